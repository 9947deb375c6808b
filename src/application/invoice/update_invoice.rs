use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::create_invoice::{InvoiceLineItemCommand, parse_line_items};
use super::get_invoice_details::InvoiceDetailsResponse;
use crate::domain::common::OwnerContext;
use crate::domain::invoice::{InvoiceError, InvoiceService, InvoiceStatus, InvoiceUpdateData};
use crate::domain::value_objects::TaxRate;

#[derive(Debug, Deserialize)]
pub struct UpdateInvoiceCommand {
  pub owner_id: Uuid,
  pub invoice_id: Uuid,
  pub client_id: Uuid,
  pub due_date: NaiveDate,
  pub status: String,
  pub vat_rate: Option<Decimal>,
  pub line_items: Vec<InvoiceLineItemCommand>,
}

pub struct UpdateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl UpdateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: UpdateInvoiceCommand,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let data = InvoiceUpdateData {
      client_id: command.client_id,
      due_date: command.due_date,
      status: InvoiceStatus::from_str(&command.status)?,
      vat_rate: command.vat_rate.map(TaxRate::new).transpose()?,
      line_items: parse_line_items(command.line_items)?,
    };

    let invoice = self
      .invoice_service
      .update_invoice(OwnerContext::new(command.owner_id), command.invoice_id, data)
      .await?;

    Ok(InvoiceDetailsResponse::from_invoice(
      invoice,
      self.invoice_service.today(),
    ))
  }
}
