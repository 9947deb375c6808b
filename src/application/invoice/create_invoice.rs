use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::get_invoice_details::InvoiceDetailsResponse;
use crate::domain::common::OwnerContext;
use crate::domain::invoice::{InvoiceData, InvoiceError, InvoiceItemInput, InvoiceService};
use crate::domain::value_objects::{Money, Quantity, TaxRate};

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceLineItemCommand {
  /// Existing item id on update; unknown ids are treated as new items
  pub id: Option<Uuid>,
  pub product_id: Uuid,
  pub quantity: Decimal,
  pub unit_price: Option<Decimal>,
}

impl InvoiceLineItemCommand {
  pub(crate) fn into_input(self) -> Result<InvoiceItemInput, InvoiceError> {
    Ok(InvoiceItemInput {
      id: self.id,
      product_id: self.product_id,
      quantity: Quantity::new(self.quantity)?,
      unit_price: self.unit_price.map(Money::positive).transpose()?,
    })
  }
}

pub(crate) fn parse_line_items(
  items: Vec<InvoiceLineItemCommand>,
) -> Result<Vec<InvoiceItemInput>, InvoiceError> {
  items
    .into_iter()
    .map(InvoiceLineItemCommand::into_input)
    .collect()
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceCommand {
  pub owner_id: Uuid,
  pub client_id: Uuid,
  pub due_date: NaiveDate,
  pub vat_rate: Option<Decimal>,
  pub line_items: Vec<InvoiceLineItemCommand>,
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: CreateInvoiceCommand,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let data = InvoiceData {
      client_id: command.client_id,
      due_date: command.due_date,
      vat_rate: command.vat_rate.map(TaxRate::new).transpose()?,
      line_items: parse_line_items(command.line_items)?,
    };

    let invoice = self
      .invoice_service
      .create_invoice(OwnerContext::new(command.owner_id), data)
      .await?;

    Ok(InvoiceDetailsResponse::from_invoice(
      invoice,
      self.invoice_service.today(),
    ))
  }
}
