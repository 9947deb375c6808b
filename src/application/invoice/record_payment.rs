use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_invoice_details::{InvoiceDetailsResponse, PaymentDto};
use crate::domain::common::OwnerContext;
use crate::domain::invoice::{InvoiceError, InvoiceService, PaymentData, PaymentMethod};
use crate::domain::value_objects::Money;

#[derive(Debug, Deserialize)]
pub struct RecordPaymentCommand {
  pub owner_id: Uuid,
  pub invoice_id: Uuid,
  pub amount: Decimal,
  pub method: String,
  pub paid_at: Option<DateTime<Utc>>,
  pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordPaymentResponse {
  pub payment: PaymentDto,
  pub invoice: InvoiceDetailsResponse,
}

pub struct RecordPaymentUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl RecordPaymentUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: RecordPaymentCommand,
  ) -> Result<RecordPaymentResponse, InvoiceError> {
    let data = PaymentData {
      amount: Money::positive(command.amount)?,
      method: PaymentMethod::from_str(&command.method)?,
      paid_at: command.paid_at,
      note: command.note,
    };

    let (invoice, payment) = self
      .invoice_service
      .record_payment(OwnerContext::new(command.owner_id), command.invoice_id, data)
      .await?;

    Ok(RecordPaymentResponse {
      payment: payment.into(),
      invoice: InvoiceDetailsResponse::from_invoice(invoice, self.invoice_service.today()),
    })
  }
}
