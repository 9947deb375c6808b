use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::common::OwnerContext;
use crate::domain::invoice::{Invoice, InvoiceError, InvoiceService, InvoiceStatus, Payment, PaymentMethod};

#[derive(Debug, Deserialize)]
pub struct GetInvoiceDetailsCommand {
  pub owner_id: Uuid,
  pub invoice_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct InvoiceLineItemDto {
  pub id: Uuid,
  pub product_id: Uuid,
  pub quantity: Decimal,
  pub unit_price: Decimal,
  pub line_total: Decimal,
  pub position: i32,
}

#[derive(Debug, Serialize)]
pub struct PaymentDto {
  pub id: Uuid,
  pub invoice_id: Uuid,
  pub amount: Decimal,
  pub method: PaymentMethod,
  pub note: Option<String>,
  pub paid_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl From<Payment> for PaymentDto {
  fn from(payment: Payment) -> Self {
    Self {
      id: payment.id,
      invoice_id: payment.invoice_id,
      amount: payment.amount.amount(),
      method: payment.method,
      note: payment.note,
      paid_at: payment.paid_at,
      created_at: payment.created_at,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetailsResponse {
  pub id: Uuid,
  pub client_id: Uuid,
  pub source_quote_id: Option<Uuid>,
  pub due_date: NaiveDate,
  /// Status as of today; open invoices past due read as OVERDUE
  pub status: InvoiceStatus,
  pub vat_rate: Decimal,
  pub total_ht: Decimal,
  pub vat_amount: Decimal,
  pub total: Decimal,
  pub paid_amount: Decimal,
  pub remaining_amount: Decimal,
  pub is_paid: bool,
  pub line_items: Vec<InvoiceLineItemDto>,
  pub payments: Vec<PaymentDto>,
  pub version: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl InvoiceDetailsResponse {
  pub fn from_invoice(invoice: Invoice, today: NaiveDate) -> Self {
    let totals = invoice.totals();
    let ledger = invoice.ledger();
    let status = invoice.effective_status(today);

    Self {
      id: invoice.id,
      client_id: invoice.client_id,
      source_quote_id: invoice.source_quote_id,
      due_date: invoice.due_date,
      status,
      vat_rate: invoice.vat_rate.value(),
      total_ht: totals.total_ht.amount(),
      vat_amount: totals.vat_amount.amount(),
      total: totals.total.amount(),
      paid_amount: ledger.paid_amount.amount(),
      remaining_amount: ledger.remaining_amount.amount(),
      is_paid: ledger.is_paid,
      line_items: invoice
        .line_items
        .iter()
        .map(|item| InvoiceLineItemDto {
          id: item.id,
          product_id: item.product_id,
          quantity: item.quantity.value(),
          unit_price: item.unit_price.amount(),
          line_total: item.line_total().amount(),
          position: item.position,
        })
        .collect(),
      payments: invoice.payments.into_iter().map(PaymentDto::from).collect(),
      version: invoice.version,
      created_at: invoice.created_at,
      updated_at: invoice.updated_at,
    }
  }
}

pub struct GetInvoiceDetailsUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetInvoiceDetailsUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: GetInvoiceDetailsCommand,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let invoice = self
      .invoice_service
      .get_invoice(OwnerContext::new(command.owner_id), command.invoice_id)
      .await?;

    Ok(InvoiceDetailsResponse::from_invoice(
      invoice,
      self.invoice_service.today(),
    ))
  }
}
