use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::common::OwnerContext;
use crate::domain::invoice::{InvoiceError, InvoiceService, InvoiceStatus};

#[derive(Debug, Deserialize)]
pub struct ListInvoicesCommand {
  pub owner_id: Uuid,
  pub status: Option<String>,
  pub client_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceListItemDto {
  pub id: Uuid,
  pub client_id: Uuid,
  pub due_date: NaiveDate,
  pub status: InvoiceStatus,
  pub total: Decimal,
  pub paid_amount: Decimal,
  pub remaining_amount: Decimal,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ListInvoicesResponse {
  pub invoices: Vec<InvoiceListItemDto>,
}

pub struct ListInvoicesUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListInvoicesUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: ListInvoicesCommand,
  ) -> Result<ListInvoicesResponse, InvoiceError> {
    let status = command
      .status
      .as_deref()
      .map(InvoiceStatus::from_str)
      .transpose()?;

    let invoices = self
      .invoice_service
      .list_invoices(OwnerContext::new(command.owner_id), status, command.client_id)
      .await?;

    let today = self.invoice_service.today();
    let invoices = invoices
      .into_iter()
      .map(|invoice| {
        let ledger = invoice.ledger();
        InvoiceListItemDto {
          id: invoice.id,
          client_id: invoice.client_id,
          due_date: invoice.due_date,
          status: invoice.effective_status(today),
          total: invoice.total().amount(),
          paid_amount: ledger.paid_amount.amount(),
          remaining_amount: ledger.remaining_amount.amount(),
          created_at: invoice.created_at,
        }
      })
      .collect();

    Ok(ListInvoicesResponse { invoices })
  }
}
