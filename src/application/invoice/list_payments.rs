use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::get_invoice_details::PaymentDto;
use crate::domain::common::OwnerContext;
use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Deserialize)]
pub struct ListPaymentsCommand {
  pub owner_id: Uuid,
  pub invoice_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ListPaymentsResponse {
  pub payments: Vec<PaymentDto>,
}

pub struct ListPaymentsUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ListPaymentsUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: ListPaymentsCommand,
  ) -> Result<ListPaymentsResponse, InvoiceError> {
    let payments = self
      .invoice_service
      .list_payments(OwnerContext::new(command.owner_id), command.invoice_id)
      .await?;

    Ok(ListPaymentsResponse {
      payments: payments.into_iter().map(PaymentDto::from).collect(),
    })
  }
}
