use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::get_invoice_details::InvoiceDetailsResponse;
use crate::domain::common::OwnerContext;
use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Deserialize)]
pub struct DeletePaymentCommand {
  pub owner_id: Uuid,
  pub payment_id: Uuid,
}

pub struct DeletePaymentUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DeletePaymentUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  /// Returns the invoice as it stands after the payment is removed.
  pub async fn execute(
    &self,
    command: DeletePaymentCommand,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let invoice = self
      .invoice_service
      .delete_payment(OwnerContext::new(command.owner_id), command.payment_id)
      .await?;

    Ok(InvoiceDetailsResponse::from_invoice(
      invoice,
      self.invoice_service.today(),
    ))
  }
}
