use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::common::OwnerContext;
use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Deserialize)]
pub struct DeleteInvoiceCommand {
  pub owner_id: Uuid,
  pub invoice_id: Uuid,
}

pub struct DeleteInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DeleteInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(&self, command: DeleteInvoiceCommand) -> Result<(), InvoiceError> {
    self
      .invoice_service
      .delete_invoice(OwnerContext::new(command.owner_id), command.invoice_id)
      .await
  }
}
