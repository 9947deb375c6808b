use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::get_invoice_details::InvoiceDetailsResponse;
use crate::domain::common::OwnerContext;
use crate::domain::invoice::{InvoiceError, InvoiceService};

#[derive(Debug, Deserialize)]
pub struct DuplicateInvoiceCommand {
  pub owner_id: Uuid,
  pub invoice_id: Uuid,
}

pub struct DuplicateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl DuplicateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: DuplicateInvoiceCommand,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let invoice = self
      .invoice_service
      .duplicate_invoice(OwnerContext::new(command.owner_id), command.invoice_id)
      .await?;

    Ok(InvoiceDetailsResponse::from_invoice(
      invoice,
      self.invoice_service.today(),
    ))
  }
}
