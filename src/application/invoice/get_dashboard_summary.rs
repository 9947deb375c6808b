use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::common::OwnerContext;
use crate::domain::invoice::{DashboardSummary, InvoiceError, InvoiceService};

#[derive(Debug, Deserialize)]
pub struct GetDashboardSummaryCommand {
  pub owner_id: Uuid,
}

pub struct GetDashboardSummaryUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl GetDashboardSummaryUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub async fn execute(
    &self,
    command: GetDashboardSummaryCommand,
  ) -> Result<DashboardSummary, InvoiceError> {
    self
      .invoice_service
      .summarize(OwnerContext::new(command.owner_id))
      .await
  }
}
