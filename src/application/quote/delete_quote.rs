use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::common::OwnerContext;
use crate::domain::quote::{QuoteError, QuoteService};

#[derive(Debug, Deserialize)]
pub struct DeleteQuoteCommand {
  pub owner_id: Uuid,
  pub quote_id: Uuid,
}

pub struct DeleteQuoteUseCase {
  quote_service: Arc<QuoteService>,
}

impl DeleteQuoteUseCase {
  pub fn new(quote_service: Arc<QuoteService>) -> Self {
    Self { quote_service }
  }

  pub async fn execute(&self, command: DeleteQuoteCommand) -> Result<(), QuoteError> {
    self
      .quote_service
      .delete_quote(OwnerContext::new(command.owner_id), command.quote_id)
      .await
  }
}
