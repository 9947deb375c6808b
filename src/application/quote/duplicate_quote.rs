use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::get_quote_details::QuoteDetailsResponse;
use crate::domain::common::OwnerContext;
use crate::domain::quote::{QuoteError, QuoteService};

#[derive(Debug, Deserialize)]
pub struct DuplicateQuoteCommand {
  pub owner_id: Uuid,
  pub quote_id: Uuid,
}

pub struct DuplicateQuoteUseCase {
  quote_service: Arc<QuoteService>,
}

impl DuplicateQuoteUseCase {
  pub fn new(quote_service: Arc<QuoteService>) -> Self {
    Self { quote_service }
  }

  pub async fn execute(
    &self,
    command: DuplicateQuoteCommand,
  ) -> Result<QuoteDetailsResponse, QuoteError> {
    let quote = self
      .quote_service
      .duplicate_quote(OwnerContext::new(command.owner_id), command.quote_id)
      .await?;

    Ok(QuoteDetailsResponse::from_quote(quote, self.quote_service.today()))
  }
}
