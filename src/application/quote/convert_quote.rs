use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::get_quote_details::QuoteDetailsResponse;
use crate::application::invoice::InvoiceDetailsResponse;
use crate::domain::common::OwnerContext;
use crate::domain::quote::{QuoteError, QuoteService};

#[derive(Debug, Deserialize)]
pub struct ConvertQuoteCommand {
  pub owner_id: Uuid,
  pub quote_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ConvertQuoteResponse {
  pub quote: QuoteDetailsResponse,
  pub invoice: InvoiceDetailsResponse,
}

pub struct ConvertQuoteUseCase {
  quote_service: Arc<QuoteService>,
}

impl ConvertQuoteUseCase {
  pub fn new(quote_service: Arc<QuoteService>) -> Self {
    Self { quote_service }
  }

  pub async fn execute(&self, command: ConvertQuoteCommand) -> Result<ConvertQuoteResponse, QuoteError> {
    let (quote, invoice) = self
      .quote_service
      .convert_quote(OwnerContext::new(command.owner_id), command.quote_id)
      .await?;

    let today = self.quote_service.today();
    Ok(ConvertQuoteResponse {
      quote: QuoteDetailsResponse::from_quote(quote, today),
      invoice: InvoiceDetailsResponse::from_invoice(invoice, today),
    })
  }
}
