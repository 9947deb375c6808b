use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::common::OwnerContext;
use crate::domain::quote::{QuoteError, QuoteService, QuoteStatus};

#[derive(Debug, Deserialize)]
pub struct ListQuotesCommand {
  pub owner_id: Uuid,
  pub status: Option<String>,
  pub client_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct QuoteListItemDto {
  pub id: Uuid,
  pub client_id: Uuid,
  pub valid_until: NaiveDate,
  pub status: QuoteStatus,
  pub is_expired: bool,
  pub total: Decimal,
  pub converted_invoice_id: Option<Uuid>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ListQuotesResponse {
  pub quotes: Vec<QuoteListItemDto>,
}

pub struct ListQuotesUseCase {
  quote_service: Arc<QuoteService>,
}

impl ListQuotesUseCase {
  pub fn new(quote_service: Arc<QuoteService>) -> Self {
    Self { quote_service }
  }

  pub async fn execute(&self, command: ListQuotesCommand) -> Result<ListQuotesResponse, QuoteError> {
    let status = command
      .status
      .as_deref()
      .map(QuoteStatus::from_str)
      .transpose()?;

    let quotes = self
      .quote_service
      .list_quotes(OwnerContext::new(command.owner_id), status, command.client_id)
      .await?;

    let today = self.quote_service.today();
    Ok(ListQuotesResponse {
      quotes: quotes
        .into_iter()
        .map(|quote| QuoteListItemDto {
          id: quote.id,
          client_id: quote.client_id,
          valid_until: quote.valid_until,
          status: quote.status,
          is_expired: quote.is_expired(today),
          total: quote.total().amount(),
          converted_invoice_id: quote.converted_invoice_id,
          created_at: quote.created_at,
        })
        .collect(),
    })
  }
}
