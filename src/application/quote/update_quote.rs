use chrono::NaiveDate;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::create_quote::{DiscountCommand, QuoteLineItemCommand, parse_line_items};
use super::get_quote_details::QuoteDetailsResponse;
use crate::domain::common::OwnerContext;
use crate::domain::quote::{QuoteError, QuoteService, QuoteStatus, QuoteUpdateData};

#[derive(Debug, Deserialize)]
pub struct UpdateQuoteCommand {
  pub owner_id: Uuid,
  pub quote_id: Uuid,
  pub client_id: Uuid,
  pub valid_until: NaiveDate,
  pub status: String,
  pub discount: Option<DiscountCommand>,
  pub notes: Option<String>,
  pub line_items: Vec<QuoteLineItemCommand>,
}

pub struct UpdateQuoteUseCase {
  quote_service: Arc<QuoteService>,
}

impl UpdateQuoteUseCase {
  pub fn new(quote_service: Arc<QuoteService>) -> Self {
    Self { quote_service }
  }

  pub async fn execute(&self, command: UpdateQuoteCommand) -> Result<QuoteDetailsResponse, QuoteError> {
    let data = QuoteUpdateData {
      client_id: command.client_id,
      valid_until: command.valid_until,
      status: QuoteStatus::from_str(&command.status)?,
      discount: command.discount.map(DiscountCommand::into_discount).transpose()?,
      notes: command.notes,
      line_items: parse_line_items(command.line_items)?,
    };

    let quote = self
      .quote_service
      .update_quote(OwnerContext::new(command.owner_id), command.quote_id, data)
      .await?;

    Ok(QuoteDetailsResponse::from_quote(quote, self.quote_service.today()))
  }
}
