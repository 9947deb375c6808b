use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::get_quote_details::QuoteDetailsResponse;
use crate::domain::common::OwnerContext;
use crate::domain::quote::{Discount, QuoteData, QuoteError, QuoteItemInput, QuoteService};
use crate::domain::value_objects::{Money, Quantity, TaxRate};

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteLineItemCommand {
  pub id: Option<Uuid>,
  pub product_id: Uuid,
  pub quantity: Decimal,
  pub unit_price: Option<Decimal>,
  pub tax_rate: Option<Decimal>,
}

/// Discount as submitted: `type` is `percentage` or `fixed`.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountCommand {
  #[serde(rename = "type")]
  pub kind: String,
  pub value: Decimal,
}

impl DiscountCommand {
  pub(crate) fn into_discount(self) -> Result<Discount, QuoteError> {
    Ok(Discount::from_parts(&self.kind.to_lowercase(), self.value)?)
  }
}

pub(crate) fn parse_line_items(
  items: Vec<QuoteLineItemCommand>,
) -> Result<Vec<QuoteItemInput>, QuoteError> {
  items
    .into_iter()
    .map(|item| -> Result<QuoteItemInput, QuoteError> {
      Ok(QuoteItemInput {
        id: item.id,
        product_id: item.product_id,
        quantity: Quantity::new(item.quantity)?,
        unit_price: item.unit_price.map(Money::positive).transpose()?,
        tax_rate: item.tax_rate.map(TaxRate::new).transpose()?,
      })
    })
    .collect()
}

#[derive(Debug, Deserialize)]
pub struct CreateQuoteCommand {
  pub owner_id: Uuid,
  pub client_id: Uuid,
  pub valid_until: Option<NaiveDate>,
  pub discount: Option<DiscountCommand>,
  pub notes: Option<String>,
  pub line_items: Vec<QuoteLineItemCommand>,
}

pub struct CreateQuoteUseCase {
  quote_service: Arc<QuoteService>,
}

impl CreateQuoteUseCase {
  pub fn new(quote_service: Arc<QuoteService>) -> Self {
    Self { quote_service }
  }

  pub async fn execute(&self, command: CreateQuoteCommand) -> Result<QuoteDetailsResponse, QuoteError> {
    let data = QuoteData {
      client_id: command.client_id,
      valid_until: command.valid_until,
      discount: command.discount.map(DiscountCommand::into_discount).transpose()?,
      notes: command.notes,
      line_items: parse_line_items(command.line_items)?,
    };

    let quote = self
      .quote_service
      .create_quote(OwnerContext::new(command.owner_id), data)
      .await?;

    Ok(QuoteDetailsResponse::from_quote(quote, self.quote_service.today()))
  }
}
