use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::common::OwnerContext;
use crate::domain::quote::{Discount, Quote, QuoteError, QuoteService, QuoteStatus};

#[derive(Debug, Deserialize)]
pub struct GetQuoteDetailsCommand {
  pub owner_id: Uuid,
  pub quote_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct QuoteLineItemDto {
  pub id: Uuid,
  pub product_id: Uuid,
  pub quantity: Decimal,
  pub unit_price: Decimal,
  pub tax_rate: Decimal,
  pub line_total: Decimal,
  pub tax_amount: Decimal,
  pub position: i32,
}

#[derive(Debug, Serialize)]
pub struct QuoteDetailsResponse {
  pub id: Uuid,
  pub client_id: Uuid,
  pub valid_until: NaiveDate,
  pub status: QuoteStatus,
  pub is_expired: bool,
  pub discount: Option<Discount>,
  pub notes: Option<String>,
  pub subtotal: Decimal,
  pub taxes: Decimal,
  pub discount_amount: Decimal,
  pub total: Decimal,
  pub converted_invoice_id: Option<Uuid>,
  pub line_items: Vec<QuoteLineItemDto>,
  pub version: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl QuoteDetailsResponse {
  pub fn from_quote(quote: Quote, today: NaiveDate) -> Self {
    let totals = quote.totals();
    let is_expired = quote.is_expired(today);

    Self {
      id: quote.id,
      client_id: quote.client_id,
      valid_until: quote.valid_until,
      status: quote.status,
      is_expired,
      discount: quote.discount,
      subtotal: totals.subtotal.amount(),
      taxes: totals.taxes.amount(),
      discount_amount: totals.discount_amount.amount(),
      total: totals.total.amount(),
      converted_invoice_id: quote.converted_invoice_id,
      line_items: quote
        .line_items
        .iter()
        .map(|item| QuoteLineItemDto {
          id: item.id,
          product_id: item.product_id,
          quantity: item.quantity.value(),
          unit_price: item.unit_price.amount(),
          tax_rate: item.tax_rate.value(),
          line_total: item.line_total().amount(),
          tax_amount: item.tax_amount().amount(),
          position: item.position,
        })
        .collect(),
      notes: quote.notes,
      version: quote.version,
      created_at: quote.created_at,
      updated_at: quote.updated_at,
    }
  }
}

pub struct GetQuoteDetailsUseCase {
  quote_service: Arc<QuoteService>,
}

impl GetQuoteDetailsUseCase {
  pub fn new(quote_service: Arc<QuoteService>) -> Self {
    Self { quote_service }
  }

  pub async fn execute(
    &self,
    command: GetQuoteDetailsCommand,
  ) -> Result<QuoteDetailsResponse, QuoteError> {
    let quote = self
      .quote_service
      .get_quote(OwnerContext::new(command.owner_id), command.quote_id)
      .await?;

    Ok(QuoteDetailsResponse::from_quote(quote, self.quote_service.today()))
  }
}
