use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::ports::{ClientRepository, ProductRepository};
use crate::domain::common::{Clock, OwnerContext};
use crate::domain::invoice::{BillingSettings, Invoice};
use crate::domain::value_objects::{Money, Quantity, TaxRate, optional_text};

use super::entities::{Quote, QuoteItemDraft, QuoteRevision};
use super::errors::QuoteError;
use super::ports::QuoteRepository;
use super::value_objects::{Discount, QuoteStatus};

/// A requested quote line. Price and tax rate fall back to the product,
/// then the tax rate to the configured default.
#[derive(Debug, Clone)]
pub struct QuoteItemInput {
  pub id: Option<Uuid>,
  pub product_id: Uuid,
  pub quantity: Quantity,
  pub unit_price: Option<Money>,
  pub tax_rate: Option<TaxRate>,
}

pub struct QuoteData {
  pub client_id: Uuid,
  /// Defaults to today plus the payment terms.
  pub valid_until: Option<NaiveDate>,
  pub discount: Option<Discount>,
  pub notes: Option<String>,
  pub line_items: Vec<QuoteItemInput>,
}

pub struct QuoteUpdateData {
  pub client_id: Uuid,
  pub valid_until: NaiveDate,
  pub status: QuoteStatus,
  pub discount: Option<Discount>,
  pub notes: Option<String>,
  pub line_items: Vec<QuoteItemInput>,
}

pub struct QuoteService {
  quote_repo: Arc<dyn QuoteRepository>,
  client_repo: Arc<dyn ClientRepository>,
  product_repo: Arc<dyn ProductRepository>,
  clock: Arc<dyn Clock>,
  settings: BillingSettings,
}

impl QuoteService {
  pub fn new(
    quote_repo: Arc<dyn QuoteRepository>,
    client_repo: Arc<dyn ClientRepository>,
    product_repo: Arc<dyn ProductRepository>,
    clock: Arc<dyn Clock>,
    settings: BillingSettings,
  ) -> Self {
    Self {
      quote_repo,
      client_repo,
      product_repo,
      clock,
      settings,
    }
  }

  pub fn today(&self) -> NaiveDate {
    self.clock.today()
  }

  pub async fn create_quote(&self, ctx: OwnerContext, data: QuoteData) -> Result<Quote, QuoteError> {
    self.ensure_client(ctx, data.client_id).await?;
    let drafts = self.resolve_items(ctx, data.line_items).await?;
    let valid_until = data
      .valid_until
      .unwrap_or_else(|| self.settings.due_date_from(self.today()));

    let quote = Quote::new(
      ctx.owner_id,
      data.client_id,
      valid_until,
      data.discount,
      optional_text(data.notes),
      drafts,
      self.clock.now(),
    )?;

    let quote = self.quote_repo.create(&quote).await?;
    tracing::info!(quote_id = %quote.id, owner_id = %ctx.owner_id, total = %quote.total(), "quote created");
    Ok(quote)
  }

  pub async fn update_quote(
    &self,
    ctx: OwnerContext,
    quote_id: Uuid,
    data: QuoteUpdateData,
  ) -> Result<Quote, QuoteError> {
    let mut quote = self.get_quote(ctx, quote_id).await?;
    // Refuse before resolving anything else
    quote
      .ensure_mutable()
      .inspect_err(|_| tracing::warn!(quote_id = %quote_id, "update of converted quote refused"))?;

    self.ensure_client(ctx, data.client_id).await?;
    let line_items = self.resolve_items(ctx, data.line_items).await?;

    let changes = quote.revise(
      QuoteRevision {
        client_id: data.client_id,
        valid_until: data.valid_until,
        status: data.status,
        discount: data.discount,
        notes: optional_text(data.notes),
        line_items,
      },
      self.clock.now(),
    )?;

    let quote = self.quote_repo.update(&quote).await?;
    tracing::info!(
      quote_id = %quote.id,
      status = %quote.status,
      created = changes.created.len(),
      updated = changes.updated.len(),
      removed = changes.removed.len(),
      "quote updated"
    );
    Ok(quote)
  }

  pub async fn delete_quote(&self, ctx: OwnerContext, quote_id: Uuid) -> Result<(), QuoteError> {
    let quote = self.get_quote(ctx, quote_id).await?;
    quote
      .ensure_mutable()
      .inspect_err(|_| tracing::warn!(quote_id = %quote_id, "delete of converted quote refused"))?;

    self.quote_repo.delete(&quote).await?;
    tracing::info!(quote_id = %quote_id, owner_id = %ctx.owner_id, "quote deleted");
    Ok(())
  }

  pub async fn duplicate_quote(&self, ctx: OwnerContext, quote_id: Uuid) -> Result<Quote, QuoteError> {
    let source = self.get_quote(ctx, quote_id).await?;
    let now = self.clock.now();
    let copy = source.duplicate(self.settings.due_date_from(now.date_naive()), now);

    let copy = self.quote_repo.create(&copy).await?;
    tracing::info!(quote_id = %copy.id, source_id = %source.id, "quote duplicated");
    Ok(copy)
  }

  /// Creates the invoice and marks the quote CONVERTED atomically.
  pub async fn convert_quote(
    &self,
    ctx: OwnerContext,
    quote_id: Uuid,
  ) -> Result<(Quote, Invoice), QuoteError> {
    let mut quote = self.get_quote(ctx, quote_id).await?;
    quote
      .ensure_mutable()
      .inspect_err(|_| tracing::warn!(quote_id = %quote_id, "quote already converted"))?;

    let vat_rate = quote
      .common_tax_rate()
      .unwrap_or(self.settings.default_vat_rate);
    let now = self.clock.now();
    let invoice = quote.to_invoice(vat_rate, self.settings.due_date_from(now.date_naive()), now)?;
    quote.mark_converted(invoice.id, now)?;

    let (quote, invoice) = self.quote_repo.convert(&quote, &invoice).await?;
    tracing::info!(quote_id = %quote.id, invoice_id = %invoice.id, "quote converted to invoice");
    Ok((quote, invoice))
  }

  pub async fn get_quote(&self, ctx: OwnerContext, quote_id: Uuid) -> Result<Quote, QuoteError> {
    self
      .quote_repo
      .find_by_id(ctx.owner_id, quote_id)
      .await?
      .ok_or(QuoteError::QuoteNotFound(quote_id))
  }

  pub async fn list_quotes(
    &self,
    ctx: OwnerContext,
    status: Option<QuoteStatus>,
    client_id: Option<Uuid>,
  ) -> Result<Vec<Quote>, QuoteError> {
    let quotes = self.quote_repo.list(ctx.owner_id, client_id).await?;
    Ok(
      quotes
        .into_iter()
        .filter(|quote| status.is_none_or(|s| quote.status == s))
        .collect(),
    )
  }

  // Helpers
  async fn ensure_client(&self, ctx: OwnerContext, client_id: Uuid) -> Result<(), QuoteError> {
    self
      .client_repo
      .find_by_id(ctx.owner_id, client_id)
      .await?
      .map(|_| ())
      .ok_or(QuoteError::ClientNotFound(client_id))
  }

  async fn resolve_items(
    &self,
    ctx: OwnerContext,
    items: Vec<QuoteItemInput>,
  ) -> Result<Vec<QuoteItemDraft>, QuoteError> {
    if items.is_empty() {
      return Err(QuoteError::NoLineItems);
    }

    let mut drafts = Vec::with_capacity(items.len());
    for item in items {
      let product = self
        .product_repo
        .find_by_id(ctx.owner_id, item.product_id)
        .await?
        .ok_or(QuoteError::ProductNotFound(item.product_id))?;

      drafts.push(QuoteItemDraft {
        id: item.id,
        product_id: product.id,
        quantity: item.quantity,
        unit_price: item.unit_price.unwrap_or(product.unit_price),
        tax_rate: item
          .tax_rate
          .or(product.default_tax_rate)
          .unwrap_or(self.settings.default_vat_rate),
      });
    }
    Ok(drafts)
  }
}
