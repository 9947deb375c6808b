use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use super::invoice_repository::insert_invoice;
use crate::domain::invoice::Invoice;
use crate::domain::quote::{
  Discount, Quote, QuoteError, QuoteLineItem, QuoteStatus, ports::QuoteRepository,
};
use crate::domain::value_objects::{Money, Quantity, TaxRate};

#[derive(Debug, FromRow)]
struct QuoteRow {
  id: Uuid,
  owner_id: Uuid,
  client_id: Uuid,
  valid_until: NaiveDate,
  status: String,
  discount_type: Option<String>,
  discount_value: Option<Decimal>,
  notes: Option<String>,
  converted_invoice_id: Option<Uuid>,
  version: i32,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct QuoteItemRow {
  id: Uuid,
  quote_id: Uuid,
  product_id: Uuid,
  quantity: Decimal,
  unit_price: Decimal,
  tax_rate: Decimal,
  position: i32,
}

impl TryFrom<QuoteItemRow> for QuoteLineItem {
  type Error = QuoteError;

  fn try_from(row: QuoteItemRow) -> Result<Self, Self::Error> {
    Ok(QuoteLineItem::new(
      row.id,
      row.product_id,
      Quantity::new(row.quantity)?,
      Money::positive(row.unit_price)?,
      TaxRate::new(row.tax_rate)?,
      row.position,
    )?)
  }
}

impl QuoteRow {
  fn into_quote(self, items: Vec<QuoteItemRow>) -> Result<Quote, QuoteError> {
    let discount = match (self.discount_type.as_deref(), self.discount_value) {
      (Some(kind), Some(value)) => Some(Discount::from_parts(kind, value)?),
      _ => None,
    };
    let line_items = items
      .into_iter()
      .map(QuoteLineItem::try_from)
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Quote {
      id: self.id,
      owner_id: self.owner_id,
      client_id: self.client_id,
      valid_until: self.valid_until,
      status: QuoteStatus::from_str(&self.status)?,
      discount,
      notes: self.notes,
      line_items,
      converted_invoice_id: self.converted_invoice_id,
      created_at: self.created_at,
      updated_at: self.updated_at,
      version: self.version,
    })
  }
}

const QUOTE_COLUMNS: &str = "id, owner_id, client_id, valid_until, status, discount_type, \
                             discount_value, notes, converted_invoice_id, version, created_at, \
                             updated_at";

async fn upsert_items(conn: &mut PgConnection, quote: &Quote) -> Result<(), sqlx::Error> {
  for item in &quote.line_items {
    sqlx::query(
      r#"
            INSERT INTO quote_items (id, quote_id, owner_id, product_id, quantity, unit_price, tax_rate, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE
            SET product_id = EXCLUDED.product_id,
                quantity = EXCLUDED.quantity,
                unit_price = EXCLUDED.unit_price,
                tax_rate = EXCLUDED.tax_rate,
                position = EXCLUDED.position
            WHERE quote_items.quote_id = EXCLUDED.quote_id
            "#,
    )
    .bind(item.id)
    .bind(quote.id)
    .bind(quote.owner_id)
    .bind(item.product_id)
    .bind(item.quantity.value())
    .bind(item.unit_price.amount())
    .bind(item.tax_rate.value())
    .bind(item.position)
    .execute(&mut *conn)
    .await?;
  }
  Ok(())
}

/// Version-conditional header write, see `InvoiceRepository`.
async fn write_header(conn: &mut PgConnection, quote: &Quote) -> Result<(), QuoteError> {
  let totals = quote.totals();

  let result = sqlx::query(
    r#"
        UPDATE quotes
        SET client_id = $4, valid_until = $5, status = $6, discount_type = $7,
            discount_value = $8, notes = $9, subtotal = $10, taxes = $11,
            discount_amount = $12, total = $13, converted_invoice_id = $14,
            updated_at = $15, version = version + 1
        WHERE id = $1 AND owner_id = $2 AND version = $3
        "#,
  )
  .bind(quote.id)
  .bind(quote.owner_id)
  .bind(quote.version)
  .bind(quote.client_id)
  .bind(quote.valid_until)
  .bind(quote.status.as_str())
  .bind(quote.discount.map(|d| d.kind()))
  .bind(quote.discount.map(|d| d.value()))
  .bind(&quote.notes)
  .bind(totals.subtotal.amount())
  .bind(totals.taxes.amount())
  .bind(totals.discount_amount.amount())
  .bind(totals.total.amount())
  .bind(quote.converted_invoice_id)
  .bind(quote.updated_at)
  .execute(&mut *conn)
  .await?;

  if result.rows_affected() == 0 {
    return Err(QuoteError::ConcurrentModification(quote.id));
  }
  Ok(())
}

fn next_version(quote: &Quote) -> Quote {
  let mut stored = quote.clone();
  stored.version += 1;
  stored
}

pub struct PostgresQuoteRepository {
  pool: PgPool,
}

impl PostgresQuoteRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn assemble(&self, rows: Vec<QuoteRow>) -> Result<Vec<Quote>, QuoteError> {
    if rows.is_empty() {
      return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let item_rows = sqlx::query_as::<_, QuoteItemRow>(
      r#"
            SELECT id, quote_id, product_id, quantity, unit_price, tax_rate, position
            FROM quote_items
            WHERE quote_id = ANY($1)
            ORDER BY position ASC
            "#,
    )
    .bind(&ids)
    .fetch_all(&self.pool)
    .await?;

    let mut items: HashMap<Uuid, Vec<QuoteItemRow>> = HashMap::new();
    for row in item_rows {
      items.entry(row.quote_id).or_default().push(row);
    }

    rows
      .into_iter()
      .map(|row| {
        let row_items = items.remove(&row.id).unwrap_or_default();
        row.into_quote(row_items)
      })
      .collect()
  }
}

#[async_trait]
impl QuoteRepository for PostgresQuoteRepository {
  async fn create(&self, quote: &Quote) -> Result<Quote, QuoteError> {
    let totals = quote.totals();
    let mut tx = self.pool.begin().await?;

    sqlx::query(
      r#"
            INSERT INTO quotes (
                id, owner_id, client_id, valid_until, status, discount_type, discount_value,
                notes, subtotal, taxes, discount_amount, total, converted_invoice_id,
                version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
    )
    .bind(quote.id)
    .bind(quote.owner_id)
    .bind(quote.client_id)
    .bind(quote.valid_until)
    .bind(quote.status.as_str())
    .bind(quote.discount.map(|d| d.kind()))
    .bind(quote.discount.map(|d| d.value()))
    .bind(&quote.notes)
    .bind(totals.subtotal.amount())
    .bind(totals.taxes.amount())
    .bind(totals.discount_amount.amount())
    .bind(totals.total.amount())
    .bind(quote.converted_invoice_id)
    .bind(quote.version)
    .bind(quote.created_at)
    .bind(quote.updated_at)
    .execute(&mut *tx)
    .await?;

    upsert_items(&mut *tx, quote).await?;
    tx.commit().await?;

    Ok(quote.clone())
  }

  async fn update(&self, quote: &Quote) -> Result<Quote, QuoteError> {
    let mut tx = self.pool.begin().await?;

    write_header(&mut *tx, quote).await?;

    let kept: Vec<Uuid> = quote.line_items.iter().map(|i| i.id).collect();
    sqlx::query("DELETE FROM quote_items WHERE quote_id = $1 AND NOT (id = ANY($2))")
      .bind(quote.id)
      .bind(&kept)
      .execute(&mut *tx)
      .await?;
    upsert_items(&mut *tx, quote).await?;

    tx.commit().await?;
    Ok(next_version(quote))
  }

  async fn delete(&self, quote: &Quote) -> Result<(), QuoteError> {
    let mut tx = self.pool.begin().await?;

    sqlx::query("DELETE FROM quote_items WHERE quote_id = $1")
      .bind(quote.id)
      .execute(&mut *tx)
      .await?;

    let result = sqlx::query("DELETE FROM quotes WHERE id = $1 AND owner_id = $2 AND version = $3")
      .bind(quote.id)
      .bind(quote.owner_id)
      .bind(quote.version)
      .execute(&mut *tx)
      .await?;

    if result.rows_affected() == 0 {
      return Err(QuoteError::ConcurrentModification(quote.id));
    }

    tx.commit().await?;
    Ok(())
  }

  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Quote>, QuoteError> {
    let row = sqlx::query_as::<_, QuoteRow>(&format!(
      "SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1 AND owner_id = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&self.pool)
    .await?;

    match row {
      Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
      None => Ok(None),
    }
  }

  async fn list(&self, owner_id: Uuid, client_id: Option<Uuid>) -> Result<Vec<Quote>, QuoteError> {
    let rows = sqlx::query_as::<_, QuoteRow>(&format!(
      r#"
            SELECT {QUOTE_COLUMNS}
            FROM quotes
            WHERE owner_id = $1 AND ($2::uuid IS NULL OR client_id = $2)
            ORDER BY created_at DESC
            "#
    ))
    .bind(owner_id)
    .bind(client_id)
    .fetch_all(&self.pool)
    .await?;

    self.assemble(rows).await
  }

  async fn convert(&self, quote: &Quote, invoice: &Invoice) -> Result<(Quote, Invoice), QuoteError> {
    let mut tx = self.pool.begin().await?;

    insert_invoice(&mut *tx, invoice).await?;
    write_header(&mut *tx, quote).await?;

    tx.commit().await?;
    Ok((next_version(quote), invoice.clone()))
  }
}
