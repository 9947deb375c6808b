use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::invoice::{
  Invoice, InvoiceError, InvoiceLineItem, InvoiceStatus, Payment, PaymentMethod,
  ports::InvoiceRepository,
};
use crate::domain::value_objects::{Money, Quantity, TaxRate};

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: Uuid,
  owner_id: Uuid,
  client_id: Uuid,
  source_quote_id: Option<Uuid>,
  due_date: NaiveDate,
  status: String,
  vat_rate: Decimal,
  version: i32,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct InvoiceItemRow {
  id: Uuid,
  invoice_id: Uuid,
  product_id: Uuid,
  quantity: Decimal,
  unit_price: Decimal,
  position: i32,
}

impl TryFrom<InvoiceItemRow> for InvoiceLineItem {
  type Error = InvoiceError;

  fn try_from(row: InvoiceItemRow) -> Result<Self, Self::Error> {
    Ok(InvoiceLineItem::new(
      row.id,
      row.product_id,
      Quantity::new(row.quantity)?,
      Money::positive(row.unit_price)?,
      row.position,
    )?)
  }
}

#[derive(Debug, FromRow)]
struct PaymentRow {
  id: Uuid,
  invoice_id: Uuid,
  owner_id: Uuid,
  amount: Decimal,
  method: String,
  note: Option<String>,
  paid_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
  type Error = InvoiceError;

  fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
    Ok(Payment {
      id: row.id,
      invoice_id: row.invoice_id,
      owner_id: row.owner_id,
      amount: Money::positive(row.amount)?,
      method: PaymentMethod::from_str(&row.method)?,
      note: row.note,
      paid_at: row.paid_at,
      created_at: row.created_at,
    })
  }
}

impl InvoiceRow {
  fn into_invoice(
    self,
    items: Vec<InvoiceItemRow>,
    payments: Vec<PaymentRow>,
  ) -> Result<Invoice, InvoiceError> {
    let line_items = items
      .into_iter()
      .map(InvoiceLineItem::try_from)
      .collect::<Result<Vec<_>, _>>()?;
    let payments = payments
      .into_iter()
      .map(Payment::try_from)
      .collect::<Result<Vec<_>, _>>()?;

    Ok(Invoice {
      id: self.id,
      owner_id: self.owner_id,
      client_id: self.client_id,
      source_quote_id: self.source_quote_id,
      due_date: self.due_date,
      status: InvoiceStatus::from_str(&self.status)?,
      vat_rate: TaxRate::new(self.vat_rate)?,
      line_items,
      payments,
      created_at: self.created_at,
      updated_at: self.updated_at,
      version: self.version,
    })
  }
}

const INVOICE_COLUMNS: &str = "id, owner_id, client_id, source_quote_id, due_date, status, \
                               vat_rate, version, created_at, updated_at";

/// Inserts the header and line items of a new invoice. Shared with quote
/// conversion, which runs it inside its own transaction.
pub(super) async fn insert_invoice(
  conn: &mut PgConnection,
  invoice: &Invoice,
) -> Result<(), sqlx::Error> {
  let totals = invoice.totals();

  sqlx::query(
    r#"
        INSERT INTO invoices (
            id, owner_id, client_id, source_quote_id, due_date, status, vat_rate,
            total_ht, vat_amount, total, version, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
  )
  .bind(invoice.id)
  .bind(invoice.owner_id)
  .bind(invoice.client_id)
  .bind(invoice.source_quote_id)
  .bind(invoice.due_date)
  .bind(invoice.status.as_str())
  .bind(invoice.vat_rate.value())
  .bind(totals.total_ht.amount())
  .bind(totals.vat_amount.amount())
  .bind(totals.total.amount())
  .bind(invoice.version)
  .bind(invoice.created_at)
  .bind(invoice.updated_at)
  .execute(&mut *conn)
  .await?;

  upsert_items(conn, invoice).await
}

async fn upsert_items(conn: &mut PgConnection, invoice: &Invoice) -> Result<(), sqlx::Error> {
  for item in &invoice.line_items {
    sqlx::query(
      r#"
            INSERT INTO invoice_items (id, invoice_id, owner_id, product_id, quantity, unit_price, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET product_id = EXCLUDED.product_id,
                quantity = EXCLUDED.quantity,
                unit_price = EXCLUDED.unit_price,
                position = EXCLUDED.position
            WHERE invoice_items.invoice_id = EXCLUDED.invoice_id
            "#,
    )
    .bind(item.id)
    .bind(invoice.id)
    .bind(invoice.owner_id)
    .bind(item.product_id)
    .bind(item.quantity.value())
    .bind(item.unit_price.amount())
    .bind(item.position)
    .execute(&mut *conn)
    .await?;
  }
  Ok(())
}

/// Writes the header and bumps the version, only if the stored version still
/// matches `invoice.version`.
async fn write_header(conn: &mut PgConnection, invoice: &Invoice) -> Result<(), InvoiceError> {
  let totals = invoice.totals();

  let result = sqlx::query(
    r#"
        UPDATE invoices
        SET client_id = $4, due_date = $5, status = $6, vat_rate = $7,
            total_ht = $8, vat_amount = $9, total = $10, updated_at = $11,
            version = version + 1
        WHERE id = $1 AND owner_id = $2 AND version = $3
        "#,
  )
  .bind(invoice.id)
  .bind(invoice.owner_id)
  .bind(invoice.version)
  .bind(invoice.client_id)
  .bind(invoice.due_date)
  .bind(invoice.status.as_str())
  .bind(invoice.vat_rate.value())
  .bind(totals.total_ht.amount())
  .bind(totals.vat_amount.amount())
  .bind(totals.total.amount())
  .bind(invoice.updated_at)
  .execute(&mut *conn)
  .await?;

  if result.rows_affected() == 0 {
    return Err(InvoiceError::ConcurrentModification(invoice.id));
  }
  Ok(())
}

fn next_version(invoice: &Invoice) -> Invoice {
  let mut stored = invoice.clone();
  stored.version += 1;
  stored
}

pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn load_children(
    &self,
    invoice_ids: &[Uuid],
  ) -> Result<(HashMap<Uuid, Vec<InvoiceItemRow>>, HashMap<Uuid, Vec<PaymentRow>>), InvoiceError> {
    let item_rows = sqlx::query_as::<_, InvoiceItemRow>(
      r#"
            SELECT id, invoice_id, product_id, quantity, unit_price, position
            FROM invoice_items
            WHERE invoice_id = ANY($1)
            ORDER BY position ASC
            "#,
    )
    .bind(invoice_ids)
    .fetch_all(&self.pool)
    .await?;

    let payment_rows = sqlx::query_as::<_, PaymentRow>(
      r#"
            SELECT id, invoice_id, owner_id, amount, method, note, paid_at, created_at
            FROM payments
            WHERE invoice_id = ANY($1)
            ORDER BY paid_at ASC, created_at ASC
            "#,
    )
    .bind(invoice_ids)
    .fetch_all(&self.pool)
    .await?;

    let mut items: HashMap<Uuid, Vec<InvoiceItemRow>> = HashMap::new();
    for row in item_rows {
      items.entry(row.invoice_id).or_default().push(row);
    }
    let mut payments: HashMap<Uuid, Vec<PaymentRow>> = HashMap::new();
    for row in payment_rows {
      payments.entry(row.invoice_id).or_default().push(row);
    }
    Ok((items, payments))
  }

  async fn assemble(&self, rows: Vec<InvoiceRow>) -> Result<Vec<Invoice>, InvoiceError> {
    if rows.is_empty() {
      return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let (mut items, mut payments) = self.load_children(&ids).await?;

    rows
      .into_iter()
      .map(|row| {
        let row_items = items.remove(&row.id).unwrap_or_default();
        let row_payments = payments.remove(&row.id).unwrap_or_default();
        row.into_invoice(row_items, row_payments)
      })
      .collect()
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, invoice: &Invoice) -> Result<Invoice, InvoiceError> {
    let mut tx = self.pool.begin().await?;
    insert_invoice(&mut *tx, invoice).await?;
    tx.commit().await?;

    Ok(invoice.clone())
  }

  async fn update(&self, invoice: &Invoice) -> Result<Invoice, InvoiceError> {
    let mut tx = self.pool.begin().await?;

    write_header(&mut *tx, invoice).await?;

    let kept: Vec<Uuid> = invoice.line_items.iter().map(|i| i.id).collect();
    sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1 AND NOT (id = ANY($2))")
      .bind(invoice.id)
      .bind(&kept)
      .execute(&mut *tx)
      .await?;
    upsert_items(&mut *tx, invoice).await?;

    tx.commit().await?;
    Ok(next_version(invoice))
  }

  async fn delete(&self, invoice: &Invoice) -> Result<(), InvoiceError> {
    let mut tx = self.pool.begin().await?;

    sqlx::query("DELETE FROM invoice_items WHERE invoice_id = $1")
      .bind(invoice.id)
      .execute(&mut *tx)
      .await?;

    let result =
      sqlx::query("DELETE FROM invoices WHERE id = $1 AND owner_id = $2 AND version = $3")
        .bind(invoice.id)
        .bind(invoice.owner_id)
        .bind(invoice.version)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
          // a payment recorded after the caller's check
          if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_foreign_key_violation() {
              return InvoiceError::ConcurrentModification(invoice.id);
            }
          }
          InvoiceError::Database(e)
        })?;

    if result.rows_affected() == 0 {
      return Err(InvoiceError::ConcurrentModification(invoice.id));
    }

    tx.commit().await?;
    Ok(())
  }

  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Invoice>, InvoiceError> {
    let row = sqlx::query_as::<_, InvoiceRow>(&format!(
      "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1 AND owner_id = $2"
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

  async fn list(&self, owner_id: Uuid, client_id: Option<Uuid>) -> Result<Vec<Invoice>, InvoiceError> {
    let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
      r#"
            SELECT {INVOICE_COLUMNS}
            FROM invoices
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

  async fn add_payment(&self, invoice: &Invoice, payment: &Payment) -> Result<Invoice, InvoiceError> {
    let mut tx = self.pool.begin().await?;

    write_header(&mut *tx, invoice).await?;

    sqlx::query(
      r#"
            INSERT INTO payments (id, invoice_id, owner_id, amount, method, note, paid_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
    )
    .bind(payment.id)
    .bind(invoice.id)
    .bind(invoice.owner_id)
    .bind(payment.amount.amount())
    .bind(payment.method.as_str())
    .bind(&payment.note)
    .bind(payment.paid_at)
    .bind(payment.created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(next_version(invoice))
  }

  async fn remove_payment(&self, invoice: &Invoice, payment_id: Uuid) -> Result<Invoice, InvoiceError> {
    let mut tx = self.pool.begin().await?;

    write_header(&mut *tx, invoice).await?;

    let result = sqlx::query("DELETE FROM payments WHERE id = $1 AND invoice_id = $2")
      .bind(payment_id)
      .bind(invoice.id)
      .execute(&mut *tx)
      .await?;

    if result.rows_affected() == 0 {
      return Err(InvoiceError::PaymentNotFound(payment_id));
    }

    tx.commit().await?;
    Ok(next_version(invoice))
  }

  async fn find_invoice_id_by_payment(
    &self,
    owner_id: Uuid,
    payment_id: Uuid,
  ) -> Result<Option<Uuid>, InvoiceError> {
    let invoice_id = sqlx::query_scalar::<_, Uuid>(
      "SELECT invoice_id FROM payments WHERE id = $1 AND owner_id = $2",
    )
    .bind(payment_id)
    .bind(owner_id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(invoice_id)
  }
}
