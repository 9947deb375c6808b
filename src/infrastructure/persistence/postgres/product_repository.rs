use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, Product, ProductName, ports::ProductRepository};
use crate::domain::value_objects::{Money, TaxRate};

#[derive(Debug, FromRow)]
struct ProductRow {
  id: Uuid,
  owner_id: Uuid,
  name: String,
  description: Option<String>,
  unit_price: Decimal,
  default_tax_rate: Option<Decimal>,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
  type Error = CatalogError;

  fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
    Ok(Product {
      id: row.id,
      owner_id: row.owner_id,
      name: ProductName::new(row.name)?,
      description: row.description,
      unit_price: Money::positive(row.unit_price)?,
      default_tax_rate: row.default_tax_rate.map(TaxRate::new).transpose()?,
      created_at: row.created_at,
      updated_at: row.updated_at,
    })
  }
}

const PRODUCT_COLUMNS: &str =
  "id, owner_id, name, description, unit_price, default_tax_rate, created_at, updated_at";

pub struct PostgresProductRepository {
  pool: PgPool,
}

impl PostgresProductRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
  async fn create(&self, product: Product) -> Result<Product, CatalogError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
      r#"
            INSERT INTO products (
                id, owner_id, name, description, unit_price, default_tax_rate,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "#
    ))
    .bind(product.id)
    .bind(product.owner_id)
    .bind(product.name.value())
    .bind(&product.description)
    .bind(product.unit_price.amount())
    .bind(product.default_tax_rate.map(|r| r.value()))
    .bind(product.created_at)
    .bind(product.updated_at)
    .fetch_one(&self.pool)
    .await?;

    row.try_into()
  }

  async fn update(&self, product: Product) -> Result<Product, CatalogError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
      r#"
            UPDATE products
            SET name = $3, description = $4, unit_price = $5, default_tax_rate = $6,
                updated_at = $7
            WHERE id = $1 AND owner_id = $2
            RETURNING {PRODUCT_COLUMNS}
            "#
    ))
    .bind(product.id)
    .bind(product.owner_id)
    .bind(product.name.value())
    .bind(&product.description)
    .bind(product.unit_price.amount())
    .bind(product.default_tax_rate.map(|r| r.value()))
    .bind(product.updated_at)
    .fetch_optional(&self.pool)
    .await?
    .ok_or(CatalogError::ProductNotFound(product.id))?;

    row.try_into()
  }

  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Product>, CatalogError> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND owner_id = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&self.pool)
    .await?;

    row.map(|r| r.try_into()).transpose()
  }

  async fn list(&self, owner_id: Uuid) -> Result<Vec<Product>, CatalogError> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products WHERE owner_id = $1 ORDER BY name ASC"
    ))
    .bind(owner_id)
    .fetch_all(&self.pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
  }

  async fn is_referenced(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError> {
    let referenced: bool = sqlx::query_scalar(
      r#"
            SELECT EXISTS (SELECT 1 FROM invoice_items WHERE product_id = $1 AND owner_id = $2)
                OR EXISTS (SELECT 1 FROM quote_items WHERE product_id = $1 AND owner_id = $2)
            "#,
    )
    .bind(id)
    .bind(owner_id)
    .fetch_one(&self.pool)
    .await?;

    Ok(referenced)
  }

  async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1 AND owner_id = $2")
      .bind(id)
      .bind(owner_id)
      .execute(&self.pool)
      .await
      .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
          if db_err.code().as_deref() == Some("23503") {
            return CatalogError::ProductInUse(id);
          }
        }
        CatalogError::Database(e)
      })?;

    Ok(result.rows_affected() > 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::infrastructure::persistence::postgres::test_support::setup_test_db;
  use rust_decimal_macros::dec;

  #[tokio::test]
  #[ignore = "requires Docker"]
  async fn test_product_round_trip_keeps_decimals() {
    let (pool, _container) = setup_test_db().await;
    let repo = PostgresProductRepository::new(pool);
    let owner_id = Uuid::new_v4();

    let product = Product::new(
      owner_id,
      ProductName::new("Consulting day".to_string()).unwrap(),
      Some("On-site".to_string()),
      Money::positive(dec!(649.99)).unwrap(),
      Some(TaxRate::new(dec!(5.5)).unwrap()),
    );
    let created = repo.create(product).await.unwrap();
    let found = repo.find_by_id(owner_id, created.id).await.unwrap().unwrap();

    assert_eq!(found.unit_price.amount(), dec!(649.99));
    assert_eq!(found.default_tax_rate.unwrap().value(), dec!(5.5));
    assert!(repo.find_by_id(Uuid::new_v4(), created.id).await.unwrap().is_none());
  }
}
