use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogService, Product};
use crate::domain::common::OwnerContext;

#[derive(Debug, Deserialize)]
pub struct GetProductCommand {
  pub owner_id: Uuid,
  pub product_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ProductDto {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub unit_price: Decimal,
  pub default_tax_rate: Option<Decimal>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
  fn from(product: Product) -> Self {
    Self {
      id: product.id,
      name: product.name.value().to_string(),
      description: product.description,
      unit_price: product.unit_price.amount(),
      default_tax_rate: product.default_tax_rate.map(|r| r.value()),
      created_at: product.created_at,
      updated_at: product.updated_at,
    }
  }
}

pub struct GetProductUseCase {
  catalog_service: Arc<CatalogService>,
}

impl GetProductUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: GetProductCommand) -> Result<ProductDto, CatalogError> {
    let product = self
      .catalog_service
      .get_product(OwnerContext::new(command.owner_id), command.product_id)
      .await?;
    Ok(product.into())
  }
}
