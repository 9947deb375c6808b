use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::get_product::ProductDto;
use crate::domain::catalog::{CatalogError, CatalogService, ProductData, ProductName};
use crate::domain::common::OwnerContext;
use crate::domain::value_objects::{Money, TaxRate};

#[derive(Debug, Clone, Deserialize)]
pub struct ProductFields {
  pub name: String,
  pub description: Option<String>,
  pub unit_price: Decimal,
  pub default_tax_rate: Option<Decimal>,
}

impl ProductFields {
  pub(crate) fn into_data(self) -> Result<ProductData, CatalogError> {
    Ok(ProductData {
      name: ProductName::new(self.name)?,
      description: self.description,
      unit_price: Money::positive(self.unit_price)?,
      default_tax_rate: self.default_tax_rate.map(TaxRate::new).transpose()?,
    })
  }
}

#[derive(Debug, Deserialize)]
pub struct CreateProductCommand {
  pub owner_id: Uuid,
  pub product: ProductFields,
}

pub struct CreateProductUseCase {
  catalog_service: Arc<CatalogService>,
}

impl CreateProductUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: CreateProductCommand) -> Result<ProductDto, CatalogError> {
    let data = command.product.into_data()?;
    let product = self
      .catalog_service
      .create_product(OwnerContext::new(command.owner_id), data)
      .await?;
    Ok(product.into())
  }
}
