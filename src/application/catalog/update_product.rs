use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::create_product::ProductFields;
use super::get_product::ProductDto;
use crate::domain::catalog::{CatalogError, CatalogService};
use crate::domain::common::OwnerContext;

#[derive(Debug, Deserialize)]
pub struct UpdateProductCommand {
  pub owner_id: Uuid,
  pub product_id: Uuid,
  pub product: ProductFields,
}

pub struct UpdateProductUseCase {
  catalog_service: Arc<CatalogService>,
}

impl UpdateProductUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: UpdateProductCommand) -> Result<ProductDto, CatalogError> {
    let data = command.product.into_data()?;
    let product = self
      .catalog_service
      .update_product(OwnerContext::new(command.owner_id), command.product_id, data)
      .await?;
    Ok(product.into())
  }
}
