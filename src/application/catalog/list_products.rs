use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::get_product::ProductDto;
use crate::domain::catalog::{CatalogError, CatalogService};
use crate::domain::common::OwnerContext;

#[derive(Debug, Deserialize)]
pub struct ListProductsCommand {
  pub owner_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
  pub products: Vec<ProductDto>,
}

pub struct ListProductsUseCase {
  catalog_service: Arc<CatalogService>,
}

impl ListProductsUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(
    &self,
    command: ListProductsCommand,
  ) -> Result<ListProductsResponse, CatalogError> {
    let products = self
      .catalog_service
      .list_products(OwnerContext::new(command.owner_id))
      .await?;

    Ok(ListProductsResponse {
      products: products.into_iter().map(ProductDto::from).collect(),
    })
  }
}
