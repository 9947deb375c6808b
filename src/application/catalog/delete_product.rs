use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogService};
use crate::domain::common::OwnerContext;

#[derive(Debug, Deserialize)]
pub struct DeleteProductCommand {
  pub owner_id: Uuid,
  pub product_id: Uuid,
}

pub struct DeleteProductUseCase {
  catalog_service: Arc<CatalogService>,
}

impl DeleteProductUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: DeleteProductCommand) -> Result<(), CatalogError> {
    self
      .catalog_service
      .delete_product(OwnerContext::new(command.owner_id), command.product_id)
      .await
  }
}
