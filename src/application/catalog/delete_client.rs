use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogService};
use crate::domain::common::OwnerContext;

#[derive(Debug, Deserialize)]
pub struct DeleteClientCommand {
  pub owner_id: Uuid,
  pub client_id: Uuid,
}

pub struct DeleteClientUseCase {
  catalog_service: Arc<CatalogService>,
}

impl DeleteClientUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: DeleteClientCommand) -> Result<(), CatalogError> {
    self
      .catalog_service
      .delete_client(OwnerContext::new(command.owner_id), command.client_id)
      .await
  }
}
