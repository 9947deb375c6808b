use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::create_client::ClientFields;
use super::get_client::ClientDto;
use crate::domain::catalog::{CatalogError, CatalogService};
use crate::domain::common::OwnerContext;

#[derive(Debug, Deserialize)]
pub struct UpdateClientCommand {
  pub owner_id: Uuid,
  pub client_id: Uuid,
  pub client: ClientFields,
}

pub struct UpdateClientUseCase {
  catalog_service: Arc<CatalogService>,
}

impl UpdateClientUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: UpdateClientCommand) -> Result<ClientDto, CatalogError> {
    let data = command.client.into_data()?;
    let client = self
      .catalog_service
      .update_client(OwnerContext::new(command.owner_id), command.client_id, data)
      .await?;
    Ok(client.into())
  }
}
