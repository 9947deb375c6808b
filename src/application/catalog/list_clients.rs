use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::get_client::ClientDto;
use crate::domain::catalog::{CatalogError, CatalogService};
use crate::domain::common::OwnerContext;

#[derive(Debug, Deserialize)]
pub struct ListClientsCommand {
  pub owner_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ListClientsResponse {
  pub clients: Vec<ClientDto>,
}

pub struct ListClientsUseCase {
  catalog_service: Arc<CatalogService>,
}

impl ListClientsUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: ListClientsCommand) -> Result<ListClientsResponse, CatalogError> {
    let clients = self
      .catalog_service
      .list_clients(OwnerContext::new(command.owner_id))
      .await?;

    Ok(ListClientsResponse {
      clients: clients.into_iter().map(ClientDto::from).collect(),
    })
  }
}
