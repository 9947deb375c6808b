use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::catalog::{CatalogError, CatalogService, Client};
use crate::domain::common::OwnerContext;

#[derive(Debug, Deserialize)]
pub struct GetClientCommand {
  pub owner_id: Uuid,
  pub client_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ClientDto {
  pub id: Uuid,
  pub name: String,
  pub email: String,
  pub phone: Option<String>,
  pub company: Option<String>,
  pub address: Option<String>,
  pub postal_code: Option<String>,
  pub city: Option<String>,
  pub country: Option<String>,
  /// Address lines as printed on documents
  pub address_block: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientDto {
  fn from(client: Client) -> Self {
    let address_block = client.address.format_multiline();
    Self {
      id: client.id,
      name: client.name.into_inner(),
      email: client.email.as_str().to_string(),
      phone: client.phone,
      company: client.company,
      address: client.address.address,
      postal_code: client.address.postal_code,
      city: client.address.city,
      country: client.address.country,
      address_block,
      created_at: client.created_at,
      updated_at: client.updated_at,
    }
  }
}

pub struct GetClientUseCase {
  catalog_service: Arc<CatalogService>,
}

impl GetClientUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: GetClientCommand) -> Result<ClientDto, CatalogError> {
    let client = self
      .catalog_service
      .get_client(OwnerContext::new(command.owner_id), command.client_id)
      .await?;
    Ok(client.into())
  }
}
