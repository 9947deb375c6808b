use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::get_client::ClientDto;
use crate::domain::catalog::{
  CatalogError, CatalogService, ClientAddress, ClientData, ClientName, Email,
};
use crate::domain::common::OwnerContext;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientFields {
  pub name: String,
  pub email: String,
  pub phone: Option<String>,
  pub company: Option<String>,
  pub address: Option<String>,
  pub postal_code: Option<String>,
  pub city: Option<String>,
  pub country: Option<String>,
}

impl ClientFields {
  pub(crate) fn into_data(self) -> Result<ClientData, CatalogError> {
    Ok(ClientData {
      name: ClientName::new(self.name)?,
      email: Email::new(self.email)?,
      phone: self.phone,
      company: self.company,
      address: ClientAddress::new(self.address, self.postal_code, self.city, self.country),
    })
  }
}

#[derive(Debug, Deserialize)]
pub struct CreateClientCommand {
  pub owner_id: Uuid,
  pub client: ClientFields,
}

pub struct CreateClientUseCase {
  catalog_service: Arc<CatalogService>,
}

impl CreateClientUseCase {
  pub fn new(catalog_service: Arc<CatalogService>) -> Self {
    Self { catalog_service }
  }

  pub async fn execute(&self, command: CreateClientCommand) -> Result<ClientDto, CatalogError> {
    let data = command.client.into_data()?;
    let client = self
      .catalog_service
      .create_client(OwnerContext::new(command.owner_id), data)
      .await?;
    Ok(client.into())
  }
}
