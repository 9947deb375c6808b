use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Client, Product};
use super::errors::CatalogError;

/// Every lookup takes the owner id; a row owned by someone else behaves
/// exactly like a missing row.
#[async_trait]
pub trait ClientRepository: Send + Sync {
  async fn create(&self, client: Client) -> Result<Client, CatalogError>;
  async fn update(&self, client: Client) -> Result<Client, CatalogError>;
  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Client>, CatalogError>;
  async fn list(&self, owner_id: Uuid) -> Result<Vec<Client>, CatalogError>;
  async fn is_referenced(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError>;
  /// Returns `false` when nothing was deleted.
  async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
  async fn create(&self, product: Product) -> Result<Product, CatalogError>;
  async fn update(&self, product: Product) -> Result<Product, CatalogError>;
  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Product>, CatalogError>;
  async fn list(&self, owner_id: Uuid) -> Result<Vec<Product>, CatalogError>;
  async fn is_referenced(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError>;
  async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, CatalogError>;
}
