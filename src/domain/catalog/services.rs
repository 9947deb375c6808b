use std::sync::Arc;
use uuid::Uuid;

use super::entities::{Client, Product};
use super::errors::CatalogError;
use super::ports::{ClientRepository, ProductRepository};
use super::value_objects::{ClientAddress, ClientName, Email, ProductName};
use crate::domain::common::OwnerContext;
use crate::domain::value_objects::{Money, TaxRate, optional_text};

/// Validated client fields, shared by create and update.
pub struct ClientData {
  pub name: ClientName,
  pub email: Email,
  pub phone: Option<String>,
  pub company: Option<String>,
  pub address: ClientAddress,
}

/// Validated product fields, shared by create and update.
pub struct ProductData {
  pub name: ProductName,
  pub description: Option<String>,
  pub unit_price: Money,
  pub default_tax_rate: Option<TaxRate>,
}

pub struct CatalogService {
  client_repo: Arc<dyn ClientRepository>,
  product_repo: Arc<dyn ProductRepository>,
}

impl CatalogService {
  pub fn new(
    client_repo: Arc<dyn ClientRepository>,
    product_repo: Arc<dyn ProductRepository>,
  ) -> Self {
    Self {
      client_repo,
      product_repo,
    }
  }

  // Client operations
  pub async fn create_client(
    &self,
    ctx: OwnerContext,
    data: ClientData,
  ) -> Result<Client, CatalogError> {
    let client = Client::new(
      ctx.owner_id,
      data.name,
      data.email,
      optional_text(data.phone),
      optional_text(data.company),
      data.address,
    );
    let client = self.client_repo.create(client).await?;
    tracing::info!(client_id = %client.id, owner_id = %ctx.owner_id, "client created");
    Ok(client)
  }

  pub async fn update_client(
    &self,
    ctx: OwnerContext,
    client_id: Uuid,
    data: ClientData,
  ) -> Result<Client, CatalogError> {
    let mut client = self.get_client(ctx, client_id).await?;
    client.update(
      data.name,
      data.email,
      optional_text(data.phone),
      optional_text(data.company),
      data.address,
    );
    self.client_repo.update(client).await
  }

  pub async fn get_client(&self, ctx: OwnerContext, client_id: Uuid) -> Result<Client, CatalogError> {
    self
      .client_repo
      .find_by_id(ctx.owner_id, client_id)
      .await?
      .ok_or(CatalogError::ClientNotFound(client_id))
  }

  pub async fn list_clients(&self, ctx: OwnerContext) -> Result<Vec<Client>, CatalogError> {
    self.client_repo.list(ctx.owner_id).await
  }

  pub async fn delete_client(&self, ctx: OwnerContext, client_id: Uuid) -> Result<(), CatalogError> {
    // Resolve first so a foreign id reports "not found" rather than "in use"
    self.get_client(ctx, client_id).await?;

    if self
      .client_repo
      .is_referenced(ctx.owner_id, client_id)
      .await?
    {
      tracing::warn!(client_id = %client_id, "refusing to delete referenced client");
      return Err(CatalogError::ClientInUse(client_id));
    }

    if !self.client_repo.delete(ctx.owner_id, client_id).await? {
      return Err(CatalogError::ClientNotFound(client_id));
    }
    tracing::info!(client_id = %client_id, owner_id = %ctx.owner_id, "client deleted");
    Ok(())
  }

  // Product operations
  pub async fn create_product(
    &self,
    ctx: OwnerContext,
    data: ProductData,
  ) -> Result<Product, CatalogError> {
    let product = Product::new(
      ctx.owner_id,
      data.name,
      optional_text(data.description),
      data.unit_price,
      data.default_tax_rate,
    );
    let product = self.product_repo.create(product).await?;
    tracing::info!(product_id = %product.id, owner_id = %ctx.owner_id, "product created");
    Ok(product)
  }

  pub async fn update_product(
    &self,
    ctx: OwnerContext,
    product_id: Uuid,
    data: ProductData,
  ) -> Result<Product, CatalogError> {
    let mut product = self.get_product(ctx, product_id).await?;
    product.update(
      data.name,
      optional_text(data.description),
      data.unit_price,
      data.default_tax_rate,
    );
    self.product_repo.update(product).await
  }

  pub async fn get_product(
    &self,
    ctx: OwnerContext,
    product_id: Uuid,
  ) -> Result<Product, CatalogError> {
    self
      .product_repo
      .find_by_id(ctx.owner_id, product_id)
      .await?
      .ok_or(CatalogError::ProductNotFound(product_id))
  }

  pub async fn list_products(&self, ctx: OwnerContext) -> Result<Vec<Product>, CatalogError> {
    self.product_repo.list(ctx.owner_id).await
  }

  pub async fn delete_product(
    &self,
    ctx: OwnerContext,
    product_id: Uuid,
  ) -> Result<(), CatalogError> {
    self.get_product(ctx, product_id).await?;

    if self
      .product_repo
      .is_referenced(ctx.owner_id, product_id)
      .await?
    {
      tracing::warn!(product_id = %product_id, "refusing to delete referenced product");
      return Err(CatalogError::ProductInUse(product_id));
    }

    if !self.product_repo.delete(ctx.owner_id, product_id).await? {
      return Err(CatalogError::ProductNotFound(product_id));
    }
    tracing::info!(product_id = %product_id, owner_id = %ctx.owner_id, "product deleted");
    Ok(())
  }
}
