use thiserror::Error;
use uuid::Uuid;

use crate::domain::common::ErrorKind;
use crate::domain::value_objects::ValueObjectError;

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Client not found: {0}")]
  ClientNotFound(Uuid),

  #[error("Product not found: {0}")]
  ProductNotFound(Uuid),

  #[error("Client {0} is still referenced by invoices or quotes")]
  ClientInUse(Uuid),

  #[error("Product {0} is still referenced by invoice or quote items")]
  ProductInUse(Uuid),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl CatalogError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      CatalogError::Validation(_) => ErrorKind::Validation,
      CatalogError::ClientNotFound(_) | CatalogError::ProductNotFound(_) => ErrorKind::NotFound,
      CatalogError::ClientInUse(_) | CatalogError::ProductInUse(_) => ErrorKind::BusinessRule,
      CatalogError::Database(_) => ErrorKind::Persistence,
    }
  }
}
