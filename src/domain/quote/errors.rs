use thiserror::Error;
use uuid::Uuid;

use super::value_objects::QuoteStatus;
use crate::domain::catalog::CatalogError;
use crate::domain::common::ErrorKind;
use crate::domain::invoice::InvoiceError;
use crate::domain::value_objects::ValueObjectError;

#[derive(Debug, Error)]
pub enum QuoteError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Quote not found: {0}")]
  QuoteNotFound(Uuid),

  #[error("Client not found: {0}")]
  ClientNotFound(Uuid),

  #[error("Product not found: {0}")]
  ProductNotFound(Uuid),

  #[error("No line items provided")]
  NoLineItems,

  #[error("Quote {0} has been converted to an invoice and can no longer be modified")]
  QuoteConverted(Uuid),

  #[error("Invalid status transition from {from} to {to}")]
  InvalidStatusTransition { from: QuoteStatus, to: QuoteStatus },

  #[error("Quote {0} was modified concurrently; reload and try again")]
  ConcurrentModification(Uuid),

  #[error("Invoice error: {0}")]
  Invoice(#[from] InvoiceError),

  #[error("Catalog error: {0}")]
  Catalog(#[from] CatalogError),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl QuoteError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      QuoteError::Validation(_) | QuoteError::NoLineItems => ErrorKind::Validation,
      QuoteError::QuoteNotFound(_) | QuoteError::ClientNotFound(_) | QuoteError::ProductNotFound(_) => {
        ErrorKind::NotFound
      }
      QuoteError::QuoteConverted(_)
      | QuoteError::InvalidStatusTransition { .. }
      | QuoteError::ConcurrentModification(_) => ErrorKind::BusinessRule,
      QuoteError::Invoice(e) => e.kind(),
      QuoteError::Catalog(e) => e.kind(),
      QuoteError::Database(_) => ErrorKind::Persistence,
    }
  }
}
