use thiserror::Error;
use uuid::Uuid;

use super::value_objects::InvoiceStatus;
use crate::domain::catalog::CatalogError;
use crate::domain::common::ErrorKind;
use crate::domain::value_objects::{Money, ValueObjectError};

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Invoice not found: {0}")]
  InvoiceNotFound(Uuid),

  #[error("Payment not found: {0}")]
  PaymentNotFound(Uuid),

  #[error("Client not found: {0}")]
  ClientNotFound(Uuid),

  #[error("Product not found: {0}")]
  ProductNotFound(Uuid),

  #[error("No line items provided")]
  NoLineItems,

  #[error("Invoice is fully paid; its status must remain PAID")]
  PaidInvoiceLocked,

  #[error("Invoice cannot be marked as paid: {remaining} still due")]
  NotFullyPaid { remaining: Money },

  #[error("Invalid status transition from {from} to {to}")]
  InvalidStatusTransition {
    from: InvoiceStatus,
    to: InvoiceStatus,
  },

  #[error("Payment of {amount} exceeds the remaining balance of {remaining}")]
  PaymentExceedsBalance { amount: Money, remaining: Money },

  #[error("Cannot record a payment on a canceled invoice")]
  InvoiceCanceled,

  #[error("Cannot delete an invoice with {0} recorded payment(s)")]
  HasPayments(usize),

  #[error("Invoice {0} was modified concurrently; reload and try again")]
  ConcurrentModification(Uuid),

  #[error("Catalog error: {0}")]
  Catalog(#[from] CatalogError),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl InvoiceError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      InvoiceError::Validation(_) | InvoiceError::NoLineItems => ErrorKind::Validation,
      InvoiceError::InvoiceNotFound(_)
      | InvoiceError::PaymentNotFound(_)
      | InvoiceError::ClientNotFound(_)
      | InvoiceError::ProductNotFound(_) => ErrorKind::NotFound,
      InvoiceError::PaidInvoiceLocked
      | InvoiceError::NotFullyPaid { .. }
      | InvoiceError::InvalidStatusTransition { .. }
      | InvoiceError::PaymentExceedsBalance { .. }
      | InvoiceError::InvoiceCanceled
      | InvoiceError::HasPayments(_)
      | InvoiceError::ConcurrentModification(_) => ErrorKind::BusinessRule,
      InvoiceError::Catalog(e) => e.kind(),
      InvoiceError::Database(_) => ErrorKind::Persistence,
    }
  }
}
