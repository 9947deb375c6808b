use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Invoice, Payment};
use super::errors::InvoiceError;

/// Persistence for the invoice aggregate (header, line items, payments).
///
/// Every write runs in a single transaction. Writes to an existing invoice
/// are conditional on `invoice.version` matching the stored version and fail
/// with `InvoiceError::ConcurrentModification` otherwise; the stored version
/// is incremented on success.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  async fn create(&self, invoice: &Invoice) -> Result<Invoice, InvoiceError>;
  /// Replaces the header and the line item set (items missing from
  /// `invoice.line_items` are deleted).
  async fn update(&self, invoice: &Invoice) -> Result<Invoice, InvoiceError>;
  async fn delete(&self, invoice: &Invoice) -> Result<(), InvoiceError>;
  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Invoice>, InvoiceError>;
  /// Newest first, optionally restricted to one client.
  async fn list(&self, owner_id: Uuid, client_id: Option<Uuid>) -> Result<Vec<Invoice>, InvoiceError>;
  /// Inserts the payment and writes the invoice status.
  async fn add_payment(&self, invoice: &Invoice, payment: &Payment) -> Result<Invoice, InvoiceError>;
  /// Deletes the payment and writes the invoice status.
  async fn remove_payment(&self, invoice: &Invoice, payment_id: Uuid) -> Result<Invoice, InvoiceError>;
  async fn find_invoice_id_by_payment(
    &self,
    owner_id: Uuid,
    payment_id: Uuid,
  ) -> Result<Option<Uuid>, InvoiceError>;
}
