use async_trait::async_trait;
use uuid::Uuid;

use super::entities::Quote;
use super::errors::QuoteError;
use crate::domain::invoice::Invoice;

/// Persistence for the quote aggregate. Writes to an existing quote are
/// conditional on `quote.version`, like invoices.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
  async fn create(&self, quote: &Quote) -> Result<Quote, QuoteError>;
  async fn update(&self, quote: &Quote) -> Result<Quote, QuoteError>;
  async fn delete(&self, quote: &Quote) -> Result<(), QuoteError>;
  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Quote>, QuoteError>;
  /// Newest first, optionally restricted to one client.
  async fn list(&self, owner_id: Uuid, client_id: Option<Uuid>) -> Result<Vec<Quote>, QuoteError>;
  /// Inserts `invoice` and stores the CONVERTED quote in one transaction.
  async fn convert(&self, quote: &Quote, invoice: &Invoice) -> Result<(Quote, Invoice), QuoteError>;
}
