use async_trait::async_trait;
use uuid::Uuid;

use super::entities::{Template, TemplateKind};
use super::errors::TemplateError;

#[async_trait]
pub trait TemplateRepository: Send + Sync {
  /// When `template.is_default` is set, any other default of the same kind
  /// is cleared in the same transaction.
  async fn create(&self, template: Template) -> Result<Template, TemplateError>;
  async fn update(&self, template: Template) -> Result<Template, TemplateError>;
  async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<bool, TemplateError>;
  async fn find_by_id(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Template>, TemplateError>;
  async fn list(&self, owner_id: Uuid, kind: Option<TemplateKind>) -> Result<Vec<Template>, TemplateError>;
  /// Makes `id` the only default of its kind for the owner, atomically.
  async fn set_default(&self, owner_id: Uuid, id: Uuid) -> Result<Option<Template>, TemplateError>;
  async fn find_default(&self, owner_id: Uuid, kind: TemplateKind) -> Result<Option<Template>, TemplateError>;
}
