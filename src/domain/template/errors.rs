use thiserror::Error;
use uuid::Uuid;

use super::entities::TemplateKind;
use crate::domain::common::ErrorKind;
use crate::domain::value_objects::ValueObjectError;

#[derive(Debug, Error)]
pub enum TemplateError {
  #[error("Validation error: {0}")]
  Validation(#[from] ValueObjectError),

  #[error("Template not found: {0}")]
  TemplateNotFound(Uuid),

  #[error("No default template for {0}")]
  NoDefault(TemplateKind),

  #[error("Another default {0} template was set concurrently")]
  DefaultConflict(TemplateKind),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),
}

impl TemplateError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      TemplateError::Validation(_) => ErrorKind::Validation,
      TemplateError::TemplateNotFound(_) | TemplateError::NoDefault(_) => ErrorKind::NotFound,
      TemplateError::DefaultConflict(_) => ErrorKind::BusinessRule,
      TemplateError::Database(_) => ErrorKind::Persistence,
    }
  }
}
