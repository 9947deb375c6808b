use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::common::OwnerContext;
use crate::domain::template::{Template, TemplateContent, TemplateError, TemplateKind, TemplateService};

#[derive(Debug, Deserialize)]
pub struct GetTemplateCommand {
  pub owner_id: Uuid,
  pub template_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TemplateDto {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
  #[serde(rename = "type")]
  pub kind: TemplateKind,
  pub is_default: bool,
  pub content: TemplateContent,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<Template> for TemplateDto {
  fn from(template: Template) -> Self {
    Self {
      id: template.id,
      name: template.name.value().to_string(),
      description: template.description,
      kind: template.kind,
      is_default: template.is_default,
      content: template.content,
      created_at: template.created_at,
      updated_at: template.updated_at,
    }
  }
}

pub struct GetTemplateUseCase {
  template_service: Arc<TemplateService>,
}

impl GetTemplateUseCase {
  pub fn new(template_service: Arc<TemplateService>) -> Self {
    Self { template_service }
  }

  pub async fn execute(&self, command: GetTemplateCommand) -> Result<TemplateDto, TemplateError> {
    let template = self
      .template_service
      .get_template(OwnerContext::new(command.owner_id), command.template_id)
      .await?;
    Ok(template.into())
  }
}
