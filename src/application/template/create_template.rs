use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_template::TemplateDto;
use crate::domain::common::OwnerContext;
use crate::domain::template::{
  TemplateContent, TemplateData, TemplateError, TemplateKind, TemplateName, TemplateService,
};

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateFields {
  pub name: String,
  pub description: Option<String>,
  pub kind: String,
  /// JSON array of positioned elements
  pub content: serde_json::Value,
}

impl TemplateFields {
  pub(crate) fn into_data(self) -> Result<TemplateData, TemplateError> {
    Ok(TemplateData {
      name: TemplateName::new(self.name)?,
      description: self.description,
      kind: TemplateKind::from_str(&self.kind)?,
      content: TemplateContent::from_json(self.content)?,
    })
  }
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplateCommand {
  pub owner_id: Uuid,
  pub template: TemplateFields,
  pub is_default: bool,
}

pub struct CreateTemplateUseCase {
  template_service: Arc<TemplateService>,
}

impl CreateTemplateUseCase {
  pub fn new(template_service: Arc<TemplateService>) -> Self {
    Self { template_service }
  }

  pub async fn execute(&self, command: CreateTemplateCommand) -> Result<TemplateDto, TemplateError> {
    let data = command.template.into_data()?;
    let template = self
      .template_service
      .create_template(OwnerContext::new(command.owner_id), data, command.is_default)
      .await?;
    Ok(template.into())
  }
}
