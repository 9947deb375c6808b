use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_template::TemplateDto;
use crate::domain::common::OwnerContext;
use crate::domain::template::{TemplateError, TemplateKind, TemplateService};

#[derive(Debug, Deserialize)]
pub struct ListTemplatesCommand {
  pub owner_id: Uuid,
  pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListTemplatesResponse {
  pub templates: Vec<TemplateDto>,
}

pub struct ListTemplatesUseCase {
  template_service: Arc<TemplateService>,
}

impl ListTemplatesUseCase {
  pub fn new(template_service: Arc<TemplateService>) -> Self {
    Self { template_service }
  }

  pub async fn execute(
    &self,
    command: ListTemplatesCommand,
  ) -> Result<ListTemplatesResponse, TemplateError> {
    let kind = command
      .kind
      .as_deref()
      .map(TemplateKind::from_str)
      .transpose()?;

    let templates = self
      .template_service
      .list_templates(OwnerContext::new(command.owner_id), kind)
      .await?;

    Ok(ListTemplatesResponse {
      templates: templates.into_iter().map(TemplateDto::from).collect(),
    })
  }
}
