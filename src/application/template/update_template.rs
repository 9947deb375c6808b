use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::create_template::TemplateFields;
use super::get_template::TemplateDto;
use crate::domain::common::OwnerContext;
use crate::domain::template::{TemplateError, TemplateService};

#[derive(Debug, Deserialize)]
pub struct UpdateTemplateCommand {
  pub owner_id: Uuid,
  pub template_id: Uuid,
  pub template: TemplateFields,
}

pub struct UpdateTemplateUseCase {
  template_service: Arc<TemplateService>,
}

impl UpdateTemplateUseCase {
  pub fn new(template_service: Arc<TemplateService>) -> Self {
    Self { template_service }
  }

  pub async fn execute(&self, command: UpdateTemplateCommand) -> Result<TemplateDto, TemplateError> {
    let data = command.template.into_data()?;
    let template = self
      .template_service
      .update_template(OwnerContext::new(command.owner_id), command.template_id, data)
      .await?;
    Ok(template.into())
  }
}
