use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::get_template::TemplateDto;
use crate::domain::common::OwnerContext;
use crate::domain::template::{TemplateError, TemplateService};

#[derive(Debug, Deserialize)]
pub struct SetDefaultTemplateCommand {
  pub owner_id: Uuid,
  pub template_id: Uuid,
}

pub struct SetDefaultTemplateUseCase {
  template_service: Arc<TemplateService>,
}

impl SetDefaultTemplateUseCase {
  pub fn new(template_service: Arc<TemplateService>) -> Self {
    Self { template_service }
  }

  pub async fn execute(
    &self,
    command: SetDefaultTemplateCommand,
  ) -> Result<TemplateDto, TemplateError> {
    let template = self
      .template_service
      .set_default_template(OwnerContext::new(command.owner_id), command.template_id)
      .await?;
    Ok(template.into())
  }
}
