use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use super::get_template::TemplateDto;
use crate::domain::common::OwnerContext;
use crate::domain::template::{TemplateError, TemplateKind, TemplateService};

#[derive(Debug, Deserialize)]
pub struct GetDefaultTemplateCommand {
  pub owner_id: Uuid,
  pub kind: String,
}

pub struct GetDefaultTemplateUseCase {
  template_service: Arc<TemplateService>,
}

impl GetDefaultTemplateUseCase {
  pub fn new(template_service: Arc<TemplateService>) -> Self {
    Self { template_service }
  }

  pub async fn execute(
    &self,
    command: GetDefaultTemplateCommand,
  ) -> Result<TemplateDto, TemplateError> {
    let kind = TemplateKind::from_str(&command.kind)?;
    let template = self
      .template_service
      .get_default_template(OwnerContext::new(command.owner_id), kind)
      .await?;
    Ok(template.into())
  }
}
