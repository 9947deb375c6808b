use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::common::OwnerContext;
use crate::domain::template::{TemplateError, TemplateService};

#[derive(Debug, Deserialize)]
pub struct DeleteTemplateCommand {
  pub owner_id: Uuid,
  pub template_id: Uuid,
}

pub struct DeleteTemplateUseCase {
  template_service: Arc<TemplateService>,
}

impl DeleteTemplateUseCase {
  pub fn new(template_service: Arc<TemplateService>) -> Self {
    Self { template_service }
  }

  pub async fn execute(&self, command: DeleteTemplateCommand) -> Result<(), TemplateError> {
    self
      .template_service
      .delete_template(OwnerContext::new(command.owner_id), command.template_id)
      .await
  }
}
