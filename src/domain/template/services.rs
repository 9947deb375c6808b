use std::sync::Arc;
use uuid::Uuid;

use super::content::TemplateContent;
use super::entities::{Template, TemplateKind, TemplateName};
use super::errors::TemplateError;
use super::ports::TemplateRepository;
use crate::domain::common::OwnerContext;
use crate::domain::value_objects::optional_text;

pub struct TemplateData {
  pub name: TemplateName,
  pub description: Option<String>,
  pub kind: TemplateKind,
  pub content: TemplateContent,
}

pub struct TemplateService {
  template_repo: Arc<dyn TemplateRepository>,
}

impl TemplateService {
  pub fn new(template_repo: Arc<dyn TemplateRepository>) -> Self {
    Self { template_repo }
  }

  pub async fn create_template(
    &self,
    ctx: OwnerContext,
    data: TemplateData,
    is_default: bool,
  ) -> Result<Template, TemplateError> {
    let template = Template::new(
      ctx.owner_id,
      data.name,
      optional_text(data.description),
      data.kind,
      is_default,
      data.content,
    );

    let template = self.template_repo.create(template).await?;
    tracing::info!(
      template_id = %template.id,
      kind = %template.kind,
      is_default = template.is_default,
      "template created"
    );
    Ok(template)
  }

  pub async fn update_template(
    &self,
    ctx: OwnerContext,
    template_id: Uuid,
    data: TemplateData,
  ) -> Result<Template, TemplateError> {
    let mut template = self.get_template(ctx, template_id).await?;
    template.update(
      data.name,
      optional_text(data.description),
      data.kind,
      data.content,
    );
    self.template_repo.update(template).await
  }

  pub async fn delete_template(&self, ctx: OwnerContext, template_id: Uuid) -> Result<(), TemplateError> {
    if !self.template_repo.delete(ctx.owner_id, template_id).await? {
      return Err(TemplateError::TemplateNotFound(template_id));
    }
    tracing::info!(template_id = %template_id, owner_id = %ctx.owner_id, "template deleted");
    Ok(())
  }

  pub async fn get_template(&self, ctx: OwnerContext, template_id: Uuid) -> Result<Template, TemplateError> {
    self
      .template_repo
      .find_by_id(ctx.owner_id, template_id)
      .await?
      .ok_or(TemplateError::TemplateNotFound(template_id))
  }

  pub async fn list_templates(
    &self,
    ctx: OwnerContext,
    kind: Option<TemplateKind>,
  ) -> Result<Vec<Template>, TemplateError> {
    self.template_repo.list(ctx.owner_id, kind).await
  }

  pub async fn set_default_template(
    &self,
    ctx: OwnerContext,
    template_id: Uuid,
  ) -> Result<Template, TemplateError> {
    let template = self
      .template_repo
      .set_default(ctx.owner_id, template_id)
      .await?
      .ok_or(TemplateError::TemplateNotFound(template_id))?;

    tracing::info!(template_id = %template.id, kind = %template.kind, "default template changed");
    Ok(template)
  }

  /// The owner's default for `kind`, falling back to a BOTH default.
  pub async fn get_default_template(
    &self,
    ctx: OwnerContext,
    kind: TemplateKind,
  ) -> Result<Template, TemplateError> {
    if let Some(template) = self.template_repo.find_default(ctx.owner_id, kind).await? {
      return Ok(template);
    }
    if kind != TemplateKind::Both {
      if let Some(template) = self
        .template_repo
        .find_default(ctx.owner_id, TemplateKind::Both)
        .await?
      {
        return Ok(template);
      }
    }
    Err(TemplateError::NoDefault(kind))
  }
}
