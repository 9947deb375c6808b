use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::observe;
use crate::adapters::http::{
  dtos::{ApiResponse, DeletedResponse, TemplateListQuery, TemplateRequest},
  errors::ApiError,
  middleware::OwnerContextExt,
};
use crate::application::template::{
  CreateTemplateCommand, CreateTemplateUseCase, DeleteTemplateCommand, DeleteTemplateUseCase,
  GetDefaultTemplateCommand, GetDefaultTemplateUseCase, GetTemplateCommand, GetTemplateUseCase,
  ListTemplatesCommand, ListTemplatesUseCase, SetDefaultTemplateCommand,
  SetDefaultTemplateUseCase, UpdateTemplateCommand, UpdateTemplateUseCase,
};

/// POST /api/v1/templates
pub async fn create_template_handler(
  request: web::Json<TemplateRequest>,
  use_case: web::Data<Arc<CreateTemplateUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;
  let request = request.into_inner();

  let command = CreateTemplateCommand {
    owner_id: ctx.owner_id,
    is_default: request.is_default,
    template: request.into(),
  };
  let template = observe("create_template", use_case.execute(command)).await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok(template)))
}

/// GET /api/v1/templates?type=
pub async fn list_templates_handler(
  query: web::Query<TemplateListQuery>,
  use_case: web::Data<Arc<ListTemplatesUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = ListTemplatesCommand {
    owner_id: ctx.owner_id,
    kind: query.into_inner().kind,
  };
  let response = observe("list_templates", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// GET /api/v1/templates/{id}
pub async fn get_template_handler(
  template_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetTemplateUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = GetTemplateCommand {
    owner_id: ctx.owner_id,
    template_id: template_id.into_inner(),
  };
  let template = observe("get_template", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(template)))
}

/// PUT /api/v1/templates/{id}
///
/// The `is_default` flag is ignored here; use the default endpoint instead.
pub async fn update_template_handler(
  template_id: web::Path<Uuid>,
  request: web::Json<TemplateRequest>,
  use_case: web::Data<Arc<UpdateTemplateUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;

  let command = UpdateTemplateCommand {
    owner_id: ctx.owner_id,
    template_id: template_id.into_inner(),
    template: request.into_inner().into(),
  };
  let template = observe("update_template", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(template)))
}

/// DELETE /api/v1/templates/{id}
pub async fn delete_template_handler(
  template_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteTemplateUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;
  let template_id = template_id.into_inner();

  let command = DeleteTemplateCommand {
    owner_id: ctx.owner_id,
    template_id,
  };
  observe("delete_template", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(DeletedResponse::new(template_id))))
}

/// POST /api/v1/templates/{id}/default
pub async fn set_default_template_handler(
  template_id: web::Path<Uuid>,
  use_case: web::Data<Arc<SetDefaultTemplateUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = SetDefaultTemplateCommand {
    owner_id: ctx.owner_id,
    template_id: template_id.into_inner(),
  };
  let template = observe("set_default_template", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(template)))
}

/// GET /api/v1/templates/defaults/{kind}
pub async fn get_default_template_handler(
  kind: web::Path<String>,
  use_case: web::Data<Arc<GetDefaultTemplateUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = GetDefaultTemplateCommand {
    owner_id: ctx.owner_id,
    kind: kind.into_inner(),
  };
  let template = observe("get_default_template", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(template)))
}
