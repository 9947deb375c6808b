use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::observe;
use crate::adapters::http::{
  dtos::{ApiResponse, ClientRequest, DeletedResponse},
  errors::ApiError,
  middleware::OwnerContextExt,
};
use crate::application::catalog::{
  CreateClientCommand, CreateClientUseCase, DeleteClientCommand, DeleteClientUseCase,
  GetClientCommand, GetClientUseCase, ListClientsCommand, ListClientsUseCase, UpdateClientCommand,
  UpdateClientUseCase,
};

/// POST /api/v1/clients
pub async fn create_client_handler(
  request: web::Json<ClientRequest>,
  use_case: web::Data<Arc<CreateClientUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;

  let command = CreateClientCommand {
    owner_id: ctx.owner_id,
    client: request.into_inner().into(),
  };
  let client = observe("create_client", use_case.execute(command)).await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok(client)))
}

/// GET /api/v1/clients
pub async fn list_clients_handler(
  use_case: web::Data<Arc<ListClientsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = ListClientsCommand {
    owner_id: ctx.owner_id,
  };
  let response = observe("list_clients", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// GET /api/v1/clients/{id}
pub async fn get_client_handler(
  client_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetClientUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = GetClientCommand {
    owner_id: ctx.owner_id,
    client_id: client_id.into_inner(),
  };
  let client = observe("get_client", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(client)))
}

/// PUT /api/v1/clients/{id}
pub async fn update_client_handler(
  client_id: web::Path<Uuid>,
  request: web::Json<ClientRequest>,
  use_case: web::Data<Arc<UpdateClientUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;

  let command = UpdateClientCommand {
    owner_id: ctx.owner_id,
    client_id: client_id.into_inner(),
    client: request.into_inner().into(),
  };
  let client = observe("update_client", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(client)))
}

/// DELETE /api/v1/clients/{id}
pub async fn delete_client_handler(
  client_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteClientUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;
  let client_id = client_id.into_inner();

  let command = DeleteClientCommand {
    owner_id: ctx.owner_id,
    client_id,
  };
  observe("delete_client", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(DeletedResponse::new(client_id))))
}
