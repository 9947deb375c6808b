use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::observe;
use crate::adapters::http::{
  dtos::{ApiResponse, CreateQuoteRequest, DeletedResponse, QuoteListQuery, UpdateQuoteRequest},
  errors::ApiError,
  middleware::OwnerContextExt,
};
use crate::application::quote::{
  ConvertQuoteCommand, ConvertQuoteUseCase, CreateQuoteCommand, CreateQuoteUseCase,
  DeleteQuoteCommand, DeleteQuoteUseCase, DuplicateQuoteCommand, DuplicateQuoteUseCase,
  GetQuoteDetailsCommand, GetQuoteDetailsUseCase, ListQuotesCommand, ListQuotesUseCase,
  UpdateQuoteCommand, UpdateQuoteUseCase,
};

/// POST /api/v1/quotes
pub async fn create_quote_handler(
  request: web::Json<CreateQuoteRequest>,
  use_case: web::Data<Arc<CreateQuoteUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;
  let request = request.into_inner();

  let command = CreateQuoteCommand {
    owner_id: ctx.owner_id,
    client_id: request.client_id,
    valid_until: request.valid_until,
    discount: request.discount.map(Into::into),
    notes: request.notes,
    line_items: request.items.into_iter().map(Into::into).collect(),
  };
  let quote = observe("create_quote", use_case.execute(command)).await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok(quote)))
}

/// GET /api/v1/quotes?status=&client_id=
pub async fn list_quotes_handler(
  query: web::Query<QuoteListQuery>,
  use_case: web::Data<Arc<ListQuotesUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;
  let query = query.into_inner();

  let command = ListQuotesCommand {
    owner_id: ctx.owner_id,
    status: query.status,
    client_id: query.client_id,
  };
  let response = observe("list_quotes", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// GET /api/v1/quotes/{id}
pub async fn get_quote_handler(
  quote_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetQuoteDetailsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = GetQuoteDetailsCommand {
    owner_id: ctx.owner_id,
    quote_id: quote_id.into_inner(),
  };
  let quote = observe("get_quote", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(quote)))
}

/// PUT /api/v1/quotes/{id}
pub async fn update_quote_handler(
  quote_id: web::Path<Uuid>,
  request: web::Json<UpdateQuoteRequest>,
  use_case: web::Data<Arc<UpdateQuoteUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;
  let request = request.into_inner();

  let command = UpdateQuoteCommand {
    owner_id: ctx.owner_id,
    quote_id: quote_id.into_inner(),
    client_id: request.client_id,
    valid_until: request.valid_until,
    status: request.status,
    discount: request.discount.map(Into::into),
    notes: request.notes,
    line_items: request.items.into_iter().map(Into::into).collect(),
  };
  let quote = observe("update_quote", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(quote)))
}

/// DELETE /api/v1/quotes/{id}
pub async fn delete_quote_handler(
  quote_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteQuoteUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;
  let quote_id = quote_id.into_inner();

  let command = DeleteQuoteCommand {
    owner_id: ctx.owner_id,
    quote_id,
  };
  observe("delete_quote", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(DeletedResponse::new(quote_id))))
}

/// POST /api/v1/quotes/{id}/duplicate
pub async fn duplicate_quote_handler(
  quote_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DuplicateQuoteUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = DuplicateQuoteCommand {
    owner_id: ctx.owner_id,
    quote_id: quote_id.into_inner(),
  };
  let quote = observe("duplicate_quote", use_case.execute(command)).await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok(quote)))
}

/// POST /api/v1/quotes/{id}/convert
///
/// Creates an invoice from an accepted quote; responds with both records.
pub async fn convert_quote_handler(
  quote_id: web::Path<Uuid>,
  use_case: web::Data<Arc<ConvertQuoteUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = ConvertQuoteCommand {
    owner_id: ctx.owner_id,
    quote_id: quote_id.into_inner(),
  };
  let response = observe("convert_quote", use_case.execute(command)).await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok(response)))
}
