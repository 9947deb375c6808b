use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::observe;
use crate::adapters::http::{
  dtos::{
    ApiResponse, CreateInvoiceRequest, DeletedResponse, InvoiceListQuery, UpdateInvoiceRequest,
  },
  errors::ApiError,
  middleware::OwnerContextExt,
};
use crate::application::invoice::{
  CreateInvoiceCommand, CreateInvoiceUseCase, DeleteInvoiceCommand, DeleteInvoiceUseCase,
  DuplicateInvoiceCommand, DuplicateInvoiceUseCase, GetInvoiceDetailsCommand,
  GetInvoiceDetailsUseCase, ListInvoicesCommand, ListInvoicesUseCase, UpdateInvoiceCommand,
  UpdateInvoiceUseCase,
};

/// POST /api/v1/invoices
pub async fn create_invoice_handler(
  request: web::Json<CreateInvoiceRequest>,
  use_case: web::Data<Arc<CreateInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;
  let request = request.into_inner();

  let command = CreateInvoiceCommand {
    owner_id: ctx.owner_id,
    client_id: request.client_id,
    due_date: request.due_date,
    vat_rate: request.vat_rate,
    line_items: request.items.into_iter().map(Into::into).collect(),
  };
  let invoice = observe("create_invoice", use_case.execute(command)).await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok(invoice)))
}

/// GET /api/v1/invoices?status=&client_id=
pub async fn list_invoices_handler(
  query: web::Query<InvoiceListQuery>,
  use_case: web::Data<Arc<ListInvoicesUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;
  let query = query.into_inner();

  let command = ListInvoicesCommand {
    owner_id: ctx.owner_id,
    status: query.status,
    client_id: query.client_id,
  };
  let response = observe("list_invoices", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// GET /api/v1/invoices/{id}
pub async fn get_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = GetInvoiceDetailsCommand {
    owner_id: ctx.owner_id,
    invoice_id: invoice_id.into_inner(),
  };
  let invoice = observe("get_invoice", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(invoice)))
}

/// PUT /api/v1/invoices/{id}
pub async fn update_invoice_handler(
  invoice_id: web::Path<Uuid>,
  request: web::Json<UpdateInvoiceRequest>,
  use_case: web::Data<Arc<UpdateInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;
  let request = request.into_inner();

  let command = UpdateInvoiceCommand {
    owner_id: ctx.owner_id,
    invoice_id: invoice_id.into_inner(),
    client_id: request.client_id,
    due_date: request.due_date,
    status: request.status,
    vat_rate: request.vat_rate,
    line_items: request.items.into_iter().map(Into::into).collect(),
  };
  let invoice = observe("update_invoice", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(invoice)))
}

/// DELETE /api/v1/invoices/{id}
pub async fn delete_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;
  let invoice_id = invoice_id.into_inner();

  let command = DeleteInvoiceCommand {
    owner_id: ctx.owner_id,
    invoice_id,
  };
  observe("delete_invoice", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(DeletedResponse::new(invoice_id))))
}

/// POST /api/v1/invoices/{id}/duplicate
pub async fn duplicate_invoice_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DuplicateInvoiceUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = DuplicateInvoiceCommand {
    owner_id: ctx.owner_id,
    invoice_id: invoice_id.into_inner(),
  };
  let invoice = observe("duplicate_invoice", use_case.execute(command)).await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok(invoice)))
}
