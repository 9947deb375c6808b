use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::observe;
use crate::adapters::http::{
  dtos::{ApiResponse, PaymentRequest},
  errors::ApiError,
  middleware::OwnerContextExt,
};
use crate::application::invoice::{
  DeletePaymentCommand, DeletePaymentUseCase, ListPaymentsCommand, ListPaymentsUseCase,
  RecordPaymentCommand, RecordPaymentUseCase,
};
use crate::infrastructure::metrics;

/// POST /api/v1/invoices/{id}/payments
///
/// Returns the new payment together with the updated invoice.
pub async fn record_payment_handler(
  invoice_id: web::Path<Uuid>,
  request: web::Json<PaymentRequest>,
  use_case: web::Data<Arc<RecordPaymentUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;
  let request = request.into_inner();

  let command = RecordPaymentCommand {
    owner_id: ctx.owner_id,
    invoice_id: invoice_id.into_inner(),
    amount: request.amount,
    method: request.method,
    paid_at: request.paid_at,
    note: request.note,
  };
  let response = observe("record_payment", use_case.execute(command)).await?;
  metrics::record_payment(response.payment.method.as_str());

  Ok(HttpResponse::Created().json(ApiResponse::ok(response)))
}

/// GET /api/v1/invoices/{id}/payments
pub async fn list_payments_handler(
  invoice_id: web::Path<Uuid>,
  use_case: web::Data<Arc<ListPaymentsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = ListPaymentsCommand {
    owner_id: ctx.owner_id,
    invoice_id: invoice_id.into_inner(),
  };
  let response = observe("list_payments", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// DELETE /api/v1/payments/{id}
///
/// Returns the invoice as it stands after the payment is removed.
pub async fn delete_payment_handler(
  payment_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeletePaymentUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = DeletePaymentCommand {
    owner_id: ctx.owner_id,
    payment_id: payment_id.into_inner(),
  };
  let invoice = observe("delete_payment", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(invoice)))
}
