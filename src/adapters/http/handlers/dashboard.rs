use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use super::observe;
use crate::adapters::http::{dtos::ApiResponse, errors::ApiError, middleware::OwnerContextExt};
use crate::application::invoice::{GetDashboardSummaryCommand, GetDashboardSummaryUseCase};

/// GET /api/v1/dashboard
pub async fn dashboard_handler(
  use_case: web::Data<Arc<GetDashboardSummaryUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = GetDashboardSummaryCommand {
    owner_id: ctx.owner_id,
  };
  let summary = observe("dashboard_summary", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(summary)))
}
