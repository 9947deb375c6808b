use actix_web::{HttpResponse, Responder};
use serde_json::json;

use crate::infrastructure::metrics;

/// GET /health
pub async fn health_handler() -> impl Responder {
  HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// GET /metrics, Prometheus text exposition format
pub async fn metrics_handler() -> impl Responder {
  HttpResponse::Ok()
    .content_type("text/plain; version=0.0.4")
    .body(metrics::gather())
}
