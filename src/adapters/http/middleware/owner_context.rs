use actix_web::{
  Error, HttpMessage, ResponseError,
  body::EitherBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
};
use uuid::Uuid;

use crate::{adapters::http::errors::ApiError, domain::common::OwnerContext};

/// Header set by the authenticating gateway in front of the service.
pub const OWNER_ID_HEADER: &str = "X-Owner-Id";

/// Resolves the caller's identity from `X-Owner-Id` and stores an
/// `OwnerContext` in the request extensions.
///
/// Requests without a valid UUID in the header are answered with 401 and
/// never reach the handler.
///
/// # Example
///
/// ```no_run
/// use actix_web::{App, web};
/// # use factura::adapters::http::middleware::OwnerContextMiddleware;
///
/// let app = App::new().service(
///   web::scope("/api/v1")
///     .wrap(OwnerContextMiddleware)
///     .route("/clients", web::get().to(|| async { "clients" })),
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerContextMiddleware;

impl<S, B> Transform<S, ServiceRequest> for OwnerContextMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Transform = OwnerContextMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(OwnerContextMiddlewareService {
      service: Rc::new(service),
    }))
  }
}

pub struct OwnerContextMiddlewareService<S> {
  service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for OwnerContextMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: 'static,
{
  type Response = ServiceResponse<EitherBody<B>>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);

    Box::pin(async move {
      let owner = match extract_owner(&req) {
        Ok(owner) => owner,
        Err(e) => {
          tracing::warn!(path = %req.path(), "rejected request without owner identity");
          let (request, _) = req.into_parts();
          let response = e.error_response().map_into_right_body();
          return Ok(ServiceResponse::new(request, response));
        }
      };

      req.extensions_mut().insert(owner);

      let res = service.call(req).await?;
      Ok(res.map_into_left_body())
    })
  }
}

fn extract_owner(req: &ServiceRequest) -> Result<OwnerContext, ApiError> {
  let value = req
    .headers()
    .get(OWNER_ID_HEADER)
    .and_then(|h| h.to_str().ok())
    .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", OWNER_ID_HEADER)))?;

  Uuid::parse_str(value.trim())
    .map(OwnerContext::new)
    .map_err(|_| ApiError::Unauthorized(format!("Invalid {} header", OWNER_ID_HEADER)))
}

/// Extension trait to extract the owner context from a request
pub trait OwnerContextExt {
  /// Fails with 401 when the middleware did not run for this route.
  fn owner_context(&self) -> Result<OwnerContext, ApiError>;
}

impl OwnerContextExt for actix_web::HttpRequest {
  fn owner_context(&self) -> Result<OwnerContext, ApiError> {
    self
      .extensions()
      .get::<OwnerContext>()
      .copied()
      .ok_or_else(|| ApiError::Unauthorized("Owner identity not resolved".to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    App, HttpRequest, HttpResponse,
    http::StatusCode,
    test::{self, TestRequest},
    web,
  };

  async fn echo_owner(req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let ctx = req.owner_context()?;
    Ok(HttpResponse::Ok().body(ctx.owner_id.to_string()))
  }

  #[actix_web::test]
  async fn test_owner_header_is_attached() {
    let app = test::init_service(
      App::new()
        .wrap(OwnerContextMiddleware)
        .route("/", web::get().to(echo_owner)),
    )
    .await;

    let owner_id = Uuid::new_v4();
    let req = TestRequest::get()
      .uri("/")
      .insert_header((OWNER_ID_HEADER, owner_id.to_string()))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert_eq!(body, owner_id.to_string());
  }

  #[actix_web::test]
  async fn test_missing_owner_is_unauthorized() {
    let app = test::init_service(
      App::new()
        .wrap(OwnerContextMiddleware)
        .route("/", web::get().to(echo_owner)),
    )
    .await;

    let req = TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "unauthorized");
  }

  #[actix_web::test]
  async fn test_malformed_owner_is_unauthorized() {
    let app = test::init_service(
      App::new()
        .wrap(OwnerContextMiddleware)
        .route("/", web::get().to(echo_owner)),
    )
    .await;

    let req = TestRequest::get()
      .uri("/")
      .insert_header((OWNER_ID_HEADER, "not-a-uuid"))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }
}
