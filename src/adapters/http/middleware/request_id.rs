use actix_web::{
  Error, HttpMessage,
  body::MessageBody,
  dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
  http::header::{HeaderName, HeaderValue},
};
use futures_util::future::LocalBoxFuture;
use std::{
  future::{Ready, ready},
  rc::Rc,
};
use tracing::Instrument;
use uuid::Uuid;

const REQUEST_ID_HEADER: &str = "x-request-id";
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request ID middleware
///
/// Reuses the caller's `X-Request-ID` when it is a short printable token,
/// otherwise generates a UUID v4. The id is stored in request extensions,
/// attached to a `request` tracing span wrapping the whole call, and echoed
/// in the response headers.
///
/// # Example
///
/// ```no_run
/// use actix_web::App;
/// # use factura::adapters::http::middleware::RequestIdMiddleware;
///
/// let app = App::new()
///   .wrap(RequestIdMiddleware::default());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestIdMiddleware;

impl RequestIdMiddleware {
  pub fn new() -> Self {
    Self
  }
}

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Transform = RequestIdMiddlewareService<S>;
  type InitError = ();
  type Future = Ready<Result<Self::Transform, Self::InitError>>;

  fn new_transform(&self, service: S) -> Self::Future {
    ready(Ok(RequestIdMiddlewareService {
      service: Rc::new(service),
    }))
  }
}

pub struct RequestIdMiddlewareService<S> {
  service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddlewareService<S>
where
  S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
  S::Future: 'static,
  B: MessageBody + 'static,
{
  type Response = ServiceResponse<B>;
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  forward_ready!(service);

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let service = Rc::clone(&self.service);

    let request_id = req
      .headers()
      .get(REQUEST_ID_HEADER)
      .and_then(|h| h.to_str().ok())
      .and_then(RequestId::from_header)
      .unwrap_or_default();

    let span = tracing::info_span!(
      "request",
      request_id = %request_id,
      method = %req.method(),
      path = %req.path(),
    );

    req.extensions_mut().insert(request_id.clone());

    Box::pin(
      async move {
        let mut res = service.call(req).await?;

        if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
          res
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }

        Ok(res)
      }
      .instrument(span),
    )
  }
}

/// Correlation id of one request, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
  pub fn new() -> Self {
    Self(Uuid::new_v4().to_string())
  }

  /// Accepts an upstream id made of visible ASCII, up to 128 bytes.
  pub fn from_header(value: &str) -> Option<Self> {
    let value = value.trim();
    let acceptable = !value.is_empty()
      && value.len() <= MAX_REQUEST_ID_LEN
      && value.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| Self(value.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Default for RequestId {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Display for RequestId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// Extension trait to easily extract request ID from request
pub trait RequestIdExt {
  /// Returns None if the middleware is not configured.
  fn request_id(&self) -> Option<RequestId>;
}

impl RequestIdExt for actix_web::HttpRequest {
  fn request_id(&self) -> Option<RequestId> {
    self.extensions().get::<RequestId>().cloned()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    App, HttpResponse,
    test::{self, TestRequest},
    web,
  };

  async fn test_handler(req: actix_web::HttpRequest) -> HttpResponse {
    assert!(req.request_id().is_some());
    HttpResponse::Ok().finish()
  }

  #[actix_web::test]
  async fn test_generates_request_id() {
    let app = test::init_service(
      App::new()
        .wrap(RequestIdMiddleware::new())
        .route("/", web::get().to(test_handler)),
    )
    .await;

    let req = TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    let request_id = resp.headers().get("x-request-id").unwrap();
    assert!(Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
  }

  #[actix_web::test]
  async fn test_propagates_incoming_request_id() {
    let app = test::init_service(
      App::new()
        .wrap(RequestIdMiddleware::new())
        .route("/", web::get().to(test_handler)),
    )
    .await;

    let req = TestRequest::get()
      .uri("/")
      .insert_header(("X-Request-ID", "gateway-7f3a"))
      .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "gateway-7f3a");
  }

  #[test]
  fn test_rejects_unusable_upstream_ids() {
    assert!(RequestId::from_header("").is_none());
    assert!(RequestId::from_header("has space").is_none());
    assert!(RequestId::from_header(&"a".repeat(200)).is_none());
    assert_eq!(RequestId::from_header(" abc-123 ").unwrap().as_str(), "abc-123");
  }
}
