use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::catalog::CatalogError;
use crate::domain::common::ErrorKind;
use crate::domain::invoice::InvoiceError;
use crate::domain::quote::QuoteError;
use crate::domain::template::TemplateError;

use super::dtos::{ErrorBody, ErrorResponse};

/// API error type that maps domain errors to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Missing resource, or one owned by someone else (404)
  NotFound(String),

  /// Malformed or invalid input (400)
  Validation(String),

  /// Request conflicts with a business rule or a concurrent write (409)
  BusinessRule(String),

  /// Missing or malformed owner identity (401)
  Unauthorized(String),

  /// Internal server error (500)
  Internal(String),
}

impl ApiError {
  /// Stable machine-readable code returned in the error envelope.
  pub fn code(&self) -> &'static str {
    match self {
      ApiError::NotFound(_) => "not_found",
      ApiError::Validation(_) => "validation_error",
      ApiError::BusinessRule(_) => "business_rule_violation",
      ApiError::Unauthorized(_) => "unauthorized",
      ApiError::Internal(_) => "internal_error",
    }
  }

  fn from_kind(kind: ErrorKind, message: String) -> Self {
    match kind {
      ErrorKind::NotFound => ApiError::NotFound(message),
      ErrorKind::Validation => ApiError::Validation(message),
      ErrorKind::BusinessRule => ApiError::BusinessRule(message),
      ErrorKind::Persistence => ApiError::Internal(message),
    }
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::BusinessRule(msg) => write!(f, "Business rule violation: {}", msg),
      ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::BusinessRule(_) => StatusCode::CONFLICT,
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let message = match self {
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        "An internal server error occurred".to_string()
      }
      ApiError::NotFound(msg)
      | ApiError::Validation(msg)
      | ApiError::BusinessRule(msg)
      | ApiError::Unauthorized(msg) => msg.clone(),
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ErrorResponse {
        success: false,
        error: ErrorBody {
          code: self.code().to_string(),
          message,
        },
      })
  }
}

impl From<CatalogError> for ApiError {
  fn from(error: CatalogError) -> Self {
    ApiError::from_kind(error.kind(), error.to_string())
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    ApiError::from_kind(error.kind(), error.to_string())
  }
}

impl From<QuoteError> for ApiError {
  fn from(error: QuoteError) -> Self {
    ApiError::from_kind(error.kind(), error.to_string())
  }
}

impl From<TemplateError> for ApiError {
  fn from(error: TemplateError) -> Self {
    ApiError::from_kind(error.kind(), error.to_string())
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages = Vec::new();
    collect_messages(&errors, "", &mut messages);
    messages.sort();
    ApiError::Validation(messages.join(", "))
  }
}

fn collect_messages(errors: &validator::ValidationErrors, prefix: &str, out: &mut Vec<String>) {
  use validator::ValidationErrorsKind;

  for (field, kind) in errors.errors() {
    let path = if prefix.is_empty() {
      field.to_string()
    } else {
      format!("{}.{}", prefix, field)
    };
    match kind {
      ValidationErrorsKind::Field(field_errors) => {
        for error in field_errors {
          out.push(
            error
              .message
              .as_ref()
              .map(|m| format!("{}: {}", path, m))
              .unwrap_or_else(|| format!("Invalid field: {}", path)),
          );
        }
      }
      ValidationErrorsKind::Struct(nested) => collect_messages(nested, &path, out),
      ValidationErrorsKind::List(items) => {
        for (index, nested) in items {
          collect_messages(nested, &format!("{}[{}]", path, index), out);
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::InvoiceStatus;
  use crate::domain::template::TemplateKind;
  use crate::domain::value_objects::{Money, ValueObjectError};
  use actix_web::body::to_bytes;
  use rust_decimal_macros::dec;
  use uuid::Uuid;

  #[test]
  fn test_api_error_status_codes() {
    assert_eq!(
      ApiError::NotFound("x".to_string()).status_code(),
      StatusCode::NOT_FOUND
    );
    assert_eq!(
      ApiError::Validation("x".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      ApiError::BusinessRule("x".to_string()).status_code(),
      StatusCode::CONFLICT
    );
    assert_eq!(
      ApiError::Unauthorized("x".to_string()).status_code(),
      StatusCode::UNAUTHORIZED
    );
    assert_eq!(
      ApiError::Internal("x".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
  }

  #[test]
  fn test_domain_error_conversion() {
    let api_error: ApiError = InvoiceError::InvoiceNotFound(Uuid::new_v4()).into();
    assert_eq!(api_error.status_code(), StatusCode::NOT_FOUND);

    let api_error: ApiError = InvoiceError::PaymentExceedsBalance {
      amount: Money::from_decimal(dec!(300)),
      remaining: Money::from_decimal(dec!(240)),
    }
    .into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = InvoiceError::InvalidStatusTransition {
      from: InvoiceStatus::Canceled,
      to: InvoiceStatus::Paid,
    }
    .into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError =
      QuoteError::Validation(ValueObjectError::InvalidAmount("negative".to_string())).into();
    assert_eq!(api_error.status_code(), StatusCode::BAD_REQUEST);

    let api_error: ApiError = CatalogError::ClientInUse(Uuid::new_v4()).into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);

    let api_error: ApiError = TemplateError::DefaultConflict(TemplateKind::Invoice).into();
    assert_eq!(api_error.status_code(), StatusCode::CONFLICT);
    assert_eq!(api_error.code(), "business_rule_violation");

    let api_error: ApiError = TemplateError::Database(sqlx::Error::PoolTimedOut).into();
    assert_eq!(api_error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
  }

  #[actix_web::test]
  async fn test_internal_error_hides_details() {
    let response = ApiError::Internal("connection refused on 10.0.0.3".to_string()).error_response();
    let body = to_bytes(response.into_body()).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "internal_error");
    assert_eq!(json["error"]["message"], "An internal server error occurred");
  }
}
