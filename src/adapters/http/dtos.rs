use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::catalog::{ClientFields, ProductFields};
use crate::application::invoice::InvoiceLineItemCommand;
use crate::application::quote::{DiscountCommand, QuoteLineItemCommand};
use crate::application::template::TemplateFields;

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
  pub success: bool,
  pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
  pub fn ok(data: T) -> Self {
    Self {
      success: true,
      data,
    }
  }
}

/// Error envelope: `{"success": false, "error": {"code": ..., "message": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
  pub success: bool,
  pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
  /// Error type/code
  pub code: String,

  /// Human-readable error message
  pub message: String,
}

/// Payload returned by delete endpoints
#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
  pub id: Uuid,
  pub deleted: bool,
}

impl DeletedResponse {
  pub fn new(id: Uuid) -> Self {
    Self { id, deleted: true }
  }
}

// Clients

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClientRequest {
  #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
  pub name: String,
  #[validate(email(message = "Invalid email format"))]
  pub email: String,
  #[validate(length(max = 50))]
  pub phone: Option<String>,
  #[validate(length(max = 255))]
  pub company: Option<String>,
  #[validate(length(max = 500))]
  pub address: Option<String>,
  #[validate(length(max = 20))]
  pub postal_code: Option<String>,
  #[validate(length(max = 100))]
  pub city: Option<String>,
  #[validate(length(max = 100))]
  pub country: Option<String>,
}

impl From<ClientRequest> for ClientFields {
  fn from(request: ClientRequest) -> Self {
    ClientFields {
      name: request.name,
      email: request.email,
      phone: request.phone,
      company: request.company,
      address: request.address,
      postal_code: request.postal_code,
      city: request.city,
      country: request.country,
    }
  }
}

// Products

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductRequest {
  #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
  pub name: String,
  #[validate(length(max = 2000))]
  pub description: Option<String>,
  pub unit_price: Decimal,
  pub default_tax_rate: Option<Decimal>,
}

impl From<ProductRequest> for ProductFields {
  fn from(request: ProductRequest) -> Self {
    ProductFields {
      name: request.name,
      description: request.description,
      unit_price: request.unit_price,
      default_tax_rate: request.default_tax_rate,
    }
  }
}

// Invoices

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvoiceItemRequest {
  /// Existing item id when updating; client-side placeholder ids are accepted
  pub id: Option<Uuid>,
  pub product_id: Uuid,
  pub quantity: Decimal,
  pub unit_price: Option<Decimal>,
}

impl From<InvoiceItemRequest> for InvoiceLineItemCommand {
  fn from(request: InvoiceItemRequest) -> Self {
    InvoiceLineItemCommand {
      id: request.id,
      product_id: request.product_id,
      quantity: request.quantity,
      unit_price: request.unit_price,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
  pub client_id: Uuid,
  pub due_date: NaiveDate,
  pub vat_rate: Option<Decimal>,
  #[validate(length(min = 1, message = "At least one line item is required"), nested)]
  pub items: Vec<InvoiceItemRequest>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
  pub client_id: Uuid,
  pub due_date: NaiveDate,
  #[validate(length(min = 1, message = "Status is required"))]
  pub status: String,
  pub vat_rate: Option<Decimal>,
  #[validate(length(min = 1, message = "At least one line item is required"), nested)]
  pub items: Vec<InvoiceItemRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceListQuery {
  pub status: Option<String>,
  pub client_id: Option<Uuid>,
}

// Payments

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentRequest {
  pub amount: Decimal,
  #[validate(length(min = 1, message = "Payment method is required"))]
  pub method: String,
  pub paid_at: Option<DateTime<Utc>>,
  #[validate(length(max = 1000))]
  pub note: Option<String>,
}

// Quotes

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteItemRequest {
  pub id: Option<Uuid>,
  pub product_id: Uuid,
  pub quantity: Decimal,
  pub unit_price: Option<Decimal>,
  pub tax_rate: Option<Decimal>,
}

impl From<QuoteItemRequest> for QuoteLineItemCommand {
  fn from(request: QuoteItemRequest) -> Self {
    QuoteLineItemCommand {
      id: request.id,
      product_id: request.product_id,
      quantity: request.quantity,
      unit_price: request.unit_price,
      tax_rate: request.tax_rate,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DiscountRequest {
  #[serde(rename = "type")]
  #[validate(length(min = 1, message = "Discount type is required"))]
  pub kind: String,
  pub value: Decimal,
}

impl From<DiscountRequest> for DiscountCommand {
  fn from(request: DiscountRequest) -> Self {
    DiscountCommand {
      kind: request.kind,
      value: request.value,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuoteRequest {
  pub client_id: Uuid,
  pub valid_until: Option<NaiveDate>,
  #[validate(nested)]
  pub discount: Option<DiscountRequest>,
  #[validate(length(max = 5000))]
  pub notes: Option<String>,
  #[validate(length(min = 1, message = "At least one line item is required"), nested)]
  pub items: Vec<QuoteItemRequest>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuoteRequest {
  pub client_id: Uuid,
  pub valid_until: NaiveDate,
  #[validate(length(min = 1, message = "Status is required"))]
  pub status: String,
  #[validate(nested)]
  pub discount: Option<DiscountRequest>,
  #[validate(length(max = 5000))]
  pub notes: Option<String>,
  #[validate(length(min = 1, message = "At least one line item is required"), nested)]
  pub items: Vec<QuoteItemRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteListQuery {
  pub status: Option<String>,
  pub client_id: Option<Uuid>,
}

// Templates

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TemplateRequest {
  #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
  pub name: String,
  #[validate(length(max = 2000))]
  pub description: Option<String>,
  #[serde(rename = "type")]
  pub kind: String,
  /// Element list; validated by the domain content model
  pub content: serde_json::Value,
  #[serde(default)]
  pub is_default: bool,
}

impl From<TemplateRequest> for TemplateFields {
  fn from(request: TemplateRequest) -> Self {
    TemplateFields {
      name: request.name,
      description: request.description,
      kind: request.kind,
      content: request.content,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateListQuery {
  #[serde(rename = "type")]
  pub kind: Option<String>,
}
