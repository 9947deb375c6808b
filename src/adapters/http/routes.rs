use actix_web::web;
use std::sync::Arc;

use crate::application::catalog::{
  CreateClientUseCase, CreateProductUseCase, DeleteClientUseCase, DeleteProductUseCase,
  GetClientUseCase, GetProductUseCase, ListClientsUseCase, ListProductsUseCase,
  UpdateClientUseCase, UpdateProductUseCase,
};
use crate::application::invoice::{
  CreateInvoiceUseCase, DeleteInvoiceUseCase, DeletePaymentUseCase, DuplicateInvoiceUseCase,
  GetDashboardSummaryUseCase, GetInvoiceDetailsUseCase, ListInvoicesUseCase, ListPaymentsUseCase,
  RecordPaymentUseCase, UpdateInvoiceUseCase,
};
use crate::application::quote::{
  ConvertQuoteUseCase, CreateQuoteUseCase, DeleteQuoteUseCase, DuplicateQuoteUseCase,
  GetQuoteDetailsUseCase, ListQuotesUseCase, UpdateQuoteUseCase,
};
use crate::application::template::{
  CreateTemplateUseCase, DeleteTemplateUseCase, GetDefaultTemplateUseCase, GetTemplateUseCase,
  ListTemplatesUseCase, SetDefaultTemplateUseCase, UpdateTemplateUseCase,
};
use crate::domain::catalog::CatalogService;
use crate::domain::invoice::InvoiceService;
use crate::domain::quote::QuoteService;
use crate::domain::template::TemplateService;

use super::errors::ApiError;
use super::handlers::{clients, dashboard, invoices, payments, products, quotes, system, templates};

/// Every use case the JSON API dispatches to.
#[derive(Clone)]
pub struct ApiUseCases {
  // Catalog
  pub create_client: Arc<CreateClientUseCase>,
  pub list_clients: Arc<ListClientsUseCase>,
  pub get_client: Arc<GetClientUseCase>,
  pub update_client: Arc<UpdateClientUseCase>,
  pub delete_client: Arc<DeleteClientUseCase>,
  pub create_product: Arc<CreateProductUseCase>,
  pub list_products: Arc<ListProductsUseCase>,
  pub get_product: Arc<GetProductUseCase>,
  pub update_product: Arc<UpdateProductUseCase>,
  pub delete_product: Arc<DeleteProductUseCase>,
  // Invoices and payments
  pub create_invoice: Arc<CreateInvoiceUseCase>,
  pub list_invoices: Arc<ListInvoicesUseCase>,
  pub get_invoice: Arc<GetInvoiceDetailsUseCase>,
  pub update_invoice: Arc<UpdateInvoiceUseCase>,
  pub delete_invoice: Arc<DeleteInvoiceUseCase>,
  pub duplicate_invoice: Arc<DuplicateInvoiceUseCase>,
  pub record_payment: Arc<RecordPaymentUseCase>,
  pub list_payments: Arc<ListPaymentsUseCase>,
  pub delete_payment: Arc<DeletePaymentUseCase>,
  pub dashboard: Arc<GetDashboardSummaryUseCase>,
  // Quotes
  pub create_quote: Arc<CreateQuoteUseCase>,
  pub list_quotes: Arc<ListQuotesUseCase>,
  pub get_quote: Arc<GetQuoteDetailsUseCase>,
  pub update_quote: Arc<UpdateQuoteUseCase>,
  pub delete_quote: Arc<DeleteQuoteUseCase>,
  pub duplicate_quote: Arc<DuplicateQuoteUseCase>,
  pub convert_quote: Arc<ConvertQuoteUseCase>,
  // Templates
  pub create_template: Arc<CreateTemplateUseCase>,
  pub list_templates: Arc<ListTemplatesUseCase>,
  pub get_template: Arc<GetTemplateUseCase>,
  pub update_template: Arc<UpdateTemplateUseCase>,
  pub delete_template: Arc<DeleteTemplateUseCase>,
  pub set_default_template: Arc<SetDefaultTemplateUseCase>,
  pub get_default_template: Arc<GetDefaultTemplateUseCase>,
}

impl ApiUseCases {
  pub fn new(
    catalog: Arc<CatalogService>,
    invoices: Arc<InvoiceService>,
    quotes: Arc<QuoteService>,
    templates: Arc<TemplateService>,
  ) -> Self {
    Self {
      create_client: Arc::new(CreateClientUseCase::new(catalog.clone())),
      list_clients: Arc::new(ListClientsUseCase::new(catalog.clone())),
      get_client: Arc::new(GetClientUseCase::new(catalog.clone())),
      update_client: Arc::new(UpdateClientUseCase::new(catalog.clone())),
      delete_client: Arc::new(DeleteClientUseCase::new(catalog.clone())),
      create_product: Arc::new(CreateProductUseCase::new(catalog.clone())),
      list_products: Arc::new(ListProductsUseCase::new(catalog.clone())),
      get_product: Arc::new(GetProductUseCase::new(catalog.clone())),
      update_product: Arc::new(UpdateProductUseCase::new(catalog.clone())),
      delete_product: Arc::new(DeleteProductUseCase::new(catalog)),
      create_invoice: Arc::new(CreateInvoiceUseCase::new(invoices.clone())),
      list_invoices: Arc::new(ListInvoicesUseCase::new(invoices.clone())),
      get_invoice: Arc::new(GetInvoiceDetailsUseCase::new(invoices.clone())),
      update_invoice: Arc::new(UpdateInvoiceUseCase::new(invoices.clone())),
      delete_invoice: Arc::new(DeleteInvoiceUseCase::new(invoices.clone())),
      duplicate_invoice: Arc::new(DuplicateInvoiceUseCase::new(invoices.clone())),
      record_payment: Arc::new(RecordPaymentUseCase::new(invoices.clone())),
      list_payments: Arc::new(ListPaymentsUseCase::new(invoices.clone())),
      delete_payment: Arc::new(DeletePaymentUseCase::new(invoices.clone())),
      dashboard: Arc::new(GetDashboardSummaryUseCase::new(invoices)),
      create_quote: Arc::new(CreateQuoteUseCase::new(quotes.clone())),
      list_quotes: Arc::new(ListQuotesUseCase::new(quotes.clone())),
      get_quote: Arc::new(GetQuoteDetailsUseCase::new(quotes.clone())),
      update_quote: Arc::new(UpdateQuoteUseCase::new(quotes.clone())),
      delete_quote: Arc::new(DeleteQuoteUseCase::new(quotes.clone())),
      duplicate_quote: Arc::new(DuplicateQuoteUseCase::new(quotes.clone())),
      convert_quote: Arc::new(ConvertQuoteUseCase::new(quotes)),
      create_template: Arc::new(CreateTemplateUseCase::new(templates.clone())),
      list_templates: Arc::new(ListTemplatesUseCase::new(templates.clone())),
      get_template: Arc::new(GetTemplateUseCase::new(templates.clone())),
      update_template: Arc::new(UpdateTemplateUseCase::new(templates.clone())),
      delete_template: Arc::new(DeleteTemplateUseCase::new(templates.clone())),
      set_default_template: Arc::new(SetDefaultTemplateUseCase::new(templates.clone())),
      get_default_template: Arc::new(GetDefaultTemplateUseCase::new(templates)),
    }
  }
}

/// Configure the billing API
///
/// Mounts every resource relative to the enclosing scope (`/api/v1` in the
/// server). The caller wraps that scope with `OwnerContextMiddleware` and the
/// rate limiter.
///
/// # Routes
///
/// - `/clients`, `/products`: CRUD
/// - `/invoices`: CRUD, `POST /{id}/duplicate`, `GET|POST /{id}/payments`
/// - `DELETE /payments/{id}`
/// - `/quotes`: CRUD, `POST /{id}/duplicate`, `POST /{id}/convert`
/// - `/templates`: CRUD, `POST /{id}/default`, `GET /defaults/{kind}`
/// - `GET /dashboard`
pub fn configure_api_routes(cfg: &mut web::ServiceConfig, use_cases: &ApiUseCases) {
  let u = use_cases.clone();

  // Extractor failures use the same envelope as every other error
  cfg
    .app_data(
      web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
      web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::Validation(err.to_string()).into()),
    )
    .app_data(
      web::PathConfig::default()
        .error_handler(|_err, _req| ApiError::NotFound("Resource not found".to_string()).into()),
    );

  cfg
    .app_data(web::Data::new(u.create_client))
    .app_data(web::Data::new(u.list_clients))
    .app_data(web::Data::new(u.get_client))
    .app_data(web::Data::new(u.update_client))
    .app_data(web::Data::new(u.delete_client))
    .app_data(web::Data::new(u.create_product))
    .app_data(web::Data::new(u.list_products))
    .app_data(web::Data::new(u.get_product))
    .app_data(web::Data::new(u.update_product))
    .app_data(web::Data::new(u.delete_product))
    .app_data(web::Data::new(u.create_invoice))
    .app_data(web::Data::new(u.list_invoices))
    .app_data(web::Data::new(u.get_invoice))
    .app_data(web::Data::new(u.update_invoice))
    .app_data(web::Data::new(u.delete_invoice))
    .app_data(web::Data::new(u.duplicate_invoice))
    .app_data(web::Data::new(u.record_payment))
    .app_data(web::Data::new(u.list_payments))
    .app_data(web::Data::new(u.delete_payment))
    .app_data(web::Data::new(u.dashboard))
    .app_data(web::Data::new(u.create_quote))
    .app_data(web::Data::new(u.list_quotes))
    .app_data(web::Data::new(u.get_quote))
    .app_data(web::Data::new(u.update_quote))
    .app_data(web::Data::new(u.delete_quote))
    .app_data(web::Data::new(u.duplicate_quote))
    .app_data(web::Data::new(u.convert_quote))
    .app_data(web::Data::new(u.create_template))
    .app_data(web::Data::new(u.list_templates))
    .app_data(web::Data::new(u.get_template))
    .app_data(web::Data::new(u.update_template))
    .app_data(web::Data::new(u.delete_template))
    .app_data(web::Data::new(u.set_default_template))
    .app_data(web::Data::new(u.get_default_template));

  cfg
    .service(
      web::scope("/clients")
        .route("", web::post().to(clients::create_client_handler))
        .route("", web::get().to(clients::list_clients_handler))
        .route("/{id}", web::get().to(clients::get_client_handler))
        .route("/{id}", web::put().to(clients::update_client_handler))
        .route("/{id}", web::delete().to(clients::delete_client_handler)),
    )
    .service(
      web::scope("/products")
        .route("", web::post().to(products::create_product_handler))
        .route("", web::get().to(products::list_products_handler))
        .route("/{id}", web::get().to(products::get_product_handler))
        .route("/{id}", web::put().to(products::update_product_handler))
        .route("/{id}", web::delete().to(products::delete_product_handler)),
    )
    .service(
      web::scope("/invoices")
        .route("", web::post().to(invoices::create_invoice_handler))
        .route("", web::get().to(invoices::list_invoices_handler))
        .route("/{id}", web::get().to(invoices::get_invoice_handler))
        .route("/{id}", web::put().to(invoices::update_invoice_handler))
        .route("/{id}", web::delete().to(invoices::delete_invoice_handler))
        .route("/{id}/duplicate", web::post().to(invoices::duplicate_invoice_handler))
        .route("/{id}/payments", web::post().to(payments::record_payment_handler))
        .route("/{id}/payments", web::get().to(payments::list_payments_handler)),
    )
    .route("/payments/{id}", web::delete().to(payments::delete_payment_handler))
    .service(
      web::scope("/quotes")
        .route("", web::post().to(quotes::create_quote_handler))
        .route("", web::get().to(quotes::list_quotes_handler))
        .route("/{id}", web::get().to(quotes::get_quote_handler))
        .route("/{id}", web::put().to(quotes::update_quote_handler))
        .route("/{id}", web::delete().to(quotes::delete_quote_handler))
        .route("/{id}/duplicate", web::post().to(quotes::duplicate_quote_handler))
        .route("/{id}/convert", web::post().to(quotes::convert_quote_handler)),
    )
    .service(
      web::scope("/templates")
        .route("", web::post().to(templates::create_template_handler))
        .route("", web::get().to(templates::list_templates_handler))
        .route("/defaults/{kind}", web::get().to(templates::get_default_template_handler))
        .route("/{id}", web::get().to(templates::get_template_handler))
        .route("/{id}", web::put().to(templates::update_template_handler))
        .route("/{id}", web::delete().to(templates::delete_template_handler))
        .route("/{id}/default", web::post().to(templates::set_default_template_handler)),
    )
    .route("/dashboard", web::get().to(dashboard::dashboard_handler));
}

/// Unauthenticated probes mounted at the server root.
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(system::health_handler))
    .route("/metrics", web::get().to(system::metrics_handler));
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::adapters::http::middleware::{OWNER_ID_HEADER, OwnerContextMiddleware};
  use crate::infrastructure::persistence::memory::Fixture;
  use actix_web::{
    App,
    http::StatusCode,
    test::{self, TestRequest},
  };
  use rust_decimal::Decimal;
  use serde_json::{Value, json};
  use std::str::FromStr;
  use uuid::Uuid;

  fn decimal(value: &Value) -> Decimal {
    match value {
      Value::String(s) => Decimal::from_str(s).unwrap(),
      other => Decimal::from_str(&other.to_string()).unwrap(),
    }
  }

  macro_rules! api {
    ($fx:expr) => {{
      let use_cases = ApiUseCases::new(
        $fx.catalog.clone(),
        $fx.invoices.clone(),
        $fx.quotes.clone(),
        $fx.templates.clone(),
      );
      test::init_service(
        App::new().configure(configure_system_routes).service(
          web::scope("/api/v1")
            .wrap(OwnerContextMiddleware)
            .configure(move |cfg| configure_api_routes(cfg, &use_cases)),
        ),
      )
      .await
    }};
  }

  fn as_owner(req: TestRequest, owner: Uuid) -> TestRequest {
    req.insert_header((OWNER_ID_HEADER, owner.to_string()))
  }

  #[actix_web::test]
  async fn test_invoice_payment_flow_over_http() {
    let fx = Fixture::on(Fixture::day(2026, 3, 10));
    let owner = fx.owner.owner_id;
    let app = api!(fx);

    let req = as_owner(TestRequest::post().uri("/api/v1/clients"), owner)
      .set_json(json!({ "name": "Acme", "email": "billing@acme.test" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    let client_id = body["data"]["id"].as_str().unwrap().to_string();

    let mut product_ids = Vec::new();
    for (name, price) in [("Widget", "50"), ("Service", "100")] {
      let req = as_owner(TestRequest::post().uri("/api/v1/products"), owner)
        .set_json(json!({ "name": name, "unit_price": price }))
        .to_request();
      let body: Value = test::call_and_read_body_json(&app, req).await;
      product_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let req = as_owner(TestRequest::post().uri("/api/v1/invoices"), owner)
      .set_json(json!({
        "client_id": client_id,
        "due_date": "2026-03-01",
        "vat_rate": "20",
        "items": [
          { "product_id": product_ids[0], "quantity": "2" },
          { "product_id": product_ids[1], "quantity": "1" }
        ]
      }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice: Value = test::read_body_json(resp).await;
    let invoice_id = invoice["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(decimal(&invoice["data"]["total_ht"]), Decimal::from(200));
    assert_eq!(decimal(&invoice["data"]["vat_amount"]), Decimal::from(40));
    assert_eq!(decimal(&invoice["data"]["total"]), Decimal::from(240));
    assert_eq!(invoice["data"]["status"], "OVERDUE");

    // Overpaying is a business rule violation
    let req = as_owner(
      TestRequest::post().uri(&format!("/api/v1/invoices/{}/payments", invoice_id)),
      owner,
    )
    .set_json(json!({ "amount": "300", "method": "card" }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "business_rule_violation");

    let req = as_owner(
      TestRequest::post().uri(&format!("/api/v1/invoices/{}/payments", invoice_id)),
      owner,
    )
    .set_json(json!({ "amount": "240", "method": "card" }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["invoice"]["status"], "PAID");
    assert_eq!(decimal(&body["data"]["invoice"]["remaining_amount"]), Decimal::ZERO);
    let payment_id = body["data"]["payment"]["id"].as_str().unwrap().to_string();

    let req = as_owner(TestRequest::delete().uri(&format!("/api/v1/invoices/{}", invoice_id)), owner)
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = as_owner(TestRequest::delete().uri(&format!("/api/v1/payments/{}", payment_id)), owner)
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "OVERDUE");

    let req = as_owner(TestRequest::get().uri("/api/v1/dashboard"), owner).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["overdue_count"], 1);

    let req = as_owner(TestRequest::delete().uri(&format!("/api/v1/invoices/{}", invoice_id)), owner)
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["deleted"], true);
  }

  #[actix_web::test]
  async fn test_other_owner_gets_not_found() {
    let fx = Fixture::on(Fixture::day(2026, 3, 10));
    let client = fx.client("Acme").await;
    let app = api!(fx);

    let req = as_owner(
      TestRequest::get().uri(&format!("/api/v1/clients/{}", client.id)),
      Uuid::new_v4(),
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "not_found");
  }

  #[actix_web::test]
  async fn test_missing_owner_is_unauthorized() {
    let fx = Fixture::on(Fixture::day(2026, 3, 10));
    let app = api!(fx);

    let req = TestRequest::get().uri("/api/v1/clients").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
  }

  #[actix_web::test]
  async fn test_malformed_requests_use_error_envelope() {
    let fx = Fixture::on(Fixture::day(2026, 3, 10));
    let owner = fx.owner.owner_id;
    let app = api!(fx);

    let req = as_owner(TestRequest::post().uri("/api/v1/invoices"), owner)
      .set_json(json!({ "client_id": Uuid::new_v4(), "due_date": "2026-04-01", "items": [] }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "validation_error");

    let req = as_owner(TestRequest::post().uri("/api/v1/clients"), owner)
      .set_payload("{not json")
      .insert_header(("content-type", "application/json"))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);

    let req = as_owner(TestRequest::get().uri("/api/v1/quotes/not-a-uuid"), owner).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
  }

  #[actix_web::test]
  async fn test_quote_conversion_over_http() {
    let fx = Fixture::on(Fixture::day(2026, 5, 1));
    let owner = fx.owner.owner_id;
    let client = fx.client("Globex").await;
    let product = fx.product("Design", Decimal::from(100), None).await;
    let app = api!(fx);

    let req = as_owner(TestRequest::post().uri("/api/v1/quotes"), owner)
      .set_json(json!({
        "client_id": client.id,
        "discount": { "type": "fixed", "value": "10" },
        "items": [{ "product_id": product.id, "quantity": "1", "tax_rate": "20" }]
      }))
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let quote_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(decimal(&body["data"]["total"]), Decimal::from(110));

    let req = as_owner(TestRequest::post().uri(&format!("/api/v1/quotes/{}/convert", quote_id)), owner)
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["quote"]["status"], "CONVERTED");
    assert_eq!(body["data"]["invoice"]["status"], "PENDING");

    let req = as_owner(TestRequest::put().uri(&format!("/api/v1/quotes/{}", quote_id)), owner)
      .set_json(json!({
        "client_id": client.id,
        "valid_until": "2026-06-30",
        "status": "DRAFT",
        "items": [{ "product_id": product.id, "quantity": "2" }]
      }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
  }

  #[actix_web::test]
  async fn test_template_default_switch_over_http() {
    let fx = Fixture::on(Fixture::day(2026, 6, 1));
    let owner = fx.owner.owner_id;
    let app = api!(fx);

    let mut ids = Vec::new();
    for (name, is_default) in [("A", true), ("B", false)] {
      let req = as_owner(TestRequest::post().uri("/api/v1/templates"), owner)
        .set_json(json!({
          "name": name,
          "type": "INVOICE",
          "is_default": is_default,
          "content": [
            { "id": "title", "type": "text", "content": "INVOICE", "x": 10, "y": 10, "width": 100, "height": 20 }
          ]
        }))
        .to_request();
      let body: Value = test::call_and_read_body_json(&app, req).await;
      ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    let req = as_owner(TestRequest::post().uri(&format!("/api/v1/templates/{}/default", ids[1])), owner)
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["is_default"], true);

    let req = as_owner(TestRequest::get().uri("/api/v1/templates/defaults/invoice"), owner).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["id"], ids[1].as_str());

    let req = as_owner(TestRequest::get().uri(&format!("/api/v1/templates/{}", ids[0])), owner).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["is_default"], false);
    assert_eq!(body["data"]["content"][0]["type"], "text");
  }
}
