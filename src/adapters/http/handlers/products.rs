use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::observe;
use crate::adapters::http::{
  dtos::{ApiResponse, DeletedResponse, ProductRequest},
  errors::ApiError,
  middleware::OwnerContextExt,
};
use crate::application::catalog::{
  CreateProductCommand, CreateProductUseCase, DeleteProductCommand, DeleteProductUseCase,
  GetProductCommand, GetProductUseCase, ListProductsCommand, ListProductsUseCase,
  UpdateProductCommand, UpdateProductUseCase,
};

/// POST /api/v1/products
pub async fn create_product_handler(
  request: web::Json<ProductRequest>,
  use_case: web::Data<Arc<CreateProductUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;

  let command = CreateProductCommand {
    owner_id: ctx.owner_id,
    product: request.into_inner().into(),
  };
  let product = observe("create_product", use_case.execute(command)).await?;

  Ok(HttpResponse::Created().json(ApiResponse::ok(product)))
}

/// GET /api/v1/products
pub async fn list_products_handler(
  use_case: web::Data<Arc<ListProductsUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = ListProductsCommand {
    owner_id: ctx.owner_id,
  };
  let response = observe("list_products", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// GET /api/v1/products/{id}
pub async fn get_product_handler(
  product_id: web::Path<Uuid>,
  use_case: web::Data<Arc<GetProductUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;

  let command = GetProductCommand {
    owner_id: ctx.owner_id,
    product_id: product_id.into_inner(),
  };
  let product = observe("get_product", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(product)))
}

/// PUT /api/v1/products/{id}
pub async fn update_product_handler(
  product_id: web::Path<Uuid>,
  request: web::Json<ProductRequest>,
  use_case: web::Data<Arc<UpdateProductUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;
  let ctx = http_req.owner_context()?;

  let command = UpdateProductCommand {
    owner_id: ctx.owner_id,
    product_id: product_id.into_inner(),
    product: request.into_inner().into(),
  };
  let product = observe("update_product", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(product)))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product_handler(
  product_id: web::Path<Uuid>,
  use_case: web::Data<Arc<DeleteProductUseCase>>,
  http_req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
  let ctx = http_req.owner_context()?;
  let product_id = product_id.into_inner();

  let command = DeleteProductCommand {
    owner_id: ctx.owner_id,
    product_id,
  };
  observe("delete_product", use_case.execute(command)).await?;

  Ok(HttpResponse::Ok().json(ApiResponse::ok(DeletedResponse::new(product_id))))
}
