pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::{ApiResponse, DeletedResponse, ErrorResponse};
pub use errors::ApiError;
pub use middleware::{
  OWNER_ID_HEADER, OwnerContextExt, OwnerContextMiddleware, RequestId, RequestIdExt,
  RequestIdMiddleware,
};
pub use routes::{ApiUseCases, configure_api_routes, configure_system_routes};
