pub mod owner_context;
pub mod request_id;

pub use owner_context::{OWNER_ID_HEADER, OwnerContextExt, OwnerContextMiddleware};
pub use request_id::{RequestId, RequestIdExt, RequestIdMiddleware};
