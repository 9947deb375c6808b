pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Client, Product};
pub use errors::CatalogError;
pub use ports::{ClientRepository, ProductRepository};
pub use services::{CatalogService, ClientData, ProductData};
pub use value_objects::{ClientAddress, ClientName, Email, ProductName};
