pub mod create_client;
pub mod create_product;
pub mod delete_client;
pub mod delete_product;
pub mod get_client;
pub mod get_product;
pub mod list_clients;
pub mod list_products;
pub mod update_client;
pub mod update_product;

pub use create_client::{ClientFields, CreateClientCommand, CreateClientUseCase};
pub use create_product::{CreateProductCommand, CreateProductUseCase, ProductFields};
pub use delete_client::{DeleteClientCommand, DeleteClientUseCase};
pub use delete_product::{DeleteProductCommand, DeleteProductUseCase};
pub use get_client::{ClientDto, GetClientCommand, GetClientUseCase};
pub use get_product::{GetProductCommand, GetProductUseCase, ProductDto};
pub use list_clients::{ListClientsCommand, ListClientsResponse, ListClientsUseCase};
pub use list_products::{ListProductsCommand, ListProductsResponse, ListProductsUseCase};
pub use update_client::{UpdateClientCommand, UpdateClientUseCase};
pub use update_product::{UpdateProductCommand, UpdateProductUseCase};
