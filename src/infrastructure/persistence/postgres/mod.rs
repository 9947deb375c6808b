pub mod client_repository;
pub mod invoice_repository;
pub mod product_repository;
pub mod quote_repository;
pub mod template_repository;

pub use client_repository::PostgresClientRepository;
pub use invoice_repository::PostgresInvoiceRepository;
pub use product_repository::PostgresProductRepository;
pub use quote_repository::PostgresQuoteRepository;
pub use template_repository::PostgresTemplateRepository;

#[cfg(test)]
pub(crate) mod test_support {
  use sqlx::PgPool;
  use sqlx::postgres::PgPoolOptions;
  use testcontainers::ImageExt;
  use testcontainers_modules::postgres::Postgres;
  use testcontainers_modules::testcontainers::{ContainerAsync, runners::AsyncRunner};

  /// Fresh migrated database; keep the container alive for the test's duration.
  pub async fn setup_test_db() -> (PgPool, ContainerAsync<Postgres>) {
    let container = Postgres::default()
      .with_tag("16-alpine")
      .start()
      .await
      .expect("Failed to start postgres container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
      .get_host_port_ipv4(5432)
      .await
      .expect("Failed to get port");
    let database_url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPoolOptions::new()
      .max_connections(5)
      .connect(&database_url)
      .await
      .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
      .run(&pool)
      .await
      .expect("Failed to run migrations");

    (pool, container)
  }
}
