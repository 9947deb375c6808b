use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use factura::{
  adapters::http::{
    ApiUseCases, OwnerContextMiddleware, RequestIdMiddleware, configure_api_routes,
    configure_system_routes,
  },
  domain::{
    Clock, SystemClock, catalog::CatalogService, invoice::InvoiceService, quote::QuoteService,
    template::TemplateService,
  },
  infrastructure::{
    config::Config,
    metrics,
    persistence::postgres::{
      PostgresClientRepository, PostgresInvoiceRepository, PostgresProductRepository,
      PostgresQuoteRepository, PostgresTemplateRepository,
    },
  },
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "factura=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Factura");

  let config = Config::load().context("Failed to load configuration")?;
  let billing = config
    .billing
    .settings()
    .context("Invalid billing configuration")?;
  tracing::info!(
    default_vat_rate = %billing.default_vat_rate.value(),
    payment_terms_days = billing.payment_terms_days,
    "Configuration loaded"
  );

  // Set up database connection pool with timeout
  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    anyhow::anyhow!(
      "Database connection timed out after {} seconds",
      config.database.connect_timeout_seconds
    )
  })?
  .context("Failed to connect to database")?;

  tracing::info!("Database connection pool created");

  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .context("Failed to run database migrations")?;
  tracing::info!("Database migrations completed");

  metrics::init_metrics();

  // Repositories
  let client_repo = Arc::new(PostgresClientRepository::new(db_pool.clone()));
  let product_repo = Arc::new(PostgresProductRepository::new(db_pool.clone()));
  let invoice_repo = Arc::new(PostgresInvoiceRepository::new(db_pool.clone()));
  let quote_repo = Arc::new(PostgresQuoteRepository::new(db_pool.clone()));
  let template_repo = Arc::new(PostgresTemplateRepository::new(db_pool));

  // Services
  let clock: Arc<dyn Clock> = Arc::new(SystemClock);
  let catalog_service = Arc::new(CatalogService::new(client_repo.clone(), product_repo.clone()));
  let invoice_service = Arc::new(InvoiceService::new(
    invoice_repo,
    client_repo.clone(),
    product_repo.clone(),
    clock.clone(),
    billing,
  ));
  let quote_service = Arc::new(QuoteService::new(
    quote_repo,
    client_repo,
    product_repo,
    clock,
    billing,
  ));
  let template_service = Arc::new(TemplateService::new(template_repo));

  let use_cases = ApiUseCases::new(
    catalog_service,
    invoice_service,
    quote_service,
    template_service,
  );

  // Shared across workers so the quota is per client, not per worker
  let governor_config = GovernorConfigBuilder::default()
    .per_second(config.rate_limit.per_second)
    .burst_size(config.rate_limit.burst_size)
    .finish()
    .context("Invalid rate limit configuration")?;

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    App::new()
      .wrap(RequestIdMiddleware::new())
      .wrap(Logger::default())
      .configure(configure_system_routes)
      .service(
        web::scope("/api/v1")
          .wrap(OwnerContextMiddleware)
          .wrap(Governor::new(&governor_config))
          .configure(|cfg| configure_api_routes(cfg, &use_cases)),
      )
  })
  .bind((server_host, server_port))?
  .run()
  .await?;

  Ok(())
}
