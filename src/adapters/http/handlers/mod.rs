pub mod clients;
pub mod dashboard;
pub mod invoices;
pub mod payments;
pub mod products;
pub mod quotes;
pub mod system;
pub mod templates;

use std::future::Future;

use crate::adapters::http::errors::ApiError;
use crate::infrastructure::metrics;

/// Runs a use case, recording its outcome and duration under `operation`.
pub(crate) async fn observe<T, E, F>(operation: &'static str, future: F) -> Result<T, ApiError>
where
  F: Future<Output = Result<T, E>>,
  E: Into<ApiError>,
{
  let timer = metrics::OPERATION_DURATION
    .with_label_values(&[operation])
    .start_timer();
  let result = future.await.map_err(Into::into);
  timer.observe_duration();

  let outcome = match &result {
    Ok(_) => "ok",
    Err(e) => e.code(),
  };
  metrics::record_operation(operation, outcome);

  if let Err(e) = &result {
    tracing::debug!(operation, code = e.code(), error = %e, "operation failed");
  }
  result
}
