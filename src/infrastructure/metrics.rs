//! Prometheus metrics exposed on `/metrics`.

use lazy_static::lazy_static;
use prometheus::{
  CounterVec, HistogramVec, TextEncoder, register_counter_vec, register_histogram_vec,
};

lazy_static! {
  /// Domain operations by name and outcome: `ok` or the API error code.
  pub static ref OPERATIONS_TOTAL: CounterVec = register_counter_vec!(
    "factura_operations_total",
    "Total number of billing operations by outcome",
    &["operation", "outcome"]
  )
  .expect("Failed to register operations_total");

  /// Wall time of domain operations as seen by the HTTP layer.
  pub static ref OPERATION_DURATION: HistogramVec = register_histogram_vec!(
    "factura_operation_duration_seconds",
    "Billing operation duration in seconds",
    &["operation"],
    vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
  )
  .expect("Failed to register operation_duration");

  /// Recorded payments by method.
  pub static ref PAYMENTS_TOTAL: CounterVec = register_counter_vec!(
    "factura_payments_total",
    "Total number of recorded payments by method",
    &["method"]
  )
  .expect("Failed to register payments_total");
}

/// Forces registration so every series shows up before its first sample.
pub fn init_metrics() {
  lazy_static::initialize(&OPERATIONS_TOTAL);
  lazy_static::initialize(&OPERATION_DURATION);
  lazy_static::initialize(&PAYMENTS_TOTAL);
}

pub fn record_operation(operation: &str, outcome: &str) {
  OPERATIONS_TOTAL.with_label_values(&[operation, outcome]).inc();
}

pub fn record_payment(method: &str) {
  PAYMENTS_TOTAL.with_label_values(&[method]).inc();
}

/// Metrics in the Prometheus text format.
pub fn gather() -> String {
  let encoder = TextEncoder::new();
  encoder
    .encode_to_string(&prometheus::gather())
    .unwrap_or_default()
}
