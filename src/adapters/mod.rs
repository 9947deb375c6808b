//! Inbound adapters
//!
//! The JSON-over-HTTP surface of the service.

pub mod http;
