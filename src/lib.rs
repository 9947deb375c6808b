//! Factura
//!
//! Billing backend for small businesses: a client and product catalog,
//! invoices with a payment ledger, quotes that convert into invoices, and
//! document templates. Every record belongs to an owner and every operation
//! is scoped to the caller's owner id.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod infrastructure;
