//! Application layer
//!
//! Use cases translate raw commands into validated domain input, call the
//! domain services with an explicit `OwnerContext`, and shape the results
//! into response DTOs.

pub mod catalog;
pub mod invoice;
pub mod quote;
pub mod template;
