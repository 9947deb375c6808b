//! Domain layer
//!
//! Pure business rules: money arithmetic, the payment ledger, invoice and
//! quote status machines, and the template content model. Persistence is only
//! reached through the repository traits declared in each module's `ports`.

pub mod catalog;
pub mod common;
pub mod invoice;
pub mod quote;
pub mod template;
pub mod value_objects;

pub use common::{Clock, ErrorKind, ItemChanges, OwnerContext, SystemClock};
pub use value_objects::{Money, Quantity, TaxRate, ValueObjectError};
