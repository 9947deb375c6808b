pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Quote, QuoteItemDraft, QuoteLineItem, QuoteRevision, QuoteTotals};
pub use errors::QuoteError;
pub use ports::QuoteRepository;
pub use services::{QuoteData, QuoteItemInput, QuoteService, QuoteUpdateData};
pub use value_objects::{Discount, QuoteStatus};
