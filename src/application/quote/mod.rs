pub mod convert_quote;
pub mod create_quote;
pub mod delete_quote;
pub mod duplicate_quote;
pub mod get_quote_details;
pub mod list_quotes;
pub mod update_quote;

pub use convert_quote::{ConvertQuoteCommand, ConvertQuoteResponse, ConvertQuoteUseCase};
pub use create_quote::{CreateQuoteCommand, CreateQuoteUseCase, DiscountCommand, QuoteLineItemCommand};
pub use delete_quote::{DeleteQuoteCommand, DeleteQuoteUseCase};
pub use duplicate_quote::{DuplicateQuoteCommand, DuplicateQuoteUseCase};
pub use get_quote_details::{
  GetQuoteDetailsCommand, GetQuoteDetailsUseCase, QuoteDetailsResponse, QuoteLineItemDto,
};
pub use list_quotes::{ListQuotesCommand, ListQuotesResponse, ListQuotesUseCase, QuoteListItemDto};
pub use update_quote::{UpdateQuoteCommand, UpdateQuoteUseCase};
