pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{
  Invoice, InvoiceLineItem, InvoiceRevision, InvoiceTotals, LedgerSummary, LineItemDraft, Payment,
};
pub use errors::InvoiceError;
pub use ports::InvoiceRepository;
pub use services::{
  BillingSettings, DashboardSummary, InvoiceData, InvoiceItemInput, InvoiceService,
  InvoiceUpdateData, PaymentData,
};
pub use value_objects::{InvoiceStatus, PaymentMethod};
