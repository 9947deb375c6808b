pub mod create_invoice;
pub mod delete_invoice;
pub mod delete_payment;
pub mod duplicate_invoice;
pub mod get_dashboard_summary;
pub mod get_invoice_details;
pub mod list_invoices;
pub mod list_payments;
pub mod record_payment;
pub mod update_invoice;

pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceUseCase, InvoiceLineItemCommand};
pub use delete_invoice::{DeleteInvoiceCommand, DeleteInvoiceUseCase};
pub use delete_payment::{DeletePaymentCommand, DeletePaymentUseCase};
pub use duplicate_invoice::{DuplicateInvoiceCommand, DuplicateInvoiceUseCase};
pub use get_dashboard_summary::{GetDashboardSummaryCommand, GetDashboardSummaryUseCase};
pub use get_invoice_details::{
  GetInvoiceDetailsCommand, GetInvoiceDetailsUseCase, InvoiceDetailsResponse, InvoiceLineItemDto,
  PaymentDto,
};
pub use list_invoices::{
  InvoiceListItemDto, ListInvoicesCommand, ListInvoicesResponse, ListInvoicesUseCase,
};
pub use list_payments::{ListPaymentsCommand, ListPaymentsResponse, ListPaymentsUseCase};
pub use record_payment::{RecordPaymentCommand, RecordPaymentResponse, RecordPaymentUseCase};
pub use update_invoice::{UpdateInvoiceCommand, UpdateInvoiceUseCase};
