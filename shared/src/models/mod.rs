//! Domain models
//!
//! - [`status`] - lifecycle statuses for orders, expense-orders and quotes
//! - [`aggregate`] - the shared aggregate shape (header, items, payments, discounts)
//! - [`sequence`] - document types and year-scoped sequences
//! - [`approval`] - approval requests and their kinds
//! - [`policy`] - per-status edit-request policy
//! - [`audit`] - audit log entries

pub mod aggregate;
pub mod approval;
pub mod audit;
pub mod policy;
pub mod sequence;
pub mod status;

pub use aggregate::{
    Aggregate, Discount, ExpenseOrder, LineItem, Order, Payment, PaymentMethod, Quote,
};
pub use approval::{ApprovalKind, ApprovalRequest, ApprovalStatus};
pub use audit::{AuditAction, AuditEntry};
pub use policy::EditableStatusPolicy;
pub use sequence::{DocumentType, Sequence, format_document_number};
pub use status::{ExpenseOrderStatus, OrderStatus, ParseStatusError, QuoteStatus};
