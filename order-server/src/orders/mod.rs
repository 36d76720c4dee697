//! Aggregate services
//!
//! Orders, expense-orders and quotes share one generic [`AggregateService`];
//! the status type decides the table, numbering, edit lock, payment rules and
//! transition guards.
//!
//! # Data flow
//!
//! ```text
//! HTTP handler → AggregateService<S> → redb write txn → commit
//!                        ↓                                 ↓
//!               GrantCheck (approvals)           SideEffects (audit, notify)
//! ```

pub mod conversion;
pub mod service;

use shared::models::{ExpenseOrderStatus, OrderStatus, QuoteStatus};

pub use service::{AggregateService, ServiceDeps};

pub type OrderService = AggregateService<OrderStatus>;
pub type ExpenseOrderService = AggregateService<ExpenseOrderStatus>;
pub type QuoteService = AggregateService<QuoteStatus>;
