//! HTTP API routes
//!
//! # Structure
//!
//! - [`health`] - liveness and component checks
//! - [`aggregates`] - orders, expense-orders and quotes
//! - [`approvals`] - edit, status-change and expense authorization requests
//! - [`policies`] - editable-status policy
//! - [`sequences`] - document numbering
//! - [`audit_log`] - audit trail queries
//!
//! Mutating routes read the acting user from `x-actor-id`
//! ([`crate::auth::RequestContext`]).

pub mod aggregates;
pub mod approvals;
pub mod audit_log;
pub mod health;
pub mod policies;
pub mod sequences;
