//! Audit log
//!
//! Mutations enqueue an [`AuditLogRequest`] after their transaction commits.
//! The [`AuditWorker`] drains the channel into the `audit_log` table. Writing
//! is best-effort: a full or closed channel is logged and the mutation still
//! succeeds.

pub mod service;
pub mod storage;
pub mod worker;

pub use service::{AuditError, AuditLogRequest, AuditLogService};
pub use storage::AuditStorage;
pub use worker::AuditWorker;
