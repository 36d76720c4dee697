//! Approval workflows
//!
//! One generic [`ApprovalWorkflow`] serves three resources:
//!
//! | Resource | Grant | Table |
//! |----------|-------|-------|
//! | [`OrderEdit`] | time-boxed window | `order_edit_requests` |
//! | [`OrderStatusChange`] | one target status | `order_status_change_requests` |
//! | [`ExpenseAuthorization`] | `CREATED → AUTHORIZED` | `expense_auth_requests` |
//!
//! [`GrantCheck`] is the seam the aggregate services use to consult grants;
//! [`GrantSweeper`] is the seam the expiry scheduler drives.

pub mod policy;
pub mod resource;
pub mod resources;
pub mod workflow;

use redb::WriteTransaction;

use crate::utils::AppResult;

pub use policy::EditPolicyService;
pub use resource::{ApprovalResource, GrantSemantics, LiveResource};
pub use resources::{ExpenseAuthorization, OrderEdit, OrderStatusChange};
pub use workflow::ApprovalWorkflow;

/// Grant lookup used by guarded operations
pub trait GrantCheck: Send + Sync {
    /// Whether the requester holds a live grant, read inside the caller's transaction
    fn has_active_grant_in(
        &self,
        txn: &WriteTransaction,
        resource_id: &str,
        requester_id: &str,
        target: Option<&str>,
    ) -> AppResult<bool>;

    fn consume(&self, resource_id: &str, requester_id: &str, target: Option<&str>);
}

/// Result of one sweep over a workflow's grants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Grants expired or warned
    pub affected: usize,
    pub failed_hooks: usize,
}

/// Grant maintenance driven by the expiry scheduler
pub trait GrantSweeper: Send + Sync {
    fn name(&self) -> &'static str;

    fn expire_due(&self, now: i64) -> AppResult<SweepOutcome>;

    fn warn_expiring(&self, now: i64, horizon_millis: i64) -> AppResult<SweepOutcome>;
}
