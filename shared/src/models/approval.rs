//! Approval requests
//!
//! One record shape serves all three workflows (order edit, order status
//! change, expense authorization). Records are never deleted; a request moves
//! `PENDING → APPROVED | REJECTED` once, and time-boxed approvals later move
//! `APPROVED → EXPIRED`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which workflow a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalKind {
    /// Temporary permission to edit a locked order
    OrderEdit,
    /// Permission to move an order to a sensitive status
    OrderStatusChange,
    /// Permission to authorize an expense-order
    ExpenseAuthorization,
}

impl ApprovalKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ApprovalKind::OrderEdit => "order_edit",
            ApprovalKind::OrderStatusChange => "order_status_change",
            ApprovalKind::ExpenseAuthorization => "expense_authorization",
        }
    }
}

impl fmt::Display for ApprovalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl ApprovalStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "PENDING",
            ApprovalStatus::Approved => "APPROVED",
            ApprovalStatus::Rejected => "REJECTED",
            ApprovalStatus::Expired => "EXPIRED",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval request record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub id: String,
    pub kind: ApprovalKind,
    pub resource_id: String,
    pub requested_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    /// Requested target value (status-change and authorization variants)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Resource status when the request was made
    pub captured_status: String,
    pub status: ApprovalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    /// End of the validity window (time-boxed grants only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub created_at: i64,
}

impl ApprovalRequest {
    pub fn is_pending(&self) -> bool {
        self.status == ApprovalStatus::Pending
    }

    /// Whether this record is an approval still inside its window at `now`
    pub fn is_live_grant(&self, now: i64) -> bool {
        self.status == ApprovalStatus::Approved && self.expires_at.is_none_or(|at| at > now)
    }

    /// Whether this record is keyed by the given (resource, requester, target)
    pub fn matches(&self, resource_id: &str, requested_by: &str, target: Option<&str>) -> bool {
        self.resource_id == resource_id
            && self.requested_by == requested_by
            && self.target.as_deref() == target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approved(expires_at: Option<i64>) -> ApprovalRequest {
        ApprovalRequest {
            id: "r-1".to_string(),
            kind: ApprovalKind::OrderEdit,
            resource_id: "o-1".to_string(),
            requested_by: "u-1".to_string(),
            justification: None,
            target: None,
            captured_status: "CONFIRMED".to_string(),
            status: ApprovalStatus::Approved,
            reviewed_by: Some("admin".to_string()),
            reviewed_at: Some(0),
            review_notes: None,
            expires_at,
            created_at: 0,
        }
    }

    #[test]
    fn test_live_grant_window() {
        let grant = approved(Some(300_000));
        assert!(grant.is_live_grant(299_000));
        assert!(!grant.is_live_grant(300_000));
        assert!(!grant.is_live_grant(301_000));
    }

    #[test]
    fn test_untimed_grant_stays_live() {
        assert!(approved(None).is_live_grant(i64::MAX));
    }

    #[test]
    fn test_matches_target() {
        let mut grant = approved(None);
        grant.target = Some("DELIVERED_ON_CREDIT".to_string());
        assert!(grant.matches("o-1", "u-1", Some("DELIVERED_ON_CREDIT")));
        assert!(!grant.matches("o-1", "u-1", Some("PAID")));
        assert!(!grant.matches("o-1", "u-2", Some("DELIVERED_ON_CREDIT")));
    }
}
