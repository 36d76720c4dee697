//! Audit log entries
//!
//! Append-only. Entries record the before/after JSON of the changed resource
//! and the actor who made the change.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::Create => f.write_str("CREATE"),
            AuditAction::Update => f.write_str("UPDATE"),
            AuditAction::Delete => f.write_str("DELETE"),
        }
    }
}

/// Persisted audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: u64,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub actor_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,
    pub timestamp: i64,
}
