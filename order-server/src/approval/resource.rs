//! What an approval workflow is about
//!
//! An [`ApprovalResource`] names its storage table, how an approval grants
//! authority, and which requests the underlying aggregate accepts.

use shared::models::ApprovalKind;

use crate::db::{DocReader, JsonTable};
use crate::utils::AppResult;

/// How an approved request grants authority
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantSemantics {
    /// Valid for a fixed window after approval
    TimeBoxed { window_millis: i64 },
    /// Valid for one target while the resource stays in the captured status
    OneShotByTarget,
}

/// Snapshot of the resource a request points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveResource {
    pub id: String,
    pub number: String,
    pub status: String,
    pub owner_id: String,
}

pub trait ApprovalResource: Send + Sync + 'static {
    const KIND: ApprovalKind;
    const TABLE: JsonTable;
    /// Human label, e.g. `order edit`
    const LABEL: &'static str;

    fn semantics(&self) -> GrantSemantics;

    /// Current state of the resource; `NotFound` if it does not exist
    fn load(&self, reader: &impl DocReader, resource_id: &str) -> AppResult<LiveResource>;

    /// Validate a new request and return its normalized target
    fn accept_request(
        &self,
        reader: &impl DocReader,
        resource: &LiveResource,
        target: Option<&str>,
    ) -> AppResult<Option<String>>;

    /// Approval and grant use require the status captured at request time
    fn requires_unchanged_status(&self) -> bool {
        self.semantics() == GrantSemantics::OneShotByTarget
    }
}
