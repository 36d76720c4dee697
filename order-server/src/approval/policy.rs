//! Editable-status policy
//!
//! Per order status, whether locked orders in that status may request edit
//! permission. Rows are seeded on startup; a missing row falls back to
//! [`EditableStatusPolicy::default_for`].

use shared::models::{AuditAction, EditableStatusPolicy, OrderStatus};
use std::sync::Arc;

use crate::audit::AuditLogRequest;
use crate::auth::RequestContext;
use crate::db::{POLICIES_TABLE, Store, get_json, put_json};
use crate::lifecycle::LifecycleStatus;
use crate::services::{Clock, PostCommitHook, PrivilegeLookup, SideEffects};
use crate::utils::{AppError, AppResult};

pub struct EditPolicyService {
    store: Store,
    privileges: Arc<dyn PrivilegeLookup>,
    clock: Arc<dyn Clock>,
    effects: SideEffects,
}

impl EditPolicyService {
    pub fn new(
        store: Store,
        privileges: Arc<dyn PrivilegeLookup>,
        clock: Arc<dyn Clock>,
        effects: SideEffects,
    ) -> Self {
        Self {
            store,
            privileges,
            clock,
            effects,
        }
    }

    /// Insert default rows for statuses that have none
    pub fn seed_defaults(&self) -> AppResult<usize> {
        let txn = self.store.begin_write()?;
        let mut seeded = 0;
        for status in OrderStatus::ALL {
            if get_json::<EditableStatusPolicy>(&txn, POLICIES_TABLE, status.as_str())?.is_none() {
                let policy = EditableStatusPolicy::default_for(*status);
                put_json(&txn, POLICIES_TABLE, status.as_str(), &policy)?;
                seeded += 1;
            }
        }
        txn.commit()?;
        if seeded > 0 {
            tracing::info!(seeded, "Seeded editable-status policies");
        }
        Ok(seeded)
    }

    /// One row per order status, in lifecycle order
    pub fn list(&self) -> AppResult<Vec<EditableStatusPolicy>> {
        OrderStatus::ALL.iter().map(|s| self.get(*s)).collect()
    }

    pub fn get(&self, status: OrderStatus) -> AppResult<EditableStatusPolicy> {
        Ok(self
            .store
            .read_json(POLICIES_TABLE, status.as_str())?
            .unwrap_or_else(|| EditableStatusPolicy::default_for(status)))
    }

    /// Toggle edit requests for a status (privileged only)
    pub fn update(
        &self,
        ctx: &RequestContext,
        status: OrderStatus,
        allow_edit_requests: bool,
    ) -> AppResult<EditableStatusPolicy> {
        if !self.privileges.is_privileged(&ctx.actor_id) {
            return Err(AppError::authorization_required(
                "only privileged users may change edit policies",
            ));
        }
        if allow_edit_requests && (status.is_editable() || status.is_terminal()) {
            return Err(AppError::validation(format!(
                "edit requests cannot be enabled for {}",
                status
            )));
        }

        let now = self.clock.now_millis();
        let txn = self.store.begin_write()?;
        let before = get_json::<EditableStatusPolicy>(&txn, POLICIES_TABLE, status.as_str())?
            .unwrap_or_else(|| EditableStatusPolicy::default_for(status));
        let after = EditableStatusPolicy {
            status,
            allow_edit_requests,
            updated_by: Some(ctx.actor_id.clone()),
            updated_at: now,
        };
        put_json(&txn, POLICIES_TABLE, status.as_str(), &after)?;
        txn.commit()?;

        tracing::info!(status = %status, allow_edit_requests, actor = %ctx.actor_id, "Edit policy updated");
        self.effects.dispatch(vec![PostCommitHook::Audit(AuditLogRequest::new(
            AuditAction::Update,
            "editable_status_policy",
            status.as_str(),
            &ctx.actor_id,
            Some(&before),
            Some(&after),
            now,
        ))]);

        Ok(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLogService;
    use crate::services::{AdminList, BusNotifier, ManualClock};

    fn service() -> EditPolicyService {
        let clock = Arc::new(ManualClock::new(1_000));
        let (audit, _rx) = AuditLogService::new(8);
        let effects = SideEffects::new(Arc::new(BusNotifier::new(clock.clone())), audit);
        EditPolicyService::new(
            Store::open_in_memory().unwrap(),
            Arc::new(AdminList::new(["admin"])),
            clock,
            effects,
        )
    }

    #[test]
    fn test_seed_is_idempotent() {
        let policies = service();
        assert_eq!(policies.seed_defaults().unwrap(), OrderStatus::ALL.len());
        assert_eq!(policies.seed_defaults().unwrap(), 0);

        let list = policies.list().unwrap();
        assert_eq!(list.len(), OrderStatus::ALL.len());
        assert!(policies.get(OrderStatus::Ready).unwrap().allow_edit_requests);
        assert!(!policies.get(OrderStatus::Draft).unwrap().allow_edit_requests);
    }

    #[test]
    fn test_update_requires_privilege() {
        let policies = service();
        let err = policies
            .update(&RequestContext::new("bob"), OrderStatus::Ready, false)
            .unwrap_err();
        assert!(matches!(err, AppError::AuthorizationRequired(_)));

        let updated = policies
            .update(&RequestContext::new("admin"), OrderStatus::Ready, false)
            .unwrap();
        assert_eq!(updated.updated_by.as_deref(), Some("admin"));
        assert_eq!(updated.updated_at, 1_000);
        assert!(!policies.get(OrderStatus::Ready).unwrap().allow_edit_requests);
    }

    #[test]
    fn test_cannot_enable_for_draft_or_terminal() {
        let policies = service();
        let admin = RequestContext::new("admin");
        for status in [OrderStatus::Draft, OrderStatus::Paid] {
            let err = policies.update(&admin, status, true).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }
}
