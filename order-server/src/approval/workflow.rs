//! Generic request → review → grant workflow
//!
//! A requester opens a PENDING request for a resource; a privileged reviewer
//! approves or rejects it exactly once. Approved requests act as grants that
//! the aggregate services consult before letting a non-privileged user past a
//! guard. Time-boxed grants carry an expiry and are moved to EXPIRED by the
//! expiry scheduler.

use redb::WriteTransaction;
use shared::models::{ApprovalRequest, ApprovalStatus, AuditAction};
use shared::request::{NewApprovalRequest, ReviewDecision};
use std::sync::Arc;

use super::resource::{ApprovalResource, GrantSemantics, LiveResource};
use super::{GrantCheck, GrantSweeper, SweepOutcome};
use crate::audit::AuditLogRequest;
use crate::auth::RequestContext;
use crate::db::{DocReader, Store, put_json, scan_json};
use crate::services::{Clock, Notification, PostCommitHook, PrivilegeLookup, SideEffects};
use crate::utils::{AppError, AppResult};
use shared::util::{MILLIS_PER_MINUTE, MILLIS_PER_SECOND};

pub struct ApprovalWorkflow<R: ApprovalResource> {
    store: Store,
    resource: R,
    privileges: Arc<dyn PrivilegeLookup>,
    clock: Arc<dyn Clock>,
    effects: SideEffects,
}

impl<R: ApprovalResource> std::fmt::Debug for ApprovalWorkflow<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalWorkflow")
            .field("kind", &R::KIND)
            .finish_non_exhaustive()
    }
}

impl<R: ApprovalResource> ApprovalWorkflow<R> {
    pub fn new(
        store: Store,
        resource: R,
        privileges: Arc<dyn PrivilegeLookup>,
        clock: Arc<dyn Clock>,
        effects: SideEffects,
    ) -> Self {
        Self {
            store,
            resource,
            privileges,
            clock,
            effects,
        }
    }

    fn notification(&self, event: &str, title: String, message: String, id: &str) -> Notification {
        Notification::new(format!("{}.{}", R::KIND.as_str(), event), title, message).related_to(id)
    }

    fn audit(
        &self,
        action: AuditAction,
        actor_id: &str,
        before: Option<&ApprovalRequest>,
        after: &ApprovalRequest,
    ) -> PostCommitHook {
        PostCommitHook::Audit(AuditLogRequest::new(
            action,
            R::KIND.as_str(),
            &after.id,
            actor_id,
            before,
            Some(after),
            self.clock.now_millis(),
        ))
    }

    fn load_request(&self, txn: &WriteTransaction, request_id: &str) -> AppResult<ApprovalRequest> {
        txn.get_doc::<ApprovalRequest>(R::TABLE, request_id)?
            .ok_or_else(|| AppError::not_found(format!("{} request {}", R::LABEL, request_id)))
    }

    fn ensure_reviewer(&self, ctx: &RequestContext) -> AppResult<()> {
        if self.privileges.is_privileged(&ctx.actor_id) {
            Ok(())
        } else {
            Err(AppError::AuthorizationRequired(format!(
                "only privileged users may review {} requests",
                R::LABEL
            )))
        }
    }

    /// Open a PENDING request for `resource_id`
    ///
    /// Privileged actors act directly and cannot open requests.
    pub fn request(
        &self,
        ctx: &RequestContext,
        resource_id: &str,
        input: NewApprovalRequest,
    ) -> AppResult<ApprovalRequest> {
        let txn = self.store.begin_write()?;
        let resource = self.resource.load(&txn, resource_id)?;
        if self.privileges.is_privileged(&ctx.actor_id) {
            return Err(AppError::validation(format!(
                "{} is privileged and needs no {} request",
                ctx.actor_id,
                R::LABEL
            )));
        }
        let target = self
            .resource
            .accept_request(&txn, &resource, input.target.as_deref())?;

        let existing: Vec<ApprovalRequest> = scan_json(&txn, R::TABLE)?;
        if let Some(pending) = existing
            .iter()
            .find(|r| r.is_pending() && r.matches(resource_id, &ctx.actor_id, target.as_deref()))
        {
            return Err(AppError::DuplicatePending {
                existing_id: pending.id.clone(),
            });
        }

        let now = self.clock.now_millis();
        let request = ApprovalRequest {
            id: uuid::Uuid::new_v4().to_string(),
            kind: R::KIND,
            resource_id: resource_id.to_string(),
            requested_by: ctx.actor_id.clone(),
            justification: input.justification.filter(|j| !j.trim().is_empty()),
            target,
            captured_status: resource.status.clone(),
            status: ApprovalStatus::Pending,
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
            expires_at: None,
            created_at: now,
        };
        put_json(&txn, R::TABLE, &request.id, &request)?;
        txn.commit()?;

        tracing::info!(
            kind = %R::KIND,
            request_id = %request.id,
            resource_id = %resource_id,
            requested_by = %ctx.actor_id,
            "Approval requested"
        );

        let target_note = request
            .target
            .as_deref()
            .map(|t| format!(" ({})", t))
            .unwrap_or_default();
        self.effects.dispatch(vec![
            PostCommitHook::NotifyPrivileged(self.notification(
                "requested",
                format!("New {} request", R::LABEL),
                format!(
                    "{} requested {} for {}{}",
                    ctx.actor_id,
                    R::LABEL,
                    resource.number,
                    target_note
                ),
                &request.id,
            )),
            self.audit(AuditAction::Create, &ctx.actor_id, None, &request),
        ]);

        Ok(request)
    }

    /// Approve a PENDING request
    pub fn approve(
        &self,
        ctx: &RequestContext,
        request_id: &str,
        decision: ReviewDecision,
    ) -> AppResult<ApprovalRequest> {
        self.review(ctx, request_id, decision, ApprovalStatus::Approved)
    }

    /// Reject a PENDING request
    pub fn reject(
        &self,
        ctx: &RequestContext,
        request_id: &str,
        decision: ReviewDecision,
    ) -> AppResult<ApprovalRequest> {
        self.review(ctx, request_id, decision, ApprovalStatus::Rejected)
    }

    fn review(
        &self,
        ctx: &RequestContext,
        request_id: &str,
        decision: ReviewDecision,
        outcome: ApprovalStatus,
    ) -> AppResult<ApprovalRequest> {
        self.ensure_reviewer(ctx)?;

        let txn = self.store.begin_write()?;
        let before = self.load_request(&txn, request_id)?;
        if !before.is_pending() {
            return Err(AppError::not_found(format!(
                "pending {} request {} (is {})",
                R::LABEL,
                request_id,
                before.status
            )));
        }

        let resource = self.resource.load(&txn, &before.resource_id)?;
        if outcome == ApprovalStatus::Approved
            && self.resource.requires_unchanged_status()
            && resource.status != before.captured_status
        {
            return Err(AppError::Conflict(format!(
                "{} moved from {} to {} since the request was made",
                resource.number, before.captured_status, resource.status
            )));
        }

        let now = self.clock.now_millis();
        let mut request = before.clone();
        request.status = outcome;
        request.reviewed_by = Some(ctx.actor_id.clone());
        request.reviewed_at = Some(now);
        request.review_notes = decision.notes.filter(|n| !n.trim().is_empty());
        if outcome == ApprovalStatus::Approved {
            request.expires_at = match self.resource.semantics() {
                GrantSemantics::TimeBoxed { window_millis } => Some(now + window_millis),
                GrantSemantics::OneShotByTarget => None,
            };
        }
        put_json(&txn, R::TABLE, &request.id, &request)?;
        txn.commit()?;

        tracing::info!(
            kind = %R::KIND,
            request_id = %request.id,
            outcome = %outcome,
            reviewer = %ctx.actor_id,
            "Approval reviewed"
        );

        let notification = self.review_notification(&request, &resource);
        self.effects.dispatch(vec![
            PostCommitHook::notify(request.requested_by.clone(), notification),
            self.audit(AuditAction::Update, &ctx.actor_id, Some(&before), &request),
        ]);

        Ok(request)
    }

    fn review_notification(&self, request: &ApprovalRequest, resource: &LiveResource) -> Notification {
        match request.status {
            ApprovalStatus::Approved => {
                let window = match (request.expires_at, request.reviewed_at) {
                    (Some(at), Some(reviewed)) => {
                        format!(" for {} minutes", (at - reviewed) / MILLIS_PER_MINUTE)
                    }
                    _ => String::new(),
                };
                self.notification(
                    "approved",
                    format!("{} approved", capitalize(R::LABEL)),
                    format!(
                        "Your {} request for {} was approved{}",
                        R::LABEL,
                        resource.number,
                        window
                    ),
                    &request.id,
                )
            }
            _ => {
                let reason = request
                    .review_notes
                    .as_deref()
                    .map(|n| format!(". Reason: {}", n))
                    .unwrap_or_default();
                self.notification(
                    "rejected",
                    format!("{} rejected", capitalize(R::LABEL)),
                    format!(
                        "Your {} request for {} was rejected{}",
                        R::LABEL,
                        resource.number,
                        reason
                    ),
                    &request.id,
                )
            }
        }
    }

    /// Whether `requester_id` holds a live grant for (resource, target)
    pub fn has_active_grant(
        &self,
        resource_id: &str,
        requester_id: &str,
        target: Option<&str>,
    ) -> AppResult<bool> {
        let read_txn = self.store.begin_read()?;
        self.active_grant_in(&read_txn, resource_id, requester_id, target)
    }

    fn active_grant_in(
        &self,
        reader: &impl DocReader,
        resource_id: &str,
        requester_id: &str,
        target: Option<&str>,
    ) -> AppResult<bool> {
        let now = self.clock.now_millis();
        let requests: Vec<ApprovalRequest> = reader.scan_docs(R::TABLE)?;
        let mut grants = requests
            .into_iter()
            .filter(|r| r.matches(resource_id, requester_id, target) && r.is_live_grant(now))
            .peekable();
        if grants.peek().is_none() {
            return Ok(false);
        }
        if !self.resource.requires_unchanged_status() {
            return Ok(true);
        }

        let live = match self.resource.load(reader, resource_id) {
            Ok(live) => live,
            Err(AppError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        };
        Ok(grants.any(|g| g.captured_status == live.status))
    }

    /// Mark a grant as used
    ///
    /// Grants stay valid for their whole window, so this only records the use.
    pub fn consume(&self, resource_id: &str, requester_id: &str, target: Option<&str>) {
        tracing::debug!(
            kind = %R::KIND,
            resource_id = %resource_id,
            requester = %requester_id,
            target = ?target,
            "Approval grant used"
        );
    }

    pub fn get(&self, request_id: &str) -> AppResult<ApprovalRequest> {
        self.store
            .read_json(R::TABLE, request_id)?
            .ok_or_else(|| AppError::not_found(format!("{} request {}", R::LABEL, request_id)))
    }

    /// Every request for a resource, newest first
    pub fn list_for_resource(&self, resource_id: &str) -> AppResult<Vec<ApprovalRequest>> {
        let mut requests: Vec<ApprovalRequest> = self.store.read_all_json(R::TABLE)?;
        requests.retain(|r| r.resource_id == resource_id);
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    /// PENDING requests across all resources, oldest first
    pub fn list_pending(&self) -> AppResult<Vec<ApprovalRequest>> {
        let mut requests: Vec<ApprovalRequest> = self.store.read_all_json(R::TABLE)?;
        requests.retain(ApprovalRequest::is_pending);
        requests.sort_by_key(|r| r.created_at);
        Ok(requests)
    }

    /// Move approved grants whose window has closed to EXPIRED
    pub fn expire_due(&self, now: i64) -> AppResult<SweepOutcome> {
        let txn = self.store.begin_write()?;
        let requests: Vec<ApprovalRequest> = scan_json(&txn, R::TABLE)?;
        let due: Vec<ApprovalRequest> = requests
            .into_iter()
            .filter(|r| {
                r.status == ApprovalStatus::Approved && r.expires_at.is_some_and(|at| at <= now)
            })
            .collect();
        if due.is_empty() {
            return Ok(SweepOutcome::default());
        }

        let mut hooks = Vec::with_capacity(due.len() * 2);
        for before in &due {
            let mut expired = before.clone();
            expired.status = ApprovalStatus::Expired;
            put_json(&txn, R::TABLE, &expired.id, &expired)?;

            hooks.push(PostCommitHook::notify(
                expired.requested_by.clone(),
                self.notification(
                    "expired",
                    format!("{} expired", capitalize(R::LABEL)),
                    format!("Your {} permission has expired", R::LABEL),
                    &expired.id,
                ),
            ));
            hooks.push(self.audit(AuditAction::Update, "system", Some(before), &expired));
        }
        txn.commit()?;

        tracing::info!(kind = %R::KIND, count = due.len(), "Expired approval grants");
        let failed = self.effects.dispatch(hooks);
        Ok(SweepOutcome {
            affected: due.len(),
            failed_hooks: failed,
        })
    }

    /// Warn requesters whose grant lapses within `horizon_millis`
    ///
    /// Read-only; a grant is warned about on every sweep until it expires.
    pub fn warn_expiring(&self, now: i64, horizon_millis: i64) -> AppResult<SweepOutcome> {
        let requests: Vec<ApprovalRequest> = self.store.read_all_json(R::TABLE)?;
        let mut hooks = Vec::new();
        for r in requests {
            let Some(at) = r.expires_at else { continue };
            if r.status != ApprovalStatus::Approved || at <= now || at > now + horizon_millis {
                continue;
            }
            let secs = ((at - now) / MILLIS_PER_SECOND).max(1);
            hooks.push(PostCommitHook::notify(
                r.requested_by.clone(),
                self.notification(
                    "expiring",
                    format!("{} expiring", capitalize(R::LABEL)),
                    format!("Your {} permission expires in {} seconds", R::LABEL, secs),
                    &r.id,
                ),
            ));
        }

        let affected = hooks.len();
        let failed = self.effects.dispatch(hooks);
        Ok(SweepOutcome {
            affected,
            failed_hooks: failed,
        })
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl<R: ApprovalResource> GrantCheck for ApprovalWorkflow<R> {
    fn has_active_grant_in(
        &self,
        txn: &WriteTransaction,
        resource_id: &str,
        requester_id: &str,
        target: Option<&str>,
    ) -> AppResult<bool> {
        self.active_grant_in(txn, resource_id, requester_id, target)
    }

    fn consume(&self, resource_id: &str, requester_id: &str, target: Option<&str>) {
        ApprovalWorkflow::consume(self, resource_id, requester_id, target)
    }
}

impl<R: ApprovalResource> GrantSweeper for ApprovalWorkflow<R> {
    fn name(&self) -> &'static str {
        R::KIND.as_str()
    }

    fn expire_due(&self, now: i64) -> AppResult<SweepOutcome> {
        ApprovalWorkflow::expire_due(self, now)
    }

    fn warn_expiring(&self, now: i64, horizon_millis: i64) -> AppResult<SweepOutcome> {
        ApprovalWorkflow::warn_expiring(self, now, horizon_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::{OrderEdit, OrderStatusChange};
    use crate::audit::AuditLogService;
    use crate::services::{AdminList, BusNotifier, ManualClock};
    use rust_decimal::Decimal;
    use shared::models::{Order, OrderStatus};
    use shared::util::MILLIS_PER_MINUTE;

    const T0: i64 = 1_790_000_000_000;

    struct Fixture {
        store: Store,
        clock: Arc<ManualClock>,
        effects: SideEffects,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Store::open_in_memory().unwrap();
            let clock = Arc::new(ManualClock::new(T0));
            let (audit, _rx) = AuditLogService::new(64);
            let effects = SideEffects::new(Arc::new(BusNotifier::new(clock.clone())), audit);
            Self {
                store,
                clock,
                effects,
            }
        }

        fn workflow<R: ApprovalResource>(&self, resource: R) -> ApprovalWorkflow<R> {
            ApprovalWorkflow::new(
                self.store.clone(),
                resource,
                Arc::new(AdminList::new(["admin"])),
                self.clock.clone(),
                self.effects.clone(),
            )
        }

        fn put_order(&self, id: &str, status: OrderStatus) {
            let order = Order::new(
                id.into(),
                format!("ORD-2026-{}", id),
                status,
                Decimal::ZERO,
                "bob".into(),
                T0,
            );
            let txn = self.store.begin_write().unwrap();
            put_json(&txn, crate::db::ORDERS_TABLE, id, &order).unwrap();
            txn.commit().unwrap();
        }
    }

    fn bob() -> RequestContext {
        RequestContext::new("bob")
    }

    fn admin() -> RequestContext {
        RequestContext::new("admin")
    }

    #[test]
    fn test_duplicate_pending_is_rejected() {
        let fx = Fixture::new();
        fx.put_order("1", OrderStatus::Confirmed);
        let wf = fx.workflow(OrderEdit::new(5 * MILLIS_PER_MINUTE));

        let first = wf.request(&bob(), "1", NewApprovalRequest::default()).unwrap();
        assert_eq!(first.captured_status, "CONFIRMED");
        match wf.request(&bob(), "1", NewApprovalRequest::default()) {
            Err(AppError::DuplicatePending { existing_id }) => assert_eq!(existing_id, first.id),
            other => panic!("unexpected: {other:?}"),
        }
        // another requester is independent
        assert!(wf.request(&RequestContext::new("carol"), "1", NewApprovalRequest::default()).is_ok());
    }

    #[test]
    fn test_draft_orders_need_no_edit_request() {
        let fx = Fixture::new();
        fx.put_order("1", OrderStatus::Draft);
        let wf = fx.workflow(OrderEdit::new(5 * MILLIS_PER_MINUTE));
        assert!(matches!(
            wf.request(&bob(), "1", NewApprovalRequest::default()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            wf.request(&bob(), "missing", NewApprovalRequest::default()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_review_happens_once() {
        let fx = Fixture::new();
        fx.put_order("1", OrderStatus::Confirmed);
        let wf = fx.workflow(OrderEdit::new(5 * MILLIS_PER_MINUTE));
        let req = wf.request(&bob(), "1", NewApprovalRequest::default()).unwrap();

        assert!(matches!(
            wf.approve(&bob(), &req.id, ReviewDecision::default()),
            Err(AppError::AuthorizationRequired(_))
        ));

        let approved = wf.approve(&admin(), &req.id, ReviewDecision::default()).unwrap();
        assert_eq!(approved.status, ApprovalStatus::Approved);
        assert_eq!(approved.expires_at, Some(T0 + 5 * MILLIS_PER_MINUTE));

        assert!(matches!(
            wf.approve(&admin(), &req.id, ReviewDecision::default()),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            wf.reject(&admin(), &req.id, ReviewDecision::default()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_time_boxed_grant_window() {
        let fx = Fixture::new();
        fx.put_order("1", OrderStatus::Ready);
        let wf = fx.workflow(OrderEdit::new(5 * MILLIS_PER_MINUTE));
        let req = wf.request(&bob(), "1", NewApprovalRequest::default()).unwrap();
        wf.approve(&admin(), &req.id, ReviewDecision::default()).unwrap();

        fx.clock.set(T0 + 4 * MILLIS_PER_MINUTE + 59_000);
        assert!(wf.has_active_grant("1", "bob", None).unwrap());
        assert!(!wf.has_active_grant("1", "carol", None).unwrap());

        fx.clock.set(T0 + 5 * MILLIS_PER_MINUTE + 1_000);
        assert!(!wf.has_active_grant("1", "bob", None).unwrap());

        let outcome = wf.expire_due(fx.clock.now_millis()).unwrap();
        assert_eq!(outcome.affected, 1);
        assert_eq!(wf.get(&req.id).unwrap().status, ApprovalStatus::Expired);
        assert_eq!(wf.expire_due(fx.clock.now_millis()).unwrap().affected, 0);
    }

    #[test]
    fn test_expiry_warning_repeats_until_expired() {
        let fx = Fixture::new();
        fx.put_order("1", OrderStatus::Ready);
        let wf = fx.workflow(OrderEdit::new(5 * MILLIS_PER_MINUTE));
        let req = wf.request(&bob(), "1", NewApprovalRequest::default()).unwrap();
        wf.approve(&admin(), &req.id, ReviewDecision::default()).unwrap();

        let now = T0 + 4 * MILLIS_PER_MINUTE + 30_000;
        assert_eq!(wf.warn_expiring(T0, 60_000).unwrap().affected, 0);
        assert_eq!(wf.warn_expiring(now, 60_000).unwrap().affected, 1);
        assert_eq!(wf.warn_expiring(now + 20_000, 60_000).unwrap().affected, 1);
        assert_eq!(wf.get(&req.id).unwrap().status, ApprovalStatus::Approved);

        let expires_at = T0 + 5 * MILLIS_PER_MINUTE;
        assert_eq!(wf.warn_expiring(expires_at, 60_000).unwrap().affected, 0);
    }

    #[test]
    fn test_privileged_actor_cannot_open_requests() {
        let fx = Fixture::new();
        fx.put_order("1", OrderStatus::Confirmed);
        let edits = fx.workflow(OrderEdit::new(5 * MILLIS_PER_MINUTE));
        assert!(matches!(
            edits.request(&admin(), "1", NewApprovalRequest::default()),
            Err(AppError::Validation(_))
        ));

        let status_changes = fx.workflow(OrderStatusChange);
        assert!(matches!(
            status_changes.request(
                &admin(),
                "1",
                NewApprovalRequest {
                    justification: None,
                    target: Some("DELIVERED_ON_CREDIT".into()),
                }
            ),
            Err(AppError::Validation(_))
        ));

        assert!(edits.list_pending().unwrap().is_empty());
        assert!(status_changes.list_pending().unwrap().is_empty());
    }

    #[test]
    fn test_status_change_grant_needs_unchanged_status() {
        let fx = Fixture::new();
        fx.put_order("1", OrderStatus::Ready);
        let wf = fx.workflow(OrderStatusChange);

        assert!(matches!(
            wf.request(&bob(), "1", NewApprovalRequest::default()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            wf.request(
                &bob(),
                "1",
                NewApprovalRequest {
                    justification: None,
                    target: Some("PAID".into()),
                }
            ),
            Err(AppError::Validation(_))
        ));

        let req = wf
            .request(
                &bob(),
                "1",
                NewApprovalRequest {
                    justification: Some("regular client".into()),
                    target: Some("DELIVERED_ON_CREDIT".into()),
                },
            )
            .unwrap();
        let approved = wf.approve(&admin(), &req.id, ReviewDecision::default()).unwrap();
        assert!(approved.expires_at.is_none());
        assert!(wf.has_active_grant("1", "bob", Some("DELIVERED_ON_CREDIT")).unwrap());
        assert!(!wf.has_active_grant("1", "bob", Some("DELIVERED")).unwrap());

        // the grant lapses once the order leaves the captured status
        fx.put_order("1", OrderStatus::Cancelled);
        assert!(!wf.has_active_grant("1", "bob", Some("DELIVERED_ON_CREDIT")).unwrap());
    }

    #[test]
    fn test_stale_status_change_cannot_be_approved() {
        let fx = Fixture::new();
        fx.put_order("1", OrderStatus::Ready);
        let wf = fx.workflow(OrderStatusChange);
        let req = wf
            .request(
                &bob(),
                "1",
                NewApprovalRequest {
                    justification: None,
                    target: Some("DELIVERED_ON_CREDIT".into()),
                },
            )
            .unwrap();

        fx.put_order("1", OrderStatus::Cancelled);
        assert!(matches!(
            wf.approve(&admin(), &req.id, ReviewDecision::default()),
            Err(AppError::Conflict(_))
        ));
        // rejection still works on a stale request
        let rejected = wf
            .reject(
                &admin(),
                &req.id,
                ReviewDecision {
                    notes: Some("order was cancelled".into()),
                },
            )
            .unwrap();
        assert_eq!(rejected.status, ApprovalStatus::Rejected);
        assert_eq!(wf.list_pending().unwrap().len(), 0);
        assert_eq!(wf.list_for_resource("1").unwrap().len(), 1);
    }
}
