//! Approval grant expiry
//!
//! Registered as `TaskKind::Periodic`. Every tick runs two passes over each
//! registered workflow:
//!
//! 1. `expire_due(now)` moves APPROVED grants whose window has closed to
//!    EXPIRED and notifies the requester
//! 2. `warn_expiring(now, warning)` notifies requesters whose grant lapses
//!    within the warning horizon
//!
//! A failing sweeper is logged and skipped; the others still run.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::approval::GrantSweeper;
use crate::services::Clock;

/// Totals of one scheduler tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub expired: usize,
    pub warned: usize,
    pub failed_hooks: usize,
    pub failed_sweepers: usize,
}

#[derive(Clone)]
pub struct ExpiryScheduler {
    sweepers: Vec<Arc<dyn GrantSweeper>>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    warning: Duration,
}

impl std::fmt::Debug for ExpiryScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiryScheduler")
            .field(
                "sweepers",
                &self.sweepers.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("interval", &self.interval)
            .field("warning", &self.warning)
            .finish()
    }
}

impl ExpiryScheduler {
    pub fn new(clock: Arc<dyn Clock>, interval: Duration, warning: Duration) -> Self {
        Self {
            sweepers: Vec::new(),
            clock,
            interval,
            warning,
        }
    }

    pub fn register(mut self, sweeper: Arc<dyn GrantSweeper>) -> Self {
        self.sweepers.push(sweeper);
        self
    }

    /// Run one expire + warn pass over every sweeper
    pub fn sweep_once(&self) -> SweepReport {
        let now = self.clock.now_millis();
        let horizon = i64::try_from(self.warning.as_millis()).unwrap_or(i64::MAX);
        let mut report = SweepReport::default();

        for sweeper in &self.sweepers {
            match sweeper.expire_due(now) {
                Ok(outcome) => {
                    report.expired += outcome.affected;
                    report.failed_hooks += outcome.failed_hooks;
                }
                Err(e) => {
                    report.failed_sweepers += 1;
                    tracing::error!(sweeper = sweeper.name(), error = %e, "Grant expiry pass failed");
                    continue;
                }
            }
            match sweeper.warn_expiring(now, horizon) {
                Ok(outcome) => {
                    report.warned += outcome.affected;
                    report.failed_hooks += outcome.failed_hooks;
                }
                Err(e) => {
                    report.failed_sweepers += 1;
                    tracing::error!(sweeper = sweeper.name(), error = %e, "Grant warning pass failed");
                }
            }
        }

        if report.expired > 0 || report.warned > 0 {
            tracing::info!(
                expired = report.expired,
                warned = report.warned,
                failed_hooks = report.failed_hooks,
                "Expiry sweep finished"
            );
        }
        report
    }

    /// Main loop: sweep once per interval until `shutdown` fires
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            sweepers = self.sweepers.len(),
            "Expiry scheduler started"
        );
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    // redb calls block; keep them off the runtime threads
                    let this = self.clone();
                    if let Err(e) = tokio::task::spawn_blocking(move || this.sweep_once()).await {
                        tracing::error!(error = %e, "Expiry sweep task failed");
                    }
                }
            }
        }

        tracing::info!("Expiry scheduler stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::{ApprovalWorkflow, OrderEdit, SweepOutcome};
    use crate::audit::AuditLogService;
    use crate::auth::RequestContext;
    use crate::db::{ORDERS_TABLE, Store, put_json};
    use crate::services::{AdminList, BusNotifier, ManualClock, SideEffects};
    use crate::utils::{AppError, AppResult};
    use rust_decimal::Decimal;
    use shared::models::{ApprovalStatus, Order, OrderStatus};
    use shared::request::{NewApprovalRequest, ReviewDecision};
    use shared::util::{MILLIS_PER_MINUTE, MILLIS_PER_SECOND};

    const T0: i64 = 1_790_000_000_000;

    struct Failing;

    impl GrantSweeper for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn expire_due(&self, _now: i64) -> AppResult<SweepOutcome> {
            Err(AppError::Database("disk on fire".into()))
        }

        fn warn_expiring(&self, _now: i64, _horizon: i64) -> AppResult<SweepOutcome> {
            Ok(SweepOutcome::default())
        }
    }

    fn setup() -> (Arc<ManualClock>, Arc<ApprovalWorkflow<OrderEdit>>, String) {
        let store = Store::open_in_memory().unwrap();
        let clock = Arc::new(ManualClock::new(T0));
        let (audit, _rx) = AuditLogService::new(64);
        let effects = SideEffects::new(Arc::new(BusNotifier::new(clock.clone())), audit);
        let workflow = Arc::new(ApprovalWorkflow::new(
            store.clone(),
            OrderEdit::new(5 * MILLIS_PER_MINUTE),
            Arc::new(AdminList::new(["admin"])),
            clock.clone(),
            effects,
        ));

        let order = Order::new(
            "o1".into(),
            "ORD-2026-0001".into(),
            OrderStatus::Confirmed,
            Decimal::ZERO,
            "bob".into(),
            T0,
        );
        let txn = store.begin_write().unwrap();
        put_json(&txn, ORDERS_TABLE, "o1", &order).unwrap();
        txn.commit().unwrap();

        let request = workflow
            .request(&RequestContext::new("bob"), "o1", NewApprovalRequest::default())
            .unwrap();
        workflow
            .approve(&RequestContext::new("admin"), &request.id, ReviewDecision::default())
            .unwrap();
        (clock, workflow, request.id)
    }

    #[test]
    fn test_sweep_warns_then_expires() {
        let (clock, workflow, request_id) = setup();
        let scheduler = ExpiryScheduler::new(
            clock.clone(),
            Duration::from_secs(60),
            Duration::from_secs(60),
        )
        .register(workflow.clone());

        assert_eq!(scheduler.sweep_once(), SweepReport::default());

        clock.advance(4 * MILLIS_PER_MINUTE + 30 * MILLIS_PER_SECOND);
        let report = scheduler.sweep_once();
        assert_eq!(report.warned, 1);
        assert_eq!(report.expired, 0);
        // Warned again on every sweep until the grant lapses
        clock.advance(20 * MILLIS_PER_SECOND);
        let report = scheduler.sweep_once();
        assert_eq!(report.warned, 1);
        assert_eq!(report.expired, 0);

        clock.advance(MILLIS_PER_MINUTE);
        let report = scheduler.sweep_once();
        assert_eq!(report.expired, 1);
        assert_eq!(report.warned, 0);
        assert_eq!(workflow.get(&request_id).unwrap().status, ApprovalStatus::Expired);
        assert_eq!(scheduler.sweep_once().expired, 0);
    }

    #[test]
    fn test_failing_sweeper_does_not_stop_others() {
        let (clock, workflow, request_id) = setup();
        let scheduler =
            ExpiryScheduler::new(clock.clone(), Duration::from_secs(60), Duration::ZERO)
                .register(Arc::new(Failing))
                .register(workflow.clone());

        clock.advance(6 * MILLIS_PER_MINUTE);
        let report = scheduler.sweep_once();
        assert_eq!(report.failed_sweepers, 1);
        assert_eq!(report.expired, 1);
        assert_eq!(workflow.get(&request_id).unwrap().status, ApprovalStatus::Expired);
    }

    #[tokio::test]
    async fn test_run_stops_on_shutdown() {
        let (clock, workflow, request_id) = setup();
        clock.advance(6 * MILLIS_PER_MINUTE);
        let scheduler =
            ExpiryScheduler::new(clock, Duration::from_millis(10), Duration::from_secs(60))
                .register(workflow.clone());

        let token = CancellationToken::new();
        let handle = tokio::spawn(scheduler.run(token.clone()));
        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();
        handle.await.unwrap();

        assert_eq!(workflow.get(&request_id).unwrap().status, ApprovalStatus::Expired);
    }
}
