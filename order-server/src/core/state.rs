use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::approval::{
    ApprovalWorkflow, EditPolicyService, ExpenseAuthorization, OrderEdit, OrderStatusChange,
};
use crate::audit::{AuditLogRequest, AuditLogService, AuditStorage, AuditWorker};
use crate::core::{BackgroundTasks, Config, Result, ServerError, TaskKind};
use crate::db::Store;
use crate::orders::{ExpenseOrderService, OrderService, QuoteService, ServiceDeps};
use crate::scheduler::ExpiryScheduler;
use crate::sequence::SequenceGenerator;
use crate::services::{AdminList, BusNotifier, Clock, PrivilegeLookup, SideEffects, SystemClock};
use shared::util::MILLIS_PER_MINUTE;

/// Server state - shared handles to every service
///
/// Cheap to clone; every field is an `Arc` or a handle around one.
///
/// | Field | Purpose |
/// |-------|---------|
/// | store | redb database |
/// | sequences | document numbering |
/// | orders / expense_orders / quotes | aggregate services |
/// | order_edits / status_changes / expense_auths | approval workflows |
/// | policies | editable-status policy |
/// | audit | audit log queries |
/// | notifier | notification bus (subscribe for live events) |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub store: Store,
    pub clock: Arc<dyn Clock>,
    pub privileges: Arc<dyn PrivilegeLookup>,
    pub notifier: Arc<BusNotifier>,
    pub sequences: SequenceGenerator,
    pub orders: Arc<OrderService>,
    pub expense_orders: Arc<ExpenseOrderService>,
    pub quotes: Arc<QuoteService>,
    pub order_edits: Arc<ApprovalWorkflow<OrderEdit>>,
    pub status_changes: Arc<ApprovalWorkflow<OrderStatusChange>>,
    pub expense_auths: Arc<ApprovalWorkflow<ExpenseAuthorization>>,
    pub policies: Arc<EditPolicyService>,
    pub audit: AuditStorage,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("config", &self.config)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// Open the database under `work_dir` and wire every service
    ///
    /// Returns the receiving end of the audit channel; hand it to
    /// [`start_background_tasks`](Self::start_background_tasks).
    pub fn initialize(config: &Config) -> Result<(Self, mpsc::Receiver<AuditLogRequest>)> {
        std::fs::create_dir_all(config.database_dir()).map_err(ServerError::WorkDir)?;
        let db_path = config.database_path();
        let store = Store::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Database opened");

        Self::with_store(config.clone(), store, Arc::new(SystemClock))
    }

    /// Wire every service around an already opened store
    ///
    /// Tests use this with an in-memory store and a manual clock.
    pub fn with_store(
        config: Config,
        store: Store,
        clock: Arc<dyn Clock>,
    ) -> Result<(Self, mpsc::Receiver<AuditLogRequest>)> {
        let privileges: Arc<dyn PrivilegeLookup> =
            Arc::new(AdminList::new(config.admin_user_ids.iter().cloned()));
        if config.admin_user_ids.is_empty() {
            tracing::warn!("ADMIN_USER_IDS is empty; nobody can review approval requests");
        }

        let (audit_service, audit_rx) = AuditLogService::new(config.audit_buffer_size);
        let notifier = Arc::new(BusNotifier::new(clock.clone()));
        let effects = SideEffects::new(notifier.clone(), audit_service);

        let deps = ServiceDeps {
            store: store.clone(),
            privileges: privileges.clone(),
            clock: clock.clone(),
            effects: effects.clone(),
        };

        let order_edits = Arc::new(ApprovalWorkflow::new(
            store.clone(),
            OrderEdit::new(config.edit_grant_minutes * MILLIS_PER_MINUTE),
            privileges.clone(),
            clock.clone(),
            effects.clone(),
        ));
        let status_changes = Arc::new(ApprovalWorkflow::new(
            store.clone(),
            OrderStatusChange,
            privileges.clone(),
            clock.clone(),
            effects.clone(),
        ));
        let expense_auths = Arc::new(ApprovalWorkflow::new(
            store.clone(),
            ExpenseAuthorization,
            privileges.clone(),
            clock.clone(),
            effects.clone(),
        ));

        let orders = OrderService::new(deps.clone(), config.default_tax_rate)
            .with_edit_grants(order_edits.clone())
            .with_transition_grants(status_changes.clone());
        let expense_orders = ExpenseOrderService::new(deps.clone(), config.default_tax_rate)
            .with_transition_grants(expense_auths.clone());
        let quotes = QuoteService::new(deps, config.default_tax_rate);

        let policies = EditPolicyService::new(store.clone(), privileges.clone(), clock.clone(), effects);
        policies.seed_defaults()?;

        let state = Self {
            config,
            sequences: SequenceGenerator::new(store.clone()),
            audit: AuditStorage::new(store.clone()),
            store,
            clock,
            privileges,
            notifier,
            orders: Arc::new(orders),
            expense_orders: Arc::new(expense_orders),
            quotes: Arc::new(quotes),
            order_edits,
            status_changes,
            expense_auths,
            policies: Arc::new(policies),
        };
        Ok((state, audit_rx))
    }

    /// Expiry scheduler over every approval workflow
    pub fn expiry_scheduler(&self) -> ExpiryScheduler {
        ExpiryScheduler::new(
            self.clock.clone(),
            Duration::from_secs(self.config.expiry_sweep_interval_secs.max(1)),
            Duration::from_secs(self.config.expiry_warning_secs),
        )
        .register(self.order_edits.clone())
        .register(self.status_changes.clone())
        .register(self.expense_auths.clone())
    }

    /// Register the audit writer and the expiry scheduler
    pub fn start_background_tasks(
        &self,
        tasks: &mut BackgroundTasks,
        audit_rx: mpsc::Receiver<AuditLogRequest>,
    ) {
        let shutdown = tasks.shutdown_token();

        let worker = AuditWorker::new(self.audit.clone());
        tasks.spawn(
            "audit_worker",
            TaskKind::Worker,
            worker.run(audit_rx, shutdown.clone()),
        );

        let scheduler = self.expiry_scheduler();
        tasks.spawn("expiry_scheduler", TaskKind::Periodic, scheduler.run(shutdown));

        tasks.log_summary();
    }
}
