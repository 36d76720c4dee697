//! Post-commit side effects
//!
//! Notifications and audit entries are collected while a transaction runs and
//! dispatched only after it commits. A failing or panicking hook is logged
//! and never affects the committed change or the remaining hooks.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use super::notification::{Notification, NotificationService};
use crate::audit::{AuditLogRequest, AuditLogService};

#[derive(Debug, Clone)]
pub enum PostCommitHook {
    Notify {
        user_id: String,
        notification: Notification,
    },
    NotifyPrivileged(Notification),
    Audit(AuditLogRequest),
}

impl PostCommitHook {
    pub fn notify(user_id: impl Into<String>, notification: Notification) -> Self {
        Self::Notify {
            user_id: user_id.into(),
            notification,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PostCommitHook::Notify { .. } => "notify",
            PostCommitHook::NotifyPrivileged(_) => "notify_privileged",
            PostCommitHook::Audit(_) => "audit",
        }
    }
}

/// Dispatcher for post-commit hooks
#[derive(Clone)]
pub struct SideEffects {
    notifier: Arc<dyn NotificationService>,
    audit: AuditLogService,
}

impl std::fmt::Debug for SideEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SideEffects")
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}

impl SideEffects {
    pub fn new(notifier: Arc<dyn NotificationService>, audit: AuditLogService) -> Self {
        Self { notifier, audit }
    }

    /// Run every hook; returns the number that failed
    pub fn dispatch(&self, hooks: Vec<PostCommitHook>) -> usize {
        let mut failed = 0;
        for hook in hooks {
            let label = hook.label();
            match catch_unwind(AssertUnwindSafe(|| self.run(hook))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failed += 1;
                    tracing::warn!(hook = label, error = %e, "Post-commit hook failed");
                }
                Err(_) => {
                    failed += 1;
                    tracing::error!(hook = label, "Post-commit hook panicked");
                }
            }
        }
        failed
    }

    fn run(&self, hook: PostCommitHook) -> Result<(), String> {
        match hook {
            PostCommitHook::Notify {
                user_id,
                notification,
            } => self
                .notifier
                .notify(&user_id, &notification)
                .map_err(|e| e.to_string()),
            PostCommitHook::NotifyPrivileged(notification) => self
                .notifier
                .notify_all_privileged(&notification)
                .map_err(|e| e.to_string()),
            PostCommitHook::Audit(request) => {
                self.audit.log_change(request).map_err(|e| e.to_string())
            }
        }
    }
}
