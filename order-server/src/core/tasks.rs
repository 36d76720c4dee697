//! Background task management
//!
//! Tasks are registered with a kind and a name, wrapped so a panic is logged
//! instead of silently killing the task, and stopped together through a shared
//! [`CancellationToken`].
//!
//! - [`TaskKind::Worker`] - long-lived consumer (audit writer)
//! - [`TaskKind::Periodic`] - interval-driven job (grant expiry sweep)

use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Worker,
    Periodic,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Worker => write!(f, "Worker"),
            TaskKind::Periodic => write!(f, "Periodic"),
        }
    }
}

struct RegisteredTask {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// Registry of spawned background tasks
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
/// let token = tasks.shutdown_token();
/// tasks.spawn("expiry_scheduler", TaskKind::Periodic, scheduler.run(token));
/// tasks.shutdown().await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that tasks watch for the shutdown signal
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Spawn a task; panics inside it are caught and logged
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        let wrapped_future = async move {
            let result: Result<(), Box<dyn std::any::Any + Send>> =
                AssertUnwindSafe(future).catch_unwind().await;
            match result {
                Ok(()) => {
                    if !shutdown.is_cancelled() {
                        tracing::warn!(task = %name, kind = %kind, "Background task completed unexpectedly");
                    }
                }
                Err(panic_info) => {
                    let panic_msg: String = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        (*s).to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    tracing::error!(
                        task = %name,
                        kind = %kind,
                        panic = %panic_msg,
                        "Background task panicked"
                    );
                }
            }
        };

        let handle = tokio::spawn(wrapped_future);
        tracing::debug!(task = %name, kind = %kind, "Registered background task");
        self.tasks.push(RegisteredTask { name, kind, handle });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn log_summary(&self) {
        let workers = self
            .tasks
            .iter()
            .filter(|t| t.kind == TaskKind::Worker)
            .count();
        tracing::info!(
            "Background tasks registered: {} total (Worker: {}, Periodic: {})",
            self.tasks.len(),
            workers,
            self.tasks.len() - workers
        );
    }

    /// Number of tasks that have already finished (panicked or exited early)
    pub fn check_health(&self) -> usize {
        let failed = self
            .tasks
            .iter()
            .filter(|t| t.handle.is_finished())
            .inspect(|t| {
                tracing::error!(task = %t.name, kind = %t.kind, "Background task unexpectedly finished")
            })
            .count();
        if failed > 0 {
            tracing::error!(failed, total = self.tasks.len(), "Background task health check failed");
        }
        failed
    }

    /// Cancel every task and wait for it to stop
    pub async fn shutdown(self) {
        tracing::info!("Shutting down {} background tasks...", self.tasks.len());
        self.shutdown.cancel();

        for task in self.tasks {
            match task.handle.await {
                Ok(()) => tracing::debug!(task = %task.name, "Task completed"),
                Err(e) if e.is_cancelled() => tracing::debug!(task = %task.name, "Task cancelled"),
                Err(e) => tracing::error!(task = %task.name, error = ?e, "Task panicked"),
            }
        }

        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_stops_tasks() {
        let mut tasks = BackgroundTasks::new();
        let token = tasks.shutdown_token();
        tasks.spawn("waiter", TaskKind::Worker, async move {
            token.cancelled().await;
        });
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks.check_health(), 0);
        tasks.shutdown().await;
    }

    #[tokio::test]
    async fn test_panicking_task_is_contained() {
        let mut tasks = BackgroundTasks::new();
        tasks.spawn("boom", TaskKind::Periodic, async {
            panic!("boom");
        });
        tokio::task::yield_now().await;
        tasks.shutdown().await;
    }
}
