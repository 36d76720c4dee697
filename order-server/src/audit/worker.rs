//! Audit log background worker
//!
//! Consumes [`AuditLogRequest`]s and writes them to redb. On shutdown the
//! channel is drained before the worker exits.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::service::AuditLogRequest;
use super::storage::AuditStorage;

pub struct AuditWorker {
    storage: AuditStorage,
}

impl AuditWorker {
    pub fn new(storage: AuditStorage) -> Self {
        Self { storage }
    }

    /// Run until the channel closes or `shutdown` fires
    pub async fn run(self, mut rx: mpsc::Receiver<AuditLogRequest>, shutdown: CancellationToken) {
        tracing::info!("Audit log worker started");

        loop {
            tokio::select! {
                biased;
                req = rx.recv() => match req {
                    Some(req) => self.write(req),
                    None => {
                        tracing::info!("Audit log channel closed, worker stopping");
                        return;
                    }
                },
                _ = shutdown.cancelled() => break,
            }
        }

        while let Ok(req) = rx.try_recv() {
            self.write(req);
        }
        tracing::info!("Audit log worker stopped");
    }

    fn write(&self, req: AuditLogRequest) {
        match self.storage.append(req) {
            Ok(entry) => {
                tracing::debug!(
                    audit_id = entry.id,
                    action = %entry.action,
                    resource = %entry.resource_type,
                    "Audit entry recorded"
                );
            }
            Err(e) => tracing::error!("Failed to write audit entry: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditLogService;
    use crate::db::Store;
    use shared::models::AuditAction;

    #[tokio::test]
    async fn test_worker_drains_on_shutdown() {
        let store = Store::open_in_memory().unwrap();
        let storage = AuditStorage::new(store);
        let (service, rx) = AuditLogService::new(8);
        let token = CancellationToken::new();

        for id in ["o-1", "o-2"] {
            service
                .log_change(AuditLogRequest::new::<serde_json::Value>(
                    AuditAction::Create,
                    "order",
                    id,
                    "alice",
                    None,
                    None,
                    0,
                ))
                .unwrap();
        }
        token.cancel();
        AuditWorker::new(storage.clone()).run(rx, token).await;

        assert_eq!(storage.query_last(10).unwrap().len(), 2);
    }
}
