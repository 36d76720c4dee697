//! Audit log producer

use serde::Serialize;
use serde_json::Value;
use shared::models::AuditAction;
use thiserror::Error;
use tokio::sync::mpsc;

/// Audit entry waiting to be written
#[derive(Debug, Clone)]
pub struct AuditLogRequest {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub actor_id: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub timestamp: i64,
}

impl AuditLogRequest {
    /// Build a request from typed before/after snapshots
    pub fn new<T: Serialize>(
        action: AuditAction,
        resource_type: &str,
        resource_id: &str,
        actor_id: &str,
        before: Option<&T>,
        after: Option<&T>,
        timestamp: i64,
    ) -> Self {
        Self {
            action,
            resource_type: resource_type.to_string(),
            resource_id: resource_id.to_string(),
            actor_id: actor_id.to_string(),
            before: before.and_then(|v| serde_json::to_value(v).ok()),
            after: after.and_then(|v| serde_json::to_value(v).ok()),
            timestamp,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit channel full")]
    ChannelFull,
    #[error("audit channel closed")]
    ChannelClosed,
}

/// Non-blocking handle for enqueueing audit entries
#[derive(Debug, Clone)]
pub struct AuditLogService {
    tx: mpsc::Sender<AuditLogRequest>,
}

impl AuditLogService {
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<AuditLogRequest>) {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        (Self { tx }, rx)
    }

    /// Enqueue an entry without waiting
    pub fn log_change(&self, request: AuditLogRequest) -> Result<(), AuditError> {
        self.tx.try_send(request).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => AuditError::ChannelFull,
            mpsc::error::TrySendError::Closed(_) => AuditError::ChannelClosed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_change_enqueues() {
        let (service, mut rx) = AuditLogService::new(4);
        let req = AuditLogRequest::new::<Value>(
            AuditAction::Create,
            "order",
            "o-1",
            "alice",
            None,
            Some(&serde_json::json!({"number": "ORD-2026-0001"})),
            1,
        );
        service.log_change(req).unwrap();
        let got = rx.recv().await.unwrap();
        assert_eq!(got.resource_id, "o-1");
        assert!(got.before.is_none());
    }

    #[test]
    fn test_closed_channel_reports_error() {
        let (service, rx) = AuditLogService::new(1);
        drop(rx);
        let req = AuditLogRequest::new::<Value>(AuditAction::Update, "order", "o-1", "a", None, None, 0);
        assert!(matches!(service.log_change(req), Err(AuditError::ChannelClosed)));
    }
}
