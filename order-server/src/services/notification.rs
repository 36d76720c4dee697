//! User notifications
//!
//! [`NotificationService`] is the delivery seam. [`BusNotifier`] publishes
//! every notification on an in-process broadcast channel; a transport (push,
//! websocket, email) subscribes and forwards. Publishing with no subscriber
//! is not an error.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;

use super::clock::Clock;

const NOTIFICATION_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Machine-readable kind, e.g. `order_edit.approved`
    pub kind: String,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
}

impl Notification {
    pub fn new(kind: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            message: message.into(),
            related_id: None,
        }
    }

    pub fn related_to(mut self, id: impl Into<String>) -> Self {
        self.related_id = Some(id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Recipient {
    User { user_id: String },
    Privileged,
}

/// Published notification
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEnvelope {
    pub recipient: Recipient,
    pub notification: Notification,
    pub sent_at: i64,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

pub trait NotificationService: Send + Sync {
    fn notify(&self, user_id: &str, notification: &Notification) -> Result<(), NotifyError>;

    fn notify_all_privileged(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Broadcast-channel notifier
#[derive(Debug, Clone)]
pub struct BusNotifier {
    tx: broadcast::Sender<NotificationEnvelope>,
    clock: Arc<dyn Clock>,
}

impl BusNotifier {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let (tx, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        Self { tx, clock }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEnvelope> {
        self.tx.subscribe()
    }

    fn publish(&self, recipient: Recipient, notification: &Notification) {
        let envelope = NotificationEnvelope {
            recipient,
            notification: notification.clone(),
            sent_at: self.clock.now_millis(),
        };
        if self.tx.send(envelope).is_err() {
            tracing::debug!(kind = %notification.kind, "No notification subscribers");
        }
    }
}

impl NotificationService for BusNotifier {
    fn notify(&self, user_id: &str, notification: &Notification) -> Result<(), NotifyError> {
        self.publish(
            Recipient::User {
                user_id: user_id.to_string(),
            },
            notification,
        );
        Ok(())
    }

    fn notify_all_privileged(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.publish(Recipient::Privileged, notification);
        Ok(())
    }
}
