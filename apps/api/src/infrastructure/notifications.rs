// Notification delivery adapters
// Real email/SMS/push gateways plug in behind NotificationSender

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::domain::notification::NotificationLog;

/// Delivery failure reported by a sender
#[derive(Debug, Error)]
#[error("Delivery failed: {0}")]
pub struct SendError(pub String);

/// Outbound channel for notification logs
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, notification: &NotificationLog) -> Result<(), SendError>;
}

/// Default sender: writes a tracing line and reports success
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSender;

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send(&self, notification: &NotificationLog) -> Result<(), SendError> {
        info!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            channel = ?notification.channel,
            kind = %notification.notification_type,
            subject = %notification.subject,
            "Notification dispatched"
        );
        Ok(())
    }
}
