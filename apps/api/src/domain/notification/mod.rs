// Notification domain module
// A log row per recipient; delivery is handled by infrastructure senders

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::errors::{required_text, DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_channel", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    InApp,
    Email,
    Sms,
    Push,
}

/// Delivery state of a notification
///
/// # Status Transitions
/// ```text
/// Pending -> Sent -> Read
///    |                ^
///    +--> Failed -----+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
    Read,
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationStatus::Pending => write!(f, "pending"),
            NotificationStatus::Sent => write!(f, "sent"),
            NotificationStatus::Failed => write!(f, "failed"),
            NotificationStatus::Read => write!(f, "read"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationLog {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
    pub channel: NotificationChannel,
    pub notification_type: String,
    pub subject: String,
    pub body: String,
    pub data: Value,
    pub status: NotificationStatus,
    pub error: Option<String>,
    pub sent_at: Option<DateTime<Utc>>,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl NotificationLog {
    pub fn new(
        organization_id: Uuid,
        user_id: Uuid,
        channel: NotificationChannel,
        notification_type: &str,
        subject: &str,
        body: &str,
        data: Value,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            organization_id,
            user_id,
            channel,
            notification_type: required_text(notification_type, "Notification type")?,
            subject: required_text(subject, "Subject")?,
            body: required_text(body, "Body")?,
            data,
            status: NotificationStatus::Pending,
            error: None,
            sent_at: None,
            read_at: None,
            created_at: Utc::now(),
        })
    }

    pub fn mark_sent(&mut self) -> DomainResult<()> {
        if self.status != NotificationStatus::Pending {
            return Err(DomainError::invalid_transition(self.status, NotificationStatus::Sent));
        }
        self.status = NotificationStatus::Sent;
        self.sent_at = Some(Utc::now());
        self.error = None;
        Ok(())
    }

    pub fn mark_failed(&mut self, error: impl Into<String>) -> DomainResult<()> {
        if self.status != NotificationStatus::Pending {
            return Err(DomainError::invalid_transition(self.status, NotificationStatus::Failed));
        }
        self.status = NotificationStatus::Failed;
        self.error = Some(error.into());
        Ok(())
    }

    /// Marks the notification read; repeated calls keep the first read time
    pub fn mark_read(&mut self) {
        if self.status == NotificationStatus::Read {
            return;
        }
        self.status = NotificationStatus::Read;
        self.read_at = Some(Utc::now());
    }
}
