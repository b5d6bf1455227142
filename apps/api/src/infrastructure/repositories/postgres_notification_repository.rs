use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::notification::{NotificationChannel, NotificationLog, NotificationStatus};
use crate::domain::repositories::{NotificationRepository, RepositoryError, RepositoryResult};

/// PostgreSQL implementation of NotificationRepository
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_LOG: &str = r#"
    SELECT id, organization_id, user_id, channel, notification_type, subject, body,
           data, status, error, sent_at, read_at, created_at
    FROM notification_logs
"#;

#[derive(sqlx::FromRow)]
struct LogRow {
    id: Uuid,
    organization_id: Uuid,
    user_id: Uuid,
    channel: NotificationChannel,
    notification_type: String,
    subject: String,
    body: String,
    data: Value,
    status: NotificationStatus,
    error: Option<String>,
    sent_at: Option<DateTime<Utc>>,
    read_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<LogRow> for NotificationLog {
    fn from(r: LogRow) -> Self {
        NotificationLog {
            id: r.id,
            organization_id: r.organization_id,
            user_id: r.user_id,
            channel: r.channel,
            notification_type: r.notification_type,
            subject: r.subject,
            body: r.body,
            data: r.data,
            status: r.status,
            error: r.error,
            sent_at: r.sent_at,
            read_at: r.read_at,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn insert(&self, log: &NotificationLog) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_logs (
                id, organization_id, user_id, channel, notification_type, subject, body,
                data, status, error, sent_at, read_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(log.id)
        .bind(log.organization_id)
        .bind(log.user_id)
        .bind(log.channel)
        .bind(&log.notification_type)
        .bind(&log.subject)
        .bind(&log.body)
        .bind(&log.data)
        .bind(log.status)
        .bind(&log.error)
        .bind(log.sent_at)
        .bind(log.read_at)
        .bind(log.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("insert notification"))?;

        Ok(())
    }

    async fn save(&self, log: &NotificationLog) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE notification_logs
            SET status = $2, error = $3, sent_at = $4, read_at = $5
            WHERE id = $1
            "#,
        )
        .bind(log.id)
        .bind(log.status)
        .bind(&log.error)
        .bind(log.sent_at)
        .bind(log.read_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("update notification"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Notification {}", log.id)));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<NotificationLog>> {
        let sql = format!("{} WHERE id = $1", SELECT_LOG);
        let row = sqlx::query_as::<_, LogRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find notification"))?;

        Ok(row.map(NotificationLog::from))
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<NotificationLog>> {
        let sql = format!("{} WHERE user_id = $1 ORDER BY created_at DESC", SELECT_LOG);
        let rows = sqlx::query_as::<_, LogRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list user notifications"))?;

        Ok(rows.into_iter().map(NotificationLog::from).collect())
    }

    async fn list_for_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<NotificationLog>> {
        let sql = format!(
            "{} WHERE organization_id = $1 ORDER BY created_at DESC",
            SELECT_LOG
        );
        let rows = sqlx::query_as::<_, LogRow>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list organization notifications"))?;

        Ok(rows.into_iter().map(NotificationLog::from).collect())
    }
}
