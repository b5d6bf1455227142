use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::notification::NotificationLog;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert(&self, log: &NotificationLog) -> RepositoryResult<()>;

    /// Persist status changes of an existing log
    async fn save(&self, log: &NotificationLog) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<NotificationLog>>;

    /// A user's inbox, newest first
    async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<NotificationLog>>;

    async fn list_for_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<NotificationLog>>;
}
