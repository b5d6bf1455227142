use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::subscription::Subscription;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Save a subscription (insert or update)
    ///
    /// A second open subscription for the same organization is a conflict.
    async fn save(&self, subscription: &Subscription) -> RepositoryResult<()>;

    /// The organization's open subscription, else its most recent one
    async fn find_current(&self, organization_id: Uuid) -> RepositoryResult<Option<Subscription>>;
}
