use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::tenant::Tenant;

#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Insert a new tenant; a taken slug is a conflict
    async fn create(&self, tenant: &Tenant) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Tenant>>;
}
