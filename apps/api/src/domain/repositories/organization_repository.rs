use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::organization::Organization;

/// Repository trait for Organization aggregate
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Save an organization (insert or update)
    async fn save(&self, organization: &Organization) -> RepositoryResult<()>;

    /// Find a live organization by its ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Organization>>;

    /// Find all live organizations of a tenant
    async fn list_by_tenant(&self, tenant_id: Uuid) -> RepositoryResult<Vec<Organization>>;
}
