use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{corrupt, db_error};
use crate::domain::organization::Slug;
use crate::domain::repositories::{RepositoryResult, TenantRepository};
use crate::domain::tenant::Tenant;

/// PostgreSQL implementation of TenantRepository
pub struct PostgresTenantRepository {
    pool: PgPool,
}

impl PostgresTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TenantRow {
    id: Uuid,
    name: String,
    slug: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = crate::domain::repositories::RepositoryError;

    fn try_from(r: TenantRow) -> Result<Self, Self::Error> {
        Ok(Tenant {
            id: r.id,
            name: r.name,
            slug: Slug::new(r.slug).map_err(corrupt("tenant slug"))?,
            is_active: r.is_active,
            created_at: r.created_at,
        })
    }
}

#[async_trait]
impl TenantRepository for PostgresTenantRepository {
    async fn create(&self, tenant: &Tenant) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO tenants (id, name, slug, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(tenant.id)
        .bind(&tenant.name)
        .bind(tenant.slug.as_str())
        .bind(tenant.is_active)
        .bind(tenant.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create tenant"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Tenant>> {
        let row = sqlx::query_as::<_, TenantRow>(
            "SELECT id, name, slug, is_active, created_at FROM tenants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find tenant by id"))?;

        row.map(Tenant::try_from).transpose()
    }
}
