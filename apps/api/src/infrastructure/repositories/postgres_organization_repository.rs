use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{corrupt, db_error};
use crate::domain::organization::{Organization, Slug};
use crate::domain::repositories::{OrganizationRepository, RepositoryError, RepositoryResult};
use crate::domain::user::Email;

/// PostgreSQL implementation of OrganizationRepository
///
/// Soft-deleted rows are kept but never returned by the finders.
pub struct PostgresOrganizationRepository {
    pool: PgPool,
}

impl PostgresOrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_ORGANIZATION: &str = r#"
    SELECT id, tenant_id, name, slug, contact_email, phone, address,
           settings, is_active, created_at, updated_at, deleted_at
    FROM organizations
"#;

#[derive(sqlx::FromRow)]
struct OrganizationRow {
    id: Uuid,
    tenant_id: Uuid,
    name: String,
    slug: String,
    contact_email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    settings: Value,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<OrganizationRow> for Organization {
    type Error = RepositoryError;

    fn try_from(r: OrganizationRow) -> Result<Self, Self::Error> {
        Ok(Organization {
            id: r.id,
            tenant_id: r.tenant_id,
            name: r.name,
            slug: Slug::new(r.slug).map_err(corrupt("organization slug"))?,
            contact_email: r
                .contact_email
                .map(Email::new)
                .transpose()
                .map_err(corrupt("contact email"))?,
            phone: r.phone,
            address: r.address,
            settings: r.settings,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
            deleted_at: r.deleted_at,
        })
    }
}

#[async_trait]
impl OrganizationRepository for PostgresOrganizationRepository {
    async fn save(&self, organization: &Organization) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO organizations (
                id, tenant_id, name, slug, contact_email, phone, address,
                settings, is_active, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                contact_email = EXCLUDED.contact_email,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                settings = EXCLUDED.settings,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            "#,
        )
        .bind(organization.id)
        .bind(organization.tenant_id)
        .bind(&organization.name)
        .bind(organization.slug.as_str())
        .bind(organization.contact_email.as_ref().map(|e| e.as_str()))
        .bind(&organization.phone)
        .bind(&organization.address)
        .bind(&organization.settings)
        .bind(organization.is_active)
        .bind(organization.created_at)
        .bind(organization.updated_at)
        .bind(organization.deleted_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("save organization"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Organization>> {
        let sql = format!("{} WHERE id = $1 AND deleted_at IS NULL", SELECT_ORGANIZATION);
        let row = sqlx::query_as::<_, OrganizationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find organization by id"))?;

        row.map(Organization::try_from).transpose()
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> RepositoryResult<Vec<Organization>> {
        let sql = format!(
            "{} WHERE tenant_id = $1 AND deleted_at IS NULL ORDER BY name",
            SELECT_ORGANIZATION
        );
        let rows = sqlx::query_as::<_, OrganizationRow>(&sql)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list organizations"))?;

        rows.into_iter().map(Organization::try_from).collect()
    }
}
