use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{corrupt, db_error};
use crate::domain::repositories::{RepositoryError, RepositoryResult, UserRepository};
use crate::domain::user::{Email, Role, User};

/// PostgreSQL implementation of UserRepository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_USER: &str = r#"
    SELECT id, tenant_id, organization_id, email, password_hash, full_name,
           role, date_of_birth, is_active, last_login_at, created_at
    FROM users
"#;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    tenant_id: Uuid,
    organization_id: Option<Uuid>,
    email: String,
    password_hash: String,
    full_name: String,
    role: Role,
    date_of_birth: Option<NaiveDate>,
    is_active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: r.id,
            tenant_id: r.tenant_id,
            organization_id: r.organization_id,
            email: Email::new(r.email).map_err(corrupt("user email"))?,
            password_hash: r.password_hash,
            full_name: r.full_name,
            role: r.role,
            date_of_birth: r.date_of_birth,
            is_active: r.is_active,
            last_login_at: r.last_login_at,
            created_at: r.created_at,
        })
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, tenant_id, organization_id, email, password_hash, full_name,
                role, date_of_birth, is_active, last_login_at, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(user.id)
        .bind(user.tenant_id)
        .bind(user.organization_id)
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(user.role)
        .bind(user.date_of_birth)
        .bind(user.is_active)
        .bind(user.last_login_at)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("create user"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        let sql = format!("{} WHERE id = $1", SELECT_USER);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find user by id"))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        let sql = format!("{} WHERE email = $1", SELECT_USER);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find user by email"))?;

        row.map(User::try_from).transpose()
    }

    async fn list_by_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<User>> {
        let sql = format!(
            "{} WHERE organization_id = $1 ORDER BY full_name",
            SELECT_USER
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list users"))?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_last_login(&self, user_id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("update last login"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("User {}", user_id)));
        }

        Ok(())
    }
}
