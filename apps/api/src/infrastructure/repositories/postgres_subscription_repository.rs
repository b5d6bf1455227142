use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::repositories::{RepositoryResult, SubscriptionRepository};
use crate::domain::subscription::{BillingCycle, Plan, Subscription, SubscriptionStatus};

/// PostgreSQL implementation of SubscriptionRepository
///
/// The `subscriptions_one_open_idx` partial index keeps at most one open
/// subscription per organization.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    organization_id: Uuid,
    plan: Plan,
    status: SubscriptionStatus,
    billing_cycle: BillingCycle,
    price: Decimal,
    starts_at: DateTime<Utc>,
    ends_at: Option<DateTime<Utc>>,
    trial_ends_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(r: SubscriptionRow) -> Self {
        Subscription {
            id: r.id,
            organization_id: r.organization_id,
            plan: r.plan,
            status: r.status,
            billing_cycle: r.billing_cycle,
            price: r.price,
            starts_at: r.starts_at,
            ends_at: r.ends_at,
            trial_ends_at: r.trial_ends_at,
            cancelled_at: r.cancelled_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, organization_id, plan, status, billing_cycle, price,
                starts_at, ends_at, trial_ends_at, cancelled_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                plan = EXCLUDED.plan,
                status = EXCLUDED.status,
                billing_cycle = EXCLUDED.billing_cycle,
                price = EXCLUDED.price,
                ends_at = EXCLUDED.ends_at,
                trial_ends_at = EXCLUDED.trial_ends_at,
                cancelled_at = EXCLUDED.cancelled_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(subscription.id)
        .bind(subscription.organization_id)
        .bind(subscription.plan)
        .bind(subscription.status)
        .bind(subscription.billing_cycle)
        .bind(subscription.price)
        .bind(subscription.starts_at)
        .bind(subscription.ends_at)
        .bind(subscription.trial_ends_at)
        .bind(subscription.cancelled_at)
        .bind(subscription.created_at)
        .bind(subscription.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("save subscription"))?;

        Ok(())
    }

    async fn find_current(&self, organization_id: Uuid) -> RepositoryResult<Option<Subscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT id, organization_id, plan, status, billing_cycle, price,
                   starts_at, ends_at, trial_ends_at, cancelled_at, created_at, updated_at
            FROM subscriptions
            WHERE organization_id = $1
            ORDER BY (status IN ('trial', 'active', 'past_due')) DESC, created_at DESC
            LIMIT 1
            "#,
        )
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find current subscription"))?;

        Ok(row.map(Subscription::from))
    }
}
