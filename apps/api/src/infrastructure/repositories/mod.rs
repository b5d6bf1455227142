// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_match_repository;
pub mod postgres_notification_repository;
pub mod postgres_organization_repository;
pub mod postgres_player_repository;
pub mod postgres_schedule_repository;
pub mod postgres_subscription_repository;
pub mod postgres_team_repository;
pub mod postgres_tenant_repository;
pub mod postgres_user_repository;

pub use in_memory::InMemoryStore;
pub use postgres_match_repository::PostgresMatchRepository;
pub use postgres_notification_repository::PostgresNotificationRepository;
pub use postgres_organization_repository::PostgresOrganizationRepository;
pub use postgres_player_repository::PostgresPlayerRepository;
pub use postgres_schedule_repository::PostgresScheduleRepository;
pub use postgres_subscription_repository::PostgresSubscriptionRepository;
pub use postgres_team_repository::PostgresTeamRepository;
pub use postgres_tenant_repository::PostgresTenantRepository;
pub use postgres_user_repository::PostgresUserRepository;

use crate::domain::repositories::RepositoryError;

/// Human readable message for a violated unique index
fn conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("tenants_slug_key") => "Tenant slug is already taken",
        Some("organizations_tenant_slug_idx") => "Organization slug is already taken",
        Some("users_email_key") => "Email already registered",
        Some("teams_organization_name_idx") => "A team with this name already exists",
        Some("team_tiers_team_id_level_key") => "A tier with this level already exists",
        Some("team_players_pkey") => "Player is already on the roster",
        Some("team_players_jersey_idx") => "Jersey number is already taken",
        Some("subscriptions_one_open_idx") => "Organization already has an open subscription",
        _ => "Record already exists",
    }
}

/// Maps a sqlx error, turning unique violations into conflicts
pub(crate) fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return RepositoryError::Conflict(conflict_message(db_err.constraint()).to_string());
            }
        }
        RepositoryError::Database(format!("Failed to {}: {}", context, e))
    }
}

/// Rejects stored values that no longer pass domain validation
pub(crate) fn corrupt(field: &'static str) -> impl Fn(String) -> RepositoryError {
    move |e| RepositoryError::Database(format!("Stored {} is invalid: {}", field, e))
}
