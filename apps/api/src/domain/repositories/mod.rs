// Repository ports
// Each aggregate gets a trait; adapters live in infrastructure

pub mod match_repository;
pub mod notification_repository;
pub mod organization_repository;
pub mod player_repository;
pub mod schedule_repository;
pub mod subscription_repository;
pub mod team_repository;
pub mod tenant_repository;
pub mod user_repository;

pub use match_repository::MatchRepository;
pub use notification_repository::NotificationRepository;
pub use organization_repository::OrganizationRepository;
pub use player_repository::PlayerRepository;
pub use schedule_repository::ScheduleRepository;
pub use subscription_repository::SubscriptionRepository;
pub use team_repository::TeamRepository;
pub use tenant_repository::TenantRepository;
pub use user_repository::UserRepository;

use thiserror::Error;

/// Errors raised by repository adapters
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
