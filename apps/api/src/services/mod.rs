// Application services
// Use cases that load aggregates through the repository ports, check the
// caller's access, apply domain rules and persist the outcome

pub mod access;
pub mod auth;
pub mod matches;
pub mod notifications;
pub mod organizations;
pub mod players;
pub mod schedules;
pub mod subscriptions;
pub mod teams;
pub mod tiers;

pub use access::Actor;
pub use auth::AuthService;
pub use matches::MatchService;
pub use notifications::{Notice, NotificationService};
pub use organizations::OrganizationService;
pub use players::PlayerService;
pub use schedules::ScheduleService;
pub use subscriptions::SubscriptionService;
pub use teams::TeamService;
pub use tiers::TierService;

use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::domain::repositories::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
