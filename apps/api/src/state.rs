// Shared application state handed to every handler

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::domain::repositories::{
    MatchRepository, NotificationRepository, OrganizationRepository, PlayerRepository,
    ScheduleRepository, SubscriptionRepository, TeamRepository, TenantRepository, UserRepository,
};
use crate::infrastructure::notifications::{LogNotificationSender, NotificationSender};
use crate::infrastructure::repositories::{
    InMemoryStore, PostgresMatchRepository, PostgresNotificationRepository,
    PostgresOrganizationRepository, PostgresPlayerRepository, PostgresScheduleRepository,
    PostgresSubscriptionRepository, PostgresTeamRepository, PostgresTenantRepository,
    PostgresUserRepository,
};

/// One adapter per repository port
#[derive(Clone)]
pub struct Repositories {
    pub tenants: Arc<dyn TenantRepository>,
    pub organizations: Arc<dyn OrganizationRepository>,
    pub users: Arc<dyn UserRepository>,
    pub teams: Arc<dyn TeamRepository>,
    pub matches: Arc<dyn MatchRepository>,
    pub schedules: Arc<dyn ScheduleRepository>,
    pub players: Arc<dyn PlayerRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            tenants: Arc::new(PostgresTenantRepository::new(pool.clone())),
            organizations: Arc::new(PostgresOrganizationRepository::new(pool.clone())),
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            teams: Arc::new(PostgresTeamRepository::new(pool.clone())),
            matches: Arc::new(PostgresMatchRepository::new(pool.clone())),
            schedules: Arc::new(PostgresScheduleRepository::new(pool.clone())),
            players: Arc::new(PostgresPlayerRepository::new(pool.clone())),
            notifications: Arc::new(PostgresNotificationRepository::new(pool.clone())),
            subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool)),
        }
    }

    /// Every port backed by one shared in-memory store
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            tenants: store.clone(),
            organizations: store.clone(),
            users: store.clone(),
            teams: store.clone(),
            matches: store.clone(),
            schedules: store.clone(),
            players: store.clone(),
            notifications: store.clone(),
            subscriptions: store,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repos: Repositories,
    pub notifier: Arc<dyn NotificationSender>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories) -> Self {
        Self {
            config: Arc::new(config),
            repos,
            notifier: Arc::new(LogNotificationSender),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSender>) -> Self {
        self.notifier = notifier;
        self
    }
}
