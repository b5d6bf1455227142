//! Integration tests for repository layer
//!
//! These tests verify that the PostgreSQL repository implementations
//! round-trip domain objects, settle uniqueness through database indexes and
//! keep tenants apart. They need `DATABASE_URL`; without it each test returns
//! early.

use chrono::{Duration, Utc};
use academy_api::domain::game_match::{
    GameMatch, LineupEntry, MatchEvent, MatchEventType, MatchSide, MatchStatus, NewMatch,
};
use academy_api::domain::notification::{NotificationChannel, NotificationLog, NotificationStatus};
use academy_api::domain::organization::Organization;
use academy_api::domain::player::PlayerSkill;
use academy_api::domain::repositories::{
    MatchRepository, NotificationRepository, OrganizationRepository, PlayerRepository,
    RepositoryError, ScheduleRepository, SubscriptionRepository, TeamRepository,
    TenantRepository, UserRepository,
};
use academy_api::domain::schedule::{NewSchedule, ScheduleType, TeamSchedule};
use academy_api::domain::subscription::{Plan, Subscription, SubscriptionStatus};
use academy_api::domain::team::{NewTeam, Team, TeamPlayer, TeamTier};
use academy_api::domain::tenant::Tenant;
use academy_api::domain::user::{Email, Role, User};
use academy_api::infrastructure::repositories::{
    PostgresMatchRepository, PostgresNotificationRepository, PostgresOrganizationRepository,
    PostgresPlayerRepository, PostgresScheduleRepository, PostgresSubscriptionRepository,
    PostgresTeamRepository, PostgresTenantRepository, PostgresUserRepository,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Set up test database connection pool, or `None` when no database is configured
async fn setup_test_db() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Some(pool)
}

/// A tenant with one organization and a staff user, isolated per test
struct Fixture {
    pool: PgPool,
    tenant: Tenant,
    organization: Organization,
    staff: User,
}

impl Fixture {
    async fn new(pool: PgPool) -> Self {
        let tag = Uuid::new_v4().simple().to_string();
        let tenant = Tenant::new(&format!("Tenant {}", tag), None).unwrap();
        PostgresTenantRepository::new(pool.clone())
            .create(&tenant)
            .await
            .expect("create tenant");

        let organization = Organization::new(tenant.id, &format!("Org {}", tag), None, None).unwrap();
        PostgresOrganizationRepository::new(pool.clone())
            .save(&organization)
            .await
            .expect("create organization");

        let staff = Self::user_in(&pool, &tenant, &organization, &format!("coach-{}@test.dev", tag), Role::Coach).await;

        Self {
            pool,
            tenant,
            organization,
            staff,
        }
    }

    async fn user_in(pool: &PgPool, tenant: &Tenant, org: &Organization, email: &str, role: Role) -> User {
        let user = User::new(
            tenant.id,
            Some(org.id),
            Email::new(email).unwrap(),
            "not-a-real-hash".to_string(),
            "Test User",
            role,
        )
        .unwrap();
        PostgresUserRepository::new(pool.clone())
            .create(&user)
            .await
            .expect("create user");
        user
    }

    async fn player(&self, label: &str) -> User {
        let email = format!("{}-{}@test.dev", label, Uuid::new_v4().simple());
        Self::user_in(&self.pool, &self.tenant, &self.organization, &email, Role::Player).await
    }

    async fn team(&self, name: &str) -> Team {
        let (team, _) = Team::new(NewTeam {
            organization_id: self.organization.id,
            name: name.to_string(),
            sport: "football".to_string(),
            max_players: 22,
            ..Default::default()
        })
        .unwrap();
        PostgresTeamRepository::new(self.pool.clone())
            .save(&team)
            .await
            .expect("create team");
        team
    }

    /// Remove everything the fixture created
    async fn cleanup(self) {
        sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(self.tenant.id)
            .execute(&self.pool)
            .await
            .expect("Failed to cleanup test tenant");
    }
}

#[tokio::test]
async fn test_user_lookup_by_email() {
    let Some(pool) = setup_test_db().await else { return };
    let fx = Fixture::new(pool).await;
    let repo = PostgresUserRepository::new(fx.pool.clone());

    let found = repo
        .find_by_email(&fx.staff.email)
        .await
        .unwrap()
        .expect("user should exist");
    assert_eq!(found.id, fx.staff.id);
    assert_eq!(found.role, Role::Coach);

    repo.update_last_login(fx.staff.id).await.unwrap();
    let reloaded = repo.find_by_id(fx.staff.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());

    // Duplicate email hits the unique index
    let duplicate = User::new(
        fx.tenant.id,
        Some(fx.organization.id),
        fx.staff.email.clone(),
        "hash".to_string(),
        "Copy",
        Role::Player,
    )
    .unwrap();
    let err = repo.create(&duplicate).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    fx.cleanup().await;
}

#[tokio::test]
async fn test_team_roster_and_tiers() {
    let Some(pool) = setup_test_db().await else { return };
    let fx = Fixture::new(pool).await;
    let repo = PostgresTeamRepository::new(fx.pool.clone());

    let team = fx.team("Under 11s").await;
    let loaded = repo.find_by_id(team.id()).await.unwrap().unwrap();
    assert_eq!(loaded.name(), "Under 11s");
    assert_eq!(repo.count_by_organization(fx.organization.id).await.unwrap(), 1);

    // Team names are unique per organization
    let (clash, _) = Team::new(NewTeam {
        organization_id: fx.organization.id,
        name: "under 11s".to_string(),
        sport: "football".to_string(),
        max_players: 18,
        ..Default::default()
    })
    .unwrap();
    assert!(matches!(repo.save(&clash).await, Err(RepositoryError::Conflict(_))));

    let tier = TeamTier::new(team.id(), "Foundation", 1, None, None, Some(10)).unwrap();
    repo.save_tier(&tier).await.unwrap();
    let same_level = TeamTier::new(team.id(), "Other", 1, None, None, None).unwrap();
    assert!(matches!(repo.save_tier(&same_level).await, Err(RepositoryError::Conflict(_))));

    let first = fx.player("first").await;
    let second = fx.player("second").await;
    let (mut entry, _) = TeamPlayer::new(team.id(), first.id, Some(5), Some("DF".to_string())).unwrap();
    repo.add_player(&entry).await.unwrap();

    let (taken, _) = TeamPlayer::new(team.id(), second.id, Some(5), None).unwrap();
    assert!(matches!(repo.add_player(&taken).await, Err(RepositoryError::Conflict(_))));

    entry.tier_id = Some(tier.id);
    repo.save_player(&entry).await.unwrap();
    let stored = repo.find_player(team.id(), first.id).await.unwrap().unwrap();
    assert_eq!(stored.tier_id, Some(tier.id));
    assert_eq!(repo.count_players_in_organization(fx.organization.id).await.unwrap(), 1);

    repo.remove_player(team.id(), first.id).await.unwrap();
    assert!(repo.list_roster(team.id()).await.unwrap().is_empty());
    assert!(matches!(
        repo.remove_player(team.id(), first.id).await,
        Err(RepositoryError::NotFound(_))
    ));

    fx.cleanup().await;
}

#[tokio::test]
async fn test_match_events_update_score_atomically() {
    let Some(pool) = setup_test_db().await else { return };
    let fx = Fixture::new(pool).await;
    let repo = PostgresMatchRepository::new(fx.pool.clone());
    let team = fx.team("First XI").await;
    let striker = fx.player("striker").await;

    let (mut game, _) = GameMatch::new(NewMatch {
        organization_id: fx.organization.id,
        team_id: team.id(),
        opponent_name: "Valley Rovers".to_string(),
        venue: None,
        is_home: true,
        scheduled_at: Utc::now() + Duration::days(3),
        notes: None,
        metadata: Some(json!({ "competition": "league" })),
        created_by: fx.staff.id,
    })
    .unwrap();
    repo.save(&game).await.unwrap();

    repo.replace_lineup(
        game.id(),
        &[LineupEntry {
            match_id: game.id(),
            player_id: striker.id,
            position: Some("ST".to_string()),
            jersey_number: Some(9),
            is_starter: true,
        }],
    )
    .await
    .unwrap();
    assert_eq!(repo.list_lineup(game.id()).await.unwrap().len(), 1);
    repo.replace_lineup(game.id(), &[]).await.unwrap();
    assert!(repo.list_lineup(game.id()).await.unwrap().is_empty());

    game.start().unwrap();
    repo.save(&game).await.unwrap();

    let goal = MatchEvent::new(
        game.id(),
        MatchEventType::Goal,
        MatchSide::Team,
        Some(striker.id),
        17,
        None,
        fx.staff.id,
    )
    .unwrap();
    game.apply_event(&goal).unwrap();
    repo.record_event(&game, &goal).await.unwrap();

    let stored = repo.find_by_id(game.id()).await.unwrap().unwrap();
    assert_eq!(stored.status(), MatchStatus::InProgress);
    assert_eq!(stored.team_score(), 1);
    assert_eq!(stored.metadata()["competition"], "league");
    assert_eq!(repo.list_events(game.id()).await.unwrap().len(), 1);

    let live = repo
        .list_by_team(team.id(), Some(MatchStatus::InProgress))
        .await
        .unwrap();
    assert_eq!(live.len(), 1);
    assert!(repo
        .list_by_team(team.id(), Some(MatchStatus::Completed))
        .await
        .unwrap()
        .is_empty());

    fx.cleanup().await;
}

#[tokio::test]
async fn test_schedule_window_queries() {
    let Some(pool) = setup_test_db().await else { return };
    let fx = Fixture::new(pool).await;
    let repo = PostgresScheduleRepository::new(fx.pool.clone());
    let team = fx.team("Under 9s").await;

    let start = Utc::now() + Duration::days(7);
    let entry = |offset_days: i64| {
        TeamSchedule::new(NewSchedule {
            team_id: team.id(),
            title: "Training".to_string(),
            schedule_type: ScheduleType::Training,
            starts_at: start + Duration::days(offset_days),
            ends_at: start + Duration::days(offset_days) + Duration::minutes(90),
            location: None,
            notes: None,
            match_id: None,
            created_by: fx.staff.id,
        })
        .unwrap()
    };
    let entries = vec![entry(0), entry(7), entry(14)];
    repo.insert_many(&entries).await.unwrap();

    let mut cancelled = entries[1].clone();
    cancelled.cancel();
    repo.save(&cancelled).await.unwrap();

    let all = repo.list_by_team(team.id(), None, None).await.unwrap();
    assert_eq!(all.len(), 3);

    let active = repo
        .list_active_between(team.id(), start, start + Duration::days(15))
        .await
        .unwrap();
    assert_eq!(active.len(), 2, "cancelled entries are not active");

    let first_week = repo
        .list_by_team(team.id(), Some(start - Duration::hours(1)), Some(start + Duration::days(1)))
        .await
        .unwrap();
    assert_eq!(first_week.len(), 1);

    fx.cleanup().await;
}

#[tokio::test]
async fn test_player_development_records() {
    let Some(pool) = setup_test_db().await else { return };
    let fx = Fixture::new(pool).await;
    let repo = PostgresPlayerRepository::new(fx.pool.clone());
    let player = fx.player("keeper").await;

    let skill = PlayerSkill::new(player.id, "Handling", 6, None, fx.staff.id).unwrap();
    repo.upsert_skill(&skill).await.unwrap();
    // Same skill name replaces the rating
    let better = PlayerSkill::new(player.id, "Handling", 8, Some("Much improved".to_string()), fx.staff.id).unwrap();
    let stored = repo.upsert_skill(&better).await.unwrap();
    assert_eq!(stored.rating, 8);

    let skills = repo.list_skills(player.id).await.unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].notes.as_deref(), Some("Much improved"));

    fx.cleanup().await;
}

#[tokio::test]
async fn test_subscription_and_notification_logs() {
    let Some(pool) = setup_test_db().await else { return };
    let fx = Fixture::new(pool).await;

    let subs = PostgresSubscriptionRepository::new(fx.pool.clone());
    let trial = Subscription::start_trial(fx.organization.id, Plan::Basic, 14).unwrap();
    subs.save(&trial).await.unwrap();
    let current = subs.find_current(fx.organization.id).await.unwrap().unwrap();
    assert_eq!(current.id, trial.id);
    assert_eq!(current.status, SubscriptionStatus::Trial);

    // Only one open subscription per organization
    let second = Subscription::start_trial(fx.organization.id, Plan::Pro, 14).unwrap();
    assert!(matches!(subs.save(&second).await, Err(RepositoryError::Conflict(_))));

    let logs = PostgresNotificationRepository::new(fx.pool.clone());
    let mut log = NotificationLog::new(
        fx.organization.id,
        fx.staff.id,
        NotificationChannel::InApp,
        "team.broadcast",
        "Kit day",
        "Bring both kits.",
        json!({ "team_id": Uuid::new_v4() }),
    )
    .unwrap();
    logs.insert(&log).await.unwrap();
    log.mark_failed("gateway unavailable").unwrap();
    logs.save(&log).await.unwrap();

    let history = logs.list_for_organization(fx.organization.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, NotificationStatus::Failed);
    assert_eq!(history[0].error.as_deref(), Some("gateway unavailable"));
    assert_eq!(logs.list_for_user(fx.staff.id).await.unwrap().len(), 1);

    fx.cleanup().await;
}
