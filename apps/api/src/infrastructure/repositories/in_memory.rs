use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::game_match::{GameMatch, LineupEntry, MatchEvent, MatchStatus};
use crate::domain::notification::NotificationLog;
use crate::domain::organization::Organization;
use crate::domain::player::{PlayerEvaluation, PlayerSkill};
use crate::domain::repositories::{
    MatchRepository, NotificationRepository, OrganizationRepository, PlayerRepository,
    RepositoryError, RepositoryResult, ScheduleRepository, SubscriptionRepository,
    TeamRepository, TenantRepository, UserRepository,
};
use crate::domain::schedule::TeamSchedule;
use crate::domain::subscription::Subscription;
use crate::domain::team::{Team, TeamPlayer, TeamTier};
use crate::domain::tenant::Tenant;
use crate::domain::user::{Email, User};

#[derive(Default)]
struct Tables {
    tenants: HashMap<Uuid, Tenant>,
    organizations: HashMap<Uuid, Organization>,
    users: HashMap<Uuid, User>,
    teams: HashMap<Uuid, Team>,
    tiers: HashMap<Uuid, TeamTier>,
    roster: HashMap<(Uuid, Uuid), TeamPlayer>,
    matches: HashMap<Uuid, GameMatch>,
    match_events: Vec<MatchEvent>,
    lineups: HashMap<Uuid, Vec<LineupEntry>>,
    schedules: HashMap<Uuid, TeamSchedule>,
    skills: HashMap<Uuid, PlayerSkill>,
    evaluations: Vec<PlayerEvaluation>,
    notifications: HashMap<Uuid, NotificationLog>,
    subscriptions: HashMap<Uuid, Subscription>,
}

/// In-memory storage implementation for development/testing
///
/// Implements every repository trait over one set of tables and mirrors the
/// unique indexes of the Postgres schema, so conflicts surface the same way.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(message: &str) -> RepositoryError {
    RepositoryError::Conflict(message.to_string())
}

fn sorted_by<T, K: Ord>(mut items: Vec<T>, key: impl FnMut(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

#[async_trait]
impl TenantRepository for InMemoryStore {
    async fn create(&self, tenant: &Tenant) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        if t.tenants.values().any(|x| x.slug == tenant.slug) {
            return Err(conflict("Tenant slug is already taken"));
        }
        t.tenants.insert(tenant.id, tenant.clone());
        debug!(tenant_id = %tenant.id, "Created tenant");
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Tenant>> {
        Ok(self.tables.read().await.tenants.get(&id).cloned())
    }
}

#[async_trait]
impl OrganizationRepository for InMemoryStore {
    async fn save(&self, organization: &Organization) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        let taken = t.organizations.values().any(|o| {
            o.id != organization.id
                && o.tenant_id == organization.tenant_id
                && o.slug == organization.slug
                && !o.is_deleted()
        });
        if taken && !organization.is_deleted() {
            return Err(conflict("Organization slug is already taken"));
        }
        t.organizations.insert(organization.id, organization.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Organization>> {
        let t = self.tables.read().await;
        Ok(t.organizations.get(&id).filter(|o| !o.is_deleted()).cloned())
    }

    async fn list_by_tenant(&self, tenant_id: Uuid) -> RepositoryResult<Vec<Organization>> {
        let t = self.tables.read().await;
        let orgs = t
            .organizations
            .values()
            .filter(|o| o.tenant_id == tenant_id && !o.is_deleted())
            .cloned()
            .collect();
        Ok(sorted_by(orgs, |o: &Organization| o.name.clone()))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &User) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        if t.users.values().any(|u| u.email == user.email) {
            return Err(conflict("Email already registered"));
        }
        t.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> RepositoryResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| &u.email == email).cloned())
    }

    async fn list_by_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<User>> {
        let t = self.tables.read().await;
        let users = t
            .users
            .values()
            .filter(|u| u.belongs_to(organization_id))
            .cloned()
            .collect();
        Ok(sorted_by(users, |u: &User| u.full_name.clone()))
    }

    async fn update_last_login(&self, user_id: Uuid) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        let user = t
            .users
            .get_mut(&user_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("User {}", user_id)))?;
        user.last_login_at = Some(Utc::now());
        Ok(())
    }
}

fn live_team<'a>(t: &'a Tables, id: &Uuid) -> Option<&'a Team> {
    t.teams.get(id).filter(|team| !team.is_deleted())
}

#[async_trait]
impl TeamRepository for InMemoryStore {
    async fn save(&self, team: &Team) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        if !team.is_deleted() {
            let taken = t.teams.values().any(|x| {
                x.id() != team.id()
                    && x.organization_id() == team.organization_id()
                    && !x.is_deleted()
                    && x.name().eq_ignore_ascii_case(team.name())
            });
            if taken {
                return Err(conflict("A team with this name already exists"));
            }
        }
        t.teams.insert(team.id(), team.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        let t = self.tables.read().await;
        Ok(live_team(&t, &id).cloned())
    }

    async fn list_by_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<Team>> {
        let t = self.tables.read().await;
        let teams = t
            .teams
            .values()
            .filter(|x| x.organization_id() == organization_id && !x.is_deleted())
            .cloned()
            .collect();
        Ok(sorted_by(teams, |x: &Team| x.name().to_string()))
    }

    async fn count_by_organization(&self, organization_id: Uuid) -> RepositoryResult<usize> {
        let t = self.tables.read().await;
        Ok(t.teams
            .values()
            .filter(|x| x.organization_id() == organization_id && !x.is_deleted())
            .count())
    }

    async fn save_tier(&self, tier: &TeamTier) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        if t
            .tiers
            .values()
            .any(|x| x.id != tier.id && x.team_id == tier.team_id && x.level == tier.level)
        {
            return Err(conflict("A tier with this level already exists"));
        }
        t.tiers.insert(tier.id, tier.clone());
        Ok(())
    }

    async fn find_tier(&self, tier_id: Uuid) -> RepositoryResult<Option<TeamTier>> {
        Ok(self.tables.read().await.tiers.get(&tier_id).cloned())
    }

    async fn list_tiers(&self, team_id: Uuid) -> RepositoryResult<Vec<TeamTier>> {
        let t = self.tables.read().await;
        let tiers = t.tiers.values().filter(|x| x.team_id == team_id).cloned().collect();
        Ok(sorted_by(tiers, |x: &TeamTier| x.level))
    }

    async fn delete_tier(&self, tier_id: Uuid) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        t.tiers
            .remove(&tier_id)
            .ok_or_else(|| RepositoryError::NotFound(format!("Tier {}", tier_id)))?;
        for entry in t.roster.values_mut().filter(|p| p.tier_id == Some(tier_id)) {
            entry.tier_id = None;
        }
        Ok(())
    }

    async fn add_player(&self, entry: &TeamPlayer) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        let key = (entry.team_id, entry.player_id);
        if t.roster.contains_key(&key) {
            return Err(conflict("Player is already on the roster"));
        }
        if entry.jersey_number.is_some()
            && t.roster
                .values()
                .any(|p| p.team_id == entry.team_id && p.jersey_number == entry.jersey_number)
        {
            return Err(conflict("Jersey number is already taken"));
        }
        t.roster.insert(key, entry.clone());
        Ok(())
    }

    async fn save_player(&self, entry: &TeamPlayer) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        let key = (entry.team_id, entry.player_id);
        if !t.roster.contains_key(&key) {
            return Err(RepositoryError::NotFound(format!(
                "Player {} on team {}",
                entry.player_id, entry.team_id
            )));
        }
        if entry.jersey_number.is_some()
            && t.roster.values().any(|p| {
                p.team_id == entry.team_id
                    && p.player_id != entry.player_id
                    && p.jersey_number == entry.jersey_number
            })
        {
            return Err(conflict("Jersey number is already taken"));
        }
        t.roster.insert(key, entry.clone());
        Ok(())
    }

    async fn find_player(&self, team_id: Uuid, player_id: Uuid) -> RepositoryResult<Option<TeamPlayer>> {
        Ok(self.tables.read().await.roster.get(&(team_id, player_id)).cloned())
    }

    async fn list_roster(&self, team_id: Uuid) -> RepositoryResult<Vec<TeamPlayer>> {
        let t = self.tables.read().await;
        let roster = t.roster.values().filter(|p| p.team_id == team_id).cloned().collect();
        Ok(sorted_by(roster, |p: &TeamPlayer| {
            (p.jersey_number.is_none(), p.jersey_number, p.joined_at)
        }))
    }

    async fn remove_player(&self, team_id: Uuid, player_id: Uuid) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        t.roster.remove(&(team_id, player_id)).ok_or_else(|| {
            RepositoryError::NotFound(format!("Player {} on team {}", player_id, team_id))
        })?;
        Ok(())
    }

    async fn count_players_in_organization(&self, organization_id: Uuid) -> RepositoryResult<usize> {
        let t = self.tables.read().await;
        let mut players: Vec<Uuid> = t
            .roster
            .values()
            .filter(|p| {
                live_team(&t, &p.team_id).map_or(false, |team| team.organization_id() == organization_id)
            })
            .map(|p| p.player_id)
            .collect();
        players.sort();
        players.dedup();
        Ok(players.len())
    }
}

#[async_trait]
impl MatchRepository for InMemoryStore {
    async fn save(&self, game: &GameMatch) -> RepositoryResult<()> {
        self.tables.write().await.matches.insert(game.id(), game.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<GameMatch>> {
        let t = self.tables.read().await;
        Ok(t.matches.get(&id).filter(|m| m.deleted_at().is_none()).cloned())
    }

    async fn list_by_team(
        &self,
        team_id: Uuid,
        status: Option<MatchStatus>,
    ) -> RepositoryResult<Vec<GameMatch>> {
        let t = self.tables.read().await;
        let games = t
            .matches
            .values()
            .filter(|m| m.team_id() == team_id && m.deleted_at().is_none())
            .filter(|m| status.map_or(true, |s| m.status() == s))
            .cloned()
            .collect();
        Ok(sorted_by(games, |m: &GameMatch| m.scheduled_at()))
    }

    async fn record_event(&self, game: &GameMatch, event: &MatchEvent) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        t.match_events.push(event.clone());
        t.matches.insert(game.id(), game.clone());
        Ok(())
    }

    async fn list_events(&self, match_id: Uuid) -> RepositoryResult<Vec<MatchEvent>> {
        let t = self.tables.read().await;
        let events = t
            .match_events
            .iter()
            .filter(|e| e.match_id == match_id)
            .cloned()
            .collect();
        Ok(sorted_by(events, |e: &MatchEvent| (e.minute, e.created_at)))
    }

    async fn replace_lineup(&self, match_id: Uuid, entries: &[LineupEntry]) -> RepositoryResult<()> {
        self.tables.write().await.lineups.insert(match_id, entries.to_vec());
        Ok(())
    }

    async fn list_lineup(&self, match_id: Uuid) -> RepositoryResult<Vec<LineupEntry>> {
        let t = self.tables.read().await;
        Ok(t.lineups.get(&match_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryStore {
    async fn insert_many(&self, entries: &[TeamSchedule]) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        for entry in entries {
            t.schedules.insert(entry.id, entry.clone());
        }
        Ok(())
    }

    async fn save(&self, entry: &TeamSchedule) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        if !t.schedules.contains_key(&entry.id) {
            return Err(RepositoryError::NotFound(format!("Schedule {}", entry.id)));
        }
        t.schedules.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<TeamSchedule>> {
        Ok(self.tables.read().await.schedules.get(&id).cloned())
    }

    async fn find_by_match(&self, match_id: Uuid) -> RepositoryResult<Option<TeamSchedule>> {
        let t = self.tables.read().await;
        Ok(t.schedules.values().find(|s| s.match_id == Some(match_id)).cloned())
    }

    async fn list_by_team(
        &self,
        team_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<TeamSchedule>> {
        let t = self.tables.read().await;
        let entries = t
            .schedules
            .values()
            .filter(|s| s.team_id == team_id)
            .filter(|s| from.map_or(true, |f| s.ends_at > f))
            .filter(|s| to.map_or(true, |end| s.starts_at < end))
            .cloned()
            .collect();
        Ok(sorted_by(entries, |s: &TeamSchedule| s.starts_at))
    }

    async fn list_active_between(
        &self,
        team_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<TeamSchedule>> {
        let t = self.tables.read().await;
        let entries = t
            .schedules
            .values()
            .filter(|s| s.team_id == team_id && s.overlaps(from, to))
            .cloned()
            .collect();
        Ok(sorted_by(entries, |s: &TeamSchedule| s.starts_at))
    }
}

#[async_trait]
impl PlayerRepository for InMemoryStore {
    async fn upsert_skill(&self, skill: &PlayerSkill) -> RepositoryResult<PlayerSkill> {
        let mut t = self.tables.write().await;
        let existing = t
            .skills
            .values_mut()
            .find(|s| s.player_id == skill.player_id && s.is_same_skill(&skill.skill_name));
        let stored = match existing {
            Some(s) => {
                s.skill_name = skill.skill_name.clone();
                s.rating = skill.rating;
                s.notes = skill.notes.clone();
                s.assessed_by = skill.assessed_by;
                s.assessed_at = skill.assessed_at;
                s.clone()
            }
            None => {
                t.skills.insert(skill.id, skill.clone());
                skill.clone()
            }
        };
        Ok(stored)
    }

    async fn list_skills(&self, player_id: Uuid) -> RepositoryResult<Vec<PlayerSkill>> {
        let t = self.tables.read().await;
        let skills = t.skills.values().filter(|s| s.player_id == player_id).cloned().collect();
        Ok(sorted_by(skills, |s: &PlayerSkill| s.skill_name.clone()))
    }

    async fn add_evaluation(&self, evaluation: &PlayerEvaluation) -> RepositoryResult<()> {
        self.tables.write().await.evaluations.push(evaluation.clone());
        Ok(())
    }

    async fn list_evaluations(&self, player_id: Uuid) -> RepositoryResult<Vec<PlayerEvaluation>> {
        let t = self.tables.read().await;
        let mut evaluations: Vec<PlayerEvaluation> = t
            .evaluations
            .iter()
            .filter(|e| e.player_id == player_id)
            .cloned()
            .collect();
        evaluations.sort_by(|a, b| {
            (b.evaluation_date, b.created_at).cmp(&(a.evaluation_date, a.created_at))
        });
        Ok(evaluations)
    }
}

fn newest_first(mut logs: Vec<NotificationLog>) -> Vec<NotificationLog> {
    logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    logs
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert(&self, log: &NotificationLog) -> RepositoryResult<()> {
        self.tables.write().await.notifications.insert(log.id, log.clone());
        Ok(())
    }

    async fn save(&self, log: &NotificationLog) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        if !t.notifications.contains_key(&log.id) {
            return Err(RepositoryError::NotFound(format!("Notification {}", log.id)));
        }
        t.notifications.insert(log.id, log.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<NotificationLog>> {
        Ok(self.tables.read().await.notifications.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> RepositoryResult<Vec<NotificationLog>> {
        let t = self.tables.read().await;
        Ok(newest_first(
            t.notifications.values().filter(|n| n.user_id == user_id).cloned().collect(),
        ))
    }

    async fn list_for_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<NotificationLog>> {
        let t = self.tables.read().await;
        Ok(newest_first(
            t.notifications
                .values()
                .filter(|n| n.organization_id == organization_id)
                .cloned()
                .collect(),
        ))
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn save(&self, subscription: &Subscription) -> RepositoryResult<()> {
        let mut t = self.tables.write().await;
        if subscription.status.is_open()
            && t.subscriptions.values().any(|s| {
                s.id != subscription.id
                    && s.organization_id == subscription.organization_id
                    && s.status.is_open()
            })
        {
            return Err(conflict("Organization already has an open subscription"));
        }
        t.subscriptions.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn find_current(&self, organization_id: Uuid) -> RepositoryResult<Option<Subscription>> {
        let t = self.tables.read().await;
        Ok(t.subscriptions
            .values()
            .filter(|s| s.organization_id == organization_id)
            .max_by_key(|s| (s.status.is_open(), s.created_at))
            .cloned())
    }
}
