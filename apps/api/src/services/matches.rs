use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use super::{access, Actor, Notice, NotificationService, ServiceResult};
use crate::domain::errors::DomainError;
use crate::domain::game_match::{
    build_lineup, GameMatch, LineupEntry, LineupSlot, MatchEvent, MatchEventType, MatchLifecycleEvent,
    MatchSide, MatchStatus, NewMatch,
};
use crate::domain::schedule::{ensure_no_overlap, NewSchedule, ScheduleType, TeamSchedule};
use crate::domain::team::Team;
use crate::domain::user::Permission;
use crate::state::AppState;

/// Calendar slot reserved for a match
pub const MATCH_DURATION_HOURS: i64 = 2;

#[derive(Debug, Clone)]
pub struct MatchDetails {
    pub opponent_name: String,
    pub venue: Option<String>,
    pub is_home: bool,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct EventReport {
    pub event_type: MatchEventType,
    pub side: MatchSide,
    pub player_id: Option<Uuid>,
    pub minute: i32,
    pub description: Option<String>,
}

pub struct MatchService<'a> {
    state: &'a AppState,
}

fn match_window(kick_off: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    (kick_off, kick_off + Duration::hours(MATCH_DURATION_HOURS))
}

fn lifecycle_notice(team: &Team, game: &GameMatch, event: &MatchLifecycleEvent) -> Notice {
    let fixture = format!("{} vs {}", team.name(), game.opponent_name());
    let (subject, body) = match event {
        MatchLifecycleEvent::Scheduled { scheduled_at, .. } => (
            format!("New match: {}", fixture),
            format!("Kick-off at {}.", scheduled_at.to_rfc3339()),
        ),
        MatchLifecycleEvent::Rescheduled { scheduled_at, .. } => (
            format!("Match moved: {}", fixture),
            format!("New kick-off at {}.", scheduled_at.to_rfc3339()),
        ),
        MatchLifecycleEvent::Started { .. } => (
            format!("Match started: {}", fixture),
            "The match is under way.".to_string(),
        ),
        MatchLifecycleEvent::Completed {
            team_score,
            opponent_score,
            ..
        } => (
            format!("Full time: {}", fixture),
            format!("Final score {}-{}.", team_score, opponent_score),
        ),
        MatchLifecycleEvent::Cancelled { reason, .. } => (
            format!("Match cancelled: {}", fixture),
            format!("Reason: {}", reason),
        ),
    };
    Notice::in_app(event.kind(), subject, body).with_data(json!({
        "match_id": game.id(),
        "team_id": team.id(),
    }))
}

impl<'a> MatchService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Persists a transition and keeps the roster informed
    async fn publish(&self, game: &GameMatch, event: MatchLifecycleEvent) -> ServiceResult<()> {
        self.state.repos.matches.save(game).await?;
        info!(kind = event.kind(), match_id = %event.match_id(), status = %game.status(), "Match event");

        match self.state.repos.teams.find_by_id(game.team_id()).await? {
            Some(team) => {
                NotificationService::new(self.state)
                    .announce_to_roster(&team, lifecycle_notice(&team, game, &event))
                    .await
            }
            None => warn!(match_id = %game.id(), "Match team is gone, roster not notified"),
        }
        Ok(())
    }

    async fn linked_schedule(&self, game: &GameMatch) -> ServiceResult<Option<TeamSchedule>> {
        Ok(self.state.repos.schedules.find_by_match(game.id()).await?)
    }

    /// Rejects a match slot that clashes with another live entry of the team
    async fn ensure_slot_free(&self, entry: &TeamSchedule) -> ServiceResult<()> {
        let existing = self
            .state
            .repos
            .schedules
            .list_active_between(entry.team_id, entry.starts_at, entry.ends_at)
            .await?;
        ensure_no_overlap(&existing, entry)?;
        Ok(())
    }

    async fn cancel_linked_schedule(&self, game: &GameMatch) -> ServiceResult<()> {
        if let Some(mut entry) = self.linked_schedule(game).await? {
            entry.cancel();
            self.state.repos.schedules.save(&entry).await?;
        }
        Ok(())
    }

    /// Creates a scheduled match and its calendar entry
    ///
    /// The match slot must not clash with a live entry of the team.
    pub async fn schedule(&self, actor: &Actor, team_id: Uuid, details: MatchDetails) -> ServiceResult<GameMatch> {
        actor.require(Permission::ManageMatches)?;
        let team = access::team(self.state, actor, team_id).await?;

        let (game, event) = GameMatch::new(NewMatch {
            organization_id: team.organization_id(),
            team_id: team.id(),
            opponent_name: details.opponent_name,
            venue: details.venue,
            is_home: details.is_home,
            scheduled_at: details.scheduled_at,
            notes: details.notes,
            metadata: details.metadata,
            created_by: actor.user_id,
        })?;

        let (starts_at, ends_at) = match_window(game.scheduled_at());
        let entry = TeamSchedule::new(NewSchedule {
            team_id: team.id(),
            title: format!("{} vs {}", team.name(), game.opponent_name()),
            schedule_type: ScheduleType::Match,
            starts_at,
            ends_at,
            location: game.venue().map(str::to_string),
            notes: None,
            match_id: Some(game.id()),
            created_by: actor.user_id,
        })?;
        self.ensure_slot_free(&entry).await?;

        self.state.repos.matches.save(&game).await?;
        self.state.repos.schedules.insert_many(&[entry]).await?;
        self.publish(&game, event).await?;
        Ok(game)
    }

    pub async fn list(
        &self,
        actor: &Actor,
        team_id: Uuid,
        status: Option<MatchStatus>,
    ) -> ServiceResult<Vec<GameMatch>> {
        actor.require(Permission::ViewTeams)?;
        let team = access::team(self.state, actor, team_id).await?;
        Ok(self.state.repos.matches.list_by_team(team.id(), status).await?)
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> ServiceResult<GameMatch> {
        actor.require(Permission::ViewTeams)?;
        access::game(self.state, actor, id).await
    }

    pub async fn start(&self, actor: &Actor, id: Uuid) -> ServiceResult<GameMatch> {
        actor.require(Permission::ManageMatches)?;
        let mut game = access::game(self.state, actor, id).await?;
        let event = game.start()?;
        self.publish(&game, event).await?;
        Ok(game)
    }

    pub async fn complete(
        &self,
        actor: &Actor,
        id: Uuid,
        final_score: Option<(i32, i32)>,
    ) -> ServiceResult<GameMatch> {
        actor.require(Permission::ManageMatches)?;
        let mut game = access::game(self.state, actor, id).await?;
        let event = game.complete(final_score)?;
        self.publish(&game, event).await?;
        Ok(game)
    }

    pub async fn cancel(&self, actor: &Actor, id: Uuid, reason: &str) -> ServiceResult<GameMatch> {
        actor.require(Permission::ManageMatches)?;
        let mut game = access::game(self.state, actor, id).await?;
        let event = game.cancel(reason)?;
        self.cancel_linked_schedule(&game).await?;
        self.publish(&game, event).await?;
        Ok(game)
    }

    pub async fn reschedule(
        &self,
        actor: &Actor,
        id: Uuid,
        scheduled_at: DateTime<Utc>,
    ) -> ServiceResult<GameMatch> {
        actor.require(Permission::ManageMatches)?;
        let mut game = access::game(self.state, actor, id).await?;
        let event = game.reschedule(scheduled_at)?;

        if let Some(mut entry) = self.linked_schedule(&game).await? {
            let (starts_at, ends_at) = match_window(scheduled_at);
            entry.reschedule(starts_at, ends_at)?;
            self.ensure_slot_free(&entry).await?;
            self.state.repos.schedules.save(&entry).await?;
        }
        self.publish(&game, event).await?;
        Ok(game)
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        actor.require(Permission::ManageMatches)?;
        let mut game = access::game(self.state, actor, id).await?;
        game.soft_delete()?;
        self.state.repos.matches.save(&game).await?;
        self.cancel_linked_schedule(&game).await?;
        info!(match_id = %id, "Match deleted");
        Ok(())
    }

    /// Records an in-game event, updating the score for goals
    pub async fn record_event(
        &self,
        actor: &Actor,
        id: Uuid,
        report: EventReport,
    ) -> ServiceResult<(MatchEvent, GameMatch)> {
        actor.require(Permission::ManageMatches)?;
        let mut game = access::game(self.state, actor, id).await?;
        let event = MatchEvent::new(
            game.id(),
            report.event_type,
            report.side,
            report.player_id,
            report.minute,
            report.description,
            actor.user_id,
        )?;
        game.apply_event(&event)?;

        if let (MatchSide::Team, Some(player_id)) = (event.side, event.player_id) {
            let on_roster = self
                .state
                .repos
                .teams
                .find_player(game.team_id(), player_id)
                .await?
                .is_some();
            if !on_roster {
                return Err(DomainError::validation(format!(
                    "Player {} is not on the team roster",
                    player_id
                ))
                .into());
            }
        }

        self.state.repos.matches.record_event(&game, &event).await?;
        info!(
            match_id = %game.id(),
            event_type = ?event.event_type,
            score = %format!("{}-{}", game.team_score(), game.opponent_score()),
            "Match event recorded"
        );
        Ok((event, game))
    }

    pub async fn events(&self, actor: &Actor, id: Uuid) -> ServiceResult<Vec<MatchEvent>> {
        actor.require(Permission::ViewTeams)?;
        let game = access::game(self.state, actor, id).await?;
        Ok(self.state.repos.matches.list_events(game.id()).await?)
    }

    /// Replaces the whole lineup of a scheduled match
    pub async fn set_lineup(
        &self,
        actor: &Actor,
        id: Uuid,
        slots: Vec<LineupSlot>,
    ) -> ServiceResult<Vec<LineupEntry>> {
        actor.require(Permission::ManageMatches)?;
        let game = access::game(self.state, actor, id).await?;
        game.ensure_lineup_editable()?;

        let roster = self.state.repos.teams.list_roster(game.team_id()).await?;
        let entries = build_lineup(game.id(), slots, &roster)?;
        self.state.repos.matches.replace_lineup(game.id(), &entries).await?;
        info!(match_id = %game.id(), players = entries.len(), "Lineup set");
        Ok(entries)
    }

    pub async fn lineup(&self, actor: &Actor, id: Uuid) -> ServiceResult<Vec<LineupEntry>> {
        actor.require(Permission::ViewTeams)?;
        let game = access::game(self.state, actor, id).await?;
        Ok(self.state.repos.matches.list_lineup(game.id()).await?)
    }
}
