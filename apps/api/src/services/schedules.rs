use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::{access, Actor, ServiceError, ServiceResult};
use crate::domain::errors::DomainError;
use crate::domain::schedule::{ensure_no_overlap, NewSchedule, Recurrence, ScheduleType, TeamSchedule};
use crate::domain::user::Permission;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub title: String,
    pub schedule_type: ScheduleType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub recurrence: Option<Recurrence>,
}

pub struct ScheduleService<'a> {
    state: &'a AppState,
}

impl<'a> ScheduleService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    async fn load(&self, actor: &Actor, id: Uuid) -> ServiceResult<TeamSchedule> {
        let entry = self
            .state
            .repos
            .schedules
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Schedule"))?;
        access::team(self.state, actor, entry.team_id)
            .await
            .map_err(|e| match e {
                ServiceError::NotFound(_) => ServiceError::not_found("Schedule"),
                other => other,
            })?;
        Ok(entry)
    }

    /// Creates one entry, or a whole series when a recurrence is given
    ///
    /// The request is rejected as a whole if any occurrence clashes with a
    /// live entry of the team.
    pub async fn create(
        &self,
        actor: &Actor,
        team_id: Uuid,
        request: ScheduleRequest,
    ) -> ServiceResult<Vec<TeamSchedule>> {
        actor.require(Permission::ManageSchedules)?;
        let team = access::team(self.state, actor, team_id).await?;

        let entries = TeamSchedule::expand(
            NewSchedule {
                team_id: team.id(),
                title: request.title,
                schedule_type: request.schedule_type,
                starts_at: request.starts_at,
                ends_at: request.ends_at,
                location: request.location,
                notes: request.notes,
                match_id: None,
                created_by: actor.user_id,
            },
            request.recurrence,
        )?;

        let window = (
            entries.first().map(|e| e.starts_at),
            entries.last().map(|e| e.ends_at),
        );
        let (Some(from), Some(to)) = window else {
            return Ok(entries);
        };
        let existing = self
            .state
            .repos
            .schedules
            .list_active_between(team.id(), from, to)
            .await?;
        for (i, entry) in entries.iter().enumerate() {
            ensure_no_overlap(&existing, entry)?;
            ensure_no_overlap(&entries[..i], entry)?;
        }

        self.state.repos.schedules.insert_many(&entries).await?;
        info!(team_id = %team.id(), count = entries.len(), series_id = ?entries[0].series_id, "Schedule created");
        Ok(entries)
    }

    pub async fn list(
        &self,
        actor: &Actor,
        team_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> ServiceResult<Vec<TeamSchedule>> {
        actor.require(Permission::ViewTeams)?;
        let team = access::team(self.state, actor, team_id).await?;
        Ok(self.state.repos.schedules.list_by_team(team.id(), from, to).await?)
    }

    /// Moves an entry to a new window
    pub async fn reschedule(
        &self,
        actor: &Actor,
        id: Uuid,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> ServiceResult<TeamSchedule> {
        actor.require(Permission::ManageSchedules)?;
        let mut entry = self.load(actor, id).await?;
        if entry.match_id.is_some() {
            return Err(DomainError::conflict("Match entries move with their match; reschedule the match instead").into());
        }
        entry.reschedule(starts_at, ends_at)?;

        let existing = self
            .state
            .repos
            .schedules
            .list_active_between(entry.team_id, starts_at, ends_at)
            .await?;
        ensure_no_overlap(&existing, &entry)?;

        self.state.repos.schedules.save(&entry).await?;
        Ok(entry)
    }

    pub async fn cancel(&self, actor: &Actor, id: Uuid) -> ServiceResult<TeamSchedule> {
        actor.require(Permission::ManageSchedules)?;
        let mut entry = self.load(actor, id).await?;
        if !entry.is_cancelled {
            entry.cancel();
            self.state.repos.schedules.save(&entry).await?;
            info!(schedule_id = %entry.id, "Schedule cancelled");
        }
        Ok(entry)
    }
}
