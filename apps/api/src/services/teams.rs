use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{access, Actor, Notice, NotificationService, ServiceError, ServiceResult, SubscriptionService};
use crate::domain::errors::DomainError;
use crate::domain::team::roster::ensure_jersey_free;
use crate::domain::team::{NewTeam, RosterChanges, Team, TeamChanges, TeamEvent, TeamPlayer};
use crate::domain::user::{Permission, Role};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct RosterAddition {
    pub player_id: Uuid,
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
}

pub struct TeamService<'a> {
    state: &'a AppState,
}

fn log_event(event: &TeamEvent) {
    info!(kind = event.kind(), team_id = %event.team_id(), "Team event");
}

impl<'a> TeamService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// A coach must be staff of the team's organization
    async fn ensure_coach(&self, organization_id: Uuid, coach_id: Option<Uuid>) -> ServiceResult<()> {
        let Some(coach_id) = coach_id else {
            return Ok(());
        };
        let coach = self.state.repos.users.find_by_id(coach_id).await?;
        match coach {
            Some(user)
                if user.belongs_to(organization_id)
                    && matches!(user.role, Role::Coach | Role::OrgAdmin | Role::SuperAdmin) =>
            {
                Ok(())
            }
            _ => Err(DomainError::validation("Coach must be a staff member of the organization").into()),
        }
    }

    pub async fn create(&self, actor: &Actor, organization_id: Uuid, input: NewTeam) -> ServiceResult<Team> {
        actor.require(Permission::ManageTeams)?;
        let organization = access::organization(self.state, actor, organization_id).await?;

        let plan = SubscriptionService::new(self.state).plan_for(organization.id).await?;
        if let Some(max) = plan.max_teams() {
            let count = self.state.repos.teams.count_by_organization(organization.id).await?;
            if count >= max {
                return Err(DomainError::limit_exceeded(format!(
                    "The {} plan allows at most {} teams",
                    plan, max
                ))
                .into());
            }
        }
        self.ensure_coach(organization.id, input.coach_id).await?;

        let (team, events) = Team::new(NewTeam {
            organization_id: organization.id,
            ..input
        })?;
        self.state.repos.teams.save(&team).await?;
        events.iter().for_each(log_event);
        Ok(team)
    }

    pub async fn list(&self, actor: &Actor, organization_id: Uuid) -> ServiceResult<Vec<Team>> {
        actor.require(Permission::ViewTeams)?;
        let organization = access::organization(self.state, actor, organization_id).await?;
        Ok(self.state.repos.teams.list_by_organization(organization.id).await?)
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> ServiceResult<Team> {
        actor.require(Permission::ViewTeams)?;
        access::team(self.state, actor, id).await
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, changes: TeamChanges) -> ServiceResult<Team> {
        actor.require(Permission::ManageTeams)?;
        let mut team = access::team(self.state, actor, id).await?;
        self.ensure_coach(team.organization_id(), changes.coach_id).await?;

        let roster = self.state.repos.teams.list_roster(team.id()).await?;
        team.update(changes, roster.len())?;
        self.state.repos.teams.save(&team).await?;
        Ok(team)
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        actor.require(Permission::ManageTeams)?;
        let mut team = access::team(self.state, actor, id).await?;
        let event = team.soft_delete()?;
        self.state.repos.teams.save(&team).await?;
        log_event(&event);
        Ok(())
    }

    /// Whether the player already counts towards the organization's player limit
    async fn on_any_team(&self, organization_id: Uuid, player_id: Uuid) -> ServiceResult<bool> {
        for team in self.state.repos.teams.list_by_organization(organization_id).await? {
            if self.state.repos.teams.find_player(team.id(), player_id).await?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Puts a player on the roster
    ///
    /// # Business Rules
    /// - The user is a player of the team's organization and not yet on the roster
    /// - The jersey number is free within the team
    /// - Both the team capacity and the plan's player limit have room
    pub async fn add_player(
        &self,
        actor: &Actor,
        team_id: Uuid,
        input: RosterAddition,
    ) -> ServiceResult<TeamPlayer> {
        actor.require(Permission::ManageTeams)?;
        let team = access::team(self.state, actor, team_id).await?;
        let repos = &self.state.repos;

        let player = repos
            .users
            .find_by_id(input.player_id)
            .await?
            .filter(|u| u.belongs_to(team.organization_id()))
            .ok_or_else(|| DomainError::validation("Player must belong to the team's organization"))?;
        if player.role != Role::Player {
            return Err(DomainError::validation(format!(
                "Only players can join a roster, user has role {}",
                player.role
            ))
            .into());
        }

        let roster = repos.teams.list_roster(team.id()).await?;
        if roster.iter().any(|p| p.player_id == player.id) {
            return Err(DomainError::conflict("Player is already on the roster").into());
        }
        ensure_jersey_free(&roster, player.id, input.jersey_number)?;
        team.ensure_roster_capacity(roster.len())?;

        let plan = SubscriptionService::new(self.state)
            .plan_for(team.organization_id())
            .await?;
        if let Some(max) = plan.max_players() {
            let count = repos.teams.count_players_in_organization(team.organization_id()).await?;
            if count >= max && !self.on_any_team(team.organization_id(), player.id).await? {
                return Err(DomainError::limit_exceeded(format!(
                    "The {} plan allows at most {} players",
                    plan, max
                ))
                .into());
            }
        }

        let (entry, event) = TeamPlayer::new(team.id(), player.id, input.jersey_number, input.position)?;
        repos.teams.add_player(&entry).await?;
        log_event(&event);

        NotificationService::new(self.state)
            .announce(
                team.organization_id(),
                &[player.id],
                Notice::in_app(
                    event.kind(),
                    format!("Welcome to {}", team.name()),
                    format!("You have been added to the {} roster.", team.name()),
                )
                .with_data(json!({ "team_id": team.id() })),
            )
            .await;

        Ok(entry)
    }

    pub async fn roster(&self, actor: &Actor, team_id: Uuid) -> ServiceResult<Vec<TeamPlayer>> {
        actor.require(Permission::ViewTeams)?;
        let team = access::team(self.state, actor, team_id).await?;
        Ok(self.state.repos.teams.list_roster(team.id()).await?)
    }

    pub async fn update_player(
        &self,
        actor: &Actor,
        team_id: Uuid,
        player_id: Uuid,
        changes: RosterChanges,
    ) -> ServiceResult<TeamPlayer> {
        actor.require(Permission::ManageTeams)?;
        let team = access::team(self.state, actor, team_id).await?;
        let roster = self.state.repos.teams.list_roster(team.id()).await?;
        let mut entry = roster
            .iter()
            .find(|p| p.player_id == player_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Roster entry"))?;

        if let Some(number) = changes.jersey_number {
            ensure_jersey_free(&roster, player_id, number)?;
        }
        entry.update(changes)?;
        self.state.repos.teams.save_player(&entry).await?;
        Ok(entry)
    }

    pub async fn remove_player(&self, actor: &Actor, team_id: Uuid, player_id: Uuid) -> ServiceResult<()> {
        actor.require(Permission::ManageTeams)?;
        let team = access::team(self.state, actor, team_id).await?;
        self.state
            .repos
            .teams
            .find_player(team.id(), player_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Roster entry"))?;

        self.state.repos.teams.remove_player(team.id(), player_id).await?;
        log_event(&TeamEvent::PlayerRemoved {
            team_id: team.id(),
            player_id,
        });
        Ok(())
    }
}
