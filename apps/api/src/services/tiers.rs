use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{access, Actor, Notice, NotificationService, ServiceError, ServiceResult};
use crate::domain::errors::DomainError;
use crate::domain::player::average_rating;
use crate::domain::team::roster::tier_occupancy;
use crate::domain::team::{Team, TeamEvent, TeamPlayer, TeamTier, TierChanges, TierLadder};
use crate::domain::user::Permission;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct NewTier {
    pub name: String,
    pub level: i32,
    pub description: Option<String>,
    pub min_skill_rating: Option<Decimal>,
    pub max_players: Option<i32>,
}

/// Which way a player moves on the tier ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Move {
    Assign(Uuid),
    Promote,
    Demote,
}

pub struct TierService<'a> {
    state: &'a AppState,
}

impl<'a> TierService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    async fn load_tier(&self, team: &Team, tier_id: Uuid) -> ServiceResult<TeamTier> {
        self.state
            .repos
            .teams
            .find_tier(tier_id)
            .await?
            .filter(|t| t.team_id == team.id())
            .ok_or_else(|| ServiceError::not_found("Tier"))
    }

    pub async fn create(&self, actor: &Actor, team_id: Uuid, input: NewTier) -> ServiceResult<TeamTier> {
        actor.require(Permission::ManageTeams)?;
        let team = access::team(self.state, actor, team_id).await?;
        let tier = TeamTier::new(
            team.id(),
            &input.name,
            input.level,
            input.description,
            input.min_skill_rating,
            input.max_players,
        )?;
        self.state.repos.teams.save_tier(&tier).await?;
        info!(tier_id = %tier.id, team_id = %team.id(), level = tier.level, "Tier created");
        Ok(tier)
    }

    pub async fn list(&self, actor: &Actor, team_id: Uuid) -> ServiceResult<Vec<TeamTier>> {
        actor.require(Permission::ViewTeams)?;
        let team = access::team(self.state, actor, team_id).await?;
        Ok(self.state.repos.teams.list_tiers(team.id()).await?)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        team_id: Uuid,
        tier_id: Uuid,
        changes: TierChanges,
    ) -> ServiceResult<TeamTier> {
        actor.require(Permission::ManageTeams)?;
        let team = access::team(self.state, actor, team_id).await?;
        let mut tier = self.load_tier(&team, tier_id).await?;

        let roster = self.state.repos.teams.list_roster(team.id()).await?;
        let occupants = tier_occupancy(&roster).get(&tier.id).copied().unwrap_or(0);
        tier.update(changes, occupants)?;
        self.state.repos.teams.save_tier(&tier).await?;
        Ok(tier)
    }

    /// Removes an empty tier
    pub async fn delete(&self, actor: &Actor, team_id: Uuid, tier_id: Uuid) -> ServiceResult<()> {
        actor.require(Permission::ManageTeams)?;
        let team = access::team(self.state, actor, team_id).await?;
        let tier = self.load_tier(&team, tier_id).await?;

        let roster = self.state.repos.teams.list_roster(team.id()).await?;
        let occupants = tier_occupancy(&roster).get(&tier.id).copied().unwrap_or(0);
        if occupants > 0 {
            return Err(DomainError::conflict(format!(
                "Tier '{}' still has {} players",
                tier.name, occupants
            ))
            .into());
        }
        self.state.repos.teams.delete_tier(tier.id).await?;
        info!(tier_id = %tier.id, "Tier deleted");
        Ok(())
    }

    pub async fn assign(
        &self,
        actor: &Actor,
        team_id: Uuid,
        player_id: Uuid,
        tier_id: Uuid,
    ) -> ServiceResult<TeamPlayer> {
        self.move_player(actor, team_id, player_id, Move::Assign(tier_id)).await
    }

    pub async fn promote(&self, actor: &Actor, team_id: Uuid, player_id: Uuid) -> ServiceResult<TeamPlayer> {
        self.move_player(actor, team_id, player_id, Move::Promote).await
    }

    pub async fn demote(&self, actor: &Actor, team_id: Uuid, player_id: Uuid) -> ServiceResult<TeamPlayer> {
        self.move_player(actor, team_id, player_id, Move::Demote).await
    }

    async fn move_player(
        &self,
        actor: &Actor,
        team_id: Uuid,
        player_id: Uuid,
        direction: Move,
    ) -> ServiceResult<TeamPlayer> {
        actor.require(Permission::EvaluatePlayers)?;
        let team = access::team(self.state, actor, team_id).await?;
        let repos = &self.state.repos;

        let roster = repos.teams.list_roster(team.id()).await?;
        let mut entry = roster
            .iter()
            .find(|p| p.player_id == player_id)
            .cloned()
            .ok_or_else(|| ServiceError::not_found("Roster entry"))?;
        let tiers = repos.teams.list_tiers(team.id()).await?;
        let ladder = TierLadder::new(&tiers);
        let occupancy = tier_occupancy(&roster);

        let event = match direction {
            Move::Assign(tier_id) => entry.assign_tier(&ladder, tier_id, &occupancy)?,
            Move::Promote => {
                let skills = repos.players.list_skills(player_id).await?;
                entry.promote(&ladder, &occupancy, average_rating(&skills))?
            }
            Move::Demote => entry.demote(&ladder, &occupancy)?,
        };
        repos.teams.save_player(&entry).await?;

        let tier_name = entry
            .tier_id
            .and_then(|id| ladder.get(id))
            .map(|t| t.name.clone())
            .unwrap_or_default();
        info!(kind = event.kind(), %player_id, team_id = %team.id(), tier = %tier_name, "Tier changed");

        let subject = match event {
            TeamEvent::PlayerPromoted { .. } => format!("Promoted to {}", tier_name),
            TeamEvent::PlayerDemoted { .. } => format!("Moved to {}", tier_name),
            _ => format!("Placed in {}", tier_name),
        };
        NotificationService::new(self.state)
            .announce(
                team.organization_id(),
                &[player_id],
                Notice::in_app(
                    event.kind(),
                    subject,
                    format!("Your tier on {} is now {}.", team.name(), tier_name),
                )
                .with_data(json!({ "team_id": team.id(), "tier_id": entry.tier_id })),
            )
            .await;

        Ok(entry)
    }
}
