use chrono::{DateTime, Utc};
use serde::Serialize;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::events::TeamEvent;
use super::tier::{TierLadder, TierOccupancy};
use super::value_objects::{JerseyNumber, PlayerStatus};
use crate::domain::errors::{optional_text, DomainError, DomainResult};

/// A player's membership on a team roster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamPlayer {
    pub team_id: Uuid,
    pub player_id: Uuid,
    pub tier_id: Option<Uuid>,
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
    pub status: PlayerStatus,
    pub joined_at: DateTime<Utc>,
}

/// `jersey_number: Some(None)` takes the number off the player
#[derive(Debug, Clone, Default)]
pub struct RosterChanges {
    pub jersey_number: Option<Option<i32>>,
    pub position: Option<String>,
    pub status: Option<PlayerStatus>,
}

/// Rejects a jersey number already worn by someone else on the roster
pub fn ensure_jersey_free(
    roster: &[TeamPlayer],
    player_id: Uuid,
    number: Option<i32>,
) -> DomainResult<()> {
    if let Some(n) = number {
        if roster
            .iter()
            .any(|p| p.player_id != player_id && p.jersey_number == Some(n))
        {
            return Err(DomainError::conflict(format!(
                "Jersey number {} is already taken",
                n
            )));
        }
    }
    Ok(())
}

impl TeamPlayer {
    pub fn new(
        team_id: Uuid,
        player_id: Uuid,
        jersey_number: Option<i32>,
        position: Option<String>,
    ) -> DomainResult<(Self, TeamEvent)> {
        let jersey_number = jersey_number
            .map(|n| JerseyNumber::new(n).map(|j| j.value()))
            .transpose()
            .map_err(DomainError::Validation)?;

        let entry = Self {
            team_id,
            player_id,
            tier_id: None,
            jersey_number,
            position: optional_text(position),
            status: PlayerStatus::Active,
            joined_at: Utc::now(),
        };
        let event = TeamEvent::PlayerAdded {
            team_id,
            player_id,
        };
        Ok((entry, event))
    }

    pub fn update(&mut self, changes: RosterChanges) -> DomainResult<()> {
        match changes.jersey_number {
            Some(Some(n)) => {
                self.jersey_number = Some(JerseyNumber::new(n).map_err(DomainError::Validation)?.value());
            }
            Some(None) => self.jersey_number = None,
            None => {}
        }
        if changes.position.is_some() {
            self.position = optional_text(changes.position);
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        Ok(())
    }

    /// Places the player in a specific tier of their team
    pub fn assign_tier(
        &mut self,
        ladder: &TierLadder<'_>,
        tier_id: Uuid,
        occupancy: &TierOccupancy,
    ) -> DomainResult<TeamEvent> {
        let tier = ladder
            .get(tier_id)
            .ok_or_else(|| DomainError::validation(format!("Tier {} does not belong to team", tier_id)))?;
        if self.tier_id == Some(tier.id) {
            return Err(DomainError::conflict(format!(
                "Player is already in tier '{}'",
                tier.name
            )));
        }
        tier.ensure_capacity(occupancy.get(&tier.id).copied().unwrap_or(0))?;

        self.tier_id = Some(tier.id);
        Ok(TeamEvent::TierAssigned {
            team_id: self.team_id,
            player_id: self.player_id,
            tier_id: tier.id,
        })
    }

    /// Moves the player one tier up
    ///
    /// # Business Rules
    /// - Untiered players enter the lowest tier
    /// - Target tier must have room
    /// - Player's average skill rating must meet the target tier's minimum
    pub fn promote(
        &mut self,
        ladder: &TierLadder<'_>,
        occupancy: &TierOccupancy,
        average_skill: Decimal,
    ) -> DomainResult<TeamEvent> {
        let target = ladder.above(self.tier_id)?;
        target.ensure_capacity(occupancy.get(&target.id).copied().unwrap_or(0))?;
        target.ensure_skill(average_skill)?;

        let from = self.tier_id.replace(target.id);
        Ok(TeamEvent::PlayerPromoted {
            team_id: self.team_id,
            player_id: self.player_id,
            from_tier_id: from,
            to_tier_id: target.id,
        })
    }

    /// Moves the player one tier down; skill thresholds do not apply
    pub fn demote(
        &mut self,
        ladder: &TierLadder<'_>,
        occupancy: &TierOccupancy,
    ) -> DomainResult<TeamEvent> {
        let target = ladder.below(self.tier_id)?;
        target.ensure_capacity(occupancy.get(&target.id).copied().unwrap_or(0))?;

        let from = self
            .tier_id
            .replace(target.id)
            .ok_or_else(|| DomainError::validation("Player is not in a tier"))?;
        Ok(TeamEvent::PlayerDemoted {
            team_id: self.team_id,
            player_id: self.player_id,
            from_tier_id: from,
            to_tier_id: target.id,
        })
    }
}

/// Counts roster players per tier
pub fn tier_occupancy(roster: &[TeamPlayer]) -> TierOccupancy {
    let mut occupancy = TierOccupancy::new();
    for tier_id in roster.iter().filter_map(|p| p.tier_id) {
        *occupancy.entry(tier_id).or_insert(0) += 1;
    }
    occupancy
}
