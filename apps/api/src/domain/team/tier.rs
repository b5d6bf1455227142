use chrono::{DateTime, Utc};
use serde::Serialize;
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};

/// A sub-grouping of a team's players by skill or age level
///
/// A higher `level` is a higher tier. Levels are unique within a team but
/// need not be contiguous.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamTier {
    pub id: Uuid,
    pub team_id: Uuid,
    pub name: String,
    pub level: i32,
    pub description: Option<String>,
    pub min_skill_rating: Option<Decimal>,
    pub max_players: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// `description: Some(None)` clears the description
#[derive(Debug, Clone, Default)]
pub struct TierChanges {
    pub name: Option<String>,
    pub level: Option<i32>,
    pub description: Option<Option<String>>,
    pub min_skill_rating: Option<Decimal>,
    pub max_players: Option<i32>,
}

fn validate_level(level: i32) -> DomainResult<i32> {
    if level < 1 {
        return Err(DomainError::validation("Tier level must be at least 1"));
    }
    Ok(level)
}

fn validate_min_rating(rating: Option<Decimal>) -> DomainResult<Option<Decimal>> {
    if let Some(r) = rating {
        if r < Decimal::ONE || r > Decimal::TEN {
            return Err(DomainError::validation(
                "Minimum skill rating must be between 1 and 10",
            ));
        }
    }
    Ok(rating)
}

fn validate_capacity(max_players: Option<i32>) -> DomainResult<Option<i32>> {
    if let Some(m) = max_players {
        if m < 1 {
            return Err(DomainError::validation("Tier capacity must be at least 1"));
        }
    }
    Ok(max_players)
}

impl TeamTier {
    pub fn new(
        team_id: Uuid,
        name: &str,
        level: i32,
        description: Option<String>,
        min_skill_rating: Option<Decimal>,
        max_players: Option<i32>,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            team_id,
            name: required_text(name, "Tier name")?,
            level: validate_level(level)?,
            description: optional_text(description),
            min_skill_rating: validate_min_rating(min_skill_rating)?,
            max_players: validate_capacity(max_players)?,
            created_at: Utc::now(),
        })
    }

    /// Applies edits. `occupants` is the number of players currently in the tier.
    pub fn update(&mut self, changes: TierChanges, occupants: usize) -> DomainResult<()> {
        if let Some(name) = changes.name {
            self.name = required_text(&name, "Tier name")?;
        }
        if let Some(level) = changes.level {
            self.level = validate_level(level)?;
        }
        if let Some(description) = changes.description {
            self.description = optional_text(description);
        }
        if changes.min_skill_rating.is_some() {
            self.min_skill_rating = validate_min_rating(changes.min_skill_rating)?;
        }
        if changes.max_players.is_some() {
            let cap = validate_capacity(changes.max_players)?;
            if let Some(c) = cap {
                if (c as usize) < occupants {
                    return Err(DomainError::conflict(format!(
                        "Tier '{}' already holds {} players",
                        self.name, occupants
                    )));
                }
            }
            self.max_players = cap;
        }
        Ok(())
    }

    /// Checks that one more player fits in the tier
    pub fn ensure_capacity(&self, occupants: usize) -> DomainResult<()> {
        match self.max_players {
            Some(max) if occupants >= max as usize => Err(DomainError::limit_exceeded(format!(
                "Tier '{}' is full ({} players)",
                self.name, max
            ))),
            _ => Ok(()),
        }
    }

    /// Checks a player's average skill rating against the tier threshold
    pub fn ensure_skill(&self, average_rating: Decimal) -> DomainResult<()> {
        match self.min_skill_rating {
            Some(min) if average_rating < min => Err(DomainError::validation(format!(
                "Tier '{}' requires an average skill rating of {}, player has {}",
                self.name,
                min,
                average_rating.round_dp(2)
            ))),
            _ => Ok(()),
        }
    }
}

/// A team's tiers ordered from lowest to highest level
#[derive(Debug)]
pub struct TierLadder<'a> {
    tiers: Vec<&'a TeamTier>,
}

impl<'a> TierLadder<'a> {
    pub fn new(tiers: &'a [TeamTier]) -> Self {
        let mut tiers: Vec<&TeamTier> = tiers.iter().collect();
        tiers.sort_by_key(|t| t.level);
        Self { tiers }
    }

    pub fn get(&self, tier_id: Uuid) -> Option<&'a TeamTier> {
        self.tiers.iter().copied().find(|t| t.id == tier_id)
    }

    /// The tier a player in `current` would be promoted to
    ///
    /// Players with no tier enter at the lowest one.
    pub fn above(&self, current: Option<Uuid>) -> DomainResult<&'a TeamTier> {
        match current {
            None => self
                .tiers
                .first()
                .copied()
                .ok_or_else(|| DomainError::validation("Team has no tiers")),
            Some(id) => {
                let tier = self.lookup(id)?;
                self.tiers
                    .iter()
                    .copied()
                    .find(|t| t.level > tier.level)
                    .ok_or_else(|| {
                        DomainError::validation(format!(
                            "Player is already in the highest tier '{}'",
                            tier.name
                        ))
                    })
            }
        }
    }

    /// The tier a player in `current` would be demoted to
    pub fn below(&self, current: Option<Uuid>) -> DomainResult<&'a TeamTier> {
        let id = current.ok_or_else(|| DomainError::validation("Player is not in a tier"))?;
        let tier = self.lookup(id)?;
        self.tiers
            .iter()
            .rev()
            .copied()
            .find(|t| t.level < tier.level)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Player is already in the lowest tier '{}'",
                    tier.name
                ))
            })
    }

    fn lookup(&self, id: Uuid) -> DomainResult<&'a TeamTier> {
        self.get(id)
            .ok_or_else(|| DomainError::validation(format!("Tier {} does not belong to team", id)))
    }
}

/// Number of roster players per tier
pub type TierOccupancy = HashMap<Uuid, usize>;

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn tier(team: Uuid, name: &str, level: i32) -> TeamTier {
        TeamTier::new(team, name, level, None, None, None).unwrap()
    }

    #[test]
    fn new_tier_validation() {
        let team = Uuid::new_v4();
        assert!(TeamTier::new(team, "", 1, None, None, None).is_err());
        assert!(TeamTier::new(team, "Gold", 0, None, None, None).is_err());
        assert!(TeamTier::new(team, "Gold", 1, None, Some(dec(11)), None).is_err());
        assert!(TeamTier::new(team, "Gold", 1, None, None, Some(0)).is_err());
        assert!(TeamTier::new(team, "Gold", 1, None, Some(dec(7)), Some(5)).is_ok());
    }

    #[test]
    fn ladder_orders_by_level() {
        let team = Uuid::new_v4();
        let tiers = vec![tier(team, "Gold", 3), tier(team, "Bronze", 1), tier(team, "Silver", 2)];
        let ladder = TierLadder::new(&tiers);

        assert_eq!(ladder.above(None).unwrap().name, "Bronze");
        let bronze = ladder.above(None).unwrap().id;
        assert_eq!(ladder.above(Some(bronze)).unwrap().name, "Silver");
    }

    #[test]
    fn ladder_skips_level_gaps() {
        let team = Uuid::new_v4();
        let tiers = vec![tier(team, "Low", 1), tier(team, "High", 5)];
        let ladder = TierLadder::new(&tiers);

        let low = tiers[0].id;
        let high = tiers[1].id;
        assert_eq!(ladder.above(Some(low)).unwrap().id, high);
        assert_eq!(ladder.below(Some(high)).unwrap().id, low);
    }

    #[test]
    fn cannot_promote_past_top_or_demote_past_bottom() {
        let team = Uuid::new_v4();
        let tiers = vec![tier(team, "Low", 1), tier(team, "High", 2)];
        let ladder = TierLadder::new(&tiers);

        assert!(ladder.above(Some(tiers[1].id)).is_err());
        assert!(ladder.below(Some(tiers[0].id)).is_err());
        assert!(ladder.below(None).is_err());
    }

    #[test]
    fn empty_ladder_has_no_entry_tier() {
        let tiers: Vec<TeamTier> = Vec::new();
        let ladder = TierLadder::new(&tiers);
        assert!(ladder.above(None).is_err());
    }

    #[test]
    fn foreign_tier_is_rejected() {
        let team = Uuid::new_v4();
        let tiers = vec![tier(team, "Low", 1)];
        let ladder = TierLadder::new(&tiers);
        assert!(ladder.above(Some(Uuid::new_v4())).is_err());
    }

    #[test]
    fn capacity_and_skill_checks() {
        let team = Uuid::new_v4();
        let t = TeamTier::new(team, "Elite", 2, None, Some(dec(7)), Some(2)).unwrap();

        assert!(t.ensure_capacity(1).is_ok());
        assert!(matches!(
            t.ensure_capacity(2),
            Err(DomainError::LimitExceeded(_))
        ));
        assert!(t.ensure_skill(dec(7)).is_ok());
        assert!(t.ensure_skill(dec(6)).is_err());
    }

    #[test]
    fn shrinking_capacity_below_occupancy_fails() {
        let mut t = TeamTier::new(Uuid::new_v4(), "Elite", 2, None, None, Some(5)).unwrap();
        let result = t.update(
            TierChanges {
                max_players: Some(2),
                ..Default::default()
            },
            3,
        );
        assert!(result.is_err());
        assert_eq!(t.max_players, Some(5));
    }

    #[test]
    fn description_can_be_cleared() {
        let mut t = TeamTier::new(Uuid::new_v4(), "Elite", 2, Some("Top squad".into()), None, None).unwrap();
        t.update(TierChanges::default(), 0).unwrap();
        assert_eq!(t.description.as_deref(), Some("Top squad"));

        t.update(
            TierChanges {
                description: Some(None),
                ..Default::default()
            },
            0,
        )
        .unwrap();
        assert_eq!(t.description, None);
    }
}
