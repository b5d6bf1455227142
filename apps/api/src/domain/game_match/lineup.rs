use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::errors::{optional_text, DomainError, DomainResult};
use crate::domain::team::value_objects::JerseyNumber;
use crate::domain::team::TeamPlayer;

/// A player selected for a match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupEntry {
    pub match_id: Uuid,
    pub player_id: Uuid,
    pub position: Option<String>,
    pub jersey_number: Option<i32>,
    pub is_starter: bool,
}

/// Requested lineup slot before validation
#[derive(Debug, Clone, Deserialize)]
pub struct LineupSlot {
    pub player_id: Uuid,
    pub position: Option<String>,
    pub jersey_number: Option<i32>,
    pub is_starter: bool,
}

/// Validates a full lineup against the team roster
///
/// # Business Rules
/// - Each player appears once
/// - Each player is on the roster with an active status
/// - Jersey numbers are unique; a missing number falls back to the roster number
pub fn build_lineup(
    match_id: Uuid,
    slots: Vec<LineupSlot>,
    roster: &[TeamPlayer],
) -> DomainResult<Vec<LineupEntry>> {
    let mut players = HashSet::new();
    let mut jerseys = HashSet::new();
    let mut entries = Vec::with_capacity(slots.len());

    for slot in slots {
        if !players.insert(slot.player_id) {
            return Err(DomainError::validation(format!(
                "Player {} appears more than once in the lineup",
                slot.player_id
            )));
        }
        let member = roster
            .iter()
            .find(|p| p.player_id == slot.player_id)
            .ok_or_else(|| {
                DomainError::validation(format!("Player {} is not on the team roster", slot.player_id))
            })?;
        if !member.status.is_selectable() {
            return Err(DomainError::validation(format!(
                "Player {} is {} and cannot be selected",
                slot.player_id, member.status
            )));
        }

        let jersey = match slot.jersey_number {
            Some(n) => Some(JerseyNumber::new(n).map_err(DomainError::Validation)?.value()),
            None => member.jersey_number,
        };
        if let Some(n) = jersey {
            if !jerseys.insert(n) {
                return Err(DomainError::validation(format!(
                    "Jersey number {} is used twice in the lineup",
                    n
                )));
            }
        }

        entries.push(LineupEntry {
            match_id,
            player_id: slot.player_id,
            position: optional_text(slot.position).or_else(|| member.position.clone()),
            jersey_number: jersey,
            is_starter: slot.is_starter,
        });
    }

    Ok(entries)
}
