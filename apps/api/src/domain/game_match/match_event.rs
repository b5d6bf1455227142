use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::value_objects::{MatchEventType, MatchSide};
use crate::domain::errors::{optional_text, DomainError, DomainResult};

/// Upper bound for an event minute, leaving room for extra time
pub const MAX_EVENT_MINUTE: i32 = 200;

/// Something that happened during a match: goals, cards, substitutions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEvent {
    pub id: Uuid,
    pub match_id: Uuid,
    pub event_type: MatchEventType,
    pub side: MatchSide,
    pub player_id: Option<Uuid>,
    pub minute: i32,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl MatchEvent {
    pub fn new(
        match_id: Uuid,
        event_type: MatchEventType,
        side: MatchSide,
        player_id: Option<Uuid>,
        minute: i32,
        description: Option<String>,
        created_by: Uuid,
    ) -> DomainResult<Self> {
        if !(0..=MAX_EVENT_MINUTE).contains(&minute) {
            return Err(DomainError::validation(format!(
                "Minute must be between 0 and {}",
                MAX_EVENT_MINUTE
            )));
        }
        // opponent players are not tracked, so only our side can name one
        if side == MatchSide::Team && event_type.requires_player() && player_id.is_none() {
            return Err(DomainError::validation(format!(
                "A player is required for {:?} events",
                event_type
            )));
        }
        if side == MatchSide::Opponent && player_id.is_some() {
            return Err(DomainError::validation(
                "Opponent events cannot reference a player",
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            match_id,
            event_type,
            side,
            player_id,
            minute,
            description: optional_text(description),
            created_by,
            created_at: Utc::now(),
        })
    }
}
