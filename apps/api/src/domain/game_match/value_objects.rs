use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a match
///
/// # Status Transitions
/// ```text
/// Scheduled -> InProgress -> Completed
///     |            |
///     +------------+-----> Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MatchStatus {
    /// Checks if a transition from current status to next status is valid
    ///
    /// # Valid Transitions
    /// - Scheduled -> InProgress
    /// - Scheduled -> Cancelled
    /// - InProgress -> Completed
    /// - InProgress -> Cancelled
    ///
    /// # Example
    /// ```
    /// use academy_api::domain::game_match::value_objects::MatchStatus;
    ///
    /// assert!(MatchStatus::Scheduled.can_transition_to(MatchStatus::InProgress));
    /// assert!(!MatchStatus::Completed.can_transition_to(MatchStatus::Scheduled));
    /// ```
    pub fn can_transition_to(&self, next: MatchStatus) -> bool {
        use MatchStatus::*;
        matches!(
            (self, next),
            (Scheduled, InProgress)
                | (Scheduled, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }

    /// Completed and cancelled matches never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Scheduled => write!(f, "scheduled"),
            MatchStatus::InProgress => write!(f, "in_progress"),
            MatchStatus::Completed => write!(f, "completed"),
            MatchStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Kind of in-game occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_event_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchEventType {
    Goal,
    OwnGoal,
    Assist,
    YellowCard,
    RedCard,
    Substitution,
    Injury,
    Other,
}

impl MatchEventType {
    /// Event types that only make sense with a named player
    pub fn requires_player(&self) -> bool {
        matches!(
            self,
            MatchEventType::Assist
                | MatchEventType::YellowCard
                | MatchEventType::RedCard
                | MatchEventType::Substitution
                | MatchEventType::Injury
        )
    }
}

/// Which side of the fixture an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_side", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchSide {
    Team,
    Opponent,
}

impl MatchSide {
    pub fn other(&self) -> MatchSide {
        match self {
            MatchSide::Team => MatchSide::Opponent,
            MatchSide::Opponent => MatchSide::Team,
        }
    }
}
