use serde::{Deserialize, Serialize};

/// Availability of a player on a team roster
///
/// # Status Transitions
/// ```text
/// Active <-> Injured
///   ^  \        |
///   |   v       v
///   +-- Inactive
/// ```
/// Every status may move to any other; only `Active` players can be
/// named in a match lineup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "player_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    /// Available for selection
    Active,
    /// Temporarily unavailable
    Injured,
    /// On the roster but not taking part
    Inactive,
}

impl PlayerStatus {
    pub fn is_selectable(&self) -> bool {
        matches!(self, PlayerStatus::Active)
    }
}

impl std::fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerStatus::Active => write!(f, "active"),
            PlayerStatus::Injured => write!(f, "injured"),
            PlayerStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Shirt number within a team
///
/// # Invariants
/// - Between 0 and 99 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JerseyNumber(i32);

impl JerseyNumber {
    pub const MAX: i32 = 99;

    pub fn new(number: i32) -> Result<Self, String> {
        if (0..=Self::MAX).contains(&number) {
            Ok(Self(number))
        } else {
            Err(format!(
                "Jersey number must be between 0 and {}, got {}",
                Self::MAX,
                number
            ))
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}
