// Team domain module
// Contains the team aggregate root, tiers, roster entries and domain events

#![allow(clippy::module_inception)]

pub mod events;
pub mod roster;
pub mod team;
pub mod tier;
pub mod value_objects;

// Re-export main types for convenience
pub use events::TeamEvent;
pub use roster::{RosterChanges, TeamPlayer};
pub use team::{NewTeam, Team, TeamChanges};
pub use tier::{TeamTier, TierChanges, TierLadder};
pub use value_objects::PlayerStatus;
