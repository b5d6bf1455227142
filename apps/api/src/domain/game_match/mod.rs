// Match domain module
// GameMatch aggregate with its status state machine, in-game events and lineups

#![allow(clippy::module_inception)]

pub mod events;
pub mod game_match;
pub mod lineup;
pub mod match_event;
pub mod value_objects;

pub use events::MatchLifecycleEvent;
pub use game_match::{GameMatch, NewMatch};
pub use lineup::{build_lineup, LineupEntry, LineupSlot};
pub use match_event::MatchEvent;
pub use value_objects::{MatchEventType, MatchSide, MatchStatus};
