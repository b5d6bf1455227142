use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::game_match::{GameMatch, LineupEntry, MatchEvent, MatchStatus};

/// Repository trait for GameMatch aggregate
#[async_trait]
pub trait MatchRepository: Send + Sync {
    /// Save a match (insert or update)
    async fn save(&self, game: &GameMatch) -> RepositoryResult<()>;

    /// Find a live match by ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<GameMatch>>;

    /// Live matches of a team by kick-off, optionally filtered by status
    async fn list_by_team(
        &self,
        team_id: Uuid,
        status: Option<MatchStatus>,
    ) -> RepositoryResult<Vec<GameMatch>>;

    /// Store an event together with the match score it produced
    async fn record_event(&self, game: &GameMatch, event: &MatchEvent) -> RepositoryResult<()>;

    async fn list_events(&self, match_id: Uuid) -> RepositoryResult<Vec<MatchEvent>>;

    /// Replace the whole lineup of a match
    async fn replace_lineup(&self, match_id: Uuid, entries: &[LineupEntry]) -> RepositoryResult<()>;

    async fn list_lineup(&self, match_id: Uuid) -> RepositoryResult<Vec<LineupEntry>>;
}
