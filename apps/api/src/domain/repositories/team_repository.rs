use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::team::{Team, TeamPlayer, TeamTier};

/// Repository trait for the Team aggregate, its tiers and its roster
///
/// Finders skip soft-deleted teams.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Save a team (insert or update); a duplicate live name is a conflict
    async fn save(&self, team: &Team) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>>;

    async fn list_by_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<Team>>;

    async fn count_by_organization(&self, organization_id: Uuid) -> RepositoryResult<usize>;

    // ===== Tiers =====

    /// Save a tier (insert or update); a duplicate level is a conflict
    async fn save_tier(&self, tier: &TeamTier) -> RepositoryResult<()>;

    async fn find_tier(&self, tier_id: Uuid) -> RepositoryResult<Option<TeamTier>>;

    /// Tiers of a team ordered by level
    async fn list_tiers(&self, team_id: Uuid) -> RepositoryResult<Vec<TeamTier>>;

    async fn delete_tier(&self, tier_id: Uuid) -> RepositoryResult<()>;

    // ===== Roster =====

    /// Insert a roster entry; an existing membership or jersey is a conflict
    async fn add_player(&self, entry: &TeamPlayer) -> RepositoryResult<()>;

    /// Update an existing roster entry
    async fn save_player(&self, entry: &TeamPlayer) -> RepositoryResult<()>;

    async fn find_player(&self, team_id: Uuid, player_id: Uuid) -> RepositoryResult<Option<TeamPlayer>>;

    async fn list_roster(&self, team_id: Uuid) -> RepositoryResult<Vec<TeamPlayer>>;

    async fn remove_player(&self, team_id: Uuid, player_id: Uuid) -> RepositoryResult<()>;

    /// Distinct players rostered on the organization's live teams
    async fn count_players_in_organization(&self, organization_id: Uuid) -> RepositoryResult<usize>;
}
