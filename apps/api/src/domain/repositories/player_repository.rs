use async_trait::async_trait;
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::player::{PlayerEvaluation, PlayerSkill};

/// Repository trait for player development records
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Insert a skill or replace the rating of the same-named one
    ///
    /// Returns the stored row, which keeps the original id on replace.
    async fn upsert_skill(&self, skill: &PlayerSkill) -> RepositoryResult<PlayerSkill>;

    async fn list_skills(&self, player_id: Uuid) -> RepositoryResult<Vec<PlayerSkill>>;

    async fn add_evaluation(&self, evaluation: &PlayerEvaluation) -> RepositoryResult<()>;

    /// Evaluations of a player, newest first
    async fn list_evaluations(&self, player_id: Uuid) -> RepositoryResult<Vec<PlayerEvaluation>>;
}
