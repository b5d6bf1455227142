use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::RepositoryResult;
use crate::domain::schedule::TeamSchedule;

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Insert entries all together or not at all
    async fn insert_many(&self, entries: &[TeamSchedule]) -> RepositoryResult<()>;

    /// Update an existing entry
    async fn save(&self, entry: &TeamSchedule) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<TeamSchedule>>;

    /// The calendar entry created for a match
    async fn find_by_match(&self, match_id: Uuid) -> RepositoryResult<Option<TeamSchedule>>;

    /// Entries of a team ordered by start, optionally bounded to a window
    async fn list_by_team(
        &self,
        team_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<TeamSchedule>>;

    /// Non-cancelled entries of a team that intersect `[from, to)`
    async fn list_active_between(
        &self,
        team_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<TeamSchedule>>;
}
