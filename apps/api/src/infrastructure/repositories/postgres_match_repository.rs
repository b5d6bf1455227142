use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::game_match::{
    GameMatch, LineupEntry, MatchEvent, MatchEventType, MatchSide, MatchStatus,
};
use crate::domain::repositories::{MatchRepository, RepositoryResult};

/// PostgreSQL implementation of MatchRepository
pub struct PostgresMatchRepository {
    pool: PgPool,
}

impl PostgresMatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_MATCH: &str = r#"
    SELECT id, organization_id, team_id, opponent_name, venue, is_home, scheduled_at,
           status, team_score, opponent_score, started_at, completed_at,
           cancelled_reason, notes, metadata, created_by,
           created_at, updated_at, deleted_at
    FROM game_matches
"#;

#[derive(sqlx::FromRow)]
struct MatchRow {
    id: Uuid,
    organization_id: Uuid,
    team_id: Uuid,
    opponent_name: String,
    venue: Option<String>,
    is_home: bool,
    scheduled_at: DateTime<Utc>,
    status: MatchStatus,
    team_score: i32,
    opponent_score: i32,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    cancelled_reason: Option<String>,
    notes: Option<String>,
    metadata: Value,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<MatchRow> for GameMatch {
    fn from(r: MatchRow) -> Self {
        GameMatch::from_persistence(
            r.id,
            r.organization_id,
            r.team_id,
            r.opponent_name,
            r.venue,
            r.is_home,
            r.scheduled_at,
            r.status,
            r.team_score,
            r.opponent_score,
            r.started_at,
            r.completed_at,
            r.cancelled_reason,
            r.notes,
            r.metadata,
            r.created_by,
            r.created_at,
            r.updated_at,
            r.deleted_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    match_id: Uuid,
    event_type: MatchEventType,
    side: MatchSide,
    player_id: Option<Uuid>,
    minute: i32,
    description: Option<String>,
    created_by: Uuid,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for MatchEvent {
    fn from(r: EventRow) -> Self {
        MatchEvent {
            id: r.id,
            match_id: r.match_id,
            event_type: r.event_type,
            side: r.side,
            player_id: r.player_id,
            minute: r.minute,
            description: r.description,
            created_by: r.created_by,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LineupRow {
    match_id: Uuid,
    player_id: Uuid,
    position: Option<String>,
    jersey_number: Option<i32>,
    is_starter: bool,
}

impl From<LineupRow> for LineupEntry {
    fn from(r: LineupRow) -> Self {
        LineupEntry {
            match_id: r.match_id,
            player_id: r.player_id,
            position: r.position,
            jersey_number: r.jersey_number,
            is_starter: r.is_starter,
        }
    }
}

#[async_trait]
impl MatchRepository for PostgresMatchRepository {
    async fn save(&self, game: &GameMatch) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO game_matches (
                id, organization_id, team_id, opponent_name, venue, is_home, scheduled_at,
                status, team_score, opponent_score, started_at, completed_at,
                cancelled_reason, notes, metadata, created_by,
                created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19)
            ON CONFLICT (id) DO UPDATE SET
                opponent_name = EXCLUDED.opponent_name,
                venue = EXCLUDED.venue,
                is_home = EXCLUDED.is_home,
                scheduled_at = EXCLUDED.scheduled_at,
                status = EXCLUDED.status,
                team_score = EXCLUDED.team_score,
                opponent_score = EXCLUDED.opponent_score,
                started_at = EXCLUDED.started_at,
                completed_at = EXCLUDED.completed_at,
                cancelled_reason = EXCLUDED.cancelled_reason,
                notes = EXCLUDED.notes,
                metadata = EXCLUDED.metadata,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            "#,
        )
        .bind(game.id())
        .bind(game.organization_id())
        .bind(game.team_id())
        .bind(game.opponent_name())
        .bind(game.venue())
        .bind(game.is_home())
        .bind(game.scheduled_at())
        .bind(game.status())
        .bind(game.team_score())
        .bind(game.opponent_score())
        .bind(game.started_at())
        .bind(game.completed_at())
        .bind(game.cancelled_reason())
        .bind(game.notes())
        .bind(game.metadata())
        .bind(game.created_by())
        .bind(game.created_at())
        .bind(game.updated_at())
        .bind(game.deleted_at())
        .execute(&self.pool)
        .await
        .map_err(db_error("save match"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<GameMatch>> {
        let sql = format!("{} WHERE id = $1 AND deleted_at IS NULL", SELECT_MATCH);
        let row = sqlx::query_as::<_, MatchRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find match by id"))?;

        Ok(row.map(GameMatch::from))
    }

    async fn list_by_team(
        &self,
        team_id: Uuid,
        status: Option<MatchStatus>,
    ) -> RepositoryResult<Vec<GameMatch>> {
        let sql = format!(
            "{} WHERE team_id = $1 AND deleted_at IS NULL AND ($2::match_status IS NULL OR status = $2) ORDER BY scheduled_at",
            SELECT_MATCH
        );
        let rows = sqlx::query_as::<_, MatchRow>(&sql)
            .bind(team_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list matches"))?;

        Ok(rows.into_iter().map(GameMatch::from).collect())
    }

    async fn record_event(&self, game: &GameMatch, event: &MatchEvent) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO match_events (
                id, match_id, event_type, side, player_id, minute, description, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(event.id)
        .bind(event.match_id)
        .bind(event.event_type)
        .bind(event.side)
        .bind(event.player_id)
        .bind(event.minute)
        .bind(&event.description)
        .bind(event.created_by)
        .bind(event.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_error("insert match event"))?;

        sqlx::query(
            r#"
            UPDATE game_matches
            SET team_score = $2, opponent_score = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(game.id())
        .bind(game.team_score())
        .bind(game.opponent_score())
        .bind(game.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(db_error("update match score"))?;

        tx.commit().await.map_err(db_error("commit match event"))?;
        Ok(())
    }

    async fn list_events(&self, match_id: Uuid) -> RepositoryResult<Vec<MatchEvent>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, match_id, event_type, side, player_id, minute, description, created_by, created_at
            FROM match_events
            WHERE match_id = $1
            ORDER BY minute, created_at
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list match events"))?;

        Ok(rows.into_iter().map(MatchEvent::from).collect())
    }

    async fn replace_lineup(&self, match_id: Uuid, entries: &[LineupEntry]) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        sqlx::query("DELETE FROM match_lineups WHERE match_id = $1")
            .bind(match_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("clear lineup"))?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO match_lineups (match_id, player_id, position, jersey_number, is_starter)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(match_id)
            .bind(entry.player_id)
            .bind(&entry.position)
            .bind(entry.jersey_number)
            .bind(entry.is_starter)
            .execute(&mut *tx)
            .await
            .map_err(db_error("insert lineup entry"))?;
        }

        tx.commit().await.map_err(db_error("commit lineup"))?;
        Ok(())
    }

    async fn list_lineup(&self, match_id: Uuid) -> RepositoryResult<Vec<LineupEntry>> {
        let rows = sqlx::query_as::<_, LineupRow>(
            r#"
            SELECT match_id, player_id, position, jersey_number, is_starter
            FROM match_lineups
            WHERE match_id = $1
            ORDER BY is_starter DESC, jersey_number NULLS LAST
            "#,
        )
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list lineup"))?;

        Ok(rows.into_iter().map(LineupEntry::from).collect())
    }
}
