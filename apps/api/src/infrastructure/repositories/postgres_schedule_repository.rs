use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::repositories::{RepositoryError, RepositoryResult, ScheduleRepository};
use crate::domain::schedule::{ScheduleType, TeamSchedule};

/// PostgreSQL implementation of ScheduleRepository
pub struct PostgresScheduleRepository {
    pool: PgPool,
}

impl PostgresScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_SCHEDULE: &str = r#"
    SELECT id, team_id, title, schedule_type, starts_at, ends_at, location, notes,
           match_id, series_id, is_cancelled, created_by, created_at
    FROM team_schedules
"#;

#[derive(sqlx::FromRow)]
struct ScheduleRow {
    id: Uuid,
    team_id: Uuid,
    title: String,
    schedule_type: ScheduleType,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    location: Option<String>,
    notes: Option<String>,
    match_id: Option<Uuid>,
    series_id: Option<Uuid>,
    is_cancelled: bool,
    created_by: Uuid,
    created_at: DateTime<Utc>,
}

impl From<ScheduleRow> for TeamSchedule {
    fn from(r: ScheduleRow) -> Self {
        TeamSchedule {
            id: r.id,
            team_id: r.team_id,
            title: r.title,
            schedule_type: r.schedule_type,
            starts_at: r.starts_at,
            ends_at: r.ends_at,
            location: r.location,
            notes: r.notes,
            match_id: r.match_id,
            series_id: r.series_id,
            is_cancelled: r.is_cancelled,
            created_by: r.created_by,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl ScheduleRepository for PostgresScheduleRepository {
    async fn insert_many(&self, entries: &[TeamSchedule]) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO team_schedules (
                    id, team_id, title, schedule_type, starts_at, ends_at, location, notes,
                    match_id, series_id, is_cancelled, created_by, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
                "#,
            )
            .bind(entry.id)
            .bind(entry.team_id)
            .bind(&entry.title)
            .bind(entry.schedule_type)
            .bind(entry.starts_at)
            .bind(entry.ends_at)
            .bind(&entry.location)
            .bind(&entry.notes)
            .bind(entry.match_id)
            .bind(entry.series_id)
            .bind(entry.is_cancelled)
            .bind(entry.created_by)
            .bind(entry.created_at)
            .execute(&mut *tx)
            .await
            .map_err(db_error("insert schedule"))?;
        }

        tx.commit().await.map_err(db_error("commit schedules"))?;
        Ok(())
    }

    async fn save(&self, entry: &TeamSchedule) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE team_schedules
            SET title = $2, starts_at = $3, ends_at = $4, location = $5, notes = $6,
                is_cancelled = $7
            WHERE id = $1
            "#,
        )
        .bind(entry.id)
        .bind(&entry.title)
        .bind(entry.starts_at)
        .bind(entry.ends_at)
        .bind(&entry.location)
        .bind(&entry.notes)
        .bind(entry.is_cancelled)
        .execute(&self.pool)
        .await
        .map_err(db_error("update schedule"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Schedule {}", entry.id)));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<TeamSchedule>> {
        let sql = format!("{} WHERE id = $1", SELECT_SCHEDULE);
        let row = sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find schedule by id"))?;

        Ok(row.map(TeamSchedule::from))
    }

    async fn find_by_match(&self, match_id: Uuid) -> RepositoryResult<Option<TeamSchedule>> {
        let sql = format!("{} WHERE match_id = $1 LIMIT 1", SELECT_SCHEDULE);
        let row = sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find schedule by match"))?;

        Ok(row.map(TeamSchedule::from))
    }

    async fn list_by_team(
        &self,
        team_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> RepositoryResult<Vec<TeamSchedule>> {
        let sql = format!(
            r#"{}
            WHERE team_id = $1
              AND ($2::timestamptz IS NULL OR ends_at > $2)
              AND ($3::timestamptz IS NULL OR starts_at < $3)
            ORDER BY starts_at"#,
            SELECT_SCHEDULE
        );
        let rows = sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(team_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list schedules"))?;

        Ok(rows.into_iter().map(TeamSchedule::from).collect())
    }

    async fn list_active_between(
        &self,
        team_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> RepositoryResult<Vec<TeamSchedule>> {
        let sql = format!(
            r#"{}
            WHERE team_id = $1 AND NOT is_cancelled AND starts_at < $3 AND ends_at > $2
            ORDER BY starts_at"#,
            SELECT_SCHEDULE
        );
        let rows = sqlx::query_as::<_, ScheduleRow>(&sql)
            .bind(team_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list active schedules"))?;

        Ok(rows.into_iter().map(TeamSchedule::from).collect())
    }
}
