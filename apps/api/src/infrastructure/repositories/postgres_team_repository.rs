use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::repositories::{RepositoryError, RepositoryResult, TeamRepository};
use crate::domain::team::{PlayerStatus, Team, TeamPlayer, TeamTier};

/// PostgreSQL implementation of TeamRepository
///
/// Provides persistence for Team aggregates together with their tiers and
/// roster rows.
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new PostgresTeamRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_TEAM: &str = r#"
    SELECT id, organization_id, name, sport, age_group, gender, season,
           coach_id, max_players, is_active, metadata,
           created_at, updated_at, deleted_at
    FROM teams
"#;

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    sport: String,
    age_group: Option<String>,
    gender: Option<String>,
    season: Option<String>,
    coach_id: Option<Uuid>,
    max_players: i32,
    is_active: bool,
    metadata: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<TeamRow> for Team {
    fn from(r: TeamRow) -> Self {
        Team::from_persistence(
            r.id,
            r.organization_id,
            r.name,
            r.sport,
            r.age_group,
            r.gender,
            r.season,
            r.coach_id,
            r.max_players,
            r.is_active,
            r.metadata,
            r.created_at,
            r.updated_at,
            r.deleted_at,
        )
    }
}

#[derive(sqlx::FromRow)]
struct TierRow {
    id: Uuid,
    team_id: Uuid,
    name: String,
    level: i32,
    description: Option<String>,
    min_skill_rating: Option<Decimal>,
    max_players: Option<i32>,
    created_at: DateTime<Utc>,
}

impl From<TierRow> for TeamTier {
    fn from(r: TierRow) -> Self {
        TeamTier {
            id: r.id,
            team_id: r.team_id,
            name: r.name,
            level: r.level,
            description: r.description,
            min_skill_rating: r.min_skill_rating,
            max_players: r.max_players,
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RosterRow {
    team_id: Uuid,
    player_id: Uuid,
    tier_id: Option<Uuid>,
    jersey_number: Option<i32>,
    position: Option<String>,
    status: PlayerStatus,
    joined_at: DateTime<Utc>,
}

impl From<RosterRow> for TeamPlayer {
    fn from(r: RosterRow) -> Self {
        TeamPlayer {
            team_id: r.team_id,
            player_id: r.player_id,
            tier_id: r.tier_id,
            jersey_number: r.jersey_number,
            position: r.position,
            status: r.status,
            joined_at: r.joined_at,
        }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn save(&self, team: &Team) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO teams (
                id, organization_id, name, sport, age_group, gender, season,
                coach_id, max_players, is_active, metadata,
                created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                sport = EXCLUDED.sport,
                age_group = EXCLUDED.age_group,
                gender = EXCLUDED.gender,
                season = EXCLUDED.season,
                coach_id = EXCLUDED.coach_id,
                max_players = EXCLUDED.max_players,
                is_active = EXCLUDED.is_active,
                metadata = EXCLUDED.metadata,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at
            "#,
        )
        .bind(team.id())
        .bind(team.organization_id())
        .bind(team.name())
        .bind(team.sport())
        .bind(team.age_group())
        .bind(team.gender())
        .bind(team.season())
        .bind(team.coach_id())
        .bind(team.max_players())
        .bind(team.is_active())
        .bind(team.metadata())
        .bind(team.created_at())
        .bind(team.updated_at())
        .bind(team.deleted_at())
        .execute(&self.pool)
        .await
        .map_err(db_error("save team"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        let sql = format!("{} WHERE id = $1 AND deleted_at IS NULL", SELECT_TEAM);
        let row = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find team by id"))?;

        Ok(row.map(Team::from))
    }

    async fn list_by_organization(&self, organization_id: Uuid) -> RepositoryResult<Vec<Team>> {
        let sql = format!(
            "{} WHERE organization_id = $1 AND deleted_at IS NULL ORDER BY name",
            SELECT_TEAM
        );
        let rows = sqlx::query_as::<_, TeamRow>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list teams"))?;

        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn count_by_organization(&self, organization_id: Uuid) -> RepositoryResult<usize> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM teams WHERE organization_id = $1 AND deleted_at IS NULL",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("count teams"))?;

        Ok(count as usize)
    }

    async fn save_tier(&self, tier: &TeamTier) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO team_tiers (
                id, team_id, name, level, description, min_skill_rating, max_players, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                level = EXCLUDED.level,
                description = EXCLUDED.description,
                min_skill_rating = EXCLUDED.min_skill_rating,
                max_players = EXCLUDED.max_players
            "#,
        )
        .bind(tier.id)
        .bind(tier.team_id)
        .bind(&tier.name)
        .bind(tier.level)
        .bind(&tier.description)
        .bind(tier.min_skill_rating)
        .bind(tier.max_players)
        .bind(tier.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("save tier"))?;

        Ok(())
    }

    async fn find_tier(&self, tier_id: Uuid) -> RepositoryResult<Option<TeamTier>> {
        let row = sqlx::query_as::<_, TierRow>(
            r#"
            SELECT id, team_id, name, level, description, min_skill_rating, max_players, created_at
            FROM team_tiers
            WHERE id = $1
            "#,
        )
        .bind(tier_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find tier"))?;

        Ok(row.map(TeamTier::from))
    }

    async fn list_tiers(&self, team_id: Uuid) -> RepositoryResult<Vec<TeamTier>> {
        let rows = sqlx::query_as::<_, TierRow>(
            r#"
            SELECT id, team_id, name, level, description, min_skill_rating, max_players, created_at
            FROM team_tiers
            WHERE team_id = $1
            ORDER BY level
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list tiers"))?;

        Ok(rows.into_iter().map(TeamTier::from).collect())
    }

    async fn delete_tier(&self, tier_id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM team_tiers WHERE id = $1")
            .bind(tier_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("delete tier"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Tier {}", tier_id)));
        }

        Ok(())
    }

    async fn add_player(&self, entry: &TeamPlayer) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO team_players (
                team_id, player_id, tier_id, jersey_number, position, status, joined_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.team_id)
        .bind(entry.player_id)
        .bind(entry.tier_id)
        .bind(entry.jersey_number)
        .bind(&entry.position)
        .bind(entry.status)
        .bind(entry.joined_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("add player to roster"))?;

        Ok(())
    }

    async fn save_player(&self, entry: &TeamPlayer) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE team_players
            SET tier_id = $3, jersey_number = $4, position = $5, status = $6
            WHERE team_id = $1 AND player_id = $2
            "#,
        )
        .bind(entry.team_id)
        .bind(entry.player_id)
        .bind(entry.tier_id)
        .bind(entry.jersey_number)
        .bind(&entry.position)
        .bind(entry.status)
        .execute(&self.pool)
        .await
        .map_err(db_error("update roster entry"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Player {} on team {}",
                entry.player_id, entry.team_id
            )));
        }

        Ok(())
    }

    async fn find_player(&self, team_id: Uuid, player_id: Uuid) -> RepositoryResult<Option<TeamPlayer>> {
        let row = sqlx::query_as::<_, RosterRow>(
            r#"
            SELECT team_id, player_id, tier_id, jersey_number, position, status, joined_at
            FROM team_players
            WHERE team_id = $1 AND player_id = $2
            "#,
        )
        .bind(team_id)
        .bind(player_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("find roster entry"))?;

        Ok(row.map(TeamPlayer::from))
    }

    async fn list_roster(&self, team_id: Uuid) -> RepositoryResult<Vec<TeamPlayer>> {
        let rows = sqlx::query_as::<_, RosterRow>(
            r#"
            SELECT team_id, player_id, tier_id, jersey_number, position, status, joined_at
            FROM team_players
            WHERE team_id = $1
            ORDER BY jersey_number NULLS LAST, joined_at
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list roster"))?;

        Ok(rows.into_iter().map(TeamPlayer::from).collect())
    }

    async fn remove_player(&self, team_id: Uuid, player_id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM team_players WHERE team_id = $1 AND player_id = $2")
            .bind(team_id)
            .bind(player_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("remove player from roster"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!(
                "Player {} on team {}",
                player_id, team_id
            )));
        }

        Ok(())
    }

    async fn count_players_in_organization(&self, organization_id: Uuid) -> RepositoryResult<usize> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT tp.player_id)
            FROM team_players tp
            JOIN teams t ON t.id = tp.team_id
            WHERE t.organization_id = $1 AND t.deleted_at IS NULL
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("count players"))?;

        Ok(count as usize)
    }
}
