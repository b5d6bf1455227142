use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::db_error;
use crate::domain::player::{EvaluationScores, PlayerEvaluation, PlayerSkill};
use crate::domain::repositories::{PlayerRepository, RepositoryResult};

/// PostgreSQL implementation of PlayerRepository
pub struct PostgresPlayerRepository {
    pool: PgPool,
}

impl PostgresPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SkillRow {
    id: Uuid,
    player_id: Uuid,
    skill_name: String,
    rating: i32,
    notes: Option<String>,
    assessed_by: Uuid,
    assessed_at: DateTime<Utc>,
}

impl From<SkillRow> for PlayerSkill {
    fn from(r: SkillRow) -> Self {
        PlayerSkill {
            id: r.id,
            player_id: r.player_id,
            skill_name: r.skill_name,
            rating: r.rating,
            notes: r.notes,
            assessed_by: r.assessed_by,
            assessed_at: r.assessed_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EvaluationRow {
    id: Uuid,
    player_id: Uuid,
    team_id: Uuid,
    evaluator_id: Uuid,
    match_id: Option<Uuid>,
    evaluation_date: NaiveDate,
    technical: i32,
    tactical: i32,
    physical: i32,
    mental: i32,
    overall_score: Decimal,
    strengths: Option<String>,
    improvements: Option<String>,
    comments: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<EvaluationRow> for PlayerEvaluation {
    fn from(r: EvaluationRow) -> Self {
        PlayerEvaluation {
            id: r.id,
            player_id: r.player_id,
            team_id: r.team_id,
            evaluator_id: r.evaluator_id,
            match_id: r.match_id,
            evaluation_date: r.evaluation_date,
            scores: EvaluationScores {
                technical: r.technical,
                tactical: r.tactical,
                physical: r.physical,
                mental: r.mental,
            },
            overall_score: r.overall_score,
            strengths: r.strengths,
            improvements: r.improvements,
            comments: r.comments,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
impl PlayerRepository for PostgresPlayerRepository {
    async fn upsert_skill(&self, skill: &PlayerSkill) -> RepositoryResult<PlayerSkill> {
        let row = sqlx::query_as::<_, SkillRow>(
            r#"
            INSERT INTO player_skills (
                id, player_id, skill_name, rating, notes, assessed_by, assessed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (player_id, lower(skill_name)) DO UPDATE SET
                skill_name = EXCLUDED.skill_name,
                rating = EXCLUDED.rating,
                notes = EXCLUDED.notes,
                assessed_by = EXCLUDED.assessed_by,
                assessed_at = EXCLUDED.assessed_at
            RETURNING id, player_id, skill_name, rating, notes, assessed_by, assessed_at
            "#,
        )
        .bind(skill.id)
        .bind(skill.player_id)
        .bind(&skill.skill_name)
        .bind(skill.rating)
        .bind(&skill.notes)
        .bind(skill.assessed_by)
        .bind(skill.assessed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("upsert skill"))?;

        Ok(row.into())
    }

    async fn list_skills(&self, player_id: Uuid) -> RepositoryResult<Vec<PlayerSkill>> {
        let rows = sqlx::query_as::<_, SkillRow>(
            r#"
            SELECT id, player_id, skill_name, rating, notes, assessed_by, assessed_at
            FROM player_skills
            WHERE player_id = $1
            ORDER BY skill_name
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list skills"))?;

        Ok(rows.into_iter().map(PlayerSkill::from).collect())
    }

    async fn add_evaluation(&self, evaluation: &PlayerEvaluation) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            INSERT INTO player_evaluations (
                id, player_id, team_id, evaluator_id, match_id, evaluation_date,
                technical, tactical, physical, mental, overall_score,
                strengths, improvements, comments, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(evaluation.id)
        .bind(evaluation.player_id)
        .bind(evaluation.team_id)
        .bind(evaluation.evaluator_id)
        .bind(evaluation.match_id)
        .bind(evaluation.evaluation_date)
        .bind(evaluation.scores.technical)
        .bind(evaluation.scores.tactical)
        .bind(evaluation.scores.physical)
        .bind(evaluation.scores.mental)
        .bind(evaluation.overall_score)
        .bind(&evaluation.strengths)
        .bind(&evaluation.improvements)
        .bind(&evaluation.comments)
        .bind(evaluation.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("insert evaluation"))?;

        Ok(())
    }

    async fn list_evaluations(&self, player_id: Uuid) -> RepositoryResult<Vec<PlayerEvaluation>> {
        let rows = sqlx::query_as::<_, EvaluationRow>(
            r#"
            SELECT id, player_id, team_id, evaluator_id, match_id, evaluation_date,
                   technical, tactical, physical, mental, overall_score,
                   strengths, improvements, comments, created_at
            FROM player_evaluations
            WHERE player_id = $1
            ORDER BY evaluation_date DESC, created_at DESC
            "#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list evaluations"))?;

        Ok(rows.into_iter().map(PlayerEvaluation::from).collect())
    }
}
