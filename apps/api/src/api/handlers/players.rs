use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::AuthUser;
use crate::domain::player::{EvaluationScores, PlayerEvaluation, PlayerSkill};
use crate::services::players::{EvaluationRequest, SkillRating};
use crate::services::PlayerService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SkillRatingRequest {
    pub skill_name: String,
    pub rating: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RateSkillsRequest {
    pub skills: Vec<SkillRatingRequest>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEvaluationRequest {
    pub player_id: Uuid,
    pub match_id: Option<Uuid>,
    pub evaluation_date: Option<NaiveDate>,
    #[serde(flatten)]
    pub scores: EvaluationScores,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub comments: Option<String>,
}

/// PUT /api/players/:id/skills
pub async fn rate_skills(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(player_id): Path<Uuid>,
    Json(req): Json<RateSkillsRequest>,
) -> Result<Json<Vec<PlayerSkill>>, ApiError> {
    let ratings = req
        .skills
        .into_iter()
        .map(|s| SkillRating {
            skill_name: s.skill_name,
            rating: s.rating,
            notes: s.notes,
        })
        .collect();
    let skills = PlayerService::new(&state)
        .rate_skills(&actor, player_id, ratings)
        .await?;
    Ok(Json(skills))
}

/// GET /api/players/:id/skills
pub async fn list_skills(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(player_id): Path<Uuid>,
) -> Result<Json<Vec<PlayerSkill>>, ApiError> {
    Ok(Json(PlayerService::new(&state).skills(&actor, player_id).await?))
}

/// POST /api/teams/:id/evaluations
pub async fn create_evaluation(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(team_id): Path<Uuid>,
    Json(req): Json<CreateEvaluationRequest>,
) -> Result<(StatusCode, Json<PlayerEvaluation>), ApiError> {
    let evaluation = PlayerService::new(&state)
        .evaluate(
            &actor,
            team_id,
            EvaluationRequest {
                player_id: req.player_id,
                match_id: req.match_id,
                evaluation_date: req.evaluation_date,
                scores: req.scores,
                strengths: req.strengths,
                improvements: req.improvements,
                comments: req.comments,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(evaluation)))
}

/// GET /api/players/:id/evaluations
pub async fn list_evaluations(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(player_id): Path<Uuid>,
) -> Result<Json<Vec<PlayerEvaluation>>, ApiError> {
    Ok(Json(PlayerService::new(&state).evaluations(&actor, player_id).await?))
}
