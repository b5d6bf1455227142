use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::handlers::nullable;
use crate::api::middleware::auth::AuthUser;
use crate::domain::team::{TeamPlayer, TeamTier, TierChanges};
use crate::services::tiers::NewTier;
use crate::services::TierService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTierRequest {
    pub name: String,
    pub level: i32,
    pub description: Option<String>,
    pub min_skill_rating: Option<Decimal>,
    pub max_players: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTierRequest {
    pub name: Option<String>,
    pub level: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub min_skill_rating: Option<Decimal>,
    pub max_players: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AssignTierRequest {
    pub tier_id: Uuid,
}

/// POST /api/teams/:id/tiers
pub async fn create_tier(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(team_id): Path<Uuid>,
    Json(req): Json<CreateTierRequest>,
) -> Result<(StatusCode, Json<TeamTier>), ApiError> {
    let tier = TierService::new(&state)
        .create(
            &actor,
            team_id,
            NewTier {
                name: req.name,
                level: req.level,
                description: req.description,
                min_skill_rating: req.min_skill_rating,
                max_players: req.max_players,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(tier)))
}

/// GET /api/teams/:id/tiers
pub async fn list_tiers(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<TeamTier>>, ApiError> {
    Ok(Json(TierService::new(&state).list(&actor, team_id).await?))
}

/// PUT /api/teams/:id/tiers/:tier_id
pub async fn update_tier(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((team_id, tier_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateTierRequest>,
) -> Result<Json<TeamTier>, ApiError> {
    let changes = TierChanges {
        name: req.name,
        level: req.level,
        description: req.description,
        min_skill_rating: req.min_skill_rating,
        max_players: req.max_players,
    };
    let tier = TierService::new(&state)
        .update(&actor, team_id, tier_id, changes)
        .await?;
    Ok(Json(tier))
}

/// DELETE /api/teams/:id/tiers/:tier_id
pub async fn delete_tier(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((team_id, tier_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    TierService::new(&state).delete(&actor, team_id, tier_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/teams/:id/players/:player_id/tier
pub async fn assign_tier(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((team_id, player_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<AssignTierRequest>,
) -> Result<Json<TeamPlayer>, ApiError> {
    let entry = TierService::new(&state)
        .assign(&actor, team_id, player_id, req.tier_id)
        .await?;
    Ok(Json(entry))
}

/// POST /api/teams/:id/players/:player_id/promote
pub async fn promote_player(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((team_id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TeamPlayer>, ApiError> {
    Ok(Json(TierService::new(&state).promote(&actor, team_id, player_id).await?))
}

/// POST /api/teams/:id/players/:player_id/demote
pub async fn demote_player(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((team_id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<TeamPlayer>, ApiError> {
    Ok(Json(TierService::new(&state).demote(&actor, team_id, player_id).await?))
}
