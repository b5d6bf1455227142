use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::handlers::nullable;
use crate::api::middleware::auth::AuthUser;
use crate::domain::team::{NewTeam, PlayerStatus, RosterChanges, Team, TeamChanges, TeamPlayer};
use crate::services::teams::RosterAddition;
use crate::services::TeamService;
use crate::state::AppState;

/// Request body for creating a team
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub sport: String,
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub season: Option<String>,
    pub coach_id: Option<Uuid>,
    pub max_players: i32,
    pub metadata: Option<Value>,
}

/// Request body for editing a team; absent fields stay unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub sport: Option<String>,
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub season: Option<String>,
    pub coach_id: Option<Uuid>,
    pub max_players: Option<i32>,
    pub is_active: Option<bool>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub sport: String,
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub season: Option<String>,
    pub coach_id: Option<Uuid>,
    pub max_players: i32,
    pub is_active: bool,
    pub metadata: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id(),
            organization_id: team.organization_id(),
            name: team.name().to_string(),
            sport: team.sport().to_string(),
            age_group: team.age_group().map(str::to_string),
            gender: team.gender().map(str::to_string),
            season: team.season().map(str::to_string),
            coach_id: team.coach_id(),
            max_players: team.max_players(),
            is_active: team.is_active(),
            metadata: team.metadata().clone(),
            created_at: team.created_at(),
            updated_at: team.updated_at(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddPlayerRequest {
    pub player_id: Uuid,
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRosterRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub jersey_number: Option<Option<i32>>,
    pub position: Option<String>,
    pub status: Option<PlayerStatus>,
}

/// Create a new team
///
/// POST /api/organizations/:id/teams
pub async fn create_team(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(organization_id): Path<Uuid>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let input = NewTeam {
        organization_id,
        name: req.name,
        sport: req.sport,
        age_group: req.age_group,
        gender: req.gender,
        season: req.season,
        coach_id: req.coach_id,
        max_players: req.max_players,
        metadata: req.metadata,
    };
    let team = TeamService::new(&state)
        .create(&actor, organization_id, input)
        .await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(&team))))
}

/// Get all teams of an organization
///
/// GET /api/organizations/:id/teams
pub async fn list_teams(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(organization_id): Path<Uuid>,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = TeamService::new(&state).list(&actor, organization_id).await?;
    Ok(Json(teams.iter().map(TeamResponse::from).collect()))
}

/// Get a team by ID
///
/// GET /api/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = TeamService::new(&state).get(&actor, id).await?;
    Ok(Json(TeamResponse::from(&team)))
}

/// PUT /api/teams/:id
pub async fn update_team(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    let changes = TeamChanges {
        name: req.name,
        sport: req.sport,
        age_group: req.age_group,
        gender: req.gender,
        season: req.season,
        coach_id: req.coach_id,
        max_players: req.max_players,
        is_active: req.is_active,
        metadata: req.metadata,
    };
    let team = TeamService::new(&state).update(&actor, id, changes).await?;
    Ok(Json(TeamResponse::from(&team)))
}

/// Delete a team
///
/// DELETE /api/teams/:id
pub async fn delete_team(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    TeamService::new(&state).delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/teams/:id/players
pub async fn add_player(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(team_id): Path<Uuid>,
    Json(req): Json<AddPlayerRequest>,
) -> Result<(StatusCode, Json<TeamPlayer>), ApiError> {
    let entry = TeamService::new(&state)
        .add_player(
            &actor,
            team_id,
            RosterAddition {
                player_id: req.player_id,
                jersey_number: req.jersey_number,
                position: req.position,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/teams/:id/players
pub async fn list_roster(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(team_id): Path<Uuid>,
) -> Result<Json<Vec<TeamPlayer>>, ApiError> {
    Ok(Json(TeamService::new(&state).roster(&actor, team_id).await?))
}

/// PATCH /api/teams/:id/players/:player_id
pub async fn update_roster_entry(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((team_id, player_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateRosterRequest>,
) -> Result<Json<TeamPlayer>, ApiError> {
    let changes = RosterChanges {
        jersey_number: req.jersey_number,
        position: req.position,
        status: req.status,
    };
    let entry = TeamService::new(&state)
        .update_player(&actor, team_id, player_id, changes)
        .await?;
    Ok(Json(entry))
}

/// DELETE /api/teams/:id/players/:player_id
pub async fn remove_player(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path((team_id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    TeamService::new(&state)
        .remove_player(&actor, team_id, player_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
