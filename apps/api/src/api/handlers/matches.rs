use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::AuthUser;
use crate::domain::game_match::{
    GameMatch, LineupEntry, LineupSlot, MatchEvent, MatchEventType, MatchSide, MatchStatus,
};
use crate::services::matches::{EventReport, MatchDetails};
use crate::services::MatchService;
use crate::state::AppState;

fn default_home() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ScheduleMatchRequest {
    pub opponent_name: String,
    pub venue: Option<String>,
    #[serde(default = "default_home")]
    pub is_home: bool,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct MatchListQuery {
    pub status: Option<MatchStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteMatchRequest {
    pub team_score: Option<i32>,
    pub opponent_score: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CancelMatchRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct RescheduleMatchRequest {
    pub scheduled_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct RecordEventRequest {
    pub event_type: MatchEventType,
    pub side: MatchSide,
    pub player_id: Option<Uuid>,
    pub minute: i32,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LineupRequest {
    pub players: Vec<LineupSlot>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub team_id: Uuid,
    pub opponent_name: String,
    pub venue: Option<String>,
    pub is_home: bool,
    pub scheduled_at: DateTime<Utc>,
    pub status: MatchStatus,
    pub team_score: i32,
    pub opponent_score: i32,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_reason: Option<String>,
    pub notes: Option<String>,
    pub metadata: Value,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&GameMatch> for MatchResponse {
    fn from(game: &GameMatch) -> Self {
        Self {
            id: game.id(),
            organization_id: game.organization_id(),
            team_id: game.team_id(),
            opponent_name: game.opponent_name().to_string(),
            venue: game.venue().map(str::to_string),
            is_home: game.is_home(),
            scheduled_at: game.scheduled_at(),
            status: game.status(),
            team_score: game.team_score(),
            opponent_score: game.opponent_score(),
            started_at: game.started_at(),
            completed_at: game.completed_at(),
            cancelled_reason: game.cancelled_reason().map(str::to_string),
            notes: game.notes().map(str::to_string),
            metadata: game.metadata().clone(),
            created_by: game.created_by(),
            created_at: game.created_at(),
            updated_at: game.updated_at(),
        }
    }
}

/// An event together with the score it produced
#[derive(Debug, Serialize)]
pub struct RecordedEventResponse {
    pub event: MatchEvent,
    pub team_score: i32,
    pub opponent_score: i32,
}

/// POST /api/teams/:id/matches
pub async fn schedule_match(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(team_id): Path<Uuid>,
    Json(req): Json<ScheduleMatchRequest>,
) -> Result<(StatusCode, Json<MatchResponse>), ApiError> {
    let game = MatchService::new(&state)
        .schedule(
            &actor,
            team_id,
            MatchDetails {
                opponent_name: req.opponent_name,
                venue: req.venue,
                is_home: req.is_home,
                scheduled_at: req.scheduled_at,
                notes: req.notes,
                metadata: req.metadata,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(MatchResponse::from(&game))))
}

/// GET /api/teams/:id/matches?status=
pub async fn list_matches(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(team_id): Path<Uuid>,
    Query(query): Query<MatchListQuery>,
) -> Result<Json<Vec<MatchResponse>>, ApiError> {
    let games = MatchService::new(&state)
        .list(&actor, team_id, query.status)
        .await?;
    Ok(Json(games.iter().map(MatchResponse::from).collect()))
}

/// GET /api/matches/:id
pub async fn get_match(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchResponse>, ApiError> {
    let game = MatchService::new(&state).get(&actor, id).await?;
    Ok(Json(MatchResponse::from(&game)))
}

/// DELETE /api/matches/:id
pub async fn delete_match(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    MatchService::new(&state).delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/matches/:id/start
pub async fn start_match(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MatchResponse>, ApiError> {
    let game = MatchService::new(&state).start(&actor, id).await?;
    Ok(Json(MatchResponse::from(&game)))
}

/// POST /api/matches/:id/complete
///
/// Both scores or neither; without them the tallied score stands.
pub async fn complete_match(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CompleteMatchRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    let final_score = match (req.team_score, req.opponent_score) {
        (Some(team), Some(opponent)) => Some((team, opponent)),
        (None, None) => None,
        _ => {
            return Err(ApiError::unprocessable(
                "Provide both team_score and opponent_score, or neither",
            ))
        }
    };
    let game = MatchService::new(&state)
        .complete(&actor, id, final_score)
        .await?;
    Ok(Json(MatchResponse::from(&game)))
}

/// POST /api/matches/:id/cancel
pub async fn cancel_match(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CancelMatchRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    let game = MatchService::new(&state).cancel(&actor, id, &req.reason).await?;
    Ok(Json(MatchResponse::from(&game)))
}

/// POST /api/matches/:id/reschedule
pub async fn reschedule_match(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RescheduleMatchRequest>,
) -> Result<Json<MatchResponse>, ApiError> {
    let game = MatchService::new(&state)
        .reschedule(&actor, id, req.scheduled_at)
        .await?;
    Ok(Json(MatchResponse::from(&game)))
}

/// POST /api/matches/:id/events
pub async fn record_event(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordEventRequest>,
) -> Result<(StatusCode, Json<RecordedEventResponse>), ApiError> {
    let (event, game) = MatchService::new(&state)
        .record_event(
            &actor,
            id,
            EventReport {
                event_type: req.event_type,
                side: req.side,
                player_id: req.player_id,
                minute: req.minute,
                description: req.description,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(RecordedEventResponse {
            event,
            team_score: game.team_score(),
            opponent_score: game.opponent_score(),
        }),
    ))
}

/// GET /api/matches/:id/events
pub async fn list_events(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MatchEvent>>, ApiError> {
    Ok(Json(MatchService::new(&state).events(&actor, id).await?))
}

/// PUT /api/matches/:id/lineup
pub async fn set_lineup(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<LineupRequest>,
) -> Result<Json<Vec<LineupEntry>>, ApiError> {
    let lineup = MatchService::new(&state)
        .set_lineup(&actor, id, req.players)
        .await?;
    Ok(Json(lineup))
}

/// GET /api/matches/:id/lineup
pub async fn get_lineup(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<LineupEntry>>, ApiError> {
    Ok(Json(MatchService::new(&state).lineup(&actor, id).await?))
}
