use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::AuthUser;
use crate::domain::schedule::{Recurrence, ScheduleType, TeamSchedule};
use crate::services::schedules::ScheduleRequest;
use crate::services::ScheduleService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub title: String,
    pub schedule_type: ScheduleType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub recurrence: Option<Recurrence>,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct MoveScheduleRequest {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

/// POST /api/teams/:id/schedules
pub async fn create_schedule(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(team_id): Path<Uuid>,
    Json(req): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Vec<TeamSchedule>>), ApiError> {
    let entries = ScheduleService::new(&state)
        .create(
            &actor,
            team_id,
            ScheduleRequest {
                title: req.title,
                schedule_type: req.schedule_type,
                starts_at: req.starts_at,
                ends_at: req.ends_at,
                location: req.location,
                notes: req.notes,
                recurrence: req.recurrence,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(entries)))
}

/// GET /api/teams/:id/schedules?from=&to=
pub async fn list_schedules(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(team_id): Path<Uuid>,
    Query(window): Query<ScheduleWindow>,
) -> Result<Json<Vec<TeamSchedule>>, ApiError> {
    if let (Some(from), Some(to)) = (window.from, window.to) {
        if to < from {
            return Err(ApiError::bad_request("'to' must not be before 'from'"));
        }
    }
    let entries = ScheduleService::new(&state)
        .list(&actor, team_id, window.from, window.to)
        .await?;
    Ok(Json(entries))
}

/// PUT /api/schedules/:id
pub async fn move_schedule(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<MoveScheduleRequest>,
) -> Result<Json<TeamSchedule>, ApiError> {
    let entry = ScheduleService::new(&state)
        .reschedule(&actor, id, req.starts_at, req.ends_at)
        .await?;
    Ok(Json(entry))
}

/// POST /api/schedules/:id/cancel
pub async fn cancel_schedule(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamSchedule>, ApiError> {
    Ok(Json(ScheduleService::new(&state).cancel(&actor, id).await?))
}
