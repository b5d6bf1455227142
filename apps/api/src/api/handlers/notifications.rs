use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::AuthUser;
use crate::domain::notification::{NotificationChannel, NotificationLog};
use crate::services::{Notice, NotificationService};
use crate::state::AppState;

fn default_channel() -> NotificationChannel {
    NotificationChannel::InApp
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub subject: String,
    pub body: String,
    #[serde(default = "default_channel")]
    pub channel: NotificationChannel,
}

/// POST /api/teams/:id/notifications
pub async fn broadcast(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(team_id): Path<Uuid>,
    Json(req): Json<BroadcastRequest>,
) -> Result<(StatusCode, Json<Vec<NotificationLog>>), ApiError> {
    let notice = Notice {
        channel: req.channel,
        ..Notice::in_app("team.broadcast", req.subject, req.body)
    };
    let logs = NotificationService::new(&state)
        .broadcast(&actor, team_id, notice)
        .await?;
    Ok((StatusCode::CREATED, Json(logs)))
}

/// GET /api/notifications
pub async fn inbox(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Vec<NotificationLog>>, ApiError> {
    Ok(Json(NotificationService::new(&state).inbox(&actor).await?))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationLog>, ApiError> {
    Ok(Json(NotificationService::new(&state).mark_read(&actor, id).await?))
}

/// GET /api/organizations/:id/notifications
pub async fn organization_log(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(organization_id): Path<Uuid>,
) -> Result<Json<Vec<NotificationLog>>, ApiError> {
    let logs = NotificationService::new(&state)
        .organization_log(&actor, organization_id)
        .await?;
    Ok(Json(logs))
}
