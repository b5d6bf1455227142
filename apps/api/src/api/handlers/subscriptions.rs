use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::AuthUser;
use crate::domain::subscription::{BillingCycle, Plan, Subscription};
use crate::services::SubscriptionService;
use crate::state::AppState;

fn default_cycle() -> BillingCycle {
    BillingCycle::Monthly
}

#[derive(Debug, Deserialize)]
pub struct ChangePlanRequest {
    pub plan: Plan,
    #[serde(default = "default_cycle")]
    pub billing_cycle: BillingCycle,
}

/// GET /api/organizations/:id/subscription
pub async fn current_subscription(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Subscription>, ApiError> {
    Ok(Json(SubscriptionService::new(&state).current(&actor, id).await?))
}

/// POST /api/organizations/:id/subscription
pub async fn change_plan(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<ChangePlanRequest>,
) -> Result<Json<Subscription>, ApiError> {
    let subscription = SubscriptionService::new(&state)
        .change_plan(&actor, id, req.plan, req.billing_cycle)
        .await?;
    Ok(Json(subscription))
}

/// POST /api/organizations/:id/subscription/renew
pub async fn renew_subscription(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Subscription>, ApiError> {
    Ok(Json(SubscriptionService::new(&state).renew(&actor, id).await?))
}

/// POST /api/organizations/:id/subscription/cancel
pub async fn cancel_subscription(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Subscription>, ApiError> {
    Ok(Json(SubscriptionService::new(&state).cancel(&actor, id).await?))
}
