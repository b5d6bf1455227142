use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::middleware::auth::AuthUser;
use crate::domain::organization::Organization;
use crate::domain::subscription::Subscription;
use crate::domain::tenant::Tenant;
use crate::domain::user::{Role, User};
use crate::services::auth::Onboarding;
use crate::services::AuthService;
use crate::state::AppState;

/// Public view of a user; never carries the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            organization_id: user.organization_id,
            email: user.email.to_string(),
            full_name: user.full_name.clone(),
            role: user.role,
            date_of_birth: user.date_of_birth,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Request body for onboarding a new academy
#[derive(Debug, Deserialize)]
pub struct OnboardingRequest {
    pub tenant_name: String,
    pub tenant_slug: Option<String>,
    pub organization_name: String,
    pub organization_slug: Option<String>,
    pub contact_email: Option<String>,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
}

#[derive(Debug, Serialize)]
pub struct OnboardingResponse {
    pub token: String,
    pub tenant: Tenant,
    pub organization: Organization,
    pub subscription: Subscription,
    pub user: UserResponse,
}

/// Request body for player self-registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub organization_id: Uuid,
}

/// Request body for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response carrying a fresh token
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Onboard a tenant with its first organization and super admin
///
/// POST /api/onboarding
pub async fn onboard(
    State(state): State<AppState>,
    Json(req): Json<OnboardingRequest>,
) -> Result<(StatusCode, Json<OnboardingResponse>), ApiError> {
    let onboarded = AuthService::new(&state)
        .onboard(Onboarding {
            tenant_name: req.tenant_name,
            tenant_slug: req.tenant_slug,
            organization_name: req.organization_name,
            organization_slug: req.organization_slug,
            contact_email: req.contact_email,
            admin_email: req.admin_email,
            admin_password: req.admin_password,
            admin_name: req.admin_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OnboardingResponse {
            token: onboarded.token,
            user: UserResponse::from(&onboarded.user),
            tenant: onboarded.tenant,
            organization: onboarded.organization,
            subscription: onboarded.subscription,
        }),
    ))
}

/// Register a player account
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let session = AuthService::new(&state)
        .register(req.organization_id, &req.email, &req.password, &req.full_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            user: UserResponse::from(&session.user),
            token: session.token,
        }),
    ))
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = AuthService::new(&state).login(&req.email, &req.password).await?;

    Ok(Json(SessionResponse {
        user: UserResponse::from(&session.user),
        token: session.token,
    }))
}

/// Current user
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = AuthService::new(&state).me(&actor).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
