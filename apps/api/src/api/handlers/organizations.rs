use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::auth::UserResponse;
use crate::api::errors::ApiError;
use crate::api::middleware::auth::AuthUser;
use crate::domain::organization::{Organization, OrganizationChanges};
use crate::domain::subscription::Subscription;
use crate::domain::user::Role;
use crate::services::organizations::{NewMember, NewOrganization};
use crate::services::OrganizationService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub slug: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateOrganizationResponse {
    pub organization: Organization,
    pub subscription: Subscription,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub settings: Option<Value>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub date_of_birth: Option<NaiveDate>,
}

/// POST /api/organizations
pub async fn create_organization(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(req): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<CreateOrganizationResponse>), ApiError> {
    let (organization, subscription) = OrganizationService::new(&state)
        .create(
            &actor,
            NewOrganization {
                name: req.name,
                slug: req.slug,
                contact_email: req.contact_email,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrganizationResponse {
            organization,
            subscription,
        }),
    ))
}

/// GET /api/organizations
pub async fn list_organizations(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
) -> Result<Json<Vec<Organization>>, ApiError> {
    Ok(Json(OrganizationService::new(&state).list(&actor).await?))
}

/// GET /api/organizations/:id
pub async fn get_organization(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Organization>, ApiError> {
    Ok(Json(OrganizationService::new(&state).get(&actor, id).await?))
}

/// PUT /api/organizations/:id
pub async fn update_organization(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOrganizationRequest>,
) -> Result<Json<Organization>, ApiError> {
    let changes = OrganizationChanges {
        name: req.name,
        contact_email: req.contact_email,
        phone: req.phone,
        address: req.address,
        settings: req.settings,
        is_active: req.is_active,
    };
    let organization = OrganizationService::new(&state)
        .update(&actor, id, changes)
        .await?;
    Ok(Json(organization))
}

/// DELETE /api/organizations/:id
pub async fn delete_organization(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    OrganizationService::new(&state).delete(&actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/organizations/:id/users
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = OrganizationService::new(&state)
        .create_member(
            &actor,
            id,
            NewMember {
                email: req.email,
                password: req.password,
                full_name: req.full_name,
                role: req.role,
                date_of_birth: req.date_of_birth,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/organizations/:id/users
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = OrganizationService::new(&state).list_members(&actor, id).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}
