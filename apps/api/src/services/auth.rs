use tracing::info;
use uuid::Uuid;

use super::{Actor, ServiceError, ServiceResult, SubscriptionService};
use crate::auth::jwt::create_token;
use crate::auth::password::{hash_password, validate_password, verify_password};
use crate::domain::errors::DomainError;
use crate::domain::organization::Organization;
use crate::domain::subscription::Subscription;
use crate::domain::tenant::Tenant;
use crate::domain::user::{Email, Role, User};
use crate::state::AppState;

/// Signup of a new academy: tenant, first organization and its super admin
#[derive(Debug, Clone)]
pub struct Onboarding {
    pub tenant_name: String,
    pub tenant_slug: Option<String>,
    pub organization_name: String,
    pub organization_slug: Option<String>,
    pub contact_email: Option<String>,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
}

#[derive(Debug, Clone)]
pub struct Onboarded {
    pub tenant: Tenant,
    pub organization: Organization,
    pub subscription: Subscription,
    pub user: User,
    pub token: String,
}

/// A signed-in user and their bearer token
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub struct AuthService<'a> {
    state: &'a AppState,
}

pub(crate) fn parse_email(email: &str) -> ServiceResult<Email> {
    Email::new(email).map_err(|e| DomainError::Validation(e).into())
}

pub(crate) fn new_password_hash(password: &str) -> ServiceResult<String> {
    validate_password(password).map_err(DomainError::Validation)?;
    hash_password(password).map_err(ServiceError::Internal)
}

impl<'a> AuthService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn issue_token(&self, user: &User) -> ServiceResult<String> {
        let config = &self.state.config;
        create_token(user, &config.jwt_secret, config.jwt_expiry_hours).map_err(ServiceError::Internal)
    }

    async fn ensure_email_free(&self, email: &Email) -> ServiceResult<()> {
        if self.state.repos.users.find_by_email(email).await?.is_some() {
            return Err(DomainError::conflict("Email already registered").into());
        }
        Ok(())
    }

    pub async fn onboard(&self, input: Onboarding) -> ServiceResult<Onboarded> {
        let email = parse_email(&input.admin_email)?;
        let password_hash = new_password_hash(&input.admin_password)?;
        self.ensure_email_free(&email).await?;

        let tenant = Tenant::new(&input.tenant_name, input.tenant_slug.as_deref())?;
        let organization = Organization::new(
            tenant.id,
            &input.organization_name,
            input.organization_slug.as_deref(),
            input.contact_email.as_deref(),
        )?;
        let user = User::new(
            tenant.id,
            Some(organization.id),
            email,
            password_hash,
            &input.admin_name,
            Role::SuperAdmin,
        )?;

        let repos = &self.state.repos;
        repos.tenants.create(&tenant).await?;
        repos.organizations.save(&organization).await?;
        repos.users.create(&user).await?;
        let subscription = SubscriptionService::new(self.state)
            .start_trial(organization.id)
            .await?;

        let token = self.issue_token(&user)?;
        info!(
            tenant_id = %tenant.id,
            organization_id = %organization.id,
            user_id = %user.id,
            "Tenant onboarded"
        );

        Ok(Onboarded {
            tenant,
            organization,
            subscription,
            user,
            token,
        })
    }

    /// Self-registration of a player into an existing organization
    pub async fn register(
        &self,
        organization_id: Uuid,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> ServiceResult<Session> {
        let email = parse_email(email)?;
        let password_hash = new_password_hash(password)?;
        let organization = self
            .state
            .repos
            .organizations
            .find_by_id(organization_id)
            .await?
            .filter(|o| o.is_active)
            .ok_or_else(|| ServiceError::not_found("Organization"))?;
        self.ensure_email_free(&email).await?;

        let user = User::new(
            organization.tenant_id,
            Some(organization.id),
            email,
            password_hash,
            full_name,
            Role::Player,
        )?;
        self.state.repos.users.create(&user).await?;
        info!(user_id = %user.id, organization_id = %organization.id, "Player registered");

        let token = self.issue_token(&user)?;
        Ok(Session { user, token })
    }

    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<Session> {
        let invalid = || ServiceError::Unauthorized("Invalid credentials".to_string());

        let email = Email::new(email).map_err(|_| invalid())?;
        let mut user = self
            .state
            .repos
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        // Disabled accounts get the same answer as a wrong password
        if !verify_password(password, &user.password_hash).map_err(ServiceError::Internal)? || !user.is_active {
            return Err(invalid());
        }

        self.state.repos.users.update_last_login(user.id).await?;
        user.last_login_at = Some(chrono::Utc::now());

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "User logged in");
        Ok(Session { user, token })
    }

    pub async fn me(&self, actor: &Actor) -> ServiceResult<User> {
        self.state
            .repos
            .users
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Account no longer exists".to_string()))
    }
}
