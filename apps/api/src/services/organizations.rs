use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use super::auth::{new_password_hash, parse_email};
use super::{access, Actor, ServiceError, ServiceResult, SubscriptionService};
use crate::domain::errors::DomainError;
use crate::domain::organization::{Organization, OrganizationChanges};
use crate::domain::subscription::Subscription;
use crate::domain::user::{Permission, Role, User};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct NewOrganization {
    pub name: String,
    pub slug: Option<String>,
    pub contact_email: Option<String>,
}

/// A staff member, player or parent created by an admin
#[derive(Debug, Clone)]
pub struct NewMember {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub date_of_birth: Option<NaiveDate>,
}

pub struct OrganizationService<'a> {
    state: &'a AppState,
}

impl<'a> OrganizationService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Adds an organization to the caller's tenant and opens its trial
    pub async fn create(
        &self,
        actor: &Actor,
        input: NewOrganization,
    ) -> ServiceResult<(Organization, Subscription)> {
        actor.require(Permission::ManageTenant)?;
        let organization = Organization::new(
            actor.tenant_id,
            &input.name,
            input.slug.as_deref(),
            input.contact_email.as_deref(),
        )?;
        self.state.repos.organizations.save(&organization).await?;
        let trial = SubscriptionService::new(self.state)
            .start_trial(organization.id)
            .await?;

        info!(organization_id = %organization.id, tenant_id = %actor.tenant_id, "Organization created");
        Ok((organization, trial))
    }

    /// Organizations visible to the caller
    pub async fn list(&self, actor: &Actor) -> ServiceResult<Vec<Organization>> {
        let all = self
            .state
            .repos
            .organizations
            .list_by_tenant(actor.tenant_id)
            .await?;
        if actor.role.is_tenant_wide() {
            return Ok(all);
        }
        Ok(all
            .into_iter()
            .filter(|o| actor.organization_id == Some(o.id))
            .collect())
    }

    pub async fn get(&self, actor: &Actor, id: Uuid) -> ServiceResult<Organization> {
        access::organization(self.state, actor, id).await
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        changes: OrganizationChanges,
    ) -> ServiceResult<Organization> {
        actor.require(Permission::ManageOrganization)?;
        let mut organization = access::organization(self.state, actor, id).await?;
        organization.apply(changes)?;
        self.state.repos.organizations.save(&organization).await?;
        Ok(organization)
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        actor.require(Permission::ManageTenant)?;
        let mut organization = access::organization(self.state, actor, id).await?;
        organization.soft_delete();
        self.state.repos.organizations.save(&organization).await?;
        info!(organization_id = %id, "Organization deleted");
        Ok(())
    }

    pub async fn create_member(
        &self,
        actor: &Actor,
        organization_id: Uuid,
        input: NewMember,
    ) -> ServiceResult<User> {
        actor.require(Permission::ManageUsers)?;
        let organization = access::organization(self.state, actor, organization_id).await?;
        if input.role == Role::SuperAdmin && !actor.role.is_tenant_wide() {
            return Err(ServiceError::forbidden("Only a super admin can create super admins"));
        }

        let email = parse_email(&input.email)?;
        let password_hash = new_password_hash(&input.password)?;
        if self.state.repos.users.find_by_email(&email).await?.is_some() {
            return Err(DomainError::conflict("Email already registered").into());
        }

        let mut user = User::new(
            organization.tenant_id,
            Some(organization.id),
            email,
            password_hash,
            &input.full_name,
            input.role,
        )?;
        user.date_of_birth = input.date_of_birth;
        self.state.repos.users.create(&user).await?;

        info!(user_id = %user.id, organization_id = %organization.id, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn list_members(&self, actor: &Actor, organization_id: Uuid) -> ServiceResult<Vec<User>> {
        actor.require(Permission::ManageUsers)?;
        let organization = access::organization(self.state, actor, organization_id).await?;
        Ok(self
            .state
            .repos
            .users
            .list_by_organization(organization.id)
            .await?)
    }
}
