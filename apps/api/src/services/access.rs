use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::auth::jwt::Claims;
use crate::domain::game_match::GameMatch;
use crate::domain::organization::Organization;
use crate::domain::team::Team;
use crate::domain::user::{Permission, Role, User};
use crate::state::AppState;

/// The authenticated caller of a use case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub role: Role,
}

impl From<Claims> for Actor {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            tenant_id: claims.tenant_id,
            organization_id: claims.organization_id,
            role: claims.role,
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            tenant_id: user.tenant_id,
            organization_id: user.organization_id,
            role: user.role,
        }
    }
}

impl Actor {
    pub fn require(&self, permission: Permission) -> ServiceResult<()> {
        if self.role.has_permission(permission) {
            Ok(())
        } else {
            Err(ServiceError::forbidden(format!(
                "Role {} is not allowed to {:?}",
                self.role, permission
            )))
        }
    }

    /// Non-super-admins are confined to their home organization
    pub fn ensure_member_of(&self, organization_id: Uuid) -> ServiceResult<()> {
        if self.role.is_tenant_wide() || self.organization_id == Some(organization_id) {
            Ok(())
        } else {
            Err(ServiceError::forbidden(
                "You do not have access to this organization",
            ))
        }
    }
}

/// Loads a live organization of the caller's tenant
///
/// Organizations of other tenants are reported as missing.
pub(crate) async fn organization(
    state: &AppState,
    actor: &Actor,
    id: Uuid,
) -> ServiceResult<Organization> {
    let org = state
        .repos
        .organizations
        .find_by_id(id)
        .await?
        .filter(|o| o.tenant_id == actor.tenant_id)
        .ok_or_else(|| ServiceError::not_found("Organization"))?;
    actor.ensure_member_of(org.id)?;
    Ok(org)
}

async fn owning_organization(
    state: &AppState,
    actor: &Actor,
    organization_id: Uuid,
    what: &str,
) -> ServiceResult<()> {
    state
        .repos
        .organizations
        .find_by_id(organization_id)
        .await?
        .filter(|o| o.tenant_id == actor.tenant_id)
        .ok_or_else(|| ServiceError::not_found(what))?;
    actor.ensure_member_of(organization_id)
}

pub(crate) async fn team(state: &AppState, actor: &Actor, id: Uuid) -> ServiceResult<Team> {
    let team = state
        .repos
        .teams
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Team"))?;
    owning_organization(state, actor, team.organization_id(), "Team").await?;
    Ok(team)
}

pub(crate) async fn game(state: &AppState, actor: &Actor, id: Uuid) -> ServiceResult<GameMatch> {
    let game = state
        .repos
        .matches
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Match"))?;
    owning_organization(state, actor, game.organization_id(), "Match").await?;
    Ok(game)
}

/// Loads a user with role `player` visible to the caller
pub(crate) async fn player(state: &AppState, actor: &Actor, id: Uuid) -> ServiceResult<User> {
    let user = state
        .repos
        .users
        .find_by_id(id)
        .await?
        .filter(|u| u.tenant_id == actor.tenant_id && u.role == Role::Player)
        .ok_or_else(|| ServiceError::not_found("Player"))?;
    match user.organization_id {
        Some(org) => actor.ensure_member_of(org)?,
        None if actor.role.is_tenant_wide() => {}
        None => return Err(ServiceError::forbidden("You do not have access to this player")),
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role, organization_id: Option<Uuid>) -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            organization_id,
            role,
        }
    }

    #[test]
    fn permissions_follow_role() {
        let coach = actor(Role::Coach, Some(Uuid::new_v4()));
        assert!(coach.require(Permission::ManageMatches).is_ok());
        assert!(matches!(
            coach.require(Permission::ManageTeams),
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn org_admin_stays_in_own_organization() {
        let home = Uuid::new_v4();
        let admin = actor(Role::OrgAdmin, Some(home));
        assert!(admin.ensure_member_of(home).is_ok());
        assert!(admin.ensure_member_of(Uuid::new_v4()).is_err());
    }

    #[test]
    fn super_admin_spans_tenant() {
        let admin = actor(Role::SuperAdmin, Some(Uuid::new_v4()));
        assert!(admin.ensure_member_of(Uuid::new_v4()).is_ok());
    }
}
