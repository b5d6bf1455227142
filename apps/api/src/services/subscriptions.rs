use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{access, Actor, ServiceError, ServiceResult};
use crate::domain::subscription::{effective_plan, BillingCycle, Plan, Subscription};
use crate::domain::user::Permission;
use crate::state::AppState;

pub struct SubscriptionService<'a> {
    state: &'a AppState,
}

impl<'a> SubscriptionService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Latest subscription of an organization, expiring it first if its period ran out
    async fn load_current(&self, organization_id: Uuid) -> ServiceResult<Option<Subscription>> {
        let repo = &self.state.repos.subscriptions;
        let Some(mut subscription) = repo.find_current(organization_id).await? else {
            return Ok(None);
        };
        if subscription.expire_if_lapsed(Utc::now())? {
            info!(subscription_id = %subscription.id, %organization_id, "Subscription expired");
            repo.save(&subscription).await?;
        }
        Ok(Some(subscription))
    }

    /// Plan whose limits currently bind the organization
    pub(crate) async fn plan_for(&self, organization_id: Uuid) -> ServiceResult<Plan> {
        let current = self.state.repos.subscriptions.find_current(organization_id).await?;
        Ok(effective_plan(current.as_ref(), Utc::now()))
    }

    /// Opens the trial that every new organization starts with
    pub(crate) async fn start_trial(&self, organization_id: Uuid) -> ServiceResult<Subscription> {
        let trial = Subscription::start_trial(organization_id, Plan::Basic, self.state.config.trial_days)?;
        self.state.repos.subscriptions.save(&trial).await?;
        Ok(trial)
    }

    pub async fn current(&self, actor: &Actor, organization_id: Uuid) -> ServiceResult<Subscription> {
        actor.require(Permission::ManageSubscription)?;
        let org = access::organization(self.state, actor, organization_id).await?;
        self.load_current(org.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subscription"))
    }

    /// Switches plan on the open subscription, or starts a paid one when none is open
    pub async fn change_plan(
        &self,
        actor: &Actor,
        organization_id: Uuid,
        plan: Plan,
        cycle: BillingCycle,
    ) -> ServiceResult<Subscription> {
        actor.require(Permission::ManageSubscription)?;
        let org = access::organization(self.state, actor, organization_id).await?;

        let subscription = match self.load_current(org.id).await? {
            Some(mut open) if open.status.is_open() => {
                open.change_plan(plan, cycle)?;
                open
            }
            _ => Subscription::activate_new(org.id, plan, cycle)?,
        };
        self.state.repos.subscriptions.save(&subscription).await?;

        info!(
            organization_id = %org.id,
            plan = %subscription.plan,
            status = %subscription.status,
            "Subscription plan changed"
        );
        Ok(subscription)
    }

    pub async fn renew(&self, actor: &Actor, organization_id: Uuid) -> ServiceResult<Subscription> {
        actor.require(Permission::ManageSubscription)?;
        let org = access::organization(self.state, actor, organization_id).await?;
        let mut subscription = self
            .load_current(org.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subscription"))?;

        subscription.renew(Utc::now())?;
        self.state.repos.subscriptions.save(&subscription).await?;
        info!(subscription_id = %subscription.id, ends_at = ?subscription.ends_at, "Subscription renewed");
        Ok(subscription)
    }

    pub async fn cancel(&self, actor: &Actor, organization_id: Uuid) -> ServiceResult<Subscription> {
        actor.require(Permission::ManageSubscription)?;
        let org = access::organization(self.state, actor, organization_id).await?;
        let mut subscription = self
            .load_current(org.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Subscription"))?;

        subscription.cancel(Utc::now())?;
        self.state.repos.subscriptions.save(&subscription).await?;
        info!(subscription_id = %subscription.id, "Subscription cancelled");
        Ok(subscription)
    }
}
