use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::value_objects::{BillingCycle, Plan, SubscriptionStatus};
use crate::domain::errors::{DomainError, DomainResult};

/// An organization's plan and billing state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub plan: Plan,
    pub status: SubscriptionStatus,
    pub billing_cycle: BillingCycle,
    pub price: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn add_cycle(from: DateTime<Utc>, cycle: BillingCycle) -> DomainResult<DateTime<Utc>> {
    from.checked_add_months(Months::new(cycle.months()))
        .ok_or_else(|| DomainError::validation("Subscription end date out of range"))
}

impl Subscription {
    /// Opens a trial that lasts `trial_days` days
    pub fn start_trial(organization_id: Uuid, plan: Plan, trial_days: i64) -> DomainResult<Self> {
        if trial_days < 1 {
            return Err(DomainError::validation("Trial must last at least one day"));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            organization_id,
            plan,
            status: SubscriptionStatus::Trial,
            billing_cycle: BillingCycle::Monthly,
            price: plan.list_price(BillingCycle::Monthly),
            starts_at: now,
            ends_at: None,
            trial_ends_at: Some(now + Duration::days(trial_days)),
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Starts a paid subscription directly
    pub fn activate_new(organization_id: Uuid, plan: Plan, cycle: BillingCycle) -> DomainResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            organization_id,
            plan,
            status: SubscriptionStatus::Active,
            billing_cycle: cycle,
            price: plan.list_price(cycle),
            starts_at: now,
            ends_at: Some(add_cycle(now, cycle)?),
            trial_ends_at: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn transition(&mut self, next: SubscriptionStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(self.status, next));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Whether the organization currently enjoys this plan's limits
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            SubscriptionStatus::Trial => self.trial_ends_at.map_or(false, |t| t > now),
            SubscriptionStatus::Active | SubscriptionStatus::PastDue => {
                self.ends_at.map_or(true, |t| t > now)
            }
            SubscriptionStatus::Cancelled | SubscriptionStatus::Expired => false,
        }
    }

    /// Switches plan and billing cycle; a trial converts into a paid period
    pub fn change_plan(&mut self, plan: Plan, cycle: BillingCycle) -> DomainResult<()> {
        if !self.status.is_open() {
            return Err(DomainError::conflict(format!(
                "Cannot change plan of a {} subscription",
                self.status
            )));
        }
        let now = Utc::now();
        if self.status == SubscriptionStatus::Trial {
            self.transition(SubscriptionStatus::Active)?;
            self.trial_ends_at = None;
            self.ends_at = Some(add_cycle(now, cycle)?);
        }
        self.plan = plan;
        self.billing_cycle = cycle;
        self.price = plan.list_price(cycle);
        self.updated_at = now;
        Ok(())
    }

    /// Extends the paid period by one billing cycle
    pub fn renew(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        match self.status {
            SubscriptionStatus::Active => {}
            SubscriptionStatus::PastDue | SubscriptionStatus::Expired => {
                self.transition(SubscriptionStatus::Active)?
            }
            other => {
                return Err(DomainError::conflict(format!(
                    "Cannot renew a {} subscription",
                    other
                )))
            }
        }
        let base = match self.ends_at {
            Some(end) if end > now => end,
            _ => now,
        };
        self.ends_at = Some(add_cycle(base, self.billing_cycle)?);
        self.updated_at = now;
        Ok(())
    }

    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        self.transition(SubscriptionStatus::Cancelled)?;
        self.cancelled_at = Some(now);
        Ok(())
    }

    pub fn mark_past_due(&mut self) -> DomainResult<()> {
        self.transition(SubscriptionStatus::PastDue)
    }

    /// Closes a subscription whose paid or trial period has run out
    ///
    /// Returns `true` when the status changed.
    pub fn expire_if_lapsed(&mut self, now: DateTime<Utc>) -> DomainResult<bool> {
        let lapsed = match self.status {
            SubscriptionStatus::Trial => self.trial_ends_at.map_or(false, |t| t <= now),
            SubscriptionStatus::Active | SubscriptionStatus::PastDue => {
                self.ends_at.map_or(false, |t| t <= now)
            }
            _ => false,
        };
        if lapsed {
            self.transition(SubscriptionStatus::Expired)?;
        }
        Ok(lapsed)
    }
}

/// Plan whose limits apply to an organization right now
///
/// Organizations without a usable subscription fall back to the free plan.
pub fn effective_plan(subscription: Option<&Subscription>, now: DateTime<Utc>) -> Plan {
    subscription
        .filter(|s| s.is_usable(now))
        .map(|s| s.plan)
        .unwrap_or(Plan::Free)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trial_is_usable_until_it_ends() {
        let sub = Subscription::start_trial(Uuid::new_v4(), Plan::Basic, 14).unwrap();
        let now = Utc::now();
        assert!(sub.is_usable(now));
        assert!(!sub.is_usable(now + Duration::days(15)));
        assert_eq!(effective_plan(Some(&sub), now), Plan::Basic);
        assert_eq!(effective_plan(Some(&sub), now + Duration::days(15)), Plan::Free);
        assert_eq!(effective_plan(None, now), Plan::Free);
    }

    #[test]
    fn change_plan_converts_trial() {
        let mut sub = Subscription::start_trial(Uuid::new_v4(), Plan::Basic, 14).unwrap();
        sub.change_plan(Plan::Pro, BillingCycle::Yearly).unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.plan, Plan::Pro);
        assert_eq!(sub.price, Decimal::from(1490));
        assert!(sub.trial_ends_at.is_none());
        assert!(sub.ends_at.unwrap() > Utc::now() + Duration::days(360));
    }

    #[test]
    fn renew_extends_from_current_end() {
        let mut sub =
            Subscription::activate_new(Uuid::new_v4(), Plan::Basic, BillingCycle::Monthly).unwrap();
        let first_end = sub.ends_at.unwrap();
        sub.renew(Utc::now()).unwrap();
        let second_end = sub.ends_at.unwrap();
        assert!(second_end > first_end + Duration::days(27));
    }

    #[test]
    fn renew_reopens_expired() {
        let mut sub =
            Subscription::activate_new(Uuid::new_v4(), Plan::Basic, BillingCycle::Monthly).unwrap();
        let later = sub.ends_at.unwrap() + Duration::days(1);
        assert!(sub.expire_if_lapsed(later).unwrap());
        assert_eq!(sub.status, SubscriptionStatus::Expired);
        assert!(!sub.is_usable(later));

        sub.renew(later).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert!(sub.is_usable(later));
    }

    #[test]
    fn cancelled_cannot_renew_or_change() {
        let mut sub = Subscription::start_trial(Uuid::new_v4(), Plan::Basic, 14).unwrap();
        sub.cancel(Utc::now()).unwrap();
        assert!(sub.cancelled_at.is_some());
        assert!(sub.renew(Utc::now()).is_err());
        assert!(sub.change_plan(Plan::Pro, BillingCycle::Monthly).is_err());
        assert!(sub.cancel(Utc::now()).is_err());
    }

    #[test]
    fn trial_cannot_renew() {
        let mut sub = Subscription::start_trial(Uuid::new_v4(), Plan::Basic, 14).unwrap();
        assert!(sub.renew(Utc::now()).is_err());
    }

    #[test]
    fn past_due_stays_usable() {
        let mut sub =
            Subscription::activate_new(Uuid::new_v4(), Plan::Pro, BillingCycle::Monthly).unwrap();
        sub.mark_past_due().unwrap();
        assert!(sub.is_usable(Utc::now()));
    }

    #[test]
    fn expire_is_noop_while_running() {
        let mut sub = Subscription::start_trial(Uuid::new_v4(), Plan::Basic, 14).unwrap();
        assert!(!sub.expire_if_lapsed(Utc::now()).unwrap());
        assert_eq!(sub.status, SubscriptionStatus::Trial);
    }
}
