use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_plan", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Basic,
    Pro,
    Enterprise,
}

impl Plan {
    /// Live teams an organization may run; `None` is unlimited
    pub fn max_teams(&self) -> Option<usize> {
        match self {
            Plan::Free => Some(1),
            Plan::Basic => Some(5),
            Plan::Pro => Some(25),
            Plan::Enterprise => None,
        }
    }

    /// Rostered players across all teams; `None` is unlimited
    pub fn max_players(&self) -> Option<usize> {
        match self {
            Plan::Free => Some(25),
            Plan::Basic => Some(150),
            Plan::Pro => Some(1000),
            Plan::Enterprise => None,
        }
    }

    pub fn list_price(&self, cycle: BillingCycle) -> Decimal {
        let monthly = match self {
            Plan::Free => 0,
            Plan::Basic => 49,
            Plan::Pro => 149,
            Plan::Enterprise => 499,
        };
        match cycle {
            BillingCycle::Monthly => Decimal::from(monthly),
            // two months free on yearly billing
            BillingCycle::Yearly => Decimal::from(monthly * 10),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Free => write!(f, "free"),
            Plan::Basic => write!(f, "basic"),
            Plan::Pro => write!(f, "pro"),
            Plan::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Billing state of a subscription
///
/// # Status Transitions
/// ```text
/// Trial ----> Active <---> PastDue
///   |           |             |
///   |           v             v
///   +------> Cancelled     Expired --> Active (renewal)
/// ```
/// Trial, Active and PastDue may each move to Cancelled or Expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    PastDue,
    Cancelled,
    Expired,
}

impl SubscriptionStatus {
    pub fn can_transition_to(&self, next: SubscriptionStatus) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, next),
            (Trial, Active)
                | (Trial, Cancelled)
                | (Trial, Expired)
                | (Active, PastDue)
                | (Active, Cancelled)
                | (Active, Expired)
                | (PastDue, Active)
                | (PastDue, Cancelled)
                | (PastDue, Expired)
                | (Expired, Active)
        )
    }

    /// Open subscriptions still govern the organization
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Trial | SubscriptionStatus::Active | SubscriptionStatus::PastDue
        )
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionStatus::Trial => write!(f, "trial"),
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::PastDue => write!(f, "past_due"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
            SubscriptionStatus::Expired => write!(f, "expired"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "billing_cycle", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    pub fn months(&self) -> u32 {
        match self {
            BillingCycle::Monthly => 1,
            BillingCycle::Yearly => 12,
        }
    }
}
