// Subscription domain module

#![allow(clippy::module_inception)]

pub mod subscription;
pub mod value_objects;

pub use subscription::{effective_plan, Subscription};
pub use value_objects::{BillingCycle, Plan, SubscriptionStatus};
