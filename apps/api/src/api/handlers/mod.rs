// Request handlers, one module per resource

pub mod auth;
pub mod matches;
pub mod notifications;
pub mod organizations;
pub mod players;
pub mod schedules;
pub mod subscriptions;
pub mod teams;
pub mod tiers;

use serde::{Deserialize, Deserializer};

/// Tells an explicit `null` apart from a missing field.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`: a missing
/// field stays `None`, `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
