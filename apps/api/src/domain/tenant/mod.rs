// Tenant domain module
// A tenant is the isolation boundary every other aggregate hangs off

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::{required_text, DomainError, DomainResult};
use crate::domain::organization::Slug;

#[derive(Debug, Clone, Serialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub slug: Slug,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Tenant {
    pub fn new(name: &str, slug: Option<&str>) -> DomainResult<Self> {
        let name = required_text(name, "Tenant name")?;
        let slug = match slug {
            Some(s) => Slug::new(s),
            None => Slug::from_name(&name),
        }
        .map_err(DomainError::Validation)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            slug,
            is_active: true,
            created_at: Utc::now(),
        })
    }
}
