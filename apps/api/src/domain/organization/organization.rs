use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::value_objects::Slug;
use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};
use crate::domain::user::value_objects::Email;

/// A customer account inside a tenant that owns teams
#[derive(Debug, Clone, Serialize)]
pub struct Organization {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub slug: Slug,
    pub contact_email: Option<Email>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub settings: Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Editable organization fields; `None` leaves a field untouched
#[derive(Debug, Default, Clone)]
pub struct OrganizationChanges {
    pub name: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub settings: Option<Value>,
    pub is_active: Option<bool>,
}

impl Organization {
    /// Creates an organization, deriving the slug from the name when none is given
    pub fn new(
        tenant_id: Uuid,
        name: &str,
        slug: Option<&str>,
        contact_email: Option<&str>,
    ) -> DomainResult<Self> {
        let name = required_text(name, "Organization name")?;
        let slug = match slug {
            Some(s) => Slug::new(s),
            None => Slug::from_name(&name),
        }
        .map_err(DomainError::Validation)?;
        let contact_email = contact_email
            .map(Email::new)
            .transpose()
            .map_err(DomainError::Validation)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            tenant_id,
            name,
            slug,
            contact_email,
            phone: None,
            address: None,
            settings: Value::Object(Default::default()),
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    pub fn apply(&mut self, changes: OrganizationChanges) -> DomainResult<()> {
        if let Some(name) = changes.name {
            self.name = required_text(&name, "Organization name")?;
        }
        if let Some(email) = changes.contact_email {
            self.contact_email = Some(Email::new(email).map_err(DomainError::Validation)?);
        }
        if changes.phone.is_some() {
            self.phone = optional_text(changes.phone);
        }
        if changes.address.is_some() {
            self.address = optional_text(changes.address);
        }
        if let Some(settings) = changes.settings {
            if !settings.is_object() {
                return Err(DomainError::validation("Settings must be a JSON object"));
            }
            self.settings = settings;
        }
        if let Some(active) = changes.is_active {
            self.is_active = active;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn soft_delete(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.is_active = false;
        self.updated_at = now;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
