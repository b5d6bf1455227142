use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::value_objects::{Email, Role};
use crate::domain::errors::{required_text, DomainResult};

/// A person who can sign in: staff, players and parents alike
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub email: Email,
    pub password_hash: String,
    pub full_name: String,
    pub role: Role,
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        tenant_id: Uuid,
        organization_id: Option<Uuid>,
        email: Email,
        password_hash: String,
        full_name: &str,
        role: Role,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id,
            email,
            password_hash,
            full_name: required_text(full_name, "Full name")?,
            role,
            date_of_birth: None,
            is_active: true,
            last_login_at: None,
            created_at: Utc::now(),
        })
    }

    pub fn belongs_to(&self, organization_id: Uuid) -> bool {
        self.organization_id == Some(organization_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_active() {
        let org = Uuid::new_v4();
        let user = User::new(
            Uuid::new_v4(),
            Some(org),
            Email::new("p@example.com").unwrap(),
            "hash".into(),
            " Pat Player ",
            Role::Player,
        )
        .unwrap();

        assert_eq!(user.full_name, "Pat Player");
        assert!(user.is_active);
        assert!(user.belongs_to(org));
        assert!(!user.belongs_to(Uuid::new_v4()));
    }

    #[test]
    fn new_user_requires_name() {
        let result = User::new(
            Uuid::new_v4(),
            None,
            Email::new("p@example.com").unwrap(),
            "hash".into(),
            "",
            Role::Player,
        );
        assert!(result.is_err());
    }
}
