use serde::{Deserialize, Serialize};
use std::fmt;

/// Email value object representing a valid email address
///
/// # Invariants
/// - Must contain exactly one '@' with text on both sides
/// - Stored lowercase and trimmed
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    /// Creates a new Email value object
    ///
    /// # Example
    /// ```
    /// use academy_api::domain::user::value_objects::Email;
    ///
    /// let email = Email::new(" Coach@Example.com ").expect("valid email");
    /// assert_eq!(email.as_str(), "coach@example.com");
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, String> {
        let email = email.into().trim().to_lowercase();
        if Self::is_valid(&email) {
            Ok(Email(email))
        } else {
            Err(format!("Invalid email: {}", email))
        }
    }

    fn is_valid(email: &str) -> bool {
        match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            }
            None => false,
        }
    }

    /// Returns the email as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capabilities granted by a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageTenant,
    ManageOrganization,
    ManageUsers,
    ManageTeams,
    ManageMatches,
    ManageSchedules,
    EvaluatePlayers,
    SendNotifications,
    ManageSubscription,
    ViewTeams,
}

/// A user's role within their tenant
///
/// Roles map to a fixed permission set; there is no per-user grant table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    OrgAdmin,
    Coach,
    Player,
    Parent,
}

impl Role {
    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::SuperAdmin => &[
                ManageTenant,
                ManageOrganization,
                ManageUsers,
                ManageTeams,
                ManageMatches,
                ManageSchedules,
                EvaluatePlayers,
                SendNotifications,
                ManageSubscription,
                ViewTeams,
            ],
            Role::OrgAdmin => &[
                ManageOrganization,
                ManageUsers,
                ManageTeams,
                ManageMatches,
                ManageSchedules,
                EvaluatePlayers,
                SendNotifications,
                ManageSubscription,
                ViewTeams,
            ],
            Role::Coach => &[
                ManageMatches,
                ManageSchedules,
                EvaluatePlayers,
                SendNotifications,
                ViewTeams,
            ],
            Role::Player | Role::Parent => &[ViewTeams],
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// Whether the role spans every organization in the tenant
    pub fn is_tenant_wide(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::SuperAdmin => "super_admin",
            Role::OrgAdmin => "org_admin",
            Role::Coach => "coach",
            Role::Player => "player",
            Role::Parent => "parent",
        };
        write!(f, "{}", s)
    }
}
