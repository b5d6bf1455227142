use serde::{Deserialize, Serialize};
use std::fmt;

/// URL-safe identifier for tenants and organizations
///
/// # Invariants
/// - Only lowercase ASCII letters, digits and single hyphens
/// - Does not start or end with a hyphen
/// - Between 2 and 64 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(String);

impl Slug {
    /// Validates an explicit slug
    ///
    /// # Example
    /// ```
    /// use academy_api::domain::organization::value_objects::Slug;
    ///
    /// assert!(Slug::new("north-fc").is_ok());
    /// assert!(Slug::new("North FC").is_err());
    /// ```
    pub fn new(slug: impl Into<String>) -> Result<Self, String> {
        let slug = slug.into();
        if Self::is_valid(&slug) {
            Ok(Slug(slug))
        } else {
            Err(format!("Invalid slug: {}", slug))
        }
    }

    /// Derives a slug from a display name
    ///
    /// Runs of non-alphanumeric characters collapse into a single hyphen.
    pub fn from_name(name: &str) -> Result<Self, String> {
        let mut slug = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        slug.truncate(64);
        Self::new(slug)
    }

    fn is_valid(slug: &str) -> bool {
        (2..=64).contains(&slug.len())
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--")
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
