use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};

/// Ratings run from 1 (beginner) to 10 (elite)
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 10;

pub(crate) fn validate_rating(rating: i32, field: &str) -> DomainResult<i32> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(DomainError::validation(format!(
            "{} must be between {} and {}",
            field, MIN_RATING, MAX_RATING
        )));
    }
    Ok(rating)
}

/// A coach's current rating of one player skill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSkill {
    pub id: Uuid,
    pub player_id: Uuid,
    pub skill_name: String,
    pub rating: i32,
    pub notes: Option<String>,
    pub assessed_by: Uuid,
    pub assessed_at: DateTime<Utc>,
}

impl PlayerSkill {
    pub fn new(
        player_id: Uuid,
        skill_name: &str,
        rating: i32,
        notes: Option<String>,
        assessed_by: Uuid,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            player_id,
            skill_name: required_text(skill_name, "Skill name")?,
            rating: validate_rating(rating, "Rating")?,
            notes: optional_text(notes),
            assessed_by,
            assessed_at: Utc::now(),
        })
    }

    /// Same skill regardless of letter case
    pub fn is_same_skill(&self, name: &str) -> bool {
        self.skill_name.eq_ignore_ascii_case(name.trim())
    }
}

/// Mean rating across skills; zero when none are recorded
pub fn average_rating(skills: &[PlayerSkill]) -> Decimal {
    if skills.is_empty() {
        return Decimal::ZERO;
    }
    let total: i64 = skills.iter().map(|s| s.rating as i64).sum();
    (Decimal::from(total) / Decimal::from(skills.len() as i64)).round_dp(2)
}
