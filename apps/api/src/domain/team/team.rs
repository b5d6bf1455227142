use super::events::TeamEvent;
use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Largest roster any team may declare
pub const MAX_ROSTER_SIZE: i32 = 100;

/// Team aggregate root
///
/// A squad inside an organization. Players join it through roster entries
/// and may be grouped further into tiers.
///
/// # Invariants
/// - Name and sport cannot be empty
/// - `max_players` is between 1 and [`MAX_ROSTER_SIZE`]
/// - A deleted team stays deleted
///
/// # Example
/// ```
/// use academy_api::domain::team::{NewTeam, Team};
/// use uuid::Uuid;
///
/// let (team, events) = Team::new(NewTeam {
///     organization_id: Uuid::new_v4(),
///     name: "U12 Lions".to_string(),
///     sport: "football".to_string(),
///     max_players: 22,
///     ..Default::default()
/// })
/// .expect("valid team");
///
/// assert_eq!(team.name(), "U12 Lions");
/// assert_eq!(events.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Team {
    id: Uuid,
    organization_id: Uuid,
    name: String,
    sport: String,
    age_group: Option<String>,
    gender: Option<String>,
    season: Option<String>,
    coach_id: Option<Uuid>,
    max_players: i32,
    is_active: bool,
    metadata: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Input for creating a team
#[derive(Debug, Clone, Default)]
pub struct NewTeam {
    pub organization_id: Uuid,
    pub name: String,
    pub sport: String,
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub season: Option<String>,
    pub coach_id: Option<Uuid>,
    pub max_players: i32,
    pub metadata: Option<Value>,
}

/// Editable team fields; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct TeamChanges {
    pub name: Option<String>,
    pub sport: Option<String>,
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub season: Option<String>,
    pub coach_id: Option<Uuid>,
    pub max_players: Option<i32>,
    pub is_active: Option<bool>,
    pub metadata: Option<Value>,
}

fn validate_max_players(max_players: i32) -> DomainResult<i32> {
    if !(1..=MAX_ROSTER_SIZE).contains(&max_players) {
        return Err(DomainError::validation(format!(
            "Max players must be between 1 and {}",
            MAX_ROSTER_SIZE
        )));
    }
    Ok(max_players)
}

fn validate_metadata(metadata: Option<Value>) -> DomainResult<Value> {
    match metadata {
        None => Ok(Value::Object(Default::default())),
        Some(v) if v.is_object() => Ok(v),
        Some(_) => Err(DomainError::validation("Metadata must be a JSON object")),
    }
}

impl Team {
    /// Creates a new Team aggregate
    ///
    /// # Returns
    /// * `Ok((Team, Vec<TeamEvent>))` - New team and a `Created` event
    /// * `Err(DomainError::Validation)` - If any invariant is violated
    pub fn new(input: NewTeam) -> DomainResult<(Self, Vec<TeamEvent>)> {
        let name = required_text(&input.name, "Team name")?;
        let sport = required_text(&input.sport, "Sport")?;
        let max_players = validate_max_players(input.max_players)?;
        let metadata = validate_metadata(input.metadata)?;

        let now = Utc::now();
        let team = Self {
            id: Uuid::new_v4(),
            organization_id: input.organization_id,
            name,
            sport,
            age_group: optional_text(input.age_group),
            gender: optional_text(input.gender),
            season: optional_text(input.season),
            coach_id: input.coach_id,
            max_players,
            is_active: true,
            metadata,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let events = vec![TeamEvent::Created {
            team_id: team.id,
            organization_id: team.organization_id,
            name: team.name.clone(),
        }];

        Ok((team, events))
    }

    /// Applies edits, validating each changed field
    ///
    /// `current_roster_size` guards against shrinking `max_players` below
    /// the number of players already on the team.
    pub fn update(&mut self, changes: TeamChanges, current_roster_size: usize) -> DomainResult<()> {
        if self.is_deleted() {
            return Err(DomainError::validation("Cannot update a deleted team"));
        }
        if let Some(name) = changes.name {
            self.name = required_text(&name, "Team name")?;
        }
        if let Some(sport) = changes.sport {
            self.sport = required_text(&sport, "Sport")?;
        }
        if changes.age_group.is_some() {
            self.age_group = optional_text(changes.age_group);
        }
        if changes.gender.is_some() {
            self.gender = optional_text(changes.gender);
        }
        if changes.season.is_some() {
            self.season = optional_text(changes.season);
        }
        if changes.coach_id.is_some() {
            self.coach_id = changes.coach_id;
        }
        if let Some(max) = changes.max_players {
            let max = validate_max_players(max)?;
            if (max as usize) < current_roster_size {
                return Err(DomainError::conflict(format!(
                    "Team already has {} players; max players cannot be {}",
                    current_roster_size, max
                )));
            }
            self.max_players = max;
        }
        if let Some(active) = changes.is_active {
            self.is_active = active;
        }
        if changes.metadata.is_some() {
            self.metadata = validate_metadata(changes.metadata)?;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Checks that one more player fits on the roster
    pub fn ensure_roster_capacity(&self, current_roster_size: usize) -> DomainResult<()> {
        if current_roster_size >= self.max_players as usize {
            return Err(DomainError::limit_exceeded(format!(
                "Team '{}' is full ({} players)",
                self.name, self.max_players
            )));
        }
        Ok(())
    }

    /// Marks the team deleted
    pub fn soft_delete(&mut self) -> DomainResult<TeamEvent> {
        if self.is_deleted() {
            return Err(DomainError::validation("Team is already deleted"));
        }
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.is_active = false;
        self.updated_at = now;
        Ok(TeamEvent::Deleted { team_id: self.id })
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sport(&self) -> &str {
        &self.sport
    }

    pub fn age_group(&self) -> Option<&str> {
        self.age_group.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn season(&self) -> Option<&str> {
        self.season.as_deref()
    }

    pub fn coach_id(&self) -> Option<Uuid> {
        self.coach_id
    }

    pub fn max_players(&self) -> i32 {
        self.max_players
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// Only to be used by repository implementations; skips validation.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        organization_id: Uuid,
        name: String,
        sport: String,
        age_group: Option<String>,
        gender: Option<String>,
        season: Option<String>,
        coach_id: Option<Uuid>,
        max_players: i32,
        is_active: bool,
        metadata: Value,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            organization_id,
            name,
            sport,
            age_group,
            gender,
            season,
            coach_id,
            max_players,
            is_active,
            metadata,
            created_at,
            updated_at,
            deleted_at,
        }
    }
}
