// Schedule domain module
// Training sessions, fixtures and meetings on a team calendar

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};

/// Most occurrences a single recurring request may create
pub const MAX_OCCURRENCES: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "schedule_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ScheduleType {
    Training,
    Match,
    Meeting,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
}

impl Frequency {
    fn step(&self) -> Duration {
        match self {
            Frequency::Daily => Duration::days(1),
            Frequency::Weekly => Duration::weeks(1),
        }
    }
}

/// Repeat rule: occurrences continue while their start date is on or before `until`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    pub until: NaiveDate,
}

/// A calendar entry for a team
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSchedule {
    pub id: Uuid,
    pub team_id: Uuid,
    pub title: String,
    pub schedule_type: ScheduleType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub match_id: Option<Uuid>,
    pub series_id: Option<Uuid>,
    pub is_cancelled: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Input for a schedule entry
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub team_id: Uuid,
    pub title: String,
    pub schedule_type: ScheduleType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub match_id: Option<Uuid>,
    pub created_by: Uuid,
}

fn ensure_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> DomainResult<()> {
    if ends_at <= starts_at {
        return Err(DomainError::validation("End time must be after start time"));
    }
    Ok(())
}

impl TeamSchedule {
    pub fn new(input: NewSchedule) -> DomainResult<Self> {
        ensure_window(input.starts_at, input.ends_at)?;
        Ok(Self {
            id: Uuid::new_v4(),
            team_id: input.team_id,
            title: required_text(&input.title, "Title")?,
            schedule_type: input.schedule_type,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            location: optional_text(input.location),
            notes: optional_text(input.notes),
            match_id: input.match_id,
            series_id: None,
            is_cancelled: false,
            created_by: input.created_by,
            created_at: Utc::now(),
        })
    }

    /// Expands a recurring request into individual entries sharing a series id
    ///
    /// A request without recurrence yields exactly one entry.
    pub fn expand(input: NewSchedule, recurrence: Option<Recurrence>) -> DomainResult<Vec<Self>> {
        let first = Self::new(input)?;
        let Some(rule) = recurrence else {
            return Ok(vec![first]);
        };
        if rule.until < first.starts_at.date_naive() {
            return Err(DomainError::validation(
                "Recurrence end date is before the first occurrence",
            ));
        }

        let series_id = Uuid::new_v4();
        let mut occurrences = Vec::new();
        let mut offset = Duration::zero();
        while occurrences.len() < MAX_OCCURRENCES && (first.starts_at + offset).date_naive() <= rule.until {
            let mut entry = first.clone();
            entry.id = Uuid::new_v4();
            entry.starts_at = first.starts_at + offset;
            entry.ends_at = first.ends_at + offset;
            entry.series_id = Some(series_id);
            occurrences.push(entry);
            offset = offset + rule.frequency.step();
        }
        Ok(occurrences)
    }

    /// Half-open interval overlap; back-to-back entries do not clash
    pub fn overlaps(&self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> bool {
        !self.is_cancelled && self.starts_at < ends_at && starts_at < self.ends_at
    }

    pub fn reschedule(&mut self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> DomainResult<()> {
        if self.is_cancelled {
            return Err(DomainError::conflict("Cannot move a cancelled schedule entry"));
        }
        ensure_window(starts_at, ends_at)?;
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        Ok(())
    }

    /// Cancelling twice is a no-op
    pub fn cancel(&mut self) {
        self.is_cancelled = true;
    }
}

/// Rejects `candidate` if it clashes with any live entry other than itself
pub fn ensure_no_overlap(existing: &[TeamSchedule], candidate: &TeamSchedule) -> DomainResult<()> {
    if let Some(clash) = existing
        .iter()
        .filter(|e| e.id != candidate.id)
        .find(|e| e.overlaps(candidate.starts_at, candidate.ends_at))
    {
        return Err(DomainError::conflict(format!(
            "Overlaps with '{}' starting {}",
            clash.title,
            clash.starts_at.to_rfc3339()
        )));
    }
    Ok(())
}
