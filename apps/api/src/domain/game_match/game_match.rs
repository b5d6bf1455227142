use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::events::MatchLifecycleEvent;
use super::match_event::MatchEvent;
use super::value_objects::{MatchEventType, MatchSide, MatchStatus};
use crate::domain::errors::{optional_text, required_text, DomainError, DomainResult};

/// GameMatch aggregate root
///
/// A fixture between one of the organization's teams and an opponent.
///
/// # Invariants
/// - Status only moves along [`MatchStatus::can_transition_to`]
/// - Scores are never negative
/// - Match events are only accepted while in progress
/// - Lineups are only editable while scheduled
#[derive(Debug, Clone)]
pub struct GameMatch {
    id: Uuid,
    organization_id: Uuid,
    team_id: Uuid,
    opponent_name: String,
    venue: Option<String>,
    is_home: bool,
    scheduled_at: DateTime<Utc>,
    status: MatchStatus,
    team_score: i32,
    opponent_score: i32,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    cancelled_reason: Option<String>,
    notes: Option<String>,
    metadata: Value,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Input for scheduling a match
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub organization_id: Uuid,
    pub team_id: Uuid,
    pub opponent_name: String,
    pub venue: Option<String>,
    pub is_home: bool,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub metadata: Option<Value>,
    pub created_by: Uuid,
}

fn ensure_future(at: DateTime<Utc>) -> DomainResult<()> {
    if at <= Utc::now() {
        return Err(DomainError::validation("Match must be scheduled in the future"));
    }
    Ok(())
}

impl GameMatch {
    /// Schedules a new match
    ///
    /// # Business Rules
    /// - Opponent name must not be empty
    /// - Kick-off must be in the future
    /// - Initial status is always Scheduled with a 0-0 score
    pub fn new(input: NewMatch) -> DomainResult<(Self, MatchLifecycleEvent)> {
        let opponent_name = required_text(&input.opponent_name, "Opponent name")?;
        ensure_future(input.scheduled_at)?;
        let metadata = match input.metadata {
            None => Value::Object(Default::default()),
            Some(v) if v.is_object() => v,
            Some(_) => return Err(DomainError::validation("Metadata must be a JSON object")),
        };

        let now = Utc::now();
        let game = Self {
            id: Uuid::new_v4(),
            organization_id: input.organization_id,
            team_id: input.team_id,
            opponent_name,
            venue: optional_text(input.venue),
            is_home: input.is_home,
            scheduled_at: input.scheduled_at,
            status: MatchStatus::Scheduled,
            team_score: 0,
            opponent_score: 0,
            started_at: None,
            completed_at: None,
            cancelled_reason: None,
            notes: optional_text(input.notes),
            metadata,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        let event = MatchLifecycleEvent::Scheduled {
            match_id: game.id,
            team_id: game.team_id,
            scheduled_at: game.scheduled_at,
        };
        Ok((game, event))
    }

    fn transition(&mut self, next: MatchStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(self.status, next));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Kicks off the match (Scheduled -> InProgress)
    pub fn start(&mut self) -> DomainResult<MatchLifecycleEvent> {
        self.transition(MatchStatus::InProgress)?;
        self.started_at = Some(self.updated_at);
        self.team_score = 0;
        self.opponent_score = 0;
        Ok(MatchLifecycleEvent::Started { match_id: self.id })
    }

    /// Ends the match (InProgress -> Completed)
    ///
    /// `final_score` overrides the tallied score when given.
    pub fn complete(&mut self, final_score: Option<(i32, i32)>) -> DomainResult<MatchLifecycleEvent> {
        if let Some((team, opponent)) = final_score {
            if team < 0 || opponent < 0 {
                return Err(DomainError::validation("Scores cannot be negative"));
            }
        }
        self.transition(MatchStatus::Completed)?;
        if let Some((team, opponent)) = final_score {
            self.team_score = team;
            self.opponent_score = opponent;
        }
        self.completed_at = Some(self.updated_at);
        Ok(MatchLifecycleEvent::Completed {
            match_id: self.id,
            team_score: self.team_score,
            opponent_score: self.opponent_score,
        })
    }

    /// Calls the match off (Scheduled|InProgress -> Cancelled)
    pub fn cancel(&mut self, reason: &str) -> DomainResult<MatchLifecycleEvent> {
        let reason = required_text(reason, "Cancellation reason")?;
        self.transition(MatchStatus::Cancelled)?;
        self.cancelled_reason = Some(reason.clone());
        Ok(MatchLifecycleEvent::Cancelled {
            match_id: self.id,
            reason,
        })
    }

    /// Moves kick-off; only allowed before the match starts
    pub fn reschedule(&mut self, scheduled_at: DateTime<Utc>) -> DomainResult<MatchLifecycleEvent> {
        if self.status != MatchStatus::Scheduled {
            return Err(DomainError::conflict(format!(
                "Cannot reschedule a match in {} status",
                self.status
            )));
        }
        ensure_future(scheduled_at)?;
        let previous = self.scheduled_at;
        self.scheduled_at = scheduled_at;
        self.updated_at = Utc::now();
        Ok(MatchLifecycleEvent::Rescheduled {
            match_id: self.id,
            previous,
            scheduled_at,
        })
    }

    /// Applies an in-game event to the running score
    pub fn apply_event(&mut self, event: &MatchEvent) -> DomainResult<()> {
        if event.match_id != self.id {
            return Err(DomainError::validation("Event belongs to another match"));
        }
        if self.status != MatchStatus::InProgress {
            return Err(DomainError::conflict(format!(
                "Events can only be recorded while the match is in progress (status: {})",
                self.status
            )));
        }
        let scoring_side = match event.event_type {
            MatchEventType::Goal => Some(event.side),
            MatchEventType::OwnGoal => Some(event.side.other()),
            _ => None,
        };
        match scoring_side {
            Some(MatchSide::Team) => self.team_score += 1,
            Some(MatchSide::Opponent) => self.opponent_score += 1,
            None => {}
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn ensure_lineup_editable(&self) -> DomainResult<()> {
        if self.status != MatchStatus::Scheduled {
            return Err(DomainError::conflict(format!(
                "Lineup can only be changed before kick-off (status: {})",
                self.status
            )));
        }
        Ok(())
    }

    /// Soft deletes a match that never produced a result
    pub fn soft_delete(&mut self) -> DomainResult<()> {
        if !matches!(self.status, MatchStatus::Scheduled | MatchStatus::Cancelled) {
            return Err(DomainError::conflict(format!(
                "Cannot delete a match in {} status",
                self.status
            )));
        }
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn organization_id(&self) -> Uuid {
        self.organization_id
    }

    pub fn team_id(&self) -> Uuid {
        self.team_id
    }

    pub fn opponent_name(&self) -> &str {
        &self.opponent_name
    }

    pub fn venue(&self) -> Option<&str> {
        self.venue.as_deref()
    }

    pub fn is_home(&self) -> bool {
        self.is_home
    }

    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn team_score(&self) -> i32 {
        self.team_score
    }

    pub fn opponent_score(&self) -> i32 {
        self.opponent_score
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn cancelled_reason(&self) -> Option<&str> {
        self.cancelled_reason.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn metadata(&self) -> &Value {
        &self.metadata
    }

    pub fn created_by(&self) -> Uuid {
        self.created_by
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

    /// Reconstructs a GameMatch from persistence layer data
    #[allow(clippy::too_many_arguments)]
    pub fn from_persistence(
        id: Uuid,
        organization_id: Uuid,
        team_id: Uuid,
        opponent_name: String,
        venue: Option<String>,
        is_home: bool,
        scheduled_at: DateTime<Utc>,
        status: MatchStatus,
        team_score: i32,
        opponent_score: i32,
        started_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
        cancelled_reason: Option<String>,
        notes: Option<String>,
        metadata: Value,
        created_by: Uuid,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            organization_id,
            team_id,
            opponent_name,
            venue,
            is_home,
            scheduled_at,
            status,
            team_score,
            opponent_score,
            started_at,
            completed_at,
            cancelled_reason,
            notes,
            metadata,
            created_by,
            created_at,
            updated_at,
            deleted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn scheduled() -> GameMatch {
        GameMatch::new(NewMatch {
            organization_id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            opponent_name: "Harbour United".into(),
            venue: Some("Main pitch".into()),
            is_home: true,
            scheduled_at: Utc::now() + Duration::days(3),
            notes: None,
            metadata: None,
            created_by: Uuid::new_v4(),
        })
        .unwrap()
        .0
    }

    fn goal(game: &GameMatch, side: MatchSide) -> MatchEvent {
        MatchEvent::new(game.id(), MatchEventType::Goal, side, None, 10, None, Uuid::new_v4()).unwrap()
    }

    #[test]
    fn new_match_is_scheduled() {
        let game = scheduled();
        assert_eq!(game.status(), MatchStatus::Scheduled);
        assert_eq!((game.team_score(), game.opponent_score()), (0, 0));
        assert!(game.metadata().is_object());
    }

    #[test]
    fn cannot_schedule_in_the_past() {
        let result = GameMatch::new(NewMatch {
            organization_id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            opponent_name: "Harbour United".into(),
            venue: None,
            is_home: false,
            scheduled_at: Utc::now() - Duration::hours(1),
            notes: None,
            metadata: None,
            created_by: Uuid::new_v4(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn scheduled_to_in_progress_to_completed() {
        let mut game = scheduled();

        game.start().unwrap();
        assert_eq!(game.status(), MatchStatus::InProgress);
        assert!(game.started_at().is_some());

        let event = game.complete(Some((3, 1))).unwrap();
        assert_eq!(game.status(), MatchStatus::Completed);
        assert!(game.completed_at().is_some());
        assert_eq!(
            event,
            MatchLifecycleEvent::Completed {
                match_id: game.id(),
                team_score: 3,
                opponent_score: 1
            }
        );
    }

    #[test]
    fn completed_match_cannot_go_back() {
        let mut game = scheduled();
        game.start().unwrap();
        game.complete(None).unwrap();

        assert!(matches!(
            game.start(),
            Err(DomainError::InvalidTransition { .. })
        ));
        assert!(game.cancel("weather").is_err());
        assert!(game.reschedule(Utc::now() + Duration::days(1)).is_err());
        assert_eq!(game.status(), MatchStatus::Completed);
    }

    #[test]
    fn cannot_complete_before_start() {
        let mut game = scheduled();
        let err = game.complete(None).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: "scheduled".into(),
                to: "completed".into()
            }
        );
    }

    #[test]
    fn cancelled_match_cannot_start() {
        let mut game = scheduled();
        game.cancel("Pitch flooded").unwrap();

        assert_eq!(game.cancelled_reason(), Some("Pitch flooded"));
        assert!(game.start().is_err());
    }

    #[test]
    fn cancel_requires_reason() {
        let mut game = scheduled();
        assert!(game.cancel("  ").is_err());
        assert_eq!(game.status(), MatchStatus::Scheduled);
    }

    #[test]
    fn in_progress_match_can_be_abandoned() {
        let mut game = scheduled();
        game.start().unwrap();
        assert!(game.cancel("Floodlight failure").is_ok());
    }

    #[test]
    fn negative_final_score_rejected_without_transition() {
        let mut game = scheduled();
        game.start().unwrap();
        assert!(game.complete(Some((-1, 0))).is_err());
        assert_eq!(game.status(), MatchStatus::InProgress);
    }

    #[test]
    fn goals_update_score_only_in_progress() {
        let mut game = scheduled();
        let team_goal = goal(&game, MatchSide::Team);
        assert!(game.apply_event(&team_goal).is_err());

        game.start().unwrap();
        game.apply_event(&team_goal).unwrap();
        game.apply_event(&goal(&game, MatchSide::Opponent)).unwrap();
        game.apply_event(&goal(&game, MatchSide::Team)).unwrap();
        assert_eq!((game.team_score(), game.opponent_score()), (2, 1));

        game.complete(None).unwrap();
        assert_eq!((game.team_score(), game.opponent_score()), (2, 1));
        assert!(game.apply_event(&goal(&game, MatchSide::Team)).is_err());
    }

    #[test]
    fn own_goal_credits_other_side() {
        let mut game = scheduled();
        game.start().unwrap();
        let own_goal = MatchEvent::new(
            game.id(),
            MatchEventType::OwnGoal,
            MatchSide::Opponent,
            None,
            30,
            None,
            Uuid::new_v4(),
        )
        .unwrap();
        game.apply_event(&own_goal).unwrap();
        assert_eq!((game.team_score(), game.opponent_score()), (1, 0));
    }

    #[test]
    fn reschedule_only_while_scheduled() {
        let mut game = scheduled();
        let later = Utc::now() + Duration::days(10);
        game.reschedule(later).unwrap();
        assert_eq!(game.scheduled_at(), later);

        game.start().unwrap();
        assert!(game.reschedule(later + Duration::days(1)).is_err());
    }

    #[test]
    fn lineup_locked_after_kickoff() {
        let mut game = scheduled();
        assert!(game.ensure_lineup_editable().is_ok());
        game.start().unwrap();
        assert!(game.ensure_lineup_editable().is_err());
    }

    #[test]
    fn delete_rules() {
        let mut game = scheduled();
        game.start().unwrap();
        assert!(game.soft_delete().is_err());

        let mut other = scheduled();
        assert!(other.soft_delete().is_ok());
        assert!(other.deleted_at().is_some());
    }
}
