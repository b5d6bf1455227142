use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Domain events fired by GameMatch status changes
#[derive(Debug, Clone, PartialEq)]
pub enum MatchLifecycleEvent {
    Scheduled {
        match_id: Uuid,
        team_id: Uuid,
        scheduled_at: DateTime<Utc>,
    },
    Rescheduled {
        match_id: Uuid,
        previous: DateTime<Utc>,
        scheduled_at: DateTime<Utc>,
    },
    Started {
        match_id: Uuid,
    },
    Completed {
        match_id: Uuid,
        team_score: i32,
        opponent_score: i32,
    },
    Cancelled {
        match_id: Uuid,
        reason: String,
    },
}

impl MatchLifecycleEvent {
    pub fn match_id(&self) -> Uuid {
        match self {
            MatchLifecycleEvent::Scheduled { match_id, .. }
            | MatchLifecycleEvent::Rescheduled { match_id, .. }
            | MatchLifecycleEvent::Started { match_id }
            | MatchLifecycleEvent::Completed { match_id, .. }
            | MatchLifecycleEvent::Cancelled { match_id, .. } => *match_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MatchLifecycleEvent::Scheduled { .. } => "match.scheduled",
            MatchLifecycleEvent::Rescheduled { .. } => "match.rescheduled",
            MatchLifecycleEvent::Started { .. } => "match.started",
            MatchLifecycleEvent::Completed { .. } => "match.completed",
            MatchLifecycleEvent::Cancelled { .. } => "match.cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_accessors() {
        let id = Uuid::new_v4();
        let event = MatchLifecycleEvent::Completed {
            match_id: id,
            team_score: 2,
            opponent_score: 1,
        };
        assert_eq!(event.match_id(), id);
        assert_eq!(event.kind(), "match.completed");
    }
}
