use uuid::Uuid;

/// Domain events that occur within the Team aggregate
///
/// These events represent important moments in a team's life. Services
/// turn them into log lines and player notifications.
///
/// # Example
/// ```
/// use academy_api::domain::team::events::TeamEvent;
/// use uuid::Uuid;
///
/// let event = TeamEvent::Created {
///     team_id: Uuid::new_v4(),
///     organization_id: Uuid::new_v4(),
///     name: "U12 Lions".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TeamEvent {
    /// Fired when a team is created
    Created {
        team_id: Uuid,
        organization_id: Uuid,
        name: String,
    },
    /// Fired when a team is soft deleted
    Deleted { team_id: Uuid },
    /// Fired when a player joins the roster
    PlayerAdded { team_id: Uuid, player_id: Uuid },
    /// Fired when a player leaves the roster
    PlayerRemoved { team_id: Uuid, player_id: Uuid },
    /// Fired when a player is placed in a tier directly
    TierAssigned {
        team_id: Uuid,
        player_id: Uuid,
        tier_id: Uuid,
    },
    /// Fired when a player moves up a tier
    PlayerPromoted {
        team_id: Uuid,
        player_id: Uuid,
        from_tier_id: Option<Uuid>,
        to_tier_id: Uuid,
    },
    /// Fired when a player moves down a tier
    PlayerDemoted {
        team_id: Uuid,
        player_id: Uuid,
        from_tier_id: Uuid,
        to_tier_id: Uuid,
    },
}

impl TeamEvent {
    /// Returns the team_id for this event
    pub fn team_id(&self) -> Uuid {
        match self {
            TeamEvent::Created { team_id, .. }
            | TeamEvent::Deleted { team_id }
            | TeamEvent::PlayerAdded { team_id, .. }
            | TeamEvent::PlayerRemoved { team_id, .. }
            | TeamEvent::TierAssigned { team_id, .. }
            | TeamEvent::PlayerPromoted { team_id, .. }
            | TeamEvent::PlayerDemoted { team_id, .. } => *team_id,
        }
    }

    /// Short machine-readable name used for notification types and logs
    pub fn kind(&self) -> &'static str {
        match self {
            TeamEvent::Created { .. } => "team.created",
            TeamEvent::Deleted { .. } => "team.deleted",
            TeamEvent::PlayerAdded { .. } => "team.player_added",
            TeamEvent::PlayerRemoved { .. } => "team.player_removed",
            TeamEvent::TierAssigned { .. } => "team.tier_assigned",
            TeamEvent::PlayerPromoted { .. } => "team.player_promoted",
            TeamEvent::PlayerDemoted { .. } => "team.player_demoted",
        }
    }
}
