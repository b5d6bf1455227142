use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{access, Actor, ServiceError, ServiceResult};
use crate::domain::notification::{NotificationChannel, NotificationLog};
use crate::domain::team::Team;
use crate::domain::user::Permission;
use crate::state::AppState;

/// Message content shared by every recipient of one notification
#[derive(Debug, Clone)]
pub struct Notice {
    pub channel: NotificationChannel,
    pub kind: String,
    pub subject: String,
    pub body: String,
    pub data: Value,
}

impl Notice {
    pub fn in_app(kind: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            channel: NotificationChannel::InApp,
            kind: kind.into(),
            subject: subject.into(),
            body: body.into(),
            data: Value::Object(Default::default()),
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

pub struct NotificationService<'a> {
    state: &'a AppState,
}

impl<'a> NotificationService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Logs one notification per recipient and dispatches each
    ///
    /// A delivery failure marks that log `failed`; it never fails the call.
    pub async fn notify(
        &self,
        organization_id: Uuid,
        recipients: &[Uuid],
        notice: &Notice,
    ) -> ServiceResult<Vec<NotificationLog>> {
        let repo = &self.state.repos.notifications;
        let mut logs = Vec::with_capacity(recipients.len());

        for &user_id in recipients {
            let mut log = NotificationLog::new(
                organization_id,
                user_id,
                notice.channel,
                &notice.kind,
                &notice.subject,
                &notice.body,
                notice.data.clone(),
            )?;
            repo.insert(&log).await?;

            match self.state.notifier.send(&log).await {
                Ok(()) => log.mark_sent()?,
                Err(e) => {
                    warn!(notification_id = %log.id, user_id = %user_id, error = %e, "Notification delivery failed");
                    log.mark_failed(e.to_string())?;
                }
            }
            repo.save(&log).await?;
            logs.push(log);
        }

        Ok(logs)
    }

    /// Notifies every player on a team roster
    pub async fn notify_roster(&self, team: &Team, notice: &Notice) -> ServiceResult<Vec<NotificationLog>> {
        let roster = self.state.repos.teams.list_roster(team.id()).await?;
        let recipients: Vec<Uuid> = roster.iter().map(|p| p.player_id).collect();
        self.notify(team.organization_id(), &recipients, notice).await
    }

    /// Side-effect notification for another use case; errors are only logged
    pub(crate) async fn announce(&self, organization_id: Uuid, recipients: &[Uuid], notice: Notice) {
        match self.notify(organization_id, recipients, &notice).await {
            Ok(logs) => debug!(kind = %notice.kind, count = logs.len(), "Notifications logged"),
            Err(e) => warn!(kind = %notice.kind, error = %e, "Failed to log notifications"),
        }
    }

    pub(crate) async fn announce_to_roster(&self, team: &Team, notice: Notice) {
        if let Err(e) = self.notify_roster(team, &notice).await {
            warn!(kind = %notice.kind, team_id = %team.id(), error = %e, "Failed to notify roster");
        }
    }

    /// Coach or admin message to a whole team
    pub async fn broadcast(
        &self,
        actor: &Actor,
        team_id: Uuid,
        notice: Notice,
    ) -> ServiceResult<Vec<NotificationLog>> {
        actor.require(Permission::SendNotifications)?;
        let team = access::team(self.state, actor, team_id).await?;
        let notice = Notice {
            data: serde_json::json!({ "team_id": team.id(), "sender_id": actor.user_id }),
            ..notice
        };
        self.notify_roster(&team, &notice).await
    }

    pub async fn inbox(&self, actor: &Actor) -> ServiceResult<Vec<NotificationLog>> {
        Ok(self.state.repos.notifications.list_for_user(actor.user_id).await?)
    }

    /// Marks one of the caller's own notifications read
    pub async fn mark_read(&self, actor: &Actor, id: Uuid) -> ServiceResult<NotificationLog> {
        let repo = &self.state.repos.notifications;
        let mut log = repo
            .find_by_id(id)
            .await?
            .filter(|n| n.user_id == actor.user_id)
            .ok_or_else(|| ServiceError::not_found("Notification"))?;
        log.mark_read();
        repo.save(&log).await?;
        Ok(log)
    }

    pub async fn organization_log(
        &self,
        actor: &Actor,
        organization_id: Uuid,
    ) -> ServiceResult<Vec<NotificationLog>> {
        actor.require(Permission::ManageOrganization)?;
        let org = access::organization(self.state, actor, organization_id).await?;
        Ok(self.state.repos.notifications.list_for_organization(org.id).await?)
    }
}
