use chrono::NaiveDate;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{access, Actor, Notice, NotificationService, ServiceResult};
use crate::domain::errors::DomainError;
use crate::domain::game_match::MatchStatus;
use crate::domain::player::{EvaluationScores, NewEvaluation, PlayerEvaluation, PlayerSkill};
use crate::domain::user::Permission;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct SkillRating {
    pub skill_name: String,
    pub rating: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub player_id: Uuid,
    pub match_id: Option<Uuid>,
    pub evaluation_date: Option<NaiveDate>,
    pub scores: EvaluationScores,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub comments: Option<String>,
}

pub struct PlayerService<'a> {
    state: &'a AppState,
}

impl<'a> PlayerService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Records ratings; a skill already rated under the same name is replaced
    pub async fn rate_skills(
        &self,
        actor: &Actor,
        player_id: Uuid,
        ratings: Vec<SkillRating>,
    ) -> ServiceResult<Vec<PlayerSkill>> {
        actor.require(Permission::EvaluatePlayers)?;
        let player = access::player(self.state, actor, player_id).await?;
        if ratings.is_empty() {
            return Err(DomainError::validation("At least one skill rating is required").into());
        }

        let skills = ratings
            .into_iter()
            .map(|r| PlayerSkill::new(player.id, &r.skill_name, r.rating, r.notes, actor.user_id))
            .collect::<Result<Vec<_>, _>>()?;
        for skill in &skills {
            self.state.repos.players.upsert_skill(skill).await?;
        }
        info!(player_id = %player.id, count = skills.len(), "Skills rated");

        Ok(self.state.repos.players.list_skills(player.id).await?)
    }

    pub async fn skills(&self, actor: &Actor, player_id: Uuid) -> ServiceResult<Vec<PlayerSkill>> {
        actor.require(Permission::ViewTeams)?;
        let player = access::player(self.state, actor, player_id).await?;
        Ok(self.state.repos.players.list_skills(player.id).await?)
    }

    /// Records a structured evaluation of a rostered player
    ///
    /// # Business Rules
    /// - The player is on the team roster
    /// - A referenced match belongs to the team and is completed
    pub async fn evaluate(
        &self,
        actor: &Actor,
        team_id: Uuid,
        request: EvaluationRequest,
    ) -> ServiceResult<PlayerEvaluation> {
        actor.require(Permission::EvaluatePlayers)?;
        let team = access::team(self.state, actor, team_id).await?;
        let repos = &self.state.repos;

        if repos.teams.find_player(team.id(), request.player_id).await?.is_none() {
            return Err(DomainError::validation("Player is not on the team roster").into());
        }
        if let Some(match_id) = request.match_id {
            let game = repos
                .matches
                .find_by_id(match_id)
                .await?
                .filter(|g| g.team_id() == team.id())
                .ok_or_else(|| DomainError::validation("Match does not belong to the team"))?;
            if game.status() != MatchStatus::Completed {
                return Err(DomainError::validation(format!(
                    "Only completed matches can be evaluated (status: {})",
                    game.status()
                ))
                .into());
            }
        }

        let evaluation = PlayerEvaluation::new(NewEvaluation {
            player_id: request.player_id,
            team_id: team.id(),
            evaluator_id: actor.user_id,
            match_id: request.match_id,
            evaluation_date: request.evaluation_date,
            scores: request.scores,
            strengths: request.strengths,
            improvements: request.improvements,
            comments: request.comments,
        })?;
        repos.players.add_evaluation(&evaluation).await?;
        info!(
            evaluation_id = %evaluation.id,
            player_id = %evaluation.player_id,
            overall = %evaluation.overall_score,
            "Player evaluated"
        );

        NotificationService::new(self.state)
            .announce(
                team.organization_id(),
                &[evaluation.player_id],
                Notice::in_app(
                    "player.evaluated",
                    format!("New evaluation from {}", team.name()),
                    format!("Overall score {}.", evaluation.overall_score),
                )
                .with_data(json!({ "evaluation_id": evaluation.id, "team_id": team.id() })),
            )
            .await;

        Ok(evaluation)
    }

    pub async fn evaluations(&self, actor: &Actor, player_id: Uuid) -> ServiceResult<Vec<PlayerEvaluation>> {
        actor.require(Permission::ViewTeams)?;
        let player = access::player(self.state, actor, player_id).await?;
        Ok(self.state.repos.players.list_evaluations(player.id).await?)
    }
}
