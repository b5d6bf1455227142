use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::skill::validate_rating;
use crate::domain::errors::{optional_text, DomainResult};

/// The four scored areas of a player evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationScores {
    pub technical: i32,
    pub tactical: i32,
    pub physical: i32,
    pub mental: i32,
}

impl EvaluationScores {
    pub fn validate(self) -> DomainResult<Self> {
        validate_rating(self.technical, "Technical score")?;
        validate_rating(self.tactical, "Tactical score")?;
        validate_rating(self.physical, "Physical score")?;
        validate_rating(self.mental, "Mental score")?;
        Ok(self)
    }

    /// Mean of the four scores with two decimal places
    pub fn overall(&self) -> Decimal {
        let sum = self.technical + self.tactical + self.physical + self.mental;
        (Decimal::from(sum) / Decimal::from(4)).round_dp(2)
    }
}

/// A structured review of a player by a coach
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerEvaluation {
    pub id: Uuid,
    pub player_id: Uuid,
    pub team_id: Uuid,
    pub evaluator_id: Uuid,
    pub match_id: Option<Uuid>,
    pub evaluation_date: NaiveDate,
    #[serde(flatten)]
    pub scores: EvaluationScores,
    pub overall_score: Decimal,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording an evaluation
#[derive(Debug, Clone)]
pub struct NewEvaluation {
    pub player_id: Uuid,
    pub team_id: Uuid,
    pub evaluator_id: Uuid,
    pub match_id: Option<Uuid>,
    pub evaluation_date: Option<NaiveDate>,
    pub scores: EvaluationScores,
    pub strengths: Option<String>,
    pub improvements: Option<String>,
    pub comments: Option<String>,
}

impl PlayerEvaluation {
    pub fn new(input: NewEvaluation) -> DomainResult<Self> {
        let scores = input.scores.validate()?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            player_id: input.player_id,
            team_id: input.team_id,
            evaluator_id: input.evaluator_id,
            match_id: input.match_id,
            evaluation_date: input.evaluation_date.unwrap_or_else(|| now.date_naive()),
            overall_score: scores.overall(),
            scores,
            strengths: optional_text(input.strengths),
            improvements: optional_text(input.improvements),
            comments: optional_text(input.comments),
            created_at: now,
        })
    }
}
