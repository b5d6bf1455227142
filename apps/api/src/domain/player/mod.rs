// Player development domain: skill ratings and coach evaluations

pub mod evaluation;
pub mod skill;

pub use evaluation::{EvaluationScores, NewEvaluation, PlayerEvaluation};
pub use skill::{average_rating, PlayerSkill};
