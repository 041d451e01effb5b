pub mod config;
pub mod engine;
pub mod validation;

pub use config::*;
pub use engine::{calculate_score, score, score_with, FactorContribution, ScoreBreakdown, ScoreResult};
pub use validation::validate_scoring;
