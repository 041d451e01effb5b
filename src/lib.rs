pub mod attempt;
pub mod config;
pub mod journal;
pub mod output;
pub mod performance;
pub mod scoring;
pub mod stats;

pub use attempt::{BlocAttempt, Style};
pub use performance::{aggregate, aggregate_with, SessionPerformance};
pub use scoring::{score, score_with, ScoringConfig};
