use serde::{Deserialize, Serialize};

use crate::attempt::DE_LABEL;

pub const DEFAULT_DIFFICULTY_WEIGHT: f64 = 2.0;
pub const DEFAULT_RETRY_BONUS: f64 = 0.7;
pub const DEFAULT_HARD_STYLE_FACTOR: f64 = 1.2;
pub const DEFAULT_TERMINATED_FACTOR: f64 = 1.1;

/// Bloc scoring configuration.
///
/// A bloc scores
/// `difficulty * difficulty_weight * (1 + retry_bonus / max(retries, 1))`,
/// multiplied by `hard_style_factor` when its style is `hard_style` and by
/// `terminated_factor` when it was completed. Every field is optional and
/// falls back to the built-in constant.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   difficulty_weight: 2
///   retry_bonus: 0.7
///   hard_style: DE
///   hard_style_factor: 1.2
///   terminated_factor: 1.1
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Points per difficulty grade (default: 2.0)
    #[serde(default)]
    pub difficulty_weight: Option<f64>,

    /// Bonus fraction divided by the retry count (default: 0.7)
    /// Zero retries are treated as one, so a flash earns the full bonus.
    #[serde(default)]
    pub retry_bonus: Option<f64>,

    /// Style label that earns `hard_style_factor` (default: "DE")
    #[serde(default)]
    pub hard_style: Option<String>,

    /// Multiplier for blocs in the hard style (default: 1.2)
    #[serde(default)]
    pub hard_style_factor: Option<f64>,

    /// Multiplier for completed blocs (default: 1.1)
    #[serde(default)]
    pub terminated_factor: Option<f64>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            difficulty_weight: Some(DEFAULT_DIFFICULTY_WEIGHT),
            retry_bonus: Some(DEFAULT_RETRY_BONUS),
            hard_style: Some(DE_LABEL.to_string()),
            hard_style_factor: Some(DEFAULT_HARD_STYLE_FACTOR),
            terminated_factor: Some(DEFAULT_TERMINATED_FACTOR),
        }
    }
}

impl ScoringConfig {
    pub fn difficulty_weight(&self) -> f64 {
        self.difficulty_weight.unwrap_or(DEFAULT_DIFFICULTY_WEIGHT)
    }

    pub fn retry_bonus(&self) -> f64 {
        self.retry_bonus.unwrap_or(DEFAULT_RETRY_BONUS)
    }

    pub fn hard_style(&self) -> &str {
        self.hard_style.as_deref().unwrap_or(DE_LABEL)
    }

    pub fn hard_style_factor(&self) -> f64 {
        self.hard_style_factor.unwrap_or(DEFAULT_HARD_STYLE_FACTOR)
    }

    pub fn terminated_factor(&self) -> f64 {
        self.terminated_factor.unwrap_or(DEFAULT_TERMINATED_FACTOR)
    }
}
