use serde::Serialize;

use super::config::ScoringConfig;
use crate::attempt::BlocAttempt;

#[derive(Debug, Clone, Serialize)]
pub struct FactorContribution {
    pub label: String,       // e.g. "Retries", "Style", "Completion"
    pub description: String, // e.g. "3 retries -> x1.23", "style 'DE' -> x1.2"
    pub before: f64,         // Score before this factor
    pub after: f64,          // Score after this factor
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    /// difficulty * difficulty_weight
    pub base_score: f64,
    pub factors: Vec<FactorContribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Score one bloc with the built-in constants.
///
/// `difficulty * 2 * (1 + 0.7 / max(retries, 1)) * (DE ? 1.2 : 1) * (terminated ? 1.1 : 1)`
pub fn score(attempt: &BlocAttempt) -> f64 {
    score_with(attempt, &ScoringConfig::default())
}

/// Score one bloc with a configuration. Total over its input: no validation,
/// no failure.
pub fn score_with(attempt: &BlocAttempt, config: &ScoringConfig) -> f64 {
    let base = attempt.difficulty as f64 * config.difficulty_weight();
    base * retry_multiplier(attempt, config)
        * style_multiplier(attempt, config)
        * terminated_multiplier(attempt, config)
}

/// Score one bloc and record how each factor moved the score.
///
/// Multiplies in the same order as `score_with`, so the two always agree.
pub fn calculate_score(attempt: &BlocAttempt, config: &ScoringConfig) -> ScoreResult {
    let base_score = attempt.difficulty as f64 * config.difficulty_weight();
    let mut score = base_score;
    let mut factors = Vec::with_capacity(3);

    let retry = retry_multiplier(attempt, config);
    let before = score;
    score *= retry;
    factors.push(FactorContribution {
        label: "Retries".to_string(),
        description: format!(
            "{} retries (counted as {}), bonus {} -> x{:.3}",
            attempt.retry_count,
            retry_factor(attempt),
            config.retry_bonus(),
            retry
        ),
        before,
        after: score,
    });

    let style = style_multiplier(attempt, config);
    let before = score;
    score *= style;
    let description = if is_hard_style(attempt, config) {
        format!("style '{}' -> x{}", attempt.style, style)
    } else {
        format!("style '{}' is baseline -> x1", attempt.style)
    };
    factors.push(FactorContribution {
        label: "Style".to_string(),
        description,
        before,
        after: score,
    });

    let terminated = terminated_multiplier(attempt, config);
    let before = score;
    score *= terminated;
    let description = if attempt.terminated {
        format!("completed -> x{}", terminated)
    } else {
        "not completed -> x1".to_string()
    };
    factors.push(FactorContribution {
        label: "Completion".to_string(),
        description,
        before,
        after: score,
    });

    ScoreResult {
        score,
        breakdown: ScoreBreakdown {
            base_score,
            factors,
        },
    }
}

/// Zero retries count as one so the bonus term stays defined.
fn retry_factor(attempt: &BlocAttempt) -> u32 {
    attempt.retry_count.max(1)
}

fn retry_multiplier(attempt: &BlocAttempt, config: &ScoringConfig) -> f64 {
    1.0 + config.retry_bonus() / retry_factor(attempt) as f64
}

fn is_hard_style(attempt: &BlocAttempt, config: &ScoringConfig) -> bool {
    attempt.style.label() == config.hard_style()
}

fn style_multiplier(attempt: &BlocAttempt, config: &ScoringConfig) -> f64 {
    if is_hard_style(attempt, config) {
        config.hard_style_factor()
    } else {
        1.0
    }
}

fn terminated_multiplier(attempt: &BlocAttempt, config: &ScoringConfig) -> f64 {
    if attempt.terminated {
        config.terminated_factor()
    } else {
        1.0
    }
}
