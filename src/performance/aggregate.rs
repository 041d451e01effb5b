use serde::{Deserialize, Serialize};

use crate::attempt::BlocAttempt;
use crate::scoring::{score_with, ScoringConfig};

/// Performance summary of one session.
///
/// Extrema and averages are `None` when the set they range over is empty, so
/// an empty session never reports a NaN or a fake zero grade.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionPerformance {
    pub bloc_count: usize,
    pub terminated_count: usize,
    /// Blocs with at least one retry
    pub tried_count: usize,
    /// Blocs labelled exactly "DE", whatever `hard_style` the scoring uses
    pub de_count: usize,
    /// Every bloc whose style is not "DE"
    pub da_count: usize,
    pub flashed_count: usize,
    pub total_retries: u64,
    /// bloc_count + total_retries
    pub total_attempts: u64,
    pub difficulty_max: Option<u32>,
    pub difficulty_min: Option<u32>,
    pub average_difficulty: Option<f64>,
    pub average_difficulty_tried: Option<f64>,
    pub average_difficulty_flashed: Option<f64>,
    pub total_score: f64,
}

impl SessionPerformance {
    pub fn is_empty(&self) -> bool {
        self.bloc_count == 0
    }
}

/// Summarize a session's blocs with the built-in scoring constants.
pub fn aggregate<B: AsRef<BlocAttempt>>(blocs: &[B]) -> SessionPerformance {
    aggregate_with(blocs, &ScoringConfig::default())
}

/// Summarize a session's blocs.
///
/// The result depends only on the multiset of blocs: integer sums are exact,
/// and per-bloc scores are added in ascending order so the float total does
/// not change when the input is reordered.
pub fn aggregate_with<B: AsRef<BlocAttempt>>(blocs: &[B], config: &ScoringConfig) -> SessionPerformance {
    let mut perf = SessionPerformance::default();
    let mut difficulty_sum: u64 = 0;
    let mut tried_difficulty_sum: u64 = 0;
    let mut flashed_difficulty_sum: u64 = 0;
    let mut scores = Vec::with_capacity(blocs.len());

    for bloc in blocs {
        let bloc = bloc.as_ref();
        let difficulty = u64::from(bloc.difficulty);

        perf.bloc_count += 1;
        perf.total_retries += u64::from(bloc.retry_count);
        difficulty_sum += difficulty;

        if bloc.terminated {
            perf.terminated_count += 1;
        }
        if bloc.is_tried() {
            perf.tried_count += 1;
            tried_difficulty_sum += difficulty;
        }
        if bloc.is_flashed() {
            perf.flashed_count += 1;
            flashed_difficulty_sum += difficulty;
        }
        if bloc.style.is_de() {
            perf.de_count += 1;
        } else {
            perf.da_count += 1;
        }

        perf.difficulty_max = Some(perf.difficulty_max.map_or(bloc.difficulty, |max| max.max(bloc.difficulty)));
        perf.difficulty_min = Some(perf.difficulty_min.map_or(bloc.difficulty, |min| min.min(bloc.difficulty)));

        scores.push(score_with(bloc, config));
    }

    perf.total_attempts = perf.bloc_count as u64 + perf.total_retries;
    perf.average_difficulty = mean(difficulty_sum, perf.bloc_count);
    perf.average_difficulty_tried = mean(tried_difficulty_sum, perf.tried_count);
    perf.average_difficulty_flashed = mean(flashed_difficulty_sum, perf.flashed_count);

    scores.sort_by(f64::total_cmp);
    perf.total_score = scores.iter().fold(0.0, |total, score| total + score);

    perf
}

fn mean(sum: u64, count: usize) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}
