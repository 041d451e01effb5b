//! Journal-wide statistics.
//!
//! Unlike a session summary these are plain dashboard figures: rates and
//! averages over an empty journal read as 0.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::journal::{Bloc, Journal};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlocStats {
    pub total: usize,
    pub by_difficulty: BTreeMap<u32, usize>,
    pub by_style: BTreeMap<String, usize>,
    /// Mean retries per bloc, rounded to 2 decimals
    pub avg_retry: f64,
    /// Percentage of completed blocs, rounded to 2 decimals
    pub terminate_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub this_week: usize,
    pub this_month: usize,
    pub total_blocs: usize,
}

pub fn bloc_stats(blocs: &[Bloc]) -> BlocStats {
    let total = blocs.len();
    let mut by_difficulty = BTreeMap::new();
    let mut by_style = BTreeMap::new();
    let mut retries: u64 = 0;
    let mut terminated = 0usize;

    for bloc in blocs {
        *by_difficulty.entry(bloc.attempt.difficulty).or_insert(0) += 1;
        *by_style.entry(bloc.attempt.style.label().to_string()).or_insert(0) += 1;
        retries += u64::from(bloc.attempt.retry_count);
        if bloc.attempt.terminated {
            terminated += 1;
        }
    }

    let (avg_retry, terminate_rate) = if total > 0 {
        (
            retries as f64 / total as f64,
            terminated as f64 / total as f64 * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    BlocStats {
        total,
        by_difficulty,
        by_style,
        avg_retry: round2(avg_retry),
        terminate_rate: round2(terminate_rate),
    }
}

/// Session counts by creation time: the last 7 and 30 days before `now`.
pub fn session_stats(journal: &Journal, now: DateTime<Utc>) -> SessionStats {
    let week_ago = now - Duration::days(7);
    let month_ago = now - Duration::days(30);

    SessionStats {
        total: journal.sessions.len(),
        this_week: journal.sessions.iter().filter(|s| s.created_at >= week_ago).count(),
        this_month: journal.sessions.iter().filter(|s| s.created_at >= month_ago).count(),
        total_blocs: journal.blocs.len(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
