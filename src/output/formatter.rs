use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::journal::{Bloc, Pagination, Session, SessionBlocCount};
use crate::performance::SessionPerformance;
use crate::scoring::ScoreResult;
use crate::stats::{BlocStats, SessionStats};

/// Shown in place of an extremum or average that has no data behind it
pub const NO_DATA: &str = "n/a";

const MAX_BAR_WIDTH: usize = 30;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Scores are shown with two decimals ("16.28")
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

fn format_average(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| format!("{:.2}", v))
}

fn format_grade(value: Option<u32>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), |v| v.to_string())
}

/// A session with its computed performance for list display
pub struct SessionRow<'a> {
    pub session: &'a Session,
    pub performance: &'a SessionPerformance,
}

/// A bloc with its score, for list display and JSON output
#[derive(Serialize)]
pub struct ScoredBloc<'a> {
    #[serde(flatten)]
    pub bloc: &'a Bloc,
    pub score: f64,
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Bar of `#` proportional to `score / max`, at most `width` wide.
fn score_bar(score: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || width == 0 {
        return String::new();
    }
    let filled = ((score / max) * width as f64).round().clamp(0.0, width as f64) as usize;
    "#".repeat(filled)
}

/// Multi-line performance summary of one session
pub fn format_performance(perf: &SessionPerformance, use_colors: bool) -> String {
    if perf.is_empty() {
        return "No blocs recorded.".to_string();
    }

    let score = format_score(perf.total_score);
    let score = if use_colors {
        score.bold().to_string()
    } else {
        score
    };

    let lines = [
        format!("Score: {}", score),
        format!(
            "Blocs: {} ({} completed, {} flashed, {} tried)",
            perf.bloc_count, perf.terminated_count, perf.flashed_count, perf.tried_count
        ),
        format!("Styles: {} DE / {} other", perf.de_count, perf.da_count),
        format!(
            "Attempts: {} ({} retries)",
            perf.total_attempts, perf.total_retries
        ),
        format!(
            "Difficulty: min {} / max {} / avg {}",
            format_grade(perf.difficulty_min),
            format_grade(perf.difficulty_max),
            format_average(perf.average_difficulty)
        ),
        format!(
            "Avg difficulty tried: {}",
            format_average(perf.average_difficulty_tried)
        ),
        format!(
            "Avg difficulty flashed: {}",
            format_average(perf.average_difficulty_flashed)
        ),
    ];
    lines.join("\n")
}

/// Heading line for a single session
pub fn format_session_header(session: &Session, use_colors: bool) -> String {
    let title = format!("Session #{} - {}", session.id, session.date);
    if use_colors {
        title.bold().to_string()
    } else {
        title
    }
}

/// Format sessions as a table: id, date, blocs, flashed, score and a score bar
/// scaled against the best session in the list.
pub fn format_session_table(rows: &[SessionRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No sessions found.".to_string();
    }

    // id(5) + date(10) + blocs(5) + flashed(5) + score(8) + separators
    let fixed_width = 5 + 10 + 5 + 5 + 8 + 2 * 5;
    let bar_width = match get_terminal_width() {
        Some(width) if width > fixed_width => (width - fixed_width).min(MAX_BAR_WIDTH),
        Some(_) => 0,
        None => MAX_BAR_WIDTH,
    };
    let max_score = rows
        .iter()
        .map(|row| row.performance.total_score)
        .fold(0.0, f64::max);

    rows.iter()
        .map(|row| {
            let id = format!("{:>4}.", row.session.id);
            let blocs = format!("{:>5}", row.performance.bloc_count);
            let flashed = format!("{:>5}", row.performance.flashed_count);
            let score = format!("{:>8}", format_score(row.performance.total_score));
            let bar = score_bar(row.performance.total_score, max_score, bar_width);

            if use_colors {
                format!(
                    "{}  {}  {}  {}  {}  {}",
                    id.dimmed(),
                    row.session.date,
                    blocs,
                    flashed.green(),
                    score.bold(),
                    bar.cyan()
                )
            } else {
                format!(
                    "{}  {}  {}  {}  {}  {}",
                    id, row.session.date, blocs, flashed, score, bar
                )
                .trim_end()
                .to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One bloc on one line: id, grade, style, retries, completion and score
pub fn format_bloc_line(scored: &ScoredBloc, use_colors: bool) -> String {
    let attempt = &scored.bloc.attempt;
    let status = if attempt.is_flashed() {
        "flash"
    } else if attempt.terminated {
        "done"
    } else {
        "open"
    };
    let id = format!("{:>4}.", scored.bloc.id);
    let grade = format!("{:>2}", attempt.difficulty);
    let style = format!("{:<6}", attempt.style.label());
    let retries = format!("{:>2} retries", attempt.retry_count);
    let status_col = format!("{:<5}", status);
    let score = format!("{:>7}", format_score(scored.score));

    if use_colors {
        let status_col = match status {
            "flash" => status_col.green().to_string(),
            "done" => status_col.cyan().to_string(),
            _ => status_col.yellow().to_string(),
        };
        format!(
            "{} {}  {}  {}  {}  {}  session #{}",
            id.dimmed(),
            grade.bold(),
            style,
            retries,
            status_col,
            score.bold(),
            scored.bloc.session_id
        )
    } else {
        format!(
            "{} {}  {}  {}  {}  {}  session #{}",
            id, grade, style, retries, status_col, score, scored.bloc.session_id
        )
    }
}

pub fn format_bloc_table(blocs: &[ScoredBloc], use_colors: bool) -> String {
    if blocs.is_empty() {
        return "No blocs found.".to_string();
    }

    blocs
        .iter()
        .map(|scored| format_bloc_line(scored, use_colors))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Factor-by-factor explanation of a bloc score
pub fn format_breakdown(result: &ScoreResult, use_colors: bool) -> String {
    let mut lines = vec![format!(
        "  Base (difficulty x weight): {}",
        format_score(result.breakdown.base_score)
    )];
    for factor in &result.breakdown.factors {
        lines.push(format!(
            "  {}: {} ({} -> {})",
            factor.label,
            factor.description,
            format_score(factor.before),
            format_score(factor.after)
        ));
    }
    let total = format_score(result.score);
    if use_colors {
        lines.push(format!("  Score: {}", total.bold()));
    } else {
        lines.push(format!("  Score: {}", total));
    }
    lines.join("\n")
}

pub fn format_pagination(pagination: &Pagination) -> String {
    format!(
        "Page {}/{} ({} total)",
        pagination.page,
        pagination.total_pages.max(1),
        pagination.total
    )
}

pub fn format_session_count(count: &SessionBlocCount) -> String {
    format!(
        "Session #{} - {}: {} blocs",
        count.session.id, count.session.date, count.bloc_count
    )
}

pub fn format_bloc_stats(stats: &BlocStats) -> String {
    let mut lines = vec![
        format!("Blocs: {}", stats.total),
        format!("Average retries: {:.2}", stats.avg_retry),
        format!("Completion rate: {:.2}%", stats.terminate_rate),
    ];
    if !stats.by_difficulty.is_empty() {
        lines.push("By difficulty:".to_string());
        for (difficulty, count) in &stats.by_difficulty {
            lines.push(format!("  {:>2}: {}", difficulty, count));
        }
    }
    if !stats.by_style.is_empty() {
        lines.push("By style:".to_string());
        for (style, count) in &stats.by_style {
            lines.push(format!("  {}: {}", style, count));
        }
    }
    lines.join("\n")
}

pub fn format_session_stats(stats: &SessionStats) -> String {
    format!(
        "Sessions: {} ({} this week, {} this month)\nBlocs: {}",
        stats.total, stats.this_week, stats.this_month, stats.total_blocs
    )
}
