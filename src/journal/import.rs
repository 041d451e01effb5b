use anyhow::{Context, Result as AnyResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::error::{JournalError, Result};
use super::types::{start_of_day, Journal};
use crate::attempt::{BlocAttempt, Style};

/// Bulk data to load into a journal, one entry per session.
///
/// Example YAML:
/// ```yaml
/// sessions:
///   - date: "13/02/2025"
///     blocs:
///       - { difficulty: 3, style: DA, retry: 0, terminate: true }
///       - { difficulty: 7, style: DE, retry: 2, terminate: false }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeedFile {
    #[serde(default)]
    pub sessions: Vec<SeedSession>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSession {
    /// "YYYY-MM-DD" or "DD/MM/YYYY"
    pub date: String,
    #[serde(default)]
    pub blocs: Vec<SeedBloc>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeedBloc {
    pub difficulty: u32,
    pub style: String,
    #[serde(alias = "retry")]
    pub retry_count: u32,
    #[serde(alias = "terminate")]
    pub terminated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub sessions: usize,
    pub blocs: usize,
}

/// Parse a session date written as ISO ("2025-02-13") or day-first ("13/02/2025").
pub fn parse_session_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| JournalError::InvalidDate(s.to_string()))
}

/// Read a seed file (YAML, or JSON which parses as YAML)
pub fn load_seed_file(path: &Path) -> AnyResult<SeedFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file at {}", path.display()))?;
    let seed: SeedFile = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse import file {}", path.display()))?;
    Ok(seed)
}

/// Load a seed into the journal.
///
/// With `replace`, existing records are dropped first and ids restart at 1.
/// Imported records are timestamped at midnight UTC of their session date.
/// Either every record is imported or the journal is left unchanged.
pub fn import_seed(journal: &mut Journal, seed: &SeedFile, replace: bool) -> Result<ImportSummary> {
    let mut staged = if replace { Journal::new() } else { journal.clone() };
    let mut summary = ImportSummary { sessions: 0, blocs: 0 };

    for entry in &seed.sessions {
        let date = parse_session_date(&entry.date)?;
        let created_at = start_of_day(date);
        let session = staged.insert_session(date, created_at);
        summary.sessions += 1;

        for bloc in &entry.blocs {
            let attempt = BlocAttempt {
                difficulty: bloc.difficulty,
                style: Style::from(bloc.style.as_str()),
                retry_count: bloc.retry_count,
                terminated: bloc.terminated,
            };
            staged.insert_bloc(session.id, attempt, created_at)?;
            summary.blocs += 1;
        }
    }

    *journal = staged;
    tracing::info!(sessions = summary.sessions, blocs = summary.blocs, replace, "import complete");
    Ok(summary)
}
