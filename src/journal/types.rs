use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::{JournalError, Result};
use super::query::{paginate, BlocQuery, Page, SessionQuery};
use crate::attempt::{BlocAttempt, Style};
use crate::performance::{aggregate_with, SessionPerformance};
use crate::scoring::ScoringConfig;

pub const JOURNAL_VERSION: u32 = 1;
pub const MIN_DIFFICULTY: u32 = 1;
pub const MAX_DIFFICULTY: u32 = 10;

/// One training visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: u64,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// One recorded attempt on a problem, owned by a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bloc {
    pub id: u64,
    pub session_id: u64,
    #[serde(flatten)]
    pub attempt: BlocAttempt,
    pub created_at: DateTime<Utc>,
}

impl AsRef<BlocAttempt> for Bloc {
    fn as_ref(&self) -> &BlocAttempt {
        &self.attempt
    }
}

/// Partial update of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub date: Option<NaiveDate>,
}

/// Partial update of a bloc. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BlocUpdate {
    pub difficulty: Option<u32>,
    pub style: Option<Style>,
    pub retry_count: Option<u32>,
    pub terminated: Option<bool>,
}

impl BlocUpdate {
    pub fn is_empty(&self) -> bool {
        self.difficulty.is_none()
            && self.style.is_none()
            && self.retry_count.is_none()
            && self.terminated.is_none()
    }
}

/// A session with its blocs and computed performance.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    #[serde(flatten)]
    pub session: Session,
    pub blocs: Vec<Bloc>,
    pub performance: SessionPerformance,
}

/// A session with the number of blocs it holds.
#[derive(Debug, Clone, Serialize)]
pub struct SessionBlocCount {
    #[serde(flatten)]
    pub session: Session,
    pub bloc_count: usize,
}

/// All recorded sessions and blocs.
///
/// Ids start at 1 and are never reused, even after deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    pub version: u32,
    #[serde(default = "first_id")]
    pub next_session_id: u64,
    #[serde(default = "first_id")]
    pub next_bloc_id: u64,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub blocs: Vec<Bloc>,
}

fn first_id() -> u64 {
    1
}

impl Default for Journal {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the attributes a bloc must satisfy before it is stored.
pub fn validate_attempt(attempt: &BlocAttempt) -> Result<()> {
    if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&attempt.difficulty) {
        return Err(JournalError::InvalidBloc(format!(
            "difficulty must be between {} and {}, got {}",
            MIN_DIFFICULTY, MAX_DIFFICULTY, attempt.difficulty
        )));
    }
    if attempt.style.label().trim().is_empty() {
        return Err(JournalError::InvalidBloc("style must not be empty".to_string()));
    }
    Ok(())
}

/// Midnight UTC of a session date, used as creation time for imported records.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

impl Journal {
    /// Create an empty journal at the current version
    pub fn new() -> Self {
        Self {
            version: JOURNAL_VERSION,
            next_session_id: 1,
            next_bloc_id: 1,
            sessions: Vec::new(),
            blocs: Vec::new(),
        }
    }

    pub fn session(&self, id: u64) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    pub fn bloc(&self, id: u64) -> Option<&Bloc> {
        self.blocs.iter().find(|b| b.id == id)
    }

    pub fn create_session(&mut self, date: NaiveDate) -> Session {
        self.insert_session(date, Utc::now())
    }

    pub(crate) fn insert_session(&mut self, date: NaiveDate, created_at: DateTime<Utc>) -> Session {
        let session = Session {
            id: self.next_session_id,
            date,
            created_at,
        };
        self.next_session_id += 1;
        self.sessions.push(session.clone());
        tracing::debug!(session_id = session.id, %date, "session created");
        session
    }

    pub fn update_session(&mut self, id: u64, update: SessionUpdate) -> Result<Session> {
        let session = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(JournalError::SessionNotFound(id))?;
        if let Some(date) = update.date {
            session.date = date;
        }
        tracing::debug!(session_id = id, "session updated");
        Ok(session.clone())
    }

    /// Delete a session and every bloc it holds.
    /// Returns the number of blocs removed with it.
    pub fn delete_session(&mut self, id: u64) -> Result<usize> {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            return Err(JournalError::SessionNotFound(id));
        }

        let blocs_before = self.blocs.len();
        self.blocs.retain(|b| b.session_id != id);
        let removed = blocs_before - self.blocs.len();
        tracing::debug!(session_id = id, blocs_removed = removed, "session deleted");
        Ok(removed)
    }

    /// Record a bloc in an existing session.
    pub fn create_bloc(&mut self, session_id: u64, attempt: BlocAttempt) -> Result<Bloc> {
        self.insert_bloc(session_id, attempt, Utc::now())
    }

    pub(crate) fn insert_bloc(
        &mut self,
        session_id: u64,
        attempt: BlocAttempt,
        created_at: DateTime<Utc>,
    ) -> Result<Bloc> {
        if self.session(session_id).is_none() {
            return Err(JournalError::SessionNotFound(session_id));
        }
        validate_attempt(&attempt)?;

        let bloc = Bloc {
            id: self.next_bloc_id,
            session_id,
            attempt,
            created_at,
        };
        self.next_bloc_id += 1;
        self.blocs.push(bloc.clone());
        tracing::debug!(bloc_id = bloc.id, session_id, "bloc created");
        Ok(bloc)
    }

    pub fn update_bloc(&mut self, id: u64, update: BlocUpdate) -> Result<Bloc> {
        let bloc = self
            .blocs
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(JournalError::BlocNotFound(id))?;

        let mut attempt = bloc.attempt.clone();
        if let Some(difficulty) = update.difficulty {
            attempt.difficulty = difficulty;
        }
        if let Some(style) = update.style {
            attempt.style = style;
        }
        if let Some(retry_count) = update.retry_count {
            attempt.retry_count = retry_count;
        }
        if let Some(terminated) = update.terminated {
            attempt.terminated = terminated;
        }
        validate_attempt(&attempt)?;

        bloc.attempt = attempt;
        tracing::debug!(bloc_id = id, "bloc updated");
        Ok(bloc.clone())
    }

    pub fn delete_bloc(&mut self, id: u64) -> Result<()> {
        let before = self.blocs.len();
        self.blocs.retain(|b| b.id != id);
        if self.blocs.len() == before {
            return Err(JournalError::BlocNotFound(id));
        }
        tracing::debug!(bloc_id = id, "bloc deleted");
        Ok(())
    }

    /// Blocs of one session in creation order.
    pub fn blocs_for_session(&self, session_id: u64) -> Vec<&Bloc> {
        self.blocs.iter().filter(|b| b.session_id == session_id).collect()
    }

    /// Sessions matching the query, newest date first.
    pub fn list_sessions(&self, query: &SessionQuery) -> Result<Page<&Session>> {
        let mut sessions: Vec<&Session> = self
            .sessions
            .iter()
            .filter(|s| query.matches(s.date))
            .collect();
        sessions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        paginate(sessions, query.page, query.limit)
    }

    /// Blocs matching the query, most recently created first.
    pub fn list_blocs(&self, query: &BlocQuery) -> Result<Page<&Bloc>> {
        let mut blocs: Vec<&Bloc> = self
            .blocs
            .iter()
            .filter(|b| query.session_id.is_none_or(|id| b.session_id == id))
            .filter(|b| query.difficulty.is_none_or(|d| b.attempt.difficulty == d))
            .filter(|b| {
                query
                    .style
                    .as_deref()
                    .is_none_or(|style| b.attempt.style.label().contains(style))
            })
            .collect();
        blocs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        paginate(blocs, query.page, query.limit)
    }

    /// A session together with its blocs and performance summary.
    pub fn session_report(&self, id: u64, config: &ScoringConfig) -> Result<SessionReport> {
        let session = self.session(id).ok_or(JournalError::SessionNotFound(id))?;
        Ok(self.report_for(session, config))
    }

    pub fn report_for(&self, session: &Session, config: &ScoringConfig) -> SessionReport {
        let blocs: Vec<Bloc> = self.blocs_for_session(session.id).into_iter().cloned().collect();
        let performance = aggregate_with(&blocs, config);
        SessionReport {
            session: session.clone(),
            blocs,
            performance,
        }
    }

    pub fn session_bloc_count(&self, id: u64) -> Result<SessionBlocCount> {
        let session = self.session(id).ok_or(JournalError::SessionNotFound(id))?;
        Ok(SessionBlocCount {
            session: session.clone(),
            bloc_count: self.blocs.iter().filter(|b| b.session_id == id).count(),
        })
    }

    /// Drop every record and restart ids at 1.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn attempt(difficulty: u32, style: &str, retries: u32, terminated: bool) -> BlocAttempt {
        BlocAttempt::new(difficulty, style, retries, terminated)
    }

    #[test]
    fn test_new_journal_empty() {
        let journal = Journal::new();
        assert_eq!(journal.version, 1);
        assert!(journal.sessions.is_empty());
        assert!(journal.blocs.is_empty());
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut journal = Journal::new();
        let first = journal.create_session(date(2025, 2, 13));
        let second = journal.create_session(date(2025, 2, 18));
        assert_eq!((first.id, second.id), (1, 2));

        journal.delete_session(second.id).unwrap();
        let third = journal.create_session(date(2025, 2, 25));
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_create_bloc_requires_session() {
        let mut journal = Journal::new();
        let err = journal.create_bloc(42, attempt(5, "DA", 0, true)).unwrap_err();
        assert!(matches!(err, JournalError::SessionNotFound(42)));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_bloc_validates_difficulty_and_style() {
        let mut journal = Journal::new();
        let session = journal.create_session(date(2025, 2, 13));

        let err = journal.create_bloc(session.id, attempt(0, "DA", 0, true)).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(journal.create_bloc(session.id, attempt(11, "DA", 0, true)).is_err());
        assert!(journal.create_bloc(session.id, attempt(5, " ", 0, true)).is_err());
        assert!(journal.blocs.is_empty());
        // A rejected bloc does not consume an id
        assert_eq!(journal.create_bloc(session.id, attempt(10, "DE", 0, true)).unwrap().id, 1);
    }

    #[test]
    fn test_delete_session_cascades() {
        let mut journal = Journal::new();
        let keep = journal.create_session(date(2025, 2, 13));
        let drop = journal.create_session(date(2025, 2, 18));
        journal.create_bloc(keep.id, attempt(3, "DA", 0, true)).unwrap();
        journal.create_bloc(drop.id, attempt(4, "DE", 1, true)).unwrap();
        journal.create_bloc(drop.id, attempt(5, "DE", 2, false)).unwrap();

        assert_eq!(journal.delete_session(drop.id).unwrap(), 2);
        assert_eq!(journal.blocs.len(), 1);
        assert_eq!(journal.blocs[0].session_id, keep.id);
        assert!(journal.delete_session(drop.id).is_err());
    }

    #[test]
    fn test_update_bloc_partial() {
        let mut journal = Journal::new();
        let session = journal.create_session(date(2025, 2, 13));
        let bloc = journal.create_bloc(session.id, attempt(6, "DA", 3, false)).unwrap();

        let updated = journal
            .update_bloc(
                bloc.id,
                BlocUpdate {
                    terminated: Some(true),
                    style: Some(Style::De),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.attempt, attempt(6, "DE", 3, true));
        assert_eq!(updated.created_at, bloc.created_at);
    }

    #[test]
    fn test_update_bloc_rejects_invalid_and_keeps_old_value() {
        let mut journal = Journal::new();
        let session = journal.create_session(date(2025, 2, 13));
        let bloc = journal.create_bloc(session.id, attempt(6, "DA", 3, false)).unwrap();

        let result = journal.update_bloc(
            bloc.id,
            BlocUpdate {
                difficulty: Some(12),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(journal.bloc(bloc.id).unwrap().attempt.difficulty, 6);
        assert!(matches!(
            journal.update_bloc(99, BlocUpdate::default()),
            Err(JournalError::BlocNotFound(99))
        ));
    }

    #[test]
    fn test_update_session_date() {
        let mut journal = Journal::new();
        let session = journal.create_session(date(2025, 2, 13));
        let updated = journal
            .update_session(session.id, SessionUpdate { date: Some(date(2025, 3, 4)) })
            .unwrap();
        assert_eq!(updated.date, date(2025, 3, 4));
        assert!(journal.update_session(7, SessionUpdate::default()).is_err());
    }

    #[test]
    fn test_list_sessions_newest_first_with_range() {
        let mut journal = Journal::new();
        journal.create_session(date(2025, 2, 13));
        journal.create_session(date(2025, 6, 4));
        journal.create_session(date(2025, 3, 4));

        let page = journal.list_sessions(&SessionQuery::default()).unwrap();
        let dates: Vec<NaiveDate> = page.data.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(2025, 6, 4), date(2025, 3, 4), date(2025, 2, 13)]);

        let page = journal
            .list_sessions(&SessionQuery {
                date_from: Some(date(2025, 3, 1)),
                date_to: Some(date(2025, 3, 31)),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.pagination.total, 1);
    }

    #[test]
    fn test_list_blocs_filters() {
        let mut journal = Journal::new();
        let s1 = journal.create_session(date(2025, 2, 13));
        let s2 = journal.create_session(date(2025, 2, 18));
        let base = Utc::now();
        journal.insert_bloc(s1.id, attempt(5, "DA", 0, true), base).unwrap();
        journal.insert_bloc(s1.id, attempt(6, "DE", 1, true), base + Duration::seconds(1)).unwrap();
        journal.insert_bloc(s2.id, attempt(6, "DA", 2, false), base + Duration::seconds(2)).unwrap();

        let all = journal.list_blocs(&BlocQuery::default()).unwrap();
        let ids: Vec<u64> = all.data.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        let by_session = journal
            .list_blocs(&BlocQuery { session_id: Some(s1.id), ..Default::default() })
            .unwrap();
        assert_eq!(by_session.pagination.total, 2);

        let by_difficulty = journal
            .list_blocs(&BlocQuery { difficulty: Some(6), ..Default::default() })
            .unwrap();
        assert_eq!(by_difficulty.pagination.total, 2);

        let by_style = journal
            .list_blocs(&BlocQuery { style: Some("A".to_string()), ..Default::default() })
            .unwrap();
        assert_eq!(by_style.pagination.total, 2);
    }

    #[test]
    fn test_session_report() {
        let mut journal = Journal::new();
        let session = journal.create_session(date(2025, 2, 13));
        journal.create_bloc(session.id, attempt(5, "DA", 0, true)).unwrap();
        journal.create_bloc(session.id, attempt(8, "DE", 2, false)).unwrap();

        let report = journal.session_report(session.id, &ScoringConfig::default()).unwrap();
        assert_eq!(report.blocs.len(), 2);
        assert_eq!(report.performance.bloc_count, 2);
        assert_eq!(report.performance.total_attempts, 4);
        assert_eq!(report.performance.average_difficulty, Some(6.5));

        let count = journal.session_bloc_count(session.id).unwrap();
        assert_eq!(count.bloc_count, 2);
        assert!(journal.session_report(9, &ScoringConfig::default()).is_err());
    }

    #[test]
    fn test_report_for_empty_session() {
        let mut journal = Journal::new();
        let session = journal.create_session(date(2025, 2, 13));
        let report = journal.report_for(&session, &ScoringConfig::default());
        assert!(report.performance.is_empty());
        assert_eq!(report.performance.average_difficulty, None);
    }

    #[test]
    fn test_bloc_serializes_flat() {
        let mut journal = Journal::new();
        let session = journal.create_session(date(2025, 2, 13));
        let bloc = journal.create_bloc(session.id, attempt(5, "DE", 1, true)).unwrap();
        let json = serde_json::to_value(&bloc).unwrap();
        assert_eq!(json["difficulty"], 5);
        assert_eq!(json["style"], "DE");
        assert_eq!(json["retry_count"], 1);
        assert_eq!(json["terminated"], true);
        assert_eq!(json["session_id"], session.id);
    }

    #[test]
    fn test_start_of_day_is_midnight_utc() {
        let ts = start_of_day(date(2025, 2, 13));
        assert_eq!(ts.to_rfc3339(), "2025-02-13T00:00:00+00:00");
    }

    #[test]
    fn test_clear_resets_ids() {
        let mut journal = Journal::new();
        journal.create_session(date(2025, 2, 13));
        journal.clear();
        assert!(journal.sessions.is_empty());
        assert_eq!(journal.create_session(date(2025, 2, 13)).id, 1);
    }
}
