use blocbook::journal::{
    import_seed, load_journal, save_journal, BlocQuery, Journal, SeedFile, SessionQuery,
};
use blocbook::scoring::ScoringConfig;
use blocbook::{aggregate, score, BlocAttempt};
use chrono::NaiveDate;
use std::env;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn seed() -> SeedFile {
    serde_json::from_str(
        r#"{
            "sessions": [
                {
                    "date": "13/02/2025",
                    "blocs": [
                        { "difficulty": 5, "style": "DA", "retry": 2, "terminate": true },
                        { "difficulty": 8, "style": "DE", "retry": 0, "terminate": false }
                    ]
                },
                { "date": "2025-02-20", "blocs": [] }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_import_report_and_reload() {
    let path = env::temp_dir().join("blocbook_it_journal_flow.json");
    let _ = std::fs::remove_file(&path);

    let mut journal = load_journal(&path).unwrap();
    let summary = import_seed(&mut journal, &seed(), false).unwrap();
    assert_eq!((summary.sessions, summary.blocs), (2, 2));

    let sessions = journal.list_sessions(&SessionQuery::default()).unwrap();
    let dates: Vec<NaiveDate> = sessions.data.iter().map(|s| s.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 13).unwrap(),
        ]
    );

    let busy = sessions.data[1].id;
    let report = journal.session_report(busy, &ScoringConfig::default()).unwrap();
    let perf = &report.performance;
    assert_eq!(perf.bloc_count, 2);
    assert_eq!(perf.terminated_count, 1);
    assert_eq!(perf.tried_count, 1);
    assert_eq!((perf.de_count, perf.da_count), (1, 1));
    assert_eq!(perf.flashed_count, 1);
    assert_eq!((perf.total_retries, perf.total_attempts), (2, 4));
    assert_eq!((perf.difficulty_max, perf.difficulty_min), (Some(8), Some(5)));
    assert_eq!(perf.average_difficulty, Some(6.5));

    // The report agrees with aggregating the stored blocs directly
    assert_eq!(&aggregate(&report.blocs), perf);

    let empty = journal
        .session_report(sessions.data[0].id, &ScoringConfig::default())
        .unwrap();
    assert!(empty.performance.is_empty());
    assert_eq!(empty.performance.average_difficulty, None);
    assert_eq!(empty.performance.total_score, 0.0);

    save_journal(&path, &journal).unwrap();
    let reloaded = load_journal(&path).unwrap();
    assert_eq!(reloaded.sessions, journal.sessions);
    assert_eq!(reloaded.blocs, journal.blocs);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_manual_entries_and_cascade_delete() {
    let mut journal = Journal::new();
    let session = journal.create_session(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    let hard = journal
        .create_bloc(session.id, BlocAttempt::new(7, "DE", 0, false))
        .unwrap();
    journal
        .create_bloc(session.id, BlocAttempt::new(6, "DA", 3, true))
        .unwrap();

    assert_eq!(round2(score(&hard.attempt)), 28.56);

    let de_only = journal
        .list_blocs(&BlocQuery {
            style: Some("DE".to_string()),
            ..BlocQuery::default()
        })
        .unwrap();
    assert_eq!(de_only.pagination.total, 1);

    let report = journal.session_report(session.id, &ScoringConfig::default()).unwrap();
    assert_eq!(round2(report.performance.total_score), round2(28.56 + 16.28));

    assert_eq!(journal.delete_session(session.id).unwrap(), 2);
    assert!(journal.blocs.is_empty());
    assert!(journal.session_report(session.id, &ScoringConfig::default()).is_err());
}
