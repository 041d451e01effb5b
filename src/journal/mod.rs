pub mod error;
pub mod import;
pub mod query;
pub mod storage;
pub mod types;

pub use error::JournalError;
pub use import::{import_seed, load_seed_file, parse_session_date, ImportSummary, SeedFile};
pub use query::{since_date, BlocQuery, Page, Pagination, SessionQuery};
pub use storage::{get_journal_path, load_journal, save_journal};
pub use types::{
    validate_attempt, Bloc, BlocUpdate, Journal, Session, SessionBlocCount, SessionReport,
    SessionUpdate,
};
