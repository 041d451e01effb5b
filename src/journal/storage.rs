use super::error::{JournalError, Result};
use super::types::{Journal, JOURNAL_VERSION};
use atomic_write_file::AtomicWriteFile;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Get the default journal file path (~/.config/blocbook/journal.json)
pub fn get_journal_path() -> PathBuf {
    crate::config::get_config_dir().join("journal.json")
}

/// Load the journal from a JSON file
///
/// If the file doesn't exist, returns a new empty journal.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_journal(path: &Path) -> Result<Journal> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no journal file, starting empty");
        return Ok(Journal::new());
    }

    let file = File::open(path)?;
    let journal: Journal = serde_json::from_reader(BufReader::new(file))?;

    if journal.version != JOURNAL_VERSION {
        return Err(JournalError::UnsupportedVersion(journal.version));
    }

    tracing::debug!(
        path = %path.display(),
        sessions = journal.sessions.len(),
        blocs = journal.blocs.len(),
        "journal loaded"
    );
    Ok(journal)
}

/// Save the journal to a JSON file atomically
///
/// The file is never left half-written: the new content goes to a temporary
/// file that replaces the old one on commit. Creates the parent directory if
/// it doesn't exist.
pub fn save_journal(path: &Path, journal: &Journal) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = AtomicWriteFile::open(path)?;
    serde_json::to_writer_pretty(&mut file, journal)?;
    file.write_all(b"\n")?;
    file.commit()?;

    tracing::debug!(path = %path.display(), "journal saved");
    Ok(())
}
