use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Journal file location (defaults to ~/.config/blocbook/journal.json)
    #[serde(default)]
    pub journal_path: Option<PathBuf>,

    /// Rows per page for list commands (defaults to 100)
    #[serde(default)]
    pub page_size: Option<usize>,

    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}
