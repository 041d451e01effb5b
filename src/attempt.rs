use serde::{Deserialize, Serialize};
use std::fmt;

/// Label of the style that earns the hard-style bonus by default.
pub const DE_LABEL: &str = "DE";
/// Label of the usual baseline style.
pub const DA_LABEL: &str = "DA";

/// Climbing style of a bloc.
///
/// Two labels are known by name, but the category is open: any other label is
/// kept verbatim in `Other` and counts as baseline everywhere `DE` is special.
/// Serialized as the bare label string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Style {
    De,
    Da,
    Other(String),
}

impl Style {
    pub fn label(&self) -> &str {
        match self {
            Style::De => DE_LABEL,
            Style::Da => DA_LABEL,
            Style::Other(label) => label,
        }
    }

    pub fn is_de(&self) -> bool {
        matches!(self, Style::De)
    }
}

impl From<&str> for Style {
    fn from(label: &str) -> Self {
        match label {
            DE_LABEL => Style::De,
            DA_LABEL => Style::Da,
            other => Style::Other(other.to_string()),
        }
    }
}

impl From<String> for Style {
    fn from(label: String) -> Self {
        match label.as_str() {
            DE_LABEL => Style::De,
            DA_LABEL => Style::Da,
            _ => Style::Other(label),
        }
    }
}

impl From<Style> for String {
    fn from(style: Style) -> Self {
        match style {
            Style::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The attributes of one climbing attempt that scoring looks at.
///
/// Identity (record id, session, timestamps) lives on the journal record that
/// wraps this value; scoring and aggregation never need it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocAttempt {
    /// Grade of the problem, expected 1-10
    pub difficulty: u32,
    pub style: Style,
    /// Failed attempts before success (or before giving up)
    pub retry_count: u32,
    /// Whether the problem was eventually completed
    pub terminated: bool,
}

impl BlocAttempt {
    pub fn new(difficulty: u32, style: impl Into<Style>, retry_count: u32, terminated: bool) -> Self {
        Self {
            difficulty,
            style: style.into(),
            retry_count,
            terminated,
        }
    }

    /// At least one failed attempt was recorded.
    pub fn is_tried(&self) -> bool {
        self.retry_count > 0
    }

    /// Completed on the first go.
    pub fn is_flashed(&self) -> bool {
        self.retry_count == 0 && self.terminated
    }
}

impl AsRef<BlocAttempt> for BlocAttempt {
    fn as_ref(&self) -> &BlocAttempt {
        self
    }
}
