use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Session not found: {0}")]
    SessionNotFound(u64),

    #[error("Bloc not found: {0}")]
    BlocNotFound(u64),

    #[error("Invalid bloc: {0}")]
    InvalidBloc(String),

    #[error("Invalid page request: {0}")]
    InvalidPage(String),

    #[error("Invalid date '{0}': expected YYYY-MM-DD or DD/MM/YYYY")]
    InvalidDate(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Unsupported journal version: {0}")]
    UnsupportedVersion(u32),

    #[error("Journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Journal serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JournalError {
    /// The request named a record that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SessionNotFound(_) | Self::BlocNotFound(_))
    }

    /// The request itself was malformed.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidBloc(_)
                | Self::InvalidPage(_)
                | Self::InvalidDate(_)
                | Self::InvalidDuration(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
