//! Error types for the parish calendar.

use thiserror::Error;

/// Errors that can occur in calendar operations.
///
/// None of these are fatal to a loaded store: remote and snapshot failures
/// demote to the next tier, and degraded saves leave the in-memory and
/// cached state consistent.
#[derive(Error, Debug)]
pub enum CalError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Event not found: {0}")]
    NotFound(i64),

    #[error("Remote store unavailable: {0}")]
    RemoteUnavailable(#[from] RemoteError),

    #[error("Saved locally but not remotely: {0}")]
    PersistenceDegraded(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Local cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        CalError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

/// Failures talking to the remote document store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("credential rejected")]
    Unauthorized,

    #[error("version token is stale (document changed remotely)")]
    Conflict,

    #[error("unexpected status {0}: {1}")]
    Status(u16, String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("could not decode document: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}

/// Result type alias for calendar operations.
pub type CalResult<T> = Result<T, CalError>;
