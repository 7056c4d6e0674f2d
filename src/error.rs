use std::path::PathBuf;

/// Everything that can go wrong on the board.
///
/// None of these are fatal: validation failures block a single action,
/// the rest are logged and absorbed by the caller.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// A required field was empty or out of bounds.
    #[error("{field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },

    /// The referenced task no longer exists.
    #[error("task {id} not found")]
    NotFound { id: String },

    /// A stored collection could not be read or parsed.
    #[error("failed to read '{key}': {reason}")]
    StorageRead { key: String, reason: String },

    #[error("failed to write '{key}': {source}")]
    StorageWrite {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl BoardError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        BoardError::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True for errors the user has to correct before retrying.
    pub fn is_validation(&self) -> bool {
        matches!(self, BoardError::Validation { .. })
    }
}

pub type BoardResult<T> = Result<T, BoardError>;
