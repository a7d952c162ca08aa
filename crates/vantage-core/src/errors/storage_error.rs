//! Storage-layer errors for the persisted status cache.

use super::error_code::{self, VantageErrorCode};

/// Errors that can occur in the persistence layer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("database corrupt: {details}")]
    DbCorrupt { details: String },

    #[error("cache row serialization failed: {message}")]
    Serialization { message: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

impl VantageErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbCorrupt { .. } => error_code::DB_CORRUPT,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
