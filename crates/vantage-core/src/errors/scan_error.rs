//! Scan-pipeline errors.

use std::path::PathBuf;

use super::error_code::{self, VantageErrorCode};
use super::StorageError;

/// Errors that can occur while scanning a portfolio.
///
/// Recovery is built into each variant's contract: `IoUnavailable`
/// skips the subtree, `MalformedArtifact` treats the file as absent,
/// `ConfigInvalid` falls back to defaults, `CacheCorrupt` recomputes.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScanError {
    #[error("directory unreadable: {path}: {message}")]
    IoUnavailable { path: PathBuf, message: String },

    #[error("malformed artifact: {path}: {message}")]
    MalformedArtifact { path: PathBuf, message: String },

    #[error("invalid configuration value for {field}: {message}")]
    ConfigInvalid { field: String, message: String },

    #[error("corrupt cache entry for {path}: {message}")]
    CacheCorrupt { path: PathBuf, message: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ScanError {
    pub fn io_unavailable(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::IoUnavailable {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::MalformedArtifact {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl VantageErrorCode for ScanError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::IoUnavailable { .. } => error_code::IO_UNAVAILABLE,
            Self::MalformedArtifact { .. } => error_code::MALFORMED_ARTIFACT,
            Self::ConfigInvalid { .. } => error_code::CONFIG_INVALID,
            Self::CacheCorrupt { .. } => error_code::CACHE_CORRUPT,
            Self::Storage(e) => e.error_code(),
        }
    }
}
