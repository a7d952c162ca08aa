//! Stable error codes for reporting and annotations.

pub const IO_UNAVAILABLE: &str = "IO_UNAVAILABLE";
pub const MALFORMED_ARTIFACT: &str = "MALFORMED_ARTIFACT";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const CACHE_CORRUPT: &str = "CACHE_CORRUPT";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_CORRUPT: &str = "DB_CORRUPT";

/// Maps every error to a stable SCREAMING_SNAKE code.
pub trait VantageErrorCode {
    fn error_code(&self) -> &'static str;
}
