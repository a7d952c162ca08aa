//! Error taxonomy for the portfolio pipeline.
//!
//! Nothing in this taxonomy is fatal to a scan: every variant maps to
//! a skip, a fallback, or a recompute, and surfaces as a per-project
//! annotation rather than aborting the portfolio.

pub mod error_code;
mod scan_error;
mod storage_error;

pub use scan_error::ScanError;
pub use storage_error::StorageError;
