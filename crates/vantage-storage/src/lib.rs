//! # vantage-storage
//!
//! SQLite persistence for vantage scan results.
//! One database, one table, WAL mode. Seeds the in-process status
//! cache at startup so unchanged projects skip re-parsing entirely.

pub mod engine;

pub use engine::StatusStore;
