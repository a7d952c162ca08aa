//! # vantage-analysis
//!
//! The portfolio analysis pipeline: project locator, tolerant task
//! parser, lifecycle stage classifier, priority scorer, status cache,
//! and the concurrent aggregator that ties them together.

pub mod cache;
pub mod git;
pub mod locator;
pub mod markers;
pub mod pipeline;
pub mod priority;
pub mod stage;

pub use cache::StatusCache;
pub use markers::MarkerEngine;
pub use pipeline::PortfolioScanner;
pub use priority::PriorityCalculator;
