//! Configuration for the portfolio scanner.

mod vantage_config;

pub use vantage_config::{PriorityWeights, VantageConfig};
