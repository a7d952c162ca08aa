//! # vantage-core
//!
//! Foundation crate for the Vantage portfolio engine.
//! Defines the shared types, error taxonomy, configuration, and the
//! per-project metadata store. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod errors;
pub mod meta;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::{PriorityWeights, VantageConfig};
pub use errors::error_code::VantageErrorCode;
pub use errors::{ScanError, StorageError};
pub use meta::{AutomationLevel, MetaStore, ProjectMeta};
pub use types::cache::CacheEntry;
pub use types::collections::{FxHashMap, FxHashSet};
pub use types::git::GitStatus;
pub use types::portfolio::{Annotation, PortfolioStatus, ProjectStatus, ScanStats};
pub use types::priority::{PriorityInputs, PriorityScore};
pub use types::project::{ArtifactFile, ArtifactKind, ArtifactSet, LayoutKind, ProjectRoot};
pub use types::stage::Stage;
pub use types::tasks::TaskSummary;
