//! Cached per-project analysis results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::priority::PriorityScore;
use crate::types::stage::Stage;
use crate::types::tasks::TaskSummary;

/// One memoized analysis result.
///
/// Keyed by project path; `fingerprint` hashes the mtimes and sizes of
/// every artifact file that contributed, so any file change invalidates
/// the whole entry. Entries are replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub path: PathBuf,
    pub fingerprint: u64,
    pub stage: Stage,
    pub tasks: TaskSummary,
    pub score: PriorityScore,
}

impl CacheEntry {
    pub fn matches(&self, fingerprint: u64) -> bool {
        self.fingerprint == fingerprint
    }
}
