//! Version-control status supplied by the git collaborator.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Snapshot of a project's repository state.
///
/// Projects without a repository get no `GitStatus` at all
/// (`Option<GitStatus>` upstream); that is a normal condition, not an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitStatus {
    pub current_branch: Option<String>,
    pub is_dirty: bool,
    pub last_commit_time: Option<SystemTime>,
    /// Commits ahead of the upstream tracking branch, 0 when none.
    pub ahead: usize,
    /// Commits behind the upstream tracking branch, 0 when none.
    pub behind: usize,
}

impl GitStatus {
    /// Days elapsed since the last commit, measured against `now`.
    pub fn days_since_commit(&self, now: SystemTime) -> Option<f64> {
        let commit = self.last_commit_time?;
        let elapsed = now.duration_since(commit).unwrap_or_default();
        Some(elapsed.as_secs_f64() / 86_400.0)
    }
}
