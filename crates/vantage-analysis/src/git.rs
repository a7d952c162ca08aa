//! Version-control status collection.
//!
//! Everything here degrades: a missing repository returns `None`, a
//! missing piece of repository state returns its neutral value. Git
//! trouble never fails a scan.

use std::path::Path;
use std::time::{Duration, SystemTime};

use git2::{Repository, StatusOptions};
use vantage_core::GitStatus;

/// Collect repository status for a project path.
///
/// Returns `None` when the path is not inside a git repository.
pub fn collect_status(path: &Path) -> Option<GitStatus> {
    let repo = match Repository::open(path) {
        Ok(repo) => repo,
        Err(_) => return None,
    };

    let (ahead, behind) = ahead_behind(&repo);
    Some(GitStatus {
        current_branch: current_branch(&repo),
        is_dirty: is_dirty(&repo),
        last_commit_time: last_commit_time(&repo),
        ahead,
        behind,
    })
}

/// Branch shorthand, `None` on an unborn branch.
fn current_branch(repo: &Repository) -> Option<String> {
    let head = repo.head().ok()?;
    head.shorthand().map(str::to_string)
}

/// Any modified, staged, or untracked path counts as dirty.
fn is_dirty(repo: &Repository) -> bool {
    let mut opts = StatusOptions::new();
    opts.include_untracked(true);
    match repo.statuses(Some(&mut opts)) {
        Ok(statuses) => !statuses.is_empty(),
        Err(e) => {
            tracing::debug!(error = %e, "git status check failed");
            false
        }
    }
}

fn last_commit_time(repo: &Repository) -> Option<SystemTime> {
    let head = repo.head().ok()?;
    let oid = head.target()?;
    let commit = repo.find_commit(oid).ok()?;
    let seconds = u64::try_from(commit.time().seconds()).ok()?;
    Some(SystemTime::UNIX_EPOCH + Duration::from_secs(seconds))
}

/// Commits ahead of and behind the upstream tracking branch. Zero on
/// both sides when no upstream is configured.
fn ahead_behind(repo: &Repository) -> (usize, usize) {
    let Ok(head) = repo.head() else {
        return (0, 0);
    };
    let Some(local) = head.target() else {
        return (0, 0);
    };
    let Some(name) = head.shorthand() else {
        return (0, 0);
    };
    let Ok(branch) = repo.find_branch(name, git2::BranchType::Local) else {
        return (0, 0);
    };
    let Ok(upstream) = branch.upstream() else {
        return (0, 0);
    };
    let Some(remote) = upstream.get().target() else {
        return (0, 0);
    };
    repo.graph_ahead_behind(local, remote).unwrap_or((0, 0))
}
