//! Candidate-root discovery built on the `ignore` crate.

use std::path::{Path, PathBuf};

/// Default ignore patterns applied to every scan.
pub const DEFAULT_IGNORES: &[&str] = &[
    "node_modules",
    ".git",
    "target",
    "dist",
    "build",
    ".next",
    "__pycache__",
    ".venv",
    "venv",
    "vendor",
    ".tox",
    ".cache",
    "coverage",
];

/// True when `path` directly contains an artifact directory.
pub(crate) fn is_project_root(path: &Path) -> bool {
    path.join(".specify").is_dir() || path.join("specs").is_dir()
}

/// Walk `root` to `max_depth`, returning every project root found.
///
/// Respects `.gitignore` plus the default ignore patterns, never
/// descends into a directory already classified as a project root,
/// and returns paths sorted for deterministic output. Unreadable
/// entries are logged and skipped; a root containing no projects
/// yields an empty result, not an error.
pub fn find_project_roots(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .max_depth(Some(max_depth));

    let mut overrides = ignore::overrides::OverrideBuilder::new(root);
    for pattern in DEFAULT_IGNORES {
        let _ = overrides.add(&format!("!{pattern}"));
        let _ = overrides.add(&format!("!{pattern}/**"));
    }
    if let Ok(built) = overrides.build() {
        builder.overrides(built);
    }

    // Children of a classified root are never projects themselves, so
    // recursion stops there. This also keeps the walk out of .specify
    // and specs directories.
    builder.filter_entry(|entry| {
        entry.depth() == 0
            || entry
                .path()
                .parent()
                .map_or(true, |parent| !is_project_root(parent))
    });

    let mut roots = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_some_and(|ft| ft.is_dir()) && is_project_root(entry.path()) {
            roots.push(entry.path().to_path_buf());
        }
    }

    roots.sort();
    roots
}
