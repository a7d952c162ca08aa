//! Artifact resolution for one project root.
//!
//! Resolution is a stat-only pass: it decides which files constitute
//! the project's artifact set and records their metadata for
//! fingerprinting, without reading any content. Text is loaded
//! separately, and only when the cache misses.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use vantage_core::types::project::feature_number;
use vantage_core::{ArtifactFile, ArtifactKind, ArtifactSet, LayoutKind, ProjectRoot, ScanError};

/// A project root with its selected artifact files.
#[derive(Debug, Clone)]
pub struct ResolvedProject {
    pub root: ProjectRoot,
    /// The file chosen for each artifact kind present, unordered.
    pub files: Vec<(ArtifactKind, ArtifactFile)>,
    pub warnings: Vec<ScanError>,
}

struct Resolution {
    artifact_dir: PathBuf,
    layout: LayoutKind,
    feature_dirs: Vec<PathBuf>,
    files: Vec<(ArtifactKind, ArtifactFile)>,
}

/// Resolve the artifact set for a directory the walker classified as
/// a project root.
///
/// `specs` usually holds the feature directories, so it wins whenever
/// it yields any artifact; `.specify` is the fallback. A root whose
/// artifact directory is empty still resolves, with an empty file
/// list.
pub fn resolve_project(path: &Path) -> ResolvedProject {
    let mut warnings = Vec::new();

    let specs = path.join("specs");
    let specify = path.join(".specify");

    let mut resolution: Option<Resolution> = None;
    for dir in [&specs, &specify] {
        if !dir.is_dir() {
            continue;
        }
        let candidate = resolve_in_dir(path, dir, &mut warnings);
        let found = !candidate.files.is_empty();
        if found || resolution.is_none() {
            resolution = Some(candidate);
        }
        if found {
            break;
        }
    }

    let resolution = resolution.unwrap_or(Resolution {
        artifact_dir: specify,
        layout: LayoutKind::Direct,
        feature_dirs: Vec::new(),
        files: Vec::new(),
    });

    ResolvedProject {
        root: ProjectRoot {
            path: path.to_path_buf(),
            artifact_dir: resolution.artifact_dir,
            layout: resolution.layout,
            feature_dirs: resolution.feature_dirs,
        },
        files: resolution.files,
        warnings,
    }
}

/// Read the selected artifact files into an [`ArtifactSet`].
///
/// An unreadable or non-UTF-8 file degrades to an absent artifact
/// with a warning; it never fails the project.
pub fn load_artifacts(resolved: &ResolvedProject) -> (ArtifactSet, Vec<ScanError>) {
    let mut set = ArtifactSet::default();
    let mut warnings = Vec::new();

    for (kind, file) in &resolved.files {
        match std::fs::read_to_string(&file.path) {
            Ok(text) => set.set(*kind, text),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                warnings.push(ScanError::malformed(&file.path, "not valid UTF-8"));
            }
            Err(e) => {
                warnings.push(ScanError::io_unavailable(&file.path, &e));
            }
        }
    }

    set.files = resolved.files.iter().map(|(_, f)| f.clone()).collect();
    set.files.sort_by(|a, b| a.path.cmp(&b.path));
    (set, warnings)
}

fn resolve_in_dir(project: &Path, dir: &Path, warnings: &mut Vec<ScanError>) -> Resolution {
    let mut files: Vec<(ArtifactKind, ArtifactFile)> = Vec::new();

    // Canonical files directly in the artifact directory decide the
    // layout.
    for kind in ArtifactKind::ALL {
        if let Some(file) = stat_artifact(&dir.join(kind.file_name()), warnings) {
            files.push((kind, file));
        }
    }

    if !files.is_empty() {
        if !files.iter().any(|(k, _)| *k == ArtifactKind::Constitution) {
            if let Some(file) = constitution_fallback(project, dir, warnings) {
                files.insert(0, (ArtifactKind::Constitution, file));
            }
        }
        return Resolution {
            artifact_dir: dir.to_path_buf(),
            layout: LayoutKind::Direct,
            feature_dirs: Vec::new(),
            files,
        };
    }

    let feature_dirs = list_feature_dirs(dir, warnings);
    if feature_dirs.is_empty() {
        if let Some(file) = constitution_fallback(project, dir, warnings) {
            files.push((ArtifactKind::Constitution, file));
        }
        return Resolution {
            artifact_dir: dir.to_path_buf(),
            layout: LayoutKind::Direct,
            feature_dirs,
            files,
        };
    }

    // The numerically highest feature directory wins per artifact
    // kind, ties broken by lexical path order. Kinds are independent:
    // spec and tasks may come from different features.
    let mut newest_first = feature_dirs.clone();
    newest_first.sort_by(|a, b| {
        feature_number(b)
            .cmp(&feature_number(a))
            .then_with(|| a.cmp(b))
    });

    if let Some(file) = constitution_fallback(project, dir, warnings) {
        files.push((ArtifactKind::Constitution, file));
    }
    for kind in [ArtifactKind::Spec, ArtifactKind::Plan, ArtifactKind::Tasks] {
        for feature in &newest_first {
            if let Some(file) = stat_artifact(&feature.join(kind.file_name()), warnings) {
                files.push((kind, file));
                break;
            }
        }
    }

    Resolution {
        artifact_dir: dir.to_path_buf(),
        layout: LayoutKind::FeatureBased,
        feature_dirs,
        files,
    }
}

/// Stat one candidate artifact path.
///
/// Absence is normal and silent; any other I/O failure becomes a
/// warning. A directory shadowing an artifact name does not count.
fn stat_artifact(path: &Path, warnings: &mut Vec<ScanError>) -> Option<ArtifactFile> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {
            let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            Some(ArtifactFile {
                path: path.to_path_buf(),
                modified,
                size: meta.len(),
            })
        }
        Ok(_) => None,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warnings.push(ScanError::io_unavailable(path, &e));
            None
        }
    }
}

/// Constitutions often live under `memory/` rather than next to the
/// other artifacts.
fn constitution_fallback(
    project: &Path,
    dir: &Path,
    warnings: &mut Vec<ScanError>,
) -> Option<ArtifactFile> {
    let memory = dir.join("memory").join("constitution.md");
    if let Some(file) = stat_artifact(&memory, warnings) {
        return Some(file);
    }
    let shared = project
        .join(".specify")
        .join("memory")
        .join("constitution.md");
    if shared != memory {
        return stat_artifact(&shared, warnings);
    }
    None
}

fn list_feature_dirs(dir: &Path, warnings: &mut Vec<ScanError>) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warnings.push(ScanError::io_unavailable(dir, &e));
            return Vec::new();
        }
    };

    let mut dirs: Vec<PathBuf> = Vec::new();
    for entry in entries {
        match entry {
            Ok(e) => {
                let path = e.path();
                if path.is_dir() && feature_number(&path).is_some() {
                    dirs.push(path);
                }
            }
            Err(e) => warnings.push(ScanError::io_unavailable(dir, &e)),
        }
    }

    dirs.sort_by(|a, b| {
        feature_number(a)
            .cmp(&feature_number(b))
            .then_with(|| a.cmp(b))
    });
    dirs
}
