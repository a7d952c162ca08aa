//! Project roots and artifact sets discovered by the locator.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// How a project lays out its artifact files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutKind {
    /// Artifact files live directly inside the artifact directory.
    Direct,
    /// Artifact files live inside numbered feature subdirectories
    /// (`001-auth`, `002-billing`, ...).
    FeatureBased,
}

/// The four canonical artifact documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    Constitution,
    Spec,
    Plan,
    Tasks,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Constitution,
        ArtifactKind::Spec,
        ArtifactKind::Plan,
        ArtifactKind::Tasks,
    ];

    /// Canonical file name for this artifact.
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Constitution => "constitution.md",
            ArtifactKind::Spec => "spec.md",
            ArtifactKind::Plan => "plan.md",
            ArtifactKind::Tasks => "tasks.md",
        }
    }
}

/// One project root discovered under the scan root.
///
/// Created by the locator and immutable afterwards. `feature_dirs` is
/// ordered (numeric prefix ascending, then lexical) and empty for
/// [`LayoutKind::Direct`] projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRoot {
    pub path: PathBuf,
    /// The `.specify` or `specs` directory holding the artifacts.
    pub artifact_dir: PathBuf,
    pub layout: LayoutKind,
    pub feature_dirs: Vec<PathBuf>,
}

impl ProjectRoot {
    /// Display name derived from the directory name.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Metadata of one file contributing to an artifact set.
///
/// Feeds the cache fingerprint, so it carries exactly the fields the
/// fingerprint hashes: path, mtime, size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size: u64,
}

/// Raw text of the artifacts resolved for one project.
///
/// Each field is `None` when the project has no such document. `files`
/// lists the metadata of every file that contributed, in sorted path
/// order.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    pub constitution: Option<String>,
    pub spec: Option<String>,
    pub plan: Option<String>,
    pub tasks: Option<String>,
    pub files: Vec<ArtifactFile>,
}

impl ArtifactSet {
    pub fn get(&self, kind: ArtifactKind) -> Option<&str> {
        match kind {
            ArtifactKind::Constitution => self.constitution.as_deref(),
            ArtifactKind::Spec => self.spec.as_deref(),
            ArtifactKind::Plan => self.plan.as_deref(),
            ArtifactKind::Tasks => self.tasks.as_deref(),
        }
    }

    pub fn set(&mut self, kind: ArtifactKind, text: String) {
        let slot = match kind {
            ArtifactKind::Constitution => &mut self.constitution,
            ArtifactKind::Spec => &mut self.spec,
            ArtifactKind::Plan => &mut self.plan,
            ArtifactKind::Tasks => &mut self.tasks,
        };
        *slot = Some(text);
    }

    pub fn has(&self, kind: ArtifactKind) -> bool {
        self.get(kind).is_some()
    }

    /// True when no artifact document was found at all.
    pub fn is_empty(&self) -> bool {
        ArtifactKind::ALL.iter().all(|k| !self.has(*k))
    }
}

/// Numeric prefix of a feature directory name (`012-auth` → 12).
pub fn feature_number(path: &Path) -> Option<u32> {
    let name = path.file_name()?.to_str()?;
    let digits: String = name.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.len() < 3 {
        return None;
    }
    digits.parse().ok()
}
