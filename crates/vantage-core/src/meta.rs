//! Per-project metadata overrides.
//!
//! Operators keep a small JSON store at `<scan-root>/.vantage/meta.json`
//! keyed by project slug. The scan consumes it read-only; the `meta`
//! CLI subcommand writes it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ScanError;
use crate::types::collections::FxHashMap;

/// How much of this project's workflow runs without a human.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutomationLevel {
    /// Fully manual.
    L0,
    /// Agent proposes, human approves.
    #[default]
    L1,
    /// Agent executes, human reviews after.
    L2,
    /// Fully automated.
    L3,
}

/// Overrides for one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMeta {
    /// Business impact on a 1..=3 scale.
    pub impact: Option<u8>,
    pub automation_level: Option<AutomationLevel>,
}

/// The keyed override store for one scan root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaStore {
    pub version: String,
    pub projects: FxHashMap<String, ProjectMeta>,
}

impl Default for MetaStore {
    fn default() -> Self {
        Self {
            version: "1".to_string(),
            projects: FxHashMap::default(),
        }
    }
}

impl MetaStore {
    const DIR: &'static str = ".vantage";
    const FILE: &'static str = "meta.json";

    fn store_path(scan_root: &Path) -> PathBuf {
        scan_root.join(Self::DIR).join(Self::FILE)
    }

    /// Load the store for a scan root. A missing file is an empty store.
    pub fn load(scan_root: &Path) -> Result<Self, ScanError> {
        let path = Self::store_path(scan_root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content =
            fs::read_to_string(&path).map_err(|e| ScanError::io_unavailable(&path, &e))?;
        serde_json::from_str(&content).map_err(|e| ScanError::malformed(&path, e.to_string()))
    }

    /// Tolerant load: a malformed store degrades to defaults plus a
    /// warning instead of failing the scan.
    pub fn load_or_default(scan_root: &Path) -> (Self, Option<ScanError>) {
        match Self::load(scan_root) {
            Ok(store) => (store, None),
            Err(e) => {
                tracing::warn!(root = %scan_root.display(), error = %e, "metadata store unreadable, using defaults");
                (Self::default(), Some(e))
            }
        }
    }

    /// Persist the store, replacing the file atomically.
    pub fn save(&self, scan_root: &Path) -> Result<(), ScanError> {
        let dir = scan_root.join(Self::DIR);
        fs::create_dir_all(&dir).map_err(|e| ScanError::io_unavailable(&dir, &e))?;

        let path = Self::store_path(scan_root);
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ScanError::malformed(&path, e.to_string()))?;

        // Write-then-rename so readers never observe a partial store.
        let tmp = dir.join(format!("{}.tmp", Self::FILE));
        fs::write(&tmp, content).map_err(|e| ScanError::io_unavailable(&tmp, &e))?;
        fs::rename(&tmp, &path).map_err(|e| ScanError::io_unavailable(&path, &e))?;
        Ok(())
    }

    pub fn get(&self, project_id: &str) -> Option<&ProjectMeta> {
        self.projects.get(project_id)
    }

    pub fn entry(&mut self, project_id: &str) -> &mut ProjectMeta {
        self.projects.entry(project_id.to_string()).or_default()
    }

    /// Impact override for a project, filtered to the valid 1..=3 range.
    pub fn impact_for(&self, project_id: &str) -> Option<u8> {
        self.get(project_id)
            .and_then(|m| m.impact)
            .filter(|i| (1..=3).contains(i))
    }

    /// Automation level for a project, `L1` when unset.
    pub fn automation_for(&self, project_id: &str) -> AutomationLevel {
        self.get(project_id)
            .and_then(|m| m.automation_level)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_store_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = MetaStore::load(dir.path()).unwrap();
        assert!(store.projects.is_empty());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MetaStore::default();
        store.entry("checkout").impact = Some(3);
        store.entry("checkout").automation_level = Some(AutomationLevel::L2);
        store.save(dir.path()).unwrap();

        let loaded = MetaStore::load(dir.path()).unwrap();
        assert_eq!(loaded.impact_for("checkout"), Some(3));
        assert_eq!(loaded.automation_for("checkout"), AutomationLevel::L2);
        assert_eq!(loaded.automation_for("unknown"), AutomationLevel::L1);
    }

    #[test]
    fn malformed_store_degrades_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let meta_dir = dir.path().join(".vantage");
        std::fs::create_dir_all(&meta_dir).unwrap();
        std::fs::write(meta_dir.join("meta.json"), "{not json").unwrap();

        let (store, warning) = MetaStore::load_or_default(dir.path());
        assert!(store.projects.is_empty());
        assert!(warning.is_some());
    }

    #[test]
    fn out_of_range_impact_is_ignored() {
        let mut store = MetaStore::default();
        store.entry("p").impact = Some(7);
        assert_eq!(store.impact_for("p"), None);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let meta_dir = dir.path().join(".vantage");
        std::fs::create_dir_all(&meta_dir).unwrap();
        std::fs::write(
            meta_dir.join("meta.json"),
            r#"{"version":"1","projects":{"p":{"impact":2,"legacy_field":true}}}"#,
        )
        .unwrap();

        let store = MetaStore::load(dir.path()).unwrap();
        assert_eq!(store.impact_for("p"), Some(2));
    }
}
