//! Status cache: Moka in-memory cache keyed by project path,
//! invalidated by artifact-metadata fingerprint.
//!
//! The cache is an explicitly passed handle, seeded from storage at
//! scan start and snapshotted back at scan end. Entries are replaced
//! wholesale when the fingerprint changes; a half-updated entry is
//! never observable. Lookups for the same path are serialized, so two
//! workers can never race to compute one project.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;

use moka::sync::Cache;
use xxhash_rust::xxh3::Xxh3;

use vantage_core::{ArtifactFile, ArtifactKind, CacheEntry, FxHashSet};

const DEFAULT_CAPACITY: u64 = 10_000;

/// Fingerprint over artifact file metadata.
///
/// Hashes the (path, mtime, size) of every contributing file in
/// sorted path order. Content is never read, so fingerprinting stays
/// cheap enough to run on every scan.
pub fn fingerprint(files: &[(ArtifactKind, ArtifactFile)]) -> u64 {
    let mut sorted: Vec<&ArtifactFile> = files.iter().map(|(_, f)| f).collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut hasher = Xxh3::new();
    for file in sorted {
        hasher.update(file.path.to_string_lossy().as_bytes());
        hasher.update(&[0]);
        let mtime = file
            .modified
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        hasher.update(&mtime.as_secs().to_le_bytes());
        hasher.update(&mtime.subsec_nanos().to_le_bytes());
        hasher.update(&file.size.to_le_bytes());
    }
    hasher.digest()
}

/// In-memory memo of per-project analysis results.
pub struct StatusCache {
    inner: Cache<PathBuf, CacheEntry>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl StatusCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Return the cached entry when its fingerprint still matches,
    /// otherwise run `compute` and replace the entry wholesale.
    ///
    /// At most one `compute` runs per path at a time; concurrent
    /// callers for the same path wait for it and share the result.
    pub fn get_or_compute<F>(&self, path: &Path, fingerprint: u64, compute: F) -> CacheEntry
    where
        F: FnOnce() -> CacheEntry,
    {
        let entry = self
            .inner
            .entry(path.to_path_buf())
            .or_insert_with_if(compute, |cached| !cached.matches(fingerprint));

        if entry.is_fresh() {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        entry.into_value()
    }

    /// Load persisted entries, typically at scan start.
    pub fn seed(&self, entries: impl IntoIterator<Item = CacheEntry>) {
        for entry in entries {
            self.inner.insert(entry.path.clone(), entry);
        }
    }

    /// All current entries in sorted path order, for persistence.
    pub fn snapshot(&self) -> Vec<CacheEntry> {
        self.inner.run_pending_tasks();
        let mut entries: Vec<CacheEntry> = self.inner.iter().map(|(_, v)| v).collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        entries
    }

    /// Drop entries for projects no longer present on disk.
    pub fn retain_projects(&self, live: &FxHashSet<PathBuf>) {
        self.inner.run_pending_tasks();
        for (path, _) in self.inner.iter() {
            if !live.contains(path.as_ref()) {
                self.inner.invalidate(path.as_ref());
            }
        }
        self.inner.run_pending_tasks();
    }

    /// Discard every entry.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
    }

    pub fn entry_count(&self) -> u64 {
        self.inner.run_pending_tasks();
        self.inner.entry_count()
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn miss_count(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }
}

impl Default for StatusCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
