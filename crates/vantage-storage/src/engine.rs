//! `StatusStore`, the durable home of the scan cache.
//!
//! One row per project root, keyed by path. The in-process moka cache is
//! the hot path; this store exists so a fresh process can seed that cache
//! and skip re-parsing projects whose artifacts have not changed. Every
//! row is recomputable from the artifacts, so recovery from any kind of
//! damage is simply dropping the damaged part.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, Connection};

use vantage_core::{CacheEntry, ScanError, StorageError};

/// Current schema version, tracked via `PRAGMA user_version`.
/// On mismatch the table is dropped and recreated; cache rows are
/// never migrated.
const SCHEMA_VERSION: u32 = 1;

/// Status table schema.
///
/// `fingerprint` duplicates the payload field as a queryable column;
/// it is stored as the i64 bit pattern of the u64 hash. `payload` is
/// the JSON-encoded `CacheEntry`.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS status (
    path TEXT PRIMARY KEY,
    fingerprint INTEGER NOT NULL,
    payload TEXT NOT NULL,
    updated_at INTEGER NOT NULL
) STRICT;
"#;

/// SQLite-backed store for memoized project analysis results.
///
/// Owns the only connection to the database. Scans are already
/// serialized at the pipeline level, so a single mutexed connection
/// is enough.
pub struct StatusStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl StatusStore {
    /// Open (or create) a file-backed store at the given path.
    /// Creates parent directories, applies pragmas, initializes the schema.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io {
                message: format!("failed to create cache directory: {e}"),
            })?;
        }
        let conn = Connection::open(path).map_err(sqe)?;
        initialize_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(sqe)?;
        initialize_db(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load every cached entry.
    ///
    /// A row that fails to decode, or whose fingerprint column disagrees
    /// with its payload, is skipped and reported as a `CacheCorrupt`
    /// warning; the affected project is simply re-analyzed on the next
    /// scan. Only connection-level failures abort the load.
    pub fn load_all(&self) -> Result<(Vec<CacheEntry>, Vec<ScanError>), StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare_cached("SELECT path, fingerprint, payload FROM status")
            .map_err(sqe)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(sqe)?;

        let mut entries = Vec::new();
        let mut warnings = Vec::new();
        for row in rows {
            let (path, fingerprint, payload) = row.map_err(sqe)?;
            match serde_json::from_str::<CacheEntry>(&payload) {
                Ok(entry) if entry.fingerprint == fingerprint as u64 => entries.push(entry),
                Ok(entry) => {
                    warnings.push(ScanError::CacheCorrupt {
                        path: entry.path,
                        message: "fingerprint column does not match payload".to_string(),
                    });
                }
                Err(e) => {
                    warnings.push(ScanError::CacheCorrupt {
                        path: PathBuf::from(path),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok((entries, warnings))
    }

    /// Replace the whole table with the given entries in one transaction.
    ///
    /// Called once per scan with the cache snapshot, so rows for removed
    /// projects disappear here as well.
    pub fn replace_all(&self, entries: &[CacheEntry]) -> Result<(), StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(sqe)?;
        tx.execute("DELETE FROM status", []).map_err(sqe)?;
        {
            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO status (path, fingerprint, payload, updated_at)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .map_err(sqe)?;
            let now = unix_now();
            for entry in entries {
                let payload =
                    serde_json::to_string(entry).map_err(|e| StorageError::Serialization {
                        message: e.to_string(),
                    })?;
                stmt.execute(params![
                    entry.path.to_string_lossy(),
                    entry.fingerprint as i64,
                    payload,
                    now,
                ])
                .map_err(sqe)?;
            }
        }
        tx.commit().map_err(sqe)?;
        Ok(())
    }

    /// Drop every row. Backs `scan --no-cache`.
    pub fn clear(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM status", []).map_err(sqe)?;
        Ok(())
    }

    /// Number of persisted rows.
    pub fn count(&self) -> Result<i64, StorageError> {
        let conn = self.conn()?;
        conn.query_row("SELECT COUNT(*) FROM status", [], |row| row.get(0))
            .map_err(sqe)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::SqliteError {
            message: "status store lock poisoned".to_string(),
        })
    }
}

/// Apply pragmas and bring the schema to `SCHEMA_VERSION`.
/// Idempotent; called on every open.
fn initialize_db(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .map_err(sqe)?;

    let version: u32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(sqe)?;
    if version != SCHEMA_VERSION {
        if version != 0 {
            tracing::warn!(
                found = version,
                expected = SCHEMA_VERSION,
                "cache schema changed, rebuilding"
            );
        }
        conn.execute_batch("DROP TABLE IF EXISTS status;")
            .map_err(sqe)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)
            .map_err(sqe)?;
    }
    conn.execute_batch(SCHEMA_SQL).map_err(sqe)?;
    Ok(())
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

// ─── Helper: StorageError from rusqlite ─────────────────────────────────────

fn sqe(e: impl std::fmt::Display) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_core::{PriorityScore, Stage, TaskSummary};

    fn entry(path: &str, fingerprint: u64) -> CacheEntry {
        CacheEntry {
            path: PathBuf::from(path),
            fingerprint,
            stage: Stage::Implement,
            tasks: TaskSummary::default(),
            score: PriorityScore::ZERO,
        }
    }

    #[test]
    fn round_trip_in_memory() {
        let store = StatusStore::open_in_memory().unwrap();
        store
            .replace_all(&[entry("/a", 1), entry("/b", 2)])
            .unwrap();

        let (mut entries, warnings) = store.load_all().unwrap();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        assert!(warnings.is_empty());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, PathBuf::from("/a"));
        assert_eq!(entries[1].fingerprint, 2);
    }

    #[test]
    fn replace_all_discards_previous_rows() {
        let store = StatusStore::open_in_memory().unwrap();
        store
            .replace_all(&[entry("/a", 1), entry("/b", 2)])
            .unwrap();
        store.replace_all(&[entry("/b", 3)]).unwrap();

        let (entries, _) = store.load_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, PathBuf::from("/b"));
        assert_eq!(entries[0].fingerprint, 3);
    }

    #[test]
    fn fingerprint_survives_high_bit() {
        // u64 hashes with the top bit set round-trip through the i64 column.
        let fp = u64::MAX - 7;
        let store = StatusStore::open_in_memory().unwrap();
        store.replace_all(&[entry("/a", fp)]).unwrap();

        let (entries, warnings) = store.load_all().unwrap();
        assert!(warnings.is_empty());
        assert_eq!(entries[0].fingerprint, fp);
    }

    #[test]
    fn clear_empties_the_table() {
        let store = StatusStore::open_in_memory().unwrap();
        store.replace_all(&[entry("/a", 1)]).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        let (entries, warnings) = store.load_all().unwrap();
        assert!(entries.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn in_memory_store_has_no_path() {
        let store = StatusStore::open_in_memory().unwrap();
        assert!(store.path().is_none());
    }
}
