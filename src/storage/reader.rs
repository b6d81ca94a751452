//! Lock-avoiding reads of browser cookie stores.
//!
//! A running browser may hold the live database locked, so the reader never
//! opens it. The store (and its write-ahead log, if any) is copied into a
//! temporary directory next to it, the copy is queried, and the directory is
//! removed when the [`Snapshot`] drops, on success and error paths alike.

use crate::base::context::IoResultExt;
use crate::base::error::CleanError;
use crate::browsers::BrowserTarget;
use crate::paths::StoragePaths;
use crate::storage::record::{CookieRecord, CookieValue};
use crate::storage::{sidecar_path, JOURNAL_SUFFIXES};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary copy of a cookie store, deleted on drop.
#[derive(Debug)]
pub struct Snapshot {
    db: PathBuf,
    _dir: TempDir,
}

impl Snapshot {
    /// Copy `live` into a fresh temporary directory beside it, falling back
    /// to the system temp directory when the parent is not writable.
    pub fn take(live: &Path) -> Result<Self, CleanError> {
        let parent = live.parent().unwrap_or_else(|| Path::new("."));
        let dir = match tempfile::Builder::new()
            .prefix(".cookies_snapshot")
            .tempdir_in(parent)
        {
            Ok(dir) => dir,
            Err(e) => {
                tracing::debug!(path = %parent.display(), error = %e, "sibling snapshot dir unavailable");
                tempfile::Builder::new()
                    .prefix("cookies_snapshot")
                    .tempdir()
                    .path_context(parent)?
            }
        };

        let file_name = live
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "Cookies".into());
        let db = dir.path().join(&file_name);
        fs::copy(live, &db).path_context(live)?;

        for suffix in JOURNAL_SUFFIXES {
            let journal = sidecar_path(live, suffix);
            if journal.is_file() {
                fs::copy(&journal, sidecar_path(&db, suffix)).path_context(&journal)?;
            }
        }

        tracing::debug!(source = %live.display(), copy = %db.display(), "took cookie store snapshot");
        Ok(Self { db, _dir: dir })
    }

    pub fn open(&self) -> Result<Connection, CleanError> {
        Ok(Connection::open(&self.db)?)
    }
}

/// Reader for browser cookie databases.
#[derive(Debug, Clone, Copy)]
pub struct StorageReader {
    limit: usize,
}

impl Default for StorageReader {
    fn default() -> Self {
        Self::new(crate::base::config::DEFAULT_READ_LIMIT)
    }
}

impl StorageReader {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Up to `limit` rows ordered by host. Absent store: empty list.
    pub fn read_cookies(
        &self,
        target: &BrowserTarget,
        paths: &StoragePaths,
    ) -> Result<Vec<CookieRecord>, CleanError> {
        let Some(live) = existing_store(paths) else {
            return Ok(Vec::new());
        };

        let snapshot = Snapshot::take(live)?;
        let conn = snapshot.open()?;
        let limit = i64::try_from(self.limit).unwrap_or(i64::MAX);

        let mut stmt = conn.prepare(&target.select_query())?;
        let rows = stmt.query_map([limit], |row| {
            Ok(CookieRecord {
                host: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                path: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                value: opaque_value(row.get_ref(3)?),
                expiry: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
            })
        })?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;

        tracing::info!(path = %live.display(), rows = records.len(), "read cookies");
        Ok(records)
    }

    /// Exact row count. Absent store: 0.
    pub fn try_count(&self, target: &BrowserTarget, paths: &StoragePaths) -> Result<i64, CleanError> {
        let Some(live) = existing_store(paths) else {
            return Ok(0);
        };

        let snapshot = Snapshot::take(live)?;
        let conn = snapshot.open()?;
        let count: i64 = conn.query_row(&target.count_query(), [], |row| row.get(0))?;
        Ok(count)
    }

    /// Exact row count, or -1 when it could not be determined.
    pub fn count(&self, target: &BrowserTarget, paths: &StoragePaths) -> i64 {
        match self.try_count(target, paths) {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(browser = target.display_name, error = %e, "error counting cookies");
                -1
            }
        }
    }
}

fn existing_store(paths: &StoragePaths) -> Option<&Path> {
    paths.cookie_db.as_deref().filter(|p| p.is_file())
}

fn opaque_value(value: ValueRef<'_>) -> CookieValue {
    match value {
        ValueRef::Null => CookieValue::Null,
        ValueRef::Text(bytes) => CookieValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => CookieValue::Blob(bytes.to_vec()),
        ValueRef::Integer(i) => CookieValue::Text(i.to_string()),
        ValueRef::Real(f) => CookieValue::Text(f.to_string()),
    }
}
