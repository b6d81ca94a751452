//! Pre-delete backup artifacts.
//!
//! A backup is a byte-for-byte copy of the cookie store written beside it as
//! `<name>.backup_<YYYYMMDD_HHMMSS>`. A `-wal` journal is copied to
//! `<name>.backup_<YYYYMMDD_HHMMSS>-wal`, so opening the backup sees every
//! committed row. Complete backups are never removed here.

use crate::base::context::IoResultExt;
use crate::base::error::CleanError;
use crate::base::stamp::file_timestamp;
use crate::storage::{sidecar_path, JOURNAL_SUFFIXES};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Marker between the store name and the timestamp.
pub const BACKUP_MARKER: &str = ".backup_";

/// First unused backup path for `live` with `stamp`.
///
/// Two backups within the same second get `_1`, `_2`, ... suffixes rather
/// than overwriting each other.
pub fn backup_path_for(live: &Path, stamp: &str) -> PathBuf {
    let name = live
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("Cookies"));

    let mut base = name;
    base.push(BACKUP_MARKER);
    base.push(stamp);

    let candidate = live.with_file_name(&base);
    if !candidate.exists() {
        return candidate;
    }
    (1..)
        .map(|n| {
            let mut numbered = base.clone();
            numbered.push(format!("_{n}"));
            live.with_file_name(numbered)
        })
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

/// Copy `live` and its journal to a fresh backup path and return that path.
///
/// A journal that fails to copy takes the main copy with it, so a backup
/// path that exists is always complete.
pub fn create_backup(live: &Path) -> Result<PathBuf, CleanError> {
    let backup = backup_path_for(live, &file_timestamp());
    let mut bytes = fs::copy(live, &backup).backup_context(live)?;

    for suffix in JOURNAL_SUFFIXES {
        let journal = sidecar_path(live, suffix);
        if !journal.is_file() {
            continue;
        }
        let journal_backup = sidecar_path(&backup, suffix);
        match fs::copy(&journal, &journal_backup) {
            Ok(n) => bytes += n,
            Err(e) => {
                let _ = fs::remove_file(&journal_backup);
                let _ = fs::remove_file(&backup);
                return Err(e).backup_context(&journal);
            }
        }
    }

    tracing::info!(
        source = %live.display(),
        backup = %backup.display(),
        bytes,
        "created cookie store backup"
    );
    Ok(backup)
}
