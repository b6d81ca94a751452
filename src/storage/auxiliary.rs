//! Cache, local storage and session storage purging.
//!
//! Each directory is emptied independently: a failure is logged and the
//! remaining directories are still processed. Emptied directories are left
//! in place so the browser finds the layout it expects.

use crate::base::context::IoResultExt;
use crate::base::error::CleanError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Empty every directory in `dirs`. True when all were emptied or absent.
pub fn clean_auxiliary_storage(dirs: &[PathBuf]) -> bool {
    let mut all_cleaned = true;
    for dir in dirs {
        match empty_directory(dir) {
            Ok(true) => tracing::info!(path = %dir.display(), "cleared directory"),
            Ok(false) => tracing::debug!(path = %dir.display(), "directory absent, skipped"),
            Err(e) => {
                tracing::error!(path = %dir.display(), error = %e, "error clearing directory");
                all_cleaned = false;
            }
        }
    }
    all_cleaned
}

/// Remove everything inside `dir`, keeping `dir` itself.
///
/// Returns `Ok(false)` when `dir` does not exist. Entries that vanish while
/// being removed are ignored.
pub fn empty_directory(dir: &Path) -> Result<bool, CleanError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e).path_context(dir),
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(e).path_context(dir),
        };
        let path = entry.path();
        let removed = match entry.file_type() {
            Ok(ft) if ft.is_dir() => fs::remove_dir_all(&path),
            Ok(_) => fs::remove_file(&path),
            Err(e) => Err(e),
        };
        match removed {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).path_context(&path),
        }
    }

    fs::create_dir_all(dir).path_context(dir)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_directory_left_existing_and_empty() {
        let root = tempdir().unwrap();
        let cache = root.path().join("Cache");
        fs::create_dir_all(cache.join("sub/deeper")).unwrap();
        fs::write(cache.join("f_000001"), b"data").unwrap();
        fs::write(cache.join("sub/deeper/index"), b"data").unwrap();

        assert!(empty_directory(&cache).unwrap());
        assert!(cache.is_dir());
        assert_eq!(fs::read_dir(&cache).unwrap().count(), 0);
    }

    #[test]
    fn test_absent_directory_is_not_an_error() {
        let root = tempdir().unwrap();
        let missing = root.path().join("Session Storage");
        assert!(!empty_directory(&missing).unwrap());
        assert!(clean_auxiliary_storage(&[missing.clone()]));
        assert!(!missing.exists());
    }

    #[test]
    fn test_failure_does_not_stop_remaining_dirs() {
        let root = tempdir().unwrap();
        let not_a_dir = root.path().join("file");
        fs::write(&not_a_dir, b"x").unwrap();
        let good = root.path().join("Local Storage");
        fs::create_dir_all(&good).unwrap();
        fs::write(good.join("000003.log"), b"x").unwrap();

        assert!(!clean_auxiliary_storage(&[not_a_dir, good.clone()]));
        assert_eq!(fs::read_dir(&good).unwrap().count(), 0);
    }
}
