//! Ergonomic error context helpers.
//!
//! Extension traits that attach the offending path to IO failures,
//! converting them into context-rich [`CleanError`] variants.

use crate::base::error::CleanError;
use std::io;
use std::path::Path;

/// Extension trait for adding path context to IO Results.
pub trait IoResultExt<T> {
    /// Attach the path an IO operation was working on.
    ///
    /// # Example
    /// ```ignore
    /// use cookiecleaner::base::context::IoResultExt;
    ///
    /// std::fs::remove_dir_all(&cache).path_context(&cache)?;
    /// // Error: "io error at /home/u/.cache/...: permission denied"
    /// ```
    fn path_context(self, path: &Path) -> Result<T, CleanError>;

    /// Mark an IO failure as a failed backup of `source`.
    fn backup_context(self, source: &Path) -> Result<T, CleanError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn path_context(self, path: &Path) -> Result<T, CleanError> {
        self.map_err(|e| CleanError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn backup_context(self, source: &Path) -> Result<T, CleanError> {
        self.map_err(|e| CleanError::BackupFailed {
            path: source.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_path_context() {
        let result: Result<(), io::Error> =
            Err(Error::new(ErrorKind::PermissionDenied, "denied"));
        let err = result.path_context(Path::new("/tmp/cache")).unwrap_err();

        match err {
            CleanError::Io { path, message } => {
                assert_eq!(path, "/tmp/cache");
                assert!(message.contains("denied"));
            }
            _ => panic!("Expected Io"),
        }
    }

    #[test]
    fn test_backup_context() {
        let result: Result<u64, io::Error> = Err(Error::new(ErrorKind::Other, "disk full"));
        let err = result.backup_context(Path::new("/p/Cookies")).unwrap_err();

        match err {
            CleanError::BackupFailed { path, .. } => assert_eq!(path, "/p/Cookies"),
            _ => panic!("Expected BackupFailed"),
        }
    }
}
