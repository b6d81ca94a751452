use thiserror::Error;

/// Errors raised by the storage, process and path layers.
///
/// Every variant carries owned strings so results can be cloned into
/// [`CleanResult`](crate::storage::CleanResult) and compared in tests.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CleanError {
    /// Expected storage location is absent (unsupported OS, no profile,
    /// browser never run).
    #[error("{what} not found: {path}")]
    PathNotFound { what: String, path: String },

    /// Target browser is live while a mutation was requested.
    #[error("{browser} is running")]
    ProcessRunning { browser: String },

    /// Force-quit was attempted but processes survived.
    #[error("unable to terminate {browser} processes")]
    ForceQuitFailed { browser: String },

    /// Transient lock on the cookie database.
    #[error("database is locked")]
    StorageLocked,

    /// Any other read/write failure against the cookie database.
    #[error("storage error: {message}")]
    Storage { message: String },

    /// The pre-delete backup copy could not be written.
    #[error("backup of {path} failed: {message}")]
    BackupFailed { path: String, message: String },

    /// Process enumeration is missing or denied on this host.
    #[error("process enumeration unavailable")]
    ProbeUnavailable,

    /// Configuration file could not be read or parsed.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Filesystem failure outside the cookie database.
    #[error("io error at {path}: {message}")]
    Io { path: String, message: String },
}

impl CleanError {
    pub fn store_not_found(path: impl Into<String>) -> Self {
        CleanError::PathNotFound {
            what: "cookie store".into(),
            path: path.into(),
        }
    }

    pub fn process_running(browser: impl Into<String>) -> Self {
        CleanError::ProcessRunning {
            browser: browser.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        CleanError::Storage {
            message: message.into(),
        }
    }

    /// Whether the error is a transient lock worth retrying.
    pub fn is_locked(&self) -> bool {
        matches!(self, CleanError::StorageLocked)
    }
}

impl From<rusqlite::Error> for CleanError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ffi::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ffi::ErrorCode::DatabaseLocked =>
            {
                CleanError::StorageLocked
            }
            _ => CleanError::Storage {
                message: err.to_string(),
            },
        }
    }
}
