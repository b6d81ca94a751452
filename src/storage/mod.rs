//! Cookie store reading and purging.
//!
//! - [`reader`]: copy-then-read listing and counting
//! - [`mutator`]: backup-then-delete with lock retry
//! - [`auxiliary`]: cache / local storage / session storage purging
//! - [`backup`]: backup artifact naming and creation
//! - [`retry`]: bounded retry on "database is locked"

pub mod auxiliary;
pub mod backup;
pub mod mutator;
pub mod reader;
pub mod record;
pub mod retry;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use mutator::{RunningPolicy, StorageMutator};
pub use reader::StorageReader;
pub use record::{CleanResult, CookieRecord, CookieValue};

/// SQLite sidecar files holding committed rows not yet in the main file.
/// Copied wherever the main file is copied.
pub const JOURNAL_SUFFIXES: &[&str] = &["-wal"];

/// `<db><suffix>` beside `db`, the name SQLite pairs with it.
pub fn sidecar_path(db: &Path, suffix: &str) -> PathBuf {
    let mut name = db
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("Cookies"));
    name.push(suffix);
    db.with_file_name(name)
}
