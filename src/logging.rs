//! Process-wide log sink setup.
//!
//! Installs a `tracing-subscriber` registry with a console layer on stderr
//! and, unless disabled, a file layer writing
//! `<dir>/cookie_cleaner_<YYYYMMDD_HHMMSS>.log`. Older log files beyond the
//! retention cap are deleted before the new one is created.

use crate::base::config::LogConfig;
use crate::base::context::IoResultExt;
use crate::base::error::CleanError;
use crate::base::stamp::file_timestamp;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_PREFIX: &str = "cookie_cleaner_";
pub const LOG_FILE_SUFFIX: &str = ".log";

pub fn log_file_name(stamp: &str) -> String {
    format!("{LOG_FILE_PREFIX}{stamp}{LOG_FILE_SUFFIX}")
}

fn is_log_file(path: &Path) -> bool {
    path.is_file()
        && path.file_name().is_some_and(|name| {
            let name = name.to_string_lossy();
            name.starts_with(LOG_FILE_PREFIX) && name.ends_with(LOG_FILE_SUFFIX)
        })
}

/// Delete the oldest log files in `dir` so at most `keep` remain.
///
/// Names embed a sortable timestamp, so lexical order is age order.
/// Returns the deleted paths.
pub fn prune_logs(dir: &Path, keep: usize) -> Result<Vec<PathBuf>, CleanError> {
    let mut logs: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| is_log_file(p))
            .collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).path_context(dir),
    };
    logs.sort();

    let excess = logs.len().saturating_sub(keep);
    let mut removed = Vec::with_capacity(excess);
    for old in logs.into_iter().take(excess) {
        fs::remove_file(&old).path_context(&old)?;
        removed.push(old);
    }
    Ok(removed)
}

/// Install the global subscriber. Returns the new log file path, if any.
///
/// `RUST_LOG` wins over `default_level`.
pub fn init(config: &LogConfig, default_level: &str) -> Result<Option<PathBuf>, CleanError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let mut pruned = Vec::new();
    let (file_layer, log_path) = if config.file {
        fs::create_dir_all(&config.dir).path_context(&config.dir)?;
        pruned = prune_logs(&config.dir, config.max_files.saturating_sub(1))?;
        let path = config.dir.join(log_file_name(&file_timestamp()));
        let file = fs::File::create(&path).path_context(&path)?;
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file));
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| CleanError::Config {
            message: format!("logging already initialized: {e}"),
        })?;

    for old in &pruned {
        tracing::debug!(path = %old.display(), "removed old log file");
    }
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prune_keeps_newest() {
        let dir = tempdir().unwrap();
        for stamp in ["20240101_000000", "20240102_000000", "20240103_000000"] {
            fs::write(dir.path().join(log_file_name(stamp)), b"").unwrap();
        }
        fs::write(dir.path().join("unrelated.txt"), b"").unwrap();

        let removed = prune_logs(dir.path(), 2).unwrap();
        assert_eq!(removed, vec![dir.path().join(log_file_name("20240101_000000"))]);
        assert!(dir.path().join("unrelated.txt").exists());
        assert!(dir.path().join(log_file_name("20240103_000000")).exists());
    }

    #[test]
    fn test_prune_missing_dir() {
        assert!(prune_logs(Path::new("/nonexistent/logs"), 3).unwrap().is_empty());
    }

    #[test]
    fn test_prune_to_zero() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(log_file_name("20240101_000000")), b"").unwrap();
        assert_eq!(prune_logs(dir.path(), 0).unwrap().len(), 1);
    }
}
