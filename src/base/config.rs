//! Runtime configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock behavior: 100-row listings, three lock retries one
//! second apart, a two second force-quit grace period for Chrome.

use crate::base::context::IoResultExt;
use crate::base::error::CleanError;
use crate::browsers::BrowserKind;
use crate::storage::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default number of rows returned by cookie listings.
pub const DEFAULT_READ_LIMIT: usize = 100;

/// Default wait between graceful and hard termination.
pub const DEFAULT_FORCE_QUIT_GRACE_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Maximum rows returned by `get_cookie_details`.
    pub read_limit: usize,
    /// Retry policy for "database is locked" failures during delete.
    pub lock_retry: RetryConfig,
    /// Milliseconds between graceful terminate and hard kill.
    pub force_quit_grace_ms: u64,
    /// Force-quit Chrome instead of refusing when it is running.
    pub force_quit_chrome: bool,
    /// Refuse to mutate when process enumeration is unavailable.
    pub fail_safe_probe: bool,
    /// Report an unchanged non-zero cookie count after delete as failure.
    pub strict_verification: bool,
    /// Browsers swept by `clean-all`, in order.
    pub browsers: Vec<BrowserKind>,
    /// Also purge cache, local and session storage during `clean-all`.
    pub clean_auxiliary: bool,
    /// Home directory override; detected from the environment when unset.
    pub home: Option<PathBuf>,
    pub log: LogConfig,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            read_limit: DEFAULT_READ_LIMIT,
            lock_retry: RetryConfig::default(),
            force_quit_grace_ms: DEFAULT_FORCE_QUIT_GRACE_MS,
            force_quit_chrome: true,
            fail_safe_probe: true,
            strict_verification: false,
            browsers: BrowserKind::ALL.to_vec(),
            clean_auxiliary: false,
            home: None,
            log: LogConfig::default(),
        }
    }
}

impl CleanerConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CleanError> {
        let json = std::fs::read_to_string(path).path_context(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, CleanError> {
        serde_json::from_str(json).map_err(|e| CleanError::Config {
            message: e.to_string(),
        })
    }

    pub fn force_quit_grace(&self) -> Duration {
        Duration::from_millis(self.force_quit_grace_ms)
    }
}

/// Log sink settings used by the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Directory receiving `cookie_cleaner_<timestamp>.log` files.
    pub dir: PathBuf,
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Log files kept after start-up pruning, including the new one.
    pub max_files: usize,
    /// Write a log file in addition to console output.
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            level: "info".to_string(),
            max_files: 10,
            file: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config = CleanerConfig::from_json("{}").unwrap();
        assert_eq!(config, CleanerConfig::default());
        assert_eq!(config.read_limit, 100);
        assert_eq!(config.lock_retry.max_attempts, 3);
        assert_eq!(config.force_quit_grace(), Duration::from_secs(2));
    }

    #[test]
    fn test_partial_override() {
        let config = CleanerConfig::from_json(
            r#"{"read_limit": 5, "browsers": ["firefox"], "log": {"max_files": 3}}"#,
        )
        .unwrap();
        assert_eq!(config.read_limit, 5);
        assert_eq!(config.browsers, vec![BrowserKind::Firefox]);
        assert_eq!(config.log.max_files, 3);
        assert_eq!(config.log.level, "info");
        assert!(config.force_quit_chrome);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = CleanerConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, CleanError::Config { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = CleanerConfig::load(Path::new("/definitely/missing.json")).unwrap_err();
        assert!(matches!(err, CleanError::Io { .. }));
    }
}
