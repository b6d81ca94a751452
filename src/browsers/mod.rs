//! Browser adapters.
//!
//! Each supported browser is an independent struct holding its constant
//! [`BrowserTarget`] table and implementing [`BrowserAdapter`]. The trait
//! supplies the shared behavior; adapters override only where a browser
//! differs (Chrome's force-quit policy, for instance).
//!
//! | Browser | Table | Host column | Expiry column | Processes |
//! |---------|-------|-------------|---------------|-----------|
//! | Chrome | `cookies` | `host_key` | `expires_utc` | Google Chrome, chrome, helpers, chromedriver, chromium |
//! | Firefox | `moz_cookies` | `host` | `expiry` | firefox |
//! | Edge | `cookies` | `host_key` | `expires_utc` | msedge, Microsoft Edge |

pub mod chrome;
pub mod edge;
pub mod firefox;

pub use chrome::Chrome;
pub use edge::Edge;
pub use firefox::Firefox;

use crate::base::config::CleanerConfig;
use crate::base::error::CleanError;
use crate::paths::{self, HostEnv, StoragePaths};
use crate::process::ProcessProbe;
use crate::storage::auxiliary;
use crate::storage::mutator::{self, RunningPolicy, StorageMutator};
use crate::storage::reader::StorageReader;
use crate::storage::{CleanResult, CookieRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Supported browsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Edge,
}

impl BrowserKind {
    pub const ALL: [BrowserKind; 3] = [BrowserKind::Chrome, BrowserKind::Firefox, BrowserKind::Edge];

    pub fn name(self) -> &'static str {
        self.target().display_name
    }

    pub fn target(self) -> &'static BrowserTarget {
        match self {
            BrowserKind::Chrome => &chrome::TARGET,
            BrowserKind::Firefox => &firefox::TARGET,
            BrowserKind::Edge => &edge::TARGET,
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrowserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" | "google-chrome" => Ok(BrowserKind::Chrome),
            "firefox" => Ok(BrowserKind::Firefox),
            "edge" | "msedge" | "microsoft-edge" => Ok(BrowserKind::Edge),
            other => Err(format!("unknown browser: {other}")),
        }
    }
}

/// How a cookie timestamp column is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryEpoch {
    /// Microseconds since 1601-01-01 UTC.
    Chromium,
    /// Seconds since 1970-01-01 UTC.
    Unix,
}

/// Constant per-browser storage description.
#[derive(Debug, PartialEq, Eq)]
pub struct BrowserTarget {
    pub kind: BrowserKind,
    pub display_name: &'static str,
    /// Substrings matched case-insensitively against live process names.
    pub process_names: &'static [&'static str],
    pub table: &'static str,
    pub host_column: &'static str,
    pub expiry_column: &'static str,
    pub expiry_epoch: ExpiryEpoch,
}

impl BrowserTarget {
    /// Row listing ordered by host, limit bound as `?1`.
    pub fn select_query(&self) -> String {
        format!(
            "SELECT {host}, name, path, value, {expiry} FROM {table} ORDER BY {host} LIMIT ?1",
            host = self.host_column,
            expiry = self.expiry_column,
            table = self.table,
        )
    }

    pub fn count_query(&self) -> String {
        format!("SELECT COUNT(*) FROM {}", self.table)
    }

    pub fn delete_query(&self) -> String {
        format!("DELETE FROM {}", self.table)
    }
}

/// Everything an adapter needs besides its constant table.
#[derive(Clone)]
pub struct AdapterContext {
    pub host: HostEnv,
    pub probe: Arc<dyn ProcessProbe>,
    pub config: CleanerConfig,
}

impl AdapterContext {
    pub fn new(host: HostEnv, probe: Arc<dyn ProcessProbe>, config: CleanerConfig) -> Self {
        Self {
            host,
            probe,
            config,
        }
    }

    pub(crate) fn reader(&self) -> StorageReader {
        StorageReader::new(self.config.read_limit)
    }

    pub(crate) fn mutator(&self) -> StorageMutator {
        StorageMutator::new(Arc::clone(&self.probe), &self.config)
    }
}

impl fmt::Debug for AdapterContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterContext")
            .field("host", &self.host)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Uniform capability surface over one browser's storage.
///
/// Adapters are independent: different browsers may be used concurrently,
/// but two clean calls against the same store must not overlap.
pub trait BrowserAdapter: Send + Sync {
    fn target(&self) -> &'static BrowserTarget;

    fn context(&self) -> &AdapterContext;

    /// Span every operation of this adapter runs in.
    fn span(&self) -> tracing::Span {
        tracing::info_span!("browser", name = self.target().display_name)
    }

    fn kind(&self) -> BrowserKind {
        self.target().kind
    }

    fn name(&self) -> &'static str {
        self.target().display_name
    }

    /// Storage locations, resolved afresh on every call.
    fn storage_paths(&self) -> StoragePaths {
        paths::resolve(self.kind(), &self.context().host)
    }

    fn get_cookie_path(&self) -> Option<PathBuf> {
        self.storage_paths().cookie_db
    }

    /// First rows of the cookie store ordered by host, capped at the
    /// configured read limit. Read failures are logged and yield an empty
    /// list.
    fn get_cookie_details(&self) -> Vec<CookieRecord> {
        let _span = self.span().entered();
        let paths = self.storage_paths();
        match self.context().reader().read_cookies(self.target(), &paths) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "error reading cookies");
                Vec::new()
            }
        }
    }

    /// Exact row count; -1 when it cannot be determined.
    fn get_cookie_count(&self) -> i64 {
        let _span = self.span().entered();
        self.context()
            .reader()
            .count(self.target(), &self.storage_paths())
    }

    fn is_running(&self) -> bool {
        let running = self.context().probe.is_running(self.target().process_names);
        tracing::info!(browser = self.name(), running, "process check");
        running
    }

    fn running_policy(&self) -> RunningPolicy {
        RunningPolicy::Refuse
    }

    fn clean_cookies(&self) -> CleanResult {
        let _span = self.span().entered();
        let paths = self.storage_paths();
        self.context()
            .mutator()
            .clean_cookies(self.target(), &paths, self.running_policy())
    }

    /// Refuse unless the browser is known to be closed. An unavailable
    /// probe refuses too while `fail_safe_probe` is set.
    fn ensure_closed(&self) -> Result<(), CleanError> {
        let ctx = self.context();
        mutator::ensure_not_running(
            &*ctx.probe,
            self.target(),
            RunningPolicy::Refuse,
            ctx.config.fail_safe_probe,
        )
    }

    /// Purge cache, local storage and session storage. Refuses while the
    /// browser is running or its state is unknown.
    fn clean_auxiliary_storage(&self) -> bool {
        let _span = self.span().entered();
        if let Err(e) = self.ensure_closed() {
            tracing::warn!(error = %e, "auxiliary storage left untouched");
            return false;
        }
        auxiliary::clean_auxiliary_storage(&self.storage_paths().auxiliary_dirs())
    }
}

/// Construct the adapter for `kind`.
pub fn adapter_for(kind: BrowserKind, ctx: AdapterContext) -> Box<dyn BrowserAdapter> {
    match kind {
        BrowserKind::Chrome => Box::new(Chrome::new(ctx)),
        BrowserKind::Firefox => Box::new(Firefox::new(ctx)),
        BrowserKind::Edge => Box::new(Edge::new(ctx)),
    }
}

/// Adapters for every browser named in the configuration, in order.
pub fn configured_adapters(ctx: &AdapterContext) -> Vec<Box<dyn BrowserAdapter>> {
    ctx.config
        .browsers
        .iter()
        .map(|kind| adapter_for(*kind, ctx.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_templates() {
        let chrome = BrowserKind::Chrome.target();
        assert_eq!(
            chrome.select_query(),
            "SELECT host_key, name, path, value, expires_utc FROM cookies ORDER BY host_key LIMIT ?1"
        );
        assert_eq!(chrome.count_query(), "SELECT COUNT(*) FROM cookies");

        let firefox = BrowserKind::Firefox.target();
        assert_eq!(
            firefox.select_query(),
            "SELECT host, name, path, value, expiry FROM moz_cookies ORDER BY host LIMIT ?1"
        );
        assert_eq!(firefox.delete_query(), "DELETE FROM moz_cookies");
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Chrome".parse::<BrowserKind>(), Ok(BrowserKind::Chrome));
        assert_eq!("msedge".parse::<BrowserKind>(), Ok(BrowserKind::Edge));
        assert_eq!("firefox".parse::<BrowserKind>(), Ok(BrowserKind::Firefox));
        assert!("safari".parse::<BrowserKind>().is_err());
    }

    #[test]
    fn test_targets_are_consistent() {
        for kind in BrowserKind::ALL {
            let target = kind.target();
            assert_eq!(target.kind, kind);
            assert!(!target.process_names.is_empty());
        }
        assert_eq!(BrowserKind::Edge.to_string(), "Edge");
    }
}
