//! Backup-then-delete of a browser cookie store.
//!
//! Order of a clean:
//!
//! 1. process check (refuse, or force-quit under [`RunningPolicy::ForceQuit`])
//! 2. store must exist
//! 3. backup artifact
//! 4. initial count
//! 5. `DELETE` in a transaction, retried only while the store is locked
//! 6. final count
//!
//! The browser is not re-checked after step 1. A user relaunching it in
//! that window can still race the delete; the window is kept to a backup
//! copy and a count.

use crate::base::config::CleanerConfig;
use crate::base::error::CleanError;
use crate::browsers::BrowserTarget;
use crate::paths::StoragePaths;
use crate::process::ProcessProbe;
use crate::storage::backup;
use crate::storage::reader::StorageReader;
use crate::storage::record::CleanResult;
use crate::storage::retry::{retry_on_locked, RetryConfig};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// What to do when the browser is found running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningPolicy {
    /// Fail with [`CleanError::ProcessRunning`].
    Refuse,
    /// Force-quit, waiting `grace` between terminate and kill.
    ForceQuit { grace: Duration },
}

/// State gathered so far, reported even when a later step fails.
#[derive(Debug, Default)]
struct Progress {
    backup: Option<PathBuf>,
    initial_count: Option<i64>,
    final_count: Option<i64>,
}

pub struct StorageMutator {
    probe: Arc<dyn ProcessProbe>,
    reader: StorageReader,
    retry: RetryConfig,
    fail_safe_probe: bool,
    strict_verification: bool,
}

impl StorageMutator {
    pub fn new(probe: Arc<dyn ProcessProbe>, config: &CleanerConfig) -> Self {
        Self {
            probe,
            reader: StorageReader::new(config.read_limit),
            retry: config.lock_retry.clone(),
            fail_safe_probe: config.fail_safe_probe,
            strict_verification: config.strict_verification,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Back up and purge the cookie store. Never panics or propagates:
    /// every failure becomes a `CleanResult` with `success == false`.
    pub fn clean_cookies(
        &self,
        target: &BrowserTarget,
        paths: &StoragePaths,
        policy: RunningPolicy,
    ) -> CleanResult {
        let mut progress = Progress::default();
        let outcome = self.run(target, paths, policy, &mut progress);

        let initial = progress.initial_count.unwrap_or(0);
        let result = match outcome {
            Ok(()) => CleanResult::succeeded(
                target.display_name,
                initial,
                progress.final_count.unwrap_or(initial),
            ),
            Err(e) => {
                tracing::error!(
                    browser = target.display_name,
                    path = ?paths.cookie_db,
                    error = %e,
                    "error cleaning cookies"
                );
                CleanResult::failed(target.display_name, &e)
                    .with_counts(initial, progress.final_count.unwrap_or(initial))
            }
        }
        .with_backup(progress.backup);

        tracing::info!(
            browser = %result.browser,
            success = result.success,
            initial_count = result.initial_count,
            final_count = result.final_count,
            "clean finished"
        );
        result
    }

    fn run(
        &self,
        target: &BrowserTarget,
        paths: &StoragePaths,
        policy: RunningPolicy,
        progress: &mut Progress,
    ) -> Result<(), CleanError> {
        ensure_not_running(&*self.probe, target, policy, self.fail_safe_probe)?;

        let live = paths
            .cookie_db
            .as_deref()
            .filter(|p| p.is_file())
            .ok_or_else(|| {
                CleanError::store_not_found(
                    paths
                        .cookie_db
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "<unresolved>".to_string()),
                )
            })?;

        progress.backup = Some(backup::create_backup(live)?);

        let initial = self.reader.count(target, paths);
        progress.initial_count = Some(initial);

        let deleted = retry_on_locked(&self.retry, |attempt| {
            tracing::debug!(attempt, path = %live.display(), "deleting cookies");
            delete_all(live, target)
        })?;
        tracing::debug!(deleted, "delete committed");

        let final_count = self.reader.count(target, paths);
        progress.final_count = Some(final_count);

        self.verify(initial, final_count)
    }

    fn verify(&self, initial: i64, final_count: i64) -> Result<(), CleanError> {
        if final_count < 0 || initial < 0 {
            tracing::warn!(initial, final_count, "could not verify cookie counts");
        } else if initial > 0 && final_count == initial {
            tracing::warn!(count = initial, "cookie count unchanged after cleaning");
            if self.strict_verification {
                return Err(CleanError::storage("cookie count unchanged after delete"));
            }
        } else if initial == 0 {
            tracing::info!("cookie store was already empty");
        } else {
            tracing::info!(removed = initial - final_count, "cleaned cookies");
        }
        Ok(())
    }
}

/// Pre-flight check shared by every operation that deletes browser data.
///
/// With `fail_safe` set, an unavailable probe is a refusal rather than the
/// fail-open "not running" answer [`ProcessProbe::is_running`] gives.
pub fn ensure_not_running(
    probe: &dyn ProcessProbe,
    target: &BrowserTarget,
    policy: RunningPolicy,
    fail_safe: bool,
) -> Result<(), CleanError> {
    if !probe.is_available() {
        if fail_safe {
            return Err(CleanError::ProbeUnavailable);
        }
        tracing::warn!("process enumeration unavailable, assuming browser is closed");
        return Ok(());
    }

    if !probe.is_running(target.process_names) {
        tracing::info!(browser = target.display_name, "browser not running");
        return Ok(());
    }

    match policy {
        RunningPolicy::Refuse => Err(CleanError::process_running(target.display_name)),
        RunningPolicy::ForceQuit { grace } => {
            tracing::info!(browser = target.display_name, "browser running, force quitting");
            if probe.force_quit(target.process_names, grace) {
                Ok(())
            } else {
                Err(CleanError::ForceQuitFailed {
                    browser: target.display_name.to_string(),
                })
            }
        }
    }
}

/// Delete every row of the cookie table in one transaction.
///
/// The busy timeout is zeroed so a lock surfaces at once as
/// [`CleanError::StorageLocked`] and the retry policy owns the waiting.
fn delete_all(live: &Path, target: &BrowserTarget) -> Result<usize, CleanError> {
    let mut conn = Connection::open_with_flags(
        live,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.busy_timeout(Duration::ZERO)?;

    let tx = conn.transaction()?;
    let deleted = tx.execute(&target.delete_query(), [])?;
    tx.commit()?;
    Ok(deleted)
}
