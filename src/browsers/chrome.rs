//! Google Chrome adapter.
//!
//! Chrome is the browser cleaned aggressively: when it is found running
//! during `clean_cookies` its processes are force-quit (unless disabled in
//! configuration) instead of the clean being refused.

use crate::browsers::{AdapterContext, BrowserAdapter, BrowserKind, BrowserTarget, ExpiryEpoch};
use crate::paths;
use crate::storage::auxiliary;
use crate::storage::mutator::RunningPolicy;

pub const TARGET: BrowserTarget = BrowserTarget {
    kind: BrowserKind::Chrome,
    display_name: "Chrome",
    process_names: &[
        "Google Chrome",
        "chrome",
        "Google Chrome Helper",
        "Chrome Helper",
        "chromedriver",
        "Chrome Canary",
        "chromium",
    ],
    table: "cookies",
    host_column: "host_key",
    expiry_column: "expires_utc",
    expiry_epoch: ExpiryEpoch::Chromium,
};

#[derive(Debug)]
pub struct Chrome {
    ctx: AdapterContext,
}

impl Chrome {
    pub fn new(ctx: AdapterContext) -> Self {
        Self { ctx }
    }

    /// Terminate every Chrome process: graceful signal, grace period, then
    /// hard kill. True only if nothing matching survives.
    pub fn force_quit(&self) -> bool {
        let _span = self.span().entered();
        tracing::info!("attempting to force quit Chrome");
        let quit = self
            .ctx
            .probe
            .force_quit(TARGET.process_names, self.ctx.config.force_quit_grace());
        if !quit {
            tracing::error!("Chrome processes survived force quit");
        }
        quit
    }

    /// Empty every Chrome cache directory (HTTP, code, GPU, service worker
    /// and the OS-level cache tree). Refuses while Chrome is running or
    /// cannot be checked.
    pub fn clear_cache(&self) -> bool {
        let _span = self.span().entered();
        if let Err(e) = self.ensure_closed() {
            tracing::warn!(error = %e, "Chrome cache left untouched");
            return false;
        }
        let dirs = paths::chromium_cache_dirs(BrowserKind::Chrome, &self.ctx.host);
        if dirs.is_empty() {
            tracing::info!("no Chrome cache directories found");
        }
        auxiliary::clean_auxiliary_storage(&dirs)
    }
}

impl BrowserAdapter for Chrome {
    fn target(&self) -> &'static BrowserTarget {
        &TARGET
    }

    fn context(&self) -> &AdapterContext {
        &self.ctx
    }

    fn running_policy(&self) -> RunningPolicy {
        if self.ctx.config.force_quit_chrome {
            RunningPolicy::ForceQuit {
                grace: self.ctx.config.force_quit_grace(),
            }
        } else {
            RunningPolicy::Refuse
        }
    }
}
