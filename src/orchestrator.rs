//! Multi-browser cleaning sweep.
//!
//! Browsers are cleaned one after another in the order given. A failure for
//! one browser (running, locked, missing store) is recorded in its
//! [`CleanResult`] and the sweep moves on.

use crate::base::config::CleanerConfig;
use crate::browsers::BrowserAdapter;
use crate::storage::CleanResult;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Aggregate of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanSummary {
    pub attempted: usize,
    pub cleaned: usize,
    /// Sum of `initial - final` over successful results.
    pub cookies_removed: i64,
}

impl CleanSummary {
    pub fn from_results(results: &[CleanResult]) -> Self {
        Self {
            attempted: results.len(),
            cleaned: results.iter().filter(|r| r.success).count(),
            cookies_removed: results.iter().map(CleanResult::removed).sum(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CleaningOrchestrator {
    clean_auxiliary: bool,
    cancel: Option<Arc<AtomicBool>>,
}

impl CleaningOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &CleanerConfig) -> Self {
        Self::new().with_auxiliary(config.clean_auxiliary)
    }

    /// Also purge cache, local and session storage of each browser whose
    /// cookies were cleaned.
    pub fn with_auxiliary(mut self, enabled: bool) -> Self {
        self.clean_auxiliary = enabled;
        self
    }

    /// Flag checked before each browser. Setting it stops the sweep before
    /// the next browser starts; a browser already being cleaned finishes.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn clean_all(&self, adapters: &[Box<dyn BrowserAdapter>]) -> Vec<CleanResult> {
        let mut results = Vec::with_capacity(adapters.len());

        for (index, adapter) in adapters.iter().enumerate() {
            if self.cancelled() {
                tracing::info!(remaining = adapters.len() - index, "sweep cancelled");
                break;
            }

            let result = adapter.clean_cookies();
            if result.success && self.clean_auxiliary && !adapter.clean_auxiliary_storage() {
                tracing::warn!(browser = adapter.name(), "auxiliary storage only partly cleaned");
            }
            results.push(result);
        }

        let summary = CleanSummary::from_results(&results);
        tracing::info!(
            attempted = summary.attempted,
            cleaned = summary.cleaned,
            cookies_removed = summary.cookies_removed,
            "sweep finished"
        );
        results
    }
}
