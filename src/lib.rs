//! # cookiecleaner
//!
//! Locate, inspect and purge the cookie stores of locally installed
//! Chrome, Firefox and Edge profiles.
//!
//! Reads never touch the live store: the database is copied to a scratch
//! location and queried there. Deletes go against the live store, only
//! after the owning browser is confirmed not running and a byte-for-byte
//! backup has been written beside it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cookiecleaner::browsers::{configured_adapters, AdapterContext};
//! use cookiecleaner::paths::HostEnv;
//! use cookiecleaner::process::SystemProbe;
//! use cookiecleaner::{CleanerConfig, CleaningOrchestrator};
//! use std::sync::Arc;
//!
//! let host = HostEnv::detect().unwrap();
//! let ctx = AdapterContext::new(host, Arc::new(SystemProbe::new()), CleanerConfig::default());
//! let results = CleaningOrchestrator::new().clean_all(&configured_adapters(&ctx));
//! for r in results {
//!     println!("{}: {} -> {}", r.browser, r.initial_count, r.final_count);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error type, I/O context helpers and configuration
//! - [`paths`] - Per-OS, per-browser storage location resolution
//! - [`process`] - Running-browser detection and termination
//! - [`storage`] - Snapshot reads, backed-up deletes, auxiliary purging
//! - [`browsers`] - One adapter per supported browser
//! - [`orchestrator`] - Sequential multi-browser sweep
//! - [`logging`] - Console and file log sinks

pub mod base;
pub mod browsers;
pub mod logging;
pub mod orchestrator;
pub mod paths;
pub mod process;
pub mod storage;

pub use base::{CleanError, CleanerConfig};
pub use browsers::{AdapterContext, BrowserAdapter, BrowserKind};
pub use orchestrator::{CleanSummary, CleaningOrchestrator};
pub use storage::{CleanResult, CookieRecord, CookieValue};
