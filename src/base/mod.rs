//! Base types and error handling.
//!
//! - [`CleanError`]: error taxonomy shared by every layer
//! - [`context`]: IO error context helpers
//! - [`config`]: runtime configuration
//! - [`stamp`]: timestamps for backup and log file names

pub mod config;
pub mod context;
pub mod error;
pub mod stamp;

pub use config::CleanerConfig;
pub use error::CleanError;

#[cfg(test)]
mod tests;
