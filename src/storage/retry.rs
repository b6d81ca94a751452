//! Bounded retry for transient cookie-store locks.
//!
//! Only "database is locked/busy" failures are retried, with a fixed delay
//! between attempts; every other error is returned at once.

use crate::base::error::CleanError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for lock retry behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first (default: 3)
    pub max_attempts: usize,
    /// Fixed delay between attempts in milliseconds (default: 1000)
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Check if another attempt is allowed after `attempt` attempts (1-based).
pub fn should_retry(attempt: usize, config: &RetryConfig) -> bool {
    attempt < config.max_attempts
}

/// Run `op` until it succeeds, fails with a non-lock error, or the attempt
/// budget is spent. `op` receives the 1-based attempt number.
///
/// A lock that persists through the last attempt is escalated to
/// [`CleanError::Storage`].
pub fn retry_on_locked<T, F>(config: &RetryConfig, mut op: F) -> Result<T, CleanError>
where
    F: FnMut(usize) -> Result<T, CleanError>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op(attempt) {
            Ok(value) => return Ok(value),
            Err(e) if e.is_locked() && should_retry(attempt, config) => {
                tracing::warn!(
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = config.delay_ms,
                    "cookie store locked, retrying"
                );
                std::thread::sleep(config.delay());
            }
            Err(e) if e.is_locked() => {
                tracing::error!(attempt, "cookie store still locked, giving up");
                return Err(CleanError::storage(format!(
                    "database locked after {attempt} attempts"
                )));
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast(max_attempts: usize) -> RetryConfig {
        RetryConfig {
            max_attempts,
            delay_ms: 0,
        }
    }

    #[test]
    fn test_should_retry() {
        let config = RetryConfig::default(); // max_attempts = 3

        assert!(should_retry(1, &config));
        assert!(should_retry(2, &config));
        assert!(!should_retry(3, &config));
        assert!(!should_retry(4, &config));
    }

    #[test]
    fn test_no_retry_config() {
        let config = RetryConfig {
            max_attempts: 1,
            ..Default::default()
        };
        assert!(!should_retry(1, &config));
    }

    #[test]
    fn test_exhausted_lock_escalates_after_exact_attempts() {
        let mut calls = 0;
        let result: Result<(), _> = retry_on_locked(&fast(3), |_| {
            calls += 1;
            Err(CleanError::StorageLocked)
        });
        assert_eq!(calls, 3);
        match result {
            Err(CleanError::Storage { message }) => assert!(message.contains("3 attempts")),
            other => panic!("Expected Storage error, got {other:?}"),
        }
    }

    #[test]
    fn test_lock_clears_on_second_attempt() {
        let result = retry_on_locked(&fast(3), |attempt| {
            if attempt == 1 {
                Err(CleanError::StorageLocked)
            } else {
                Ok(attempt)
            }
        });
        assert_eq!(result, Ok(2));
    }

    #[test]
    fn test_other_errors_not_retried() {
        let mut calls = 0;
        let result: Result<(), _> = retry_on_locked(&fast(3), |_| {
            calls += 1;
            Err(CleanError::storage("no such table: cookies"))
        });
        assert_eq!(calls, 1);
        assert_eq!(result, Err(CleanError::storage("no such table: cookies")));
    }
}
