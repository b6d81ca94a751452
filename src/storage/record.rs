//! Cookie rows and clean outcomes.

use crate::browsers::ExpiryEpoch;
use base64::Engine;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use time::OffsetDateTime;

/// Chromium uses microseconds since 1601-01-01 00:00:00 UTC (Windows FILETIME epoch).
/// This is the offset from Unix epoch (1970-01-01) in microseconds.
pub const CHROME_EPOCH_OFFSET_MICROS: i64 = 11_644_473_600_000_000;

/// Convert Chrome epoch (microseconds since 1601) to a UTC timestamp.
/// Zero marks a session cookie; values outside the representable range
/// yield `None`.
pub fn chrome_to_unix_timestamp(chrome_time: i64) -> Option<OffsetDateTime> {
    if chrome_time == 0 {
        return None;
    }

    let unix_micros = chrome_time.checked_sub(CHROME_EPOCH_OFFSET_MICROS)?;
    let unix_secs = unix_micros / 1_000_000;
    OffsetDateTime::from_unix_timestamp(unix_secs).ok()
}

/// Convert a Unix-second timestamp. Zero marks a session cookie.
pub fn unix_seconds_to_timestamp(secs: i64) -> Option<OffsetDateTime> {
    if secs == 0 {
        return None;
    }
    OffsetDateTime::from_unix_timestamp(secs).ok()
}

/// Opaque cookie value exactly as stored. Never decoded or decrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CookieValue {
    Text(String),
    Blob(Vec<u8>),
    Null,
}

impl CookieValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CookieValue::Text(s) => s.is_empty(),
            CookieValue::Blob(b) => b.is_empty(),
            CookieValue::Null => true,
        }
    }
}

impl fmt::Display for CookieValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CookieValue::Text(s) => f.write_str(s),
            CookieValue::Blob(b) => {
                write!(f, "base64:{}", base64::engine::general_purpose::STANDARD.encode(b))
            }
            CookieValue::Null => Ok(()),
        }
    }
}

/// Read-only snapshot of one cookie row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieRecord {
    pub host: String,
    pub name: String,
    pub path: String,
    pub value: CookieValue,
    /// Raw expiry column, in the browser's own epoch.
    pub expiry: i64,
}

impl CookieRecord {
    /// Expiry as a UTC timestamp; `None` for session cookies or
    /// out-of-range values.
    pub fn expires_at(&self, epoch: ExpiryEpoch) -> Option<OffsetDateTime> {
        match epoch {
            ExpiryEpoch::Chromium => chrome_to_unix_timestamp(self.expiry),
            ExpiryEpoch::Unix => unix_seconds_to_timestamp(self.expiry),
        }
    }
}

/// Outcome of one clean attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanResult {
    pub browser: String,
    pub success: bool,
    pub initial_count: i64,
    pub final_count: i64,
    pub error: Option<String>,
    /// Backup artifact written before the delete, if any.
    pub backup: Option<PathBuf>,
}

impl CleanResult {
    pub fn succeeded(browser: impl Into<String>, initial_count: i64, final_count: i64) -> Self {
        Self {
            browser: browser.into(),
            success: true,
            initial_count,
            final_count,
            error: None,
            backup: None,
        }
    }

    pub fn failed(browser: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            browser: browser.into(),
            success: false,
            initial_count: 0,
            final_count: 0,
            error: Some(error.to_string()),
            backup: None,
        }
    }

    pub fn with_counts(mut self, initial_count: i64, final_count: i64) -> Self {
        self.initial_count = initial_count;
        self.final_count = final_count;
        self
    }

    pub fn with_backup(mut self, backup: Option<PathBuf>) -> Self {
        self.backup = backup;
        self
    }

    /// Rows removed by a successful clean; 0 for failures or unknown counts.
    pub fn removed(&self) -> i64 {
        if self.success && self.initial_count >= 0 && self.final_count >= 0 {
            (self.initial_count - self.final_count).max(0)
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chrome_epoch_conversion() {
        // 2024-01-01 00:00:00 UTC
        let chrome_time = 1704067200_i64 * 1_000_000 + CHROME_EPOCH_OFFSET_MICROS;
        let dt = chrome_to_unix_timestamp(chrome_time).unwrap();
        assert_eq!(dt.year(), 2024);
        assert!(chrome_to_unix_timestamp(0).is_none());
    }

    #[test]
    fn test_expires_at_per_epoch() {
        let record = CookieRecord {
            host: ".example.com".into(),
            name: "sid".into(),
            path: "/".into(),
            value: CookieValue::Text("abc".into()),
            expiry: 1700000000,
        };
        assert_eq!(
            record.expires_at(ExpiryEpoch::Unix).unwrap().unix_timestamp(),
            1700000000
        );
        // Read as Chromium microseconds this lands before 1970.
        assert!(record.expires_at(ExpiryEpoch::Chromium).unwrap().year() < 1970);
    }

    #[test]
    fn test_extreme_expiry_values_are_not_timestamps() {
        let mut record = CookieRecord {
            host: "bad.example".into(),
            name: "x".into(),
            path: "/".into(),
            value: CookieValue::Null,
            expiry: i64::MIN,
        };
        assert!(record.expires_at(ExpiryEpoch::Chromium).is_none());
        assert!(record.expires_at(ExpiryEpoch::Unix).is_none());

        record.expiry = i64::MAX;
        assert!(record.expires_at(ExpiryEpoch::Chromium).is_none());
        assert!(record.expires_at(ExpiryEpoch::Unix).is_none());
    }

    #[test]
    fn test_blob_value_display() {
        assert_eq!(CookieValue::Blob(vec![1, 2, 3]).to_string(), "base64:AQID");
        assert_eq!(CookieValue::Null.to_string(), "");
        assert!(CookieValue::Null.is_empty());
    }

    #[test]
    fn test_removed_only_counts_successes() {
        assert_eq!(CleanResult::succeeded("Chrome", 12, 0).removed(), 12);
        assert_eq!(CleanResult::succeeded("Chrome", -1, 0).removed(), 0);
        assert_eq!(
            CleanResult::failed("Chrome", "Chrome is running").with_counts(5, 5).removed(),
            0
        );
    }
}
