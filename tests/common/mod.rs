//! Synthetic browser homes shared by the integration tests.

#![allow(dead_code)]

use cookiecleaner::paths::{HostEnv, OsKind};
use cookiecleaner::process::ProcessProbe;
use cookiecleaner::{AdapterContext, CleanerConfig};
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const HOSTS: [&str; 4] = [".example.com", ".example.org", "login.site.test", "shop.test"];

pub fn linux_home(root: &Path) -> HostEnv {
    HostEnv::with_home(OsKind::Linux, root)
}

/// Chromium-schema store with `rows` cookies spread over [`HOSTS`].
pub fn write_chromium_store(db: &Path, rows: usize) {
    fs::create_dir_all(db.parent().unwrap()).unwrap();
    let conn = Connection::open(db).unwrap();
    conn.execute_batch(
        "CREATE TABLE meta (key TEXT PRIMARY KEY, value TEXT);
         INSERT INTO meta VALUES ('version', '21');
         CREATE TABLE cookies (creation_utc INTEGER NOT NULL, host_key TEXT NOT NULL,
             name TEXT NOT NULL, value TEXT NOT NULL, encrypted_value BLOB DEFAULT '',
             path TEXT NOT NULL, expires_utc INTEGER NOT NULL, is_secure INTEGER NOT NULL)",
    )
    .unwrap();
    for i in 0..rows {
        conn.execute(
            "INSERT INTO cookies VALUES (?1, ?2, ?3, ?4, X'763130', '/', ?5, 1)",
            params![
                13_300_000_000_000_000_i64 + i as i64,
                HOSTS[i % HOSTS.len()],
                format!("cookie{i}"),
                format!("value{i}"),
                13_400_000_000_000_000_i64,
            ],
        )
        .unwrap();
    }
}

/// Firefox-schema store with `rows` cookies spread over [`HOSTS`].
pub fn write_firefox_store(db: &Path, rows: usize) {
    fs::create_dir_all(db.parent().unwrap()).unwrap();
    let conn = Connection::open(db).unwrap();
    conn.execute_batch(
        "CREATE TABLE moz_cookies (id INTEGER PRIMARY KEY, originAttributes TEXT NOT NULL DEFAULT '',
             name TEXT, value TEXT, host TEXT, path TEXT, expiry INTEGER, isSecure INTEGER)",
    )
    .unwrap();
    for i in 0..rows {
        conn.execute(
            "INSERT INTO moz_cookies (name, value, host, path, expiry, isSecure)
             VALUES (?1, ?2, ?3, '/', 1900000000, 0)",
            params![format!("ff{i}"), format!("v{i}"), HOSTS[i % HOSTS.len()]],
        )
        .unwrap();
    }
}

pub fn chrome_profile(home: &Path) -> PathBuf {
    home.join(".config/google-chrome/Default")
}

pub fn edge_profile(home: &Path) -> PathBuf {
    home.join(".config/microsoft-edge/Default")
}

pub fn firefox_profiles(home: &Path) -> PathBuf {
    home.join(".mozilla/firefox")
}

pub fn row_count(db: &Path, table: &str) -> i64 {
    Connection::open(db)
        .unwrap()
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

/// Files in `dir` whose name contains `.backup_`.
pub fn backups_in(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.to_string_lossy().contains(".backup_"))
        .collect()
}

pub fn context(home: &Path, probe: Arc<dyn ProcessProbe>) -> AdapterContext {
    let mut config = CleanerConfig::default();
    config.lock_retry.delay_ms = 10;
    AdapterContext::new(linux_home(home), probe, config)
}

/// Probe reporting running exactly those browsers whose process list
/// contains one of `running`.
#[derive(Debug, Default)]
pub struct NamedProbe {
    pub running: Vec<&'static str>,
}

impl NamedProbe {
    pub fn new(running: &[&'static str]) -> Self {
        Self {
            running: running.to_vec(),
        }
    }
}

impl ProcessProbe for NamedProbe {
    fn is_available(&self) -> bool {
        true
    }

    fn is_running(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.running.contains(n))
    }

    fn force_quit(&self, names: &[&str], _grace: Duration) -> bool {
        !self.is_running(names)
    }
}
