//! Browser storage path resolution.
//!
//! Maps a browser and host OS to the on-disk locations of its cookie store,
//! cache and web storage directories. Nothing is cached: profiles appear and
//! disappear between runs, so every operation resolves afresh.
//!
//! | Browser | macOS | Linux | Windows |
//! |---------|-------|-------|---------|
//! | Chrome | `~/Library/Application Support/Google/Chrome` | `~/.config/google-chrome` | `%LOCALAPPDATA%/Google/Chrome/User Data` |
//! | Edge | `~/Library/Application Support/Microsoft Edge` | `~/.config/microsoft-edge` | `%LOCALAPPDATA%/Microsoft/Edge/User Data` |
//! | Firefox | `~/Library/Application Support/Firefox/Profiles` | `~/.mozilla/firefox` | `%APPDATA%/Mozilla/Firefox/Profiles` |

pub mod profile;

use crate::browsers::BrowserKind;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub use profile::find_default_profile;

/// Host operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsKind {
    MacOs,
    Linux,
    Windows,
    Other,
}

impl OsKind {
    /// OS family this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            OsKind::MacOs
        } else if cfg!(target_os = "linux") {
            OsKind::Linux
        } else if cfg!(target_os = "windows") {
            OsKind::Windows
        } else {
            OsKind::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OsKind::MacOs => "macOS",
            OsKind::Linux => "Linux",
            OsKind::Windows => "Windows",
            OsKind::Other => "Unknown",
        }
    }
}

/// The per-user directories path resolution starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    pub os: OsKind,
    pub home: PathBuf,
    /// `%LOCALAPPDATA%` on Windows.
    pub local_app_data: PathBuf,
    /// `%APPDATA%` on Windows.
    pub roaming_app_data: PathBuf,
}

impl HostEnv {
    /// Build an environment rooted at `home`, deriving the Windows
    /// app-data roots from it.
    pub fn with_home(os: OsKind, home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            os,
            local_app_data: home.join("AppData").join("Local"),
            roaming_app_data: home.join("AppData").join("Roaming"),
            home,
        }
    }

    /// Detect the current user's environment. `None` if no home directory
    /// can be determined.
    pub fn detect() -> Option<Self> {
        let home = dirs::home_dir()?;
        let mut env = Self::with_home(OsKind::current(), home);
        if env.os == OsKind::Windows {
            if let Some(local) = dirs::data_local_dir() {
                env.local_app_data = local;
            }
            if let Some(roaming) = dirs::data_dir() {
                env.roaming_app_data = roaming;
            }
        }
        Some(env)
    }
}

/// Resolved storage locations for one browser. `None` means "nothing to do".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoragePaths {
    pub profile_dir: Option<PathBuf>,
    pub cookie_db: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub local_storage_dir: Option<PathBuf>,
    pub session_storage_dir: Option<PathBuf>,
}

impl StoragePaths {
    /// Cache, local storage and session storage directories that exist.
    pub fn auxiliary_dirs(&self) -> Vec<PathBuf> {
        [
            &self.cache_dir,
            &self.local_storage_dir,
            &self.session_storage_dir,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}

/// Chromium-family directory names per OS.
struct ChromiumLayout {
    macos: &'static str,
    linux: &'static str,
    windows: &'static str,
    macos_cache: &'static str,
    linux_cache: &'static str,
}

const CHROME_LAYOUT: ChromiumLayout = ChromiumLayout {
    macos: "Library/Application Support/Google/Chrome",
    linux: ".config/google-chrome",
    windows: "Google/Chrome/User Data",
    macos_cache: "Library/Caches/Google/Chrome",
    linux_cache: ".cache/google-chrome",
};

const EDGE_LAYOUT: ChromiumLayout = ChromiumLayout {
    macos: "Library/Application Support/Microsoft Edge",
    linux: ".config/microsoft-edge",
    windows: "Microsoft/Edge/User Data",
    macos_cache: "Library/Caches/Microsoft Edge",
    linux_cache: ".cache/microsoft-edge",
};

/// Name of the profile directory Chromium browsers create first.
pub const CHROMIUM_DEFAULT_PROFILE: &str = "Default";

fn chromium_layout(kind: BrowserKind) -> Option<&'static ChromiumLayout> {
    match kind {
        BrowserKind::Chrome => Some(&CHROME_LAYOUT),
        BrowserKind::Edge => Some(&EDGE_LAYOUT),
        BrowserKind::Firefox => None,
    }
}

/// Root directory holding a browser's profiles, whether or not it exists.
pub fn profiles_root(kind: BrowserKind, host: &HostEnv) -> Option<PathBuf> {
    if let Some(layout) = chromium_layout(kind) {
        return match host.os {
            OsKind::MacOs => Some(host.home.join(layout.macos)),
            OsKind::Linux => Some(host.home.join(layout.linux)),
            OsKind::Windows => Some(host.local_app_data.join(layout.windows)),
            OsKind::Other => None,
        };
    }

    match host.os {
        OsKind::MacOs => Some(host.home.join("Library/Application Support/Firefox/Profiles")),
        OsKind::Linux => Some(host.home.join(".mozilla/firefox")),
        OsKind::Windows => Some(host.roaming_app_data.join("Mozilla/Firefox/Profiles")),
        OsKind::Other => None,
    }
}

/// Root of the OS-level cache tree, outside the profile directory.
fn cache_root(kind: BrowserKind, host: &HostEnv) -> Option<PathBuf> {
    if let Some(layout) = chromium_layout(kind) {
        return match host.os {
            OsKind::MacOs => Some(host.home.join(layout.macos_cache)),
            OsKind::Linux => Some(host.home.join(layout.linux_cache)),
            OsKind::Windows | OsKind::Other => None,
        };
    }

    match host.os {
        OsKind::MacOs => Some(host.home.join("Library/Caches/Firefox/Profiles")),
        OsKind::Linux => Some(host.home.join(".cache/mozilla/firefox")),
        OsKind::Windows => Some(host.local_app_data.join("Mozilla/Firefox/Profiles")),
        OsKind::Other => None,
    }
}

fn existing_dir(path: PathBuf) -> Option<PathBuf> {
    path.is_dir().then_some(path)
}

fn existing_file(path: PathBuf) -> Option<PathBuf> {
    path.is_file().then_some(path)
}

/// Resolve every storage location of `kind` on `host`.
pub fn resolve(kind: BrowserKind, host: &HostEnv) -> StoragePaths {
    let paths = match kind {
        BrowserKind::Chrome | BrowserKind::Edge => resolve_chromium(kind, host),
        BrowserKind::Firefox => resolve_firefox(host),
    };

    match &paths.cookie_db {
        Some(db) => tracing::debug!(browser = kind.name(), path = %db.display(), "resolved cookie store"),
        None => tracing::debug!(browser = kind.name(), os = host.os.as_str(), "no cookie store"),
    }
    paths
}

fn resolve_chromium(kind: BrowserKind, host: &HostEnv) -> StoragePaths {
    let Some(root) = profiles_root(kind, host) else {
        tracing::warn!(browser = kind.name(), os = host.os.as_str(), "unsupported operating system");
        return StoragePaths::default();
    };
    let Some(profile) = existing_dir(root.join(CHROMIUM_DEFAULT_PROFILE)) else {
        return StoragePaths::default();
    };

    // Chromium 96 moved the store under Network/.
    let cookie_db = existing_file(profile.join("Network").join("Cookies"))
        .or_else(|| existing_file(profile.join("Cookies")));

    let cache_dir = existing_dir(profile.join("Cache")).or_else(|| {
        cache_root(kind, host)
            .and_then(|r| existing_dir(r.join(CHROMIUM_DEFAULT_PROFILE).join("Cache")))
    });

    StoragePaths {
        cookie_db,
        cache_dir,
        local_storage_dir: existing_dir(profile.join("Local Storage").join("leveldb")),
        session_storage_dir: existing_dir(profile.join("Session Storage")),
        profile_dir: Some(profile),
    }
}

fn resolve_firefox(host: &HostEnv) -> StoragePaths {
    let Some(root) = profiles_root(BrowserKind::Firefox, host) else {
        tracing::warn!(browser = "Firefox", os = host.os.as_str(), "unsupported operating system");
        return StoragePaths::default();
    };
    let Some(profile) = find_default_profile(&root) else {
        return StoragePaths::default();
    };

    let cache_dir = profile.file_name().and_then(|name| {
        cache_root(BrowserKind::Firefox, host).and_then(|r| existing_dir(r.join(name).join("cache2")))
    });

    StoragePaths {
        cookie_db: existing_file(profile.join("cookies.sqlite")),
        cache_dir,
        local_storage_dir: existing_dir(profile.join("storage").join("default")),
        session_storage_dir: existing_dir(profile.join("sessionstore-backups")),
        profile_dir: Some(profile),
    }
}

/// Every cache directory a Chromium browser keeps, existing ones only.
///
/// Broader than [`StoragePaths::cache_dir`]: includes code, GPU and
/// service-worker caches.
pub fn chromium_cache_dirs(kind: BrowserKind, host: &HostEnv) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(root) = profiles_root(kind, host) {
        let profile = root.join(CHROMIUM_DEFAULT_PROFILE);
        dirs.push(profile.join("Cache"));
        dirs.push(profile.join("Code Cache"));
        dirs.push(profile.join("GPUCache"));
        dirs.push(profile.join("Service Worker").join("CacheStorage"));
    }
    if let Some(root) = cache_root(kind, host) {
        dirs.push(root.join(CHROMIUM_DEFAULT_PROFILE).join("Cache"));
    }
    dirs.into_iter().filter(|d| d.is_dir()).collect()
}

/// Total size in bytes of all regular files below `path`.
///
/// Unreadable entries are skipped; a missing path has size 0.
pub fn directory_size(path: &Path) -> u64 {
    let Ok(entries) = std::fs::read_dir(path) else {
        return 0;
    };
    entries
        .flatten()
        .map(|entry| match entry.file_type() {
            Ok(ft) if ft.is_dir() => directory_size(&entry.path()),
            Ok(ft) if ft.is_file() => entry.metadata().map(|m| m.len()).unwrap_or(0),
            _ => 0,
        })
        .sum()
}
