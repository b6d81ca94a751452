//! Firefox profile discovery.
//!
//! Firefox keeps one directory per profile under its profiles root, named
//! `<random>.<profile name>`. The profile created for release builds ends
//! with `.default-release`; dev-edition, nightly and user-created profiles
//! are ignored.

use std::fs;
use std::path::{Path, PathBuf};

/// Suffix identifying the release-channel default profile.
pub const DEFAULT_PROFILE_SUFFIX: &str = ".default-release";

/// Find the default-release profile directory under `profiles_root`.
///
/// When several directories match, the first in lexical order wins so the
/// result does not depend on `read_dir` ordering. Returns `None` when the
/// root is missing or holds no matching profile.
pub fn find_default_profile(profiles_root: &Path) -> Option<PathBuf> {
    let entries = match fs::read_dir(profiles_root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(
                path = %profiles_root.display(),
                error = %e,
                "profiles root not readable"
            );
            return None;
        }
    };

    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .ends_with(DEFAULT_PROFILE_SUFFIX)
        })
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    candidates.sort();
    let profile = candidates.into_iter().next();
    if profile.is_none() {
        tracing::debug!(path = %profiles_root.display(), "no default-release profile");
    }
    profile
}
