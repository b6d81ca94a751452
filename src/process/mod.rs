//! Running-process detection and termination.
//!
//! [`SystemProbe`] enumerates the OS process table through `sysinfo`.
//! [`FixedProbe`] answers from preset state, for front ends that handle
//! detection themselves and for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;
use sysinfo::{Signal, System};

/// Polls after the hard kill before giving up on processes disappearing.
const SETTLE_POLLS: u32 = 10;
const SETTLE_INTERVAL: Duration = Duration::from_millis(100);

pub trait ProcessProbe: Send + Sync {
    /// Whether process enumeration works on this host.
    fn is_available(&self) -> bool;

    /// True if any live process name contains any of `names`,
    /// case-insensitively. Fails open: false when enumeration is unavailable.
    fn is_running(&self, names: &[&str]) -> bool;

    /// Terminate matching processes, wait `grace`, hard-kill survivors.
    /// True only if a fresh check finds none left.
    fn force_quit(&self, names: &[&str], grace: Duration) -> bool;
}

/// Case-insensitive substring match of a process name against `names`.
pub fn matches_any(process_name: &str, names: &[&str]) -> bool {
    let lower = process_name.to_lowercase();
    names
        .iter()
        .any(|name| !name.is_empty() && lower.contains(&name.to_lowercase()))
}

/// Probe backed by the host's process table.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

impl SystemProbe {
    pub fn new() -> Self {
        Self
    }

    fn snapshot() -> Option<System> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            tracing::warn!("process enumeration unavailable on this platform");
            return None;
        }
        let mut sys = System::new();
        sys.refresh_processes();
        Some(sys)
    }
}

impl ProcessProbe for SystemProbe {
    fn is_available(&self) -> bool {
        sysinfo::IS_SUPPORTED_SYSTEM
    }

    fn is_running(&self, names: &[&str]) -> bool {
        let Some(sys) = Self::snapshot() else {
            return false;
        };
        let me = sysinfo::get_current_pid().ok();

        // Processes that exited between listing and inspection are simply
        // absent from the snapshot.
        for (pid, process) in sys.processes() {
            if Some(*pid) == me {
                continue;
            }
            if matches_any(process.name(), names) {
                tracing::info!(pid = %pid, process = process.name(), "found running process");
                return true;
            }
        }
        false
    }

    fn force_quit(&self, names: &[&str], grace: Duration) -> bool {
        let Some(mut sys) = Self::snapshot() else {
            return false;
        };
        let me = sysinfo::get_current_pid().ok();

        let mut signalled = 0usize;
        for (pid, process) in sys.processes() {
            if Some(*pid) == me || !matches_any(process.name(), names) {
                continue;
            }
            match process.kill_with(Signal::Term) {
                Some(true) => signalled += 1,
                Some(false) => tracing::debug!(pid = %pid, "terminate signal not delivered"),
                None => tracing::debug!(pid = %pid, "graceful terminate unsupported"),
            }
        }
        tracing::info!(signalled, grace_ms = grace.as_millis() as u64, "waiting for processes to exit");
        thread::sleep(grace);

        sys.refresh_processes();
        for (pid, process) in sys.processes() {
            if Some(*pid) == me || !matches_any(process.name(), names) {
                continue;
            }
            if process.kill() {
                tracing::warn!(pid = %pid, process = process.name(), "hard killed");
            } else {
                tracing::warn!(pid = %pid, process = process.name(), "hard kill failed");
            }
        }

        for _ in 0..SETTLE_POLLS {
            if !self.is_running(names) {
                return true;
            }
            thread::sleep(SETTLE_INTERVAL);
        }
        !self.is_running(names)
    }
}

/// Probe with preset answers.
///
/// `force_quit` flips the probe to "not running" when `quit_succeeds` is set.
#[derive(Debug)]
pub struct FixedProbe {
    running: AtomicBool,
    available: bool,
    quit_succeeds: bool,
    force_quits: AtomicUsize,
}

impl FixedProbe {
    pub fn new(running: bool) -> Self {
        Self {
            running: AtomicBool::new(running),
            available: true,
            quit_succeeds: false,
            force_quits: AtomicUsize::new(0),
        }
    }

    pub fn not_running() -> Self {
        Self::new(false)
    }

    pub fn running() -> Self {
        Self::new(true)
    }

    /// A probe that cannot enumerate processes.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(false)
        }
    }

    pub fn with_quit_succeeding(mut self, succeeds: bool) -> Self {
        self.quit_succeeds = succeeds;
        self
    }

    pub fn force_quits(&self) -> usize {
        self.force_quits.load(Ordering::SeqCst)
    }
}

impl ProcessProbe for FixedProbe {
    fn is_available(&self) -> bool {
        self.available
    }

    fn is_running(&self, _names: &[&str]) -> bool {
        self.available && self.running.load(Ordering::SeqCst)
    }

    fn force_quit(&self, names: &[&str], _grace: Duration) -> bool {
        self.force_quits.fetch_add(1, Ordering::SeqCst);
        if self.quit_succeeds {
            self.running.store(false, Ordering::SeqCst);
        }
        !self.is_running(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_case_insensitive_substring() {
        let names = ["Google Chrome", "chromium"];
        assert!(matches_any("Google Chrome Helper (Renderer)", &names));
        assert!(matches_any("CHROMIUM-BROWSER", &names));
        assert!(!matches_any("firefox", &names));
        assert!(!matches_any("anything", &[""]));
    }

    #[test]
    fn test_system_probe_finds_nothing_for_unlikely_name() {
        let probe = SystemProbe::new();
        assert!(!probe.is_running(&["no-such-process-zq81x"]));
    }

    #[test]
    fn test_fixed_probe_force_quit() {
        let probe = FixedProbe::running().with_quit_succeeding(true);
        assert!(probe.is_running(&["x"]));
        assert!(probe.force_quit(&["x"], Duration::ZERO));
        assert!(!probe.is_running(&["x"]));
        assert_eq!(probe.force_quits(), 1);

        let stuck = FixedProbe::running();
        assert!(!stuck.force_quit(&["x"], Duration::ZERO));
    }

    #[test]
    fn test_unavailable_probe_fails_open() {
        let probe = FixedProbe::unavailable();
        assert!(!probe.is_available());
        assert!(!probe.is_running(&["x"]));
    }
}
