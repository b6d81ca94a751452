//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cookiecleaner::{BrowserKind, CleanerConfig};

/// Inspect and purge browser cookie stores.
///
/// Every delete is preceded by a backup written beside the cookie store, and
/// is refused while the owning browser is running.
#[derive(Parser, Debug)]
#[command(name = "cookiecleaner")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Resolve browser storage below this home directory
    #[arg(long, global = true, value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Do not write a log file
    #[arg(long, global = true)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show resolved storage locations
    Paths {
        /// Limit to one browser
        browser: Option<BrowserKind>,
    },
    /// List the first cookies of a browser, ordered by host
    List {
        browser: BrowserKind,
        /// Maximum rows to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Count stored cookies
    Count { browser: Option<BrowserKind> },
    /// Show whether each browser is running and how many cookies it holds
    Status { browser: Option<BrowserKind> },
    /// Delete all cookies of the named browsers
    Clean {
        #[arg(required = true)]
        browsers: Vec<BrowserKind>,
        /// Also purge cache, local storage and session storage
        #[arg(long)]
        with_storage: bool,
    },
    /// Delete all cookies of every configured browser
    CleanAll {
        #[arg(long)]
        with_storage: bool,
    },
    /// Empty Chrome's cache directories
    ClearCache,
    /// Terminate all Chrome processes
    ForceQuit,
    /// Report cookie counts and cache sizes after a clean
    Verify { browser: Option<BrowserKind> },
}

impl Args {
    /// Log level from flags. Priority: quiet > verbose > configured level.
    pub fn default_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => configured,
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Fold command-line overrides into a loaded configuration.
    pub fn apply(&self, config: &mut CleanerConfig) {
        if let Some(home) = &self.home {
            config.home = Some(home.clone());
        }
        if self.no_log_file {
            config.log.file = false;
        }
        match &self.command {
            Command::List {
                limit: Some(limit), ..
            } => config.read_limit = *limit,
            Command::Clean { with_storage, .. } | Command::CleanAll { with_storage } => {
                config.clean_auxiliary |= *with_storage;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["cookiecleaner", "count", "-vv", "--json"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert!(args.json);
        assert_eq!(args.command, Command::Count { browser: None });
    }

    #[test]
    fn test_cli_quiet_wins_over_verbose() {
        let args = Args::try_parse_from(["cookiecleaner", "-q", "-v", "status"]).unwrap();
        assert_eq!(args.default_level("info"), "error");

        let args = Args::try_parse_from(["cookiecleaner", "status"]).unwrap();
        assert_eq!(args.default_level("warn"), "warn");
    }

    #[test]
    fn test_cli_browser_names_parse() {
        let args =
            Args::try_parse_from(["cookiecleaner", "clean", "chrome", "msedge", "Firefox"]).unwrap();
        assert_eq!(
            args.command,
            Command::Clean {
                browsers: vec![BrowserKind::Chrome, BrowserKind::Edge, BrowserKind::Firefox],
                with_storage: false,
            }
        );
    }

    #[test]
    fn test_cli_unknown_browser_is_rejected() {
        let err = Args::try_parse_from(["cookiecleaner", "list", "safari"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_clean_requires_a_browser() {
        let err = Args::try_parse_from(["cookiecleaner", "clean"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_missing_subcommand_is_error() {
        assert!(Args::try_parse_from(["cookiecleaner"]).is_err());
    }

    #[test]
    fn test_cli_overrides_applied_to_config() {
        let args = Args::try_parse_from([
            "cookiecleaner",
            "--home",
            "/tmp/fakehome",
            "--no-log-file",
            "list",
            "chrome",
            "-n",
            "5",
        ])
        .unwrap();
        let mut config = CleanerConfig::default();
        args.apply(&mut config);
        assert_eq!(config.home, Some(PathBuf::from("/tmp/fakehome")));
        assert_eq!(config.read_limit, 5);
        assert!(!config.log.file);

        let args = Args::try_parse_from(["cookiecleaner", "clean-all", "--with-storage"]).unwrap();
        let mut config = CleanerConfig::default();
        args.apply(&mut config);
        assert!(config.clean_auxiliary);
    }
}
