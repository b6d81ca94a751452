//! CLI entry point for the cookie cleaner.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cookiecleaner::browsers::{adapter_for, configured_adapters, Chrome};
use cookiecleaner::paths::{self, HostEnv, OsKind, StoragePaths};
use cookiecleaner::process::{ProcessProbe, SystemProbe};
use cookiecleaner::{
    logging, AdapterContext, BrowserAdapter, BrowserKind, CleanResult, CleanSummary,
    CleanerConfig, CleaningOrchestrator, CookieRecord,
};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

mod cli;

use cli::{Args, Command};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const VALUE_PREVIEW_CHARS: usize = 40;

fn main() -> Result<ExitCode> {
    // Parse before logging so --help works without a log file.
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => CleanerConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => CleanerConfig::default(),
    };
    args.apply(&mut config);

    let level = args.default_level(&config.log.level).to_owned();
    let log_file = logging::init(&config.log, &level)?;

    let host = host_env(&config)?;
    info!(
        os = host.os.as_str(),
        home = %host.home.display(),
        version = env!("CARGO_PKG_VERSION"),
        "cookie cleaner starting"
    );
    if let Some(path) = &log_file {
        debug!(path = %path.display(), "logging to file");
    }
    debug!(?args, "CLI arguments parsed");

    let probe: Arc<dyn ProcessProbe> = Arc::new(SystemProbe::new());
    if !probe.is_available() {
        warn!("process enumeration unavailable on this system");
    }
    let ctx = AdapterContext::new(host, probe, config);

    let ok = run(&args, &ctx)?;
    Ok(if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn host_env(config: &CleanerConfig) -> Result<HostEnv> {
    match &config.home {
        Some(home) => Ok(HostEnv::with_home(OsKind::current(), home)),
        None => HostEnv::detect().context("could not determine the home directory"),
    }
}

fn selected(browser: Option<BrowserKind>) -> Vec<BrowserKind> {
    browser.map_or_else(|| BrowserKind::ALL.to_vec(), |b| vec![b])
}

/// Dispatch one subcommand. `Ok(false)` means the command ran but reported
/// a failure (refused clean, remaining cookies, surviving processes).
fn run(args: &Args, ctx: &AdapterContext) -> Result<bool> {
    match &args.command {
        Command::Paths { browser } => {
            let rows: Vec<PathsRow> = selected(*browser)
                .into_iter()
                .map(|kind| PathsRow {
                    browser: kind,
                    paths: paths::resolve(kind, &ctx.host),
                })
                .collect();
            emit(args.json, rows.as_slice(), print_paths)?;
            Ok(true)
        }
        Command::List { browser, .. } => {
            let adapter = adapter_for(*browser, ctx.clone());
            let records = adapter.get_cookie_details();
            emit(args.json, records.as_slice(), |records| {
                print_records(*browser, records)
            })?;
            Ok(true)
        }
        Command::Count { browser } => {
            let rows: Vec<CountRow> = selected(*browser)
                .into_iter()
                .map(|kind| CountRow {
                    browser: kind,
                    cookies: adapter_for(kind, ctx.clone()).get_cookie_count(),
                })
                .collect();
            emit(args.json, &rows, |rows| {
                for row in rows {
                    println!("{:<8} {}", row.browser.name(), row.cookies);
                }
            })?;
            Ok(true)
        }
        Command::Status { browser } => {
            let rows: Vec<StatusRow> = selected(*browser)
                .into_iter()
                .map(|kind| {
                    let adapter = adapter_for(kind, ctx.clone());
                    StatusRow {
                        browser: kind,
                        running: adapter.is_running(),
                        cookie_db: adapter.get_cookie_path(),
                        cookies: adapter.get_cookie_count(),
                    }
                })
                .collect();
            emit(args.json, rows.as_slice(), print_status)?;
            Ok(true)
        }
        Command::Clean { browsers, .. } => {
            let mut kinds: Vec<BrowserKind> = Vec::with_capacity(browsers.len());
            for kind in browsers {
                if !kinds.contains(kind) {
                    kinds.push(*kind);
                }
            }
            let adapters: Vec<Box<dyn BrowserAdapter>> = kinds
                .into_iter()
                .map(|kind| adapter_for(kind, ctx.clone()))
                .collect();
            sweep(args.json, ctx, &adapters)
        }
        Command::CleanAll { .. } => sweep(args.json, ctx, &configured_adapters(ctx)),
        Command::ClearCache => {
            let before = cache_bytes(BrowserKind::Chrome, &ctx.host);
            let cleared = Chrome::new(ctx.clone()).clear_cache();
            let after = cache_bytes(BrowserKind::Chrome, &ctx.host);
            let row = CacheRow {
                cleared,
                before_mb: to_mb(before),
                after_mb: to_mb(after),
            };
            emit(args.json, &row, |row| {
                println!(
                    "Chrome cache {}: {:.2} MB -> {:.2} MB",
                    if row.cleared { "cleared" } else { "NOT cleared" },
                    row.before_mb,
                    row.after_mb
                );
            })?;
            Ok(cleared)
        }
        Command::ForceQuit => {
            let quit = Chrome::new(ctx.clone()).force_quit();
            emit(args.json, &quit, |quit| {
                if *quit {
                    println!("Chrome is not running");
                } else {
                    println!("Chrome processes are still running");
                }
            })?;
            Ok(quit)
        }
        Command::Verify { browser } => {
            let rows: Vec<VerifyRow> = selected(*browser)
                .into_iter()
                .map(|kind| {
                    let adapter = adapter_for(kind, ctx.clone());
                    let cookies = adapter.get_cookie_count();
                    VerifyRow {
                        browser: kind,
                        cookies,
                        cache_mb: to_mb(cache_bytes(kind, &ctx.host)),
                        // No store at all counts as clean; an unreadable one does not.
                        clean: cookies == 0 || adapter.get_cookie_path().is_none(),
                    }
                })
                .collect();
            emit(args.json, &rows, |rows| {
                for row in rows {
                    println!(
                        "{:<8} cookies: {:>6}  cache: {:>8.2} MB  {}",
                        row.browser.name(),
                        row.cookies,
                        row.cache_mb,
                        if row.clean { "clean" } else { "cookies remain" }
                    );
                }
            })?;
            Ok(rows.iter().all(|r| r.clean))
        }
    }
}

fn sweep(json: bool, ctx: &AdapterContext, adapters: &[Box<dyn BrowserAdapter>]) -> Result<bool> {
    let results = CleaningOrchestrator::from_config(&ctx.config).clean_all(adapters);
    let summary = CleanSummary::from_results(&results);
    let report = SweepReport {
        results: &results,
        summary,
    };
    emit(json, &report, |report| print_sweep(report.results, &report.summary))?;
    Ok(summary.cleaned == summary.attempted)
}

/// Bytes held by every cache directory of `kind`.
fn cache_bytes(kind: BrowserKind, host: &HostEnv) -> u64 {
    let dirs = match kind {
        BrowserKind::Chrome | BrowserKind::Edge => paths::chromium_cache_dirs(kind, host),
        BrowserKind::Firefox => paths::resolve(kind, host).cache_dir.into_iter().collect(),
    };
    dirs.iter().map(|d| paths::directory_size(d)).sum()
}

fn to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text(value);
    }
    Ok(())
}

#[derive(Serialize)]
struct PathsRow {
    browser: BrowserKind,
    #[serde(flatten)]
    paths: StoragePaths,
}

#[derive(Serialize)]
struct CountRow {
    browser: BrowserKind,
    cookies: i64,
}

#[derive(Serialize)]
struct StatusRow {
    browser: BrowserKind,
    running: bool,
    cookie_db: Option<PathBuf>,
    cookies: i64,
}

#[derive(Serialize)]
struct VerifyRow {
    browser: BrowserKind,
    cookies: i64,
    cache_mb: f64,
    clean: bool,
}

#[derive(Serialize)]
struct CacheRow {
    cleared: bool,
    before_mb: f64,
    after_mb: f64,
}

#[derive(Serialize)]
struct SweepReport<'a> {
    results: &'a [CleanResult],
    summary: CleanSummary,
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map_or_else(|| "-".to_owned(), |p| p.display().to_string())
}

fn print_paths(rows: &[PathsRow]) {
    for row in rows {
        println!("{}", row.browser.name());
        println!("  profile:         {}", display_path(&row.paths.profile_dir));
        println!("  cookies:         {}", display_path(&row.paths.cookie_db));
        println!("  cache:           {}", display_path(&row.paths.cache_dir));
        println!("  local storage:   {}", display_path(&row.paths.local_storage_dir));
        println!("  session storage: {}", display_path(&row.paths.session_storage_dir));
    }
}

fn print_records(browser: BrowserKind, records: &[CookieRecord]) {
    let epoch = browser.target().expiry_epoch;
    for record in records {
        let mut value = if record.value.is_empty() {
            "-".to_owned()
        } else {
            record.value.to_string()
        };
        if value.chars().count() > VALUE_PREVIEW_CHARS {
            value = value.chars().take(VALUE_PREVIEW_CHARS).collect::<String>() + "...";
        }
        let expires = record
            .expires_at(epoch)
            .and_then(|t| t.format(&Rfc3339).ok())
            .unwrap_or_else(|| "session".to_owned());
        println!(
            "{}\t{}\t{}\t{}\t{}",
            record.host, record.name, record.path, value, expires
        );
    }
    println!("{} cookie(s) shown", records.len());
}

fn print_status(rows: &[StatusRow]) {
    for row in rows {
        let count = if row.cookies < 0 {
            "unknown".to_owned()
        } else {
            row.cookies.to_string()
        };
        println!(
            "{:<8} {:<11} cookies: {:<8} {}",
            row.browser.name(),
            if row.running { "running" } else { "not running" },
            count,
            display_path(&row.cookie_db)
        );
    }
}

fn print_sweep(results: &[CleanResult], summary: &CleanSummary) {
    for result in results {
        if result.success {
            println!(
                "{:<8} cleaned   {} -> {}",
                result.browser, result.initial_count, result.final_count
            );
            if let Some(backup) = &result.backup {
                println!("         backup    {}", backup.display());
            }
        } else {
            println!(
                "{:<8} FAILED    {}",
                result.browser,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    println!(
        "{}/{} browsers cleaned, {} cookies removed",
        summary.cleaned, summary.attempted, summary.cookies_removed
    );
}
