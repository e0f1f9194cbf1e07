// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
#[cfg(unix)]
pub mod supervisor;
pub mod types;
pub mod watch;

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_from_path, ConfigFile, RawConfigFile, WatchEntry};
use crate::errors::Result;
use crate::exec::{command_callback, print_callback};

pub use crate::errors::PollwatchError;
pub use crate::types::{WatchOptions, DEFAULT_INTERVAL};
pub use crate::watch::{
    Callback, DirectoryRule, FileFilter, Fingerprint, ScanReport, WatchSet, WatchedItem, Watcher,
};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + CLI overrides
/// - watch set construction
/// - foreground polling, or a background worker stopped on Ctrl-C
pub fn run(args: CliArgs) -> Result<()> {
    let raw = resolve_config(&args)?;
    let cfg = ConfigFile::try_from(raw)?;
    let mut watcher = build_watcher(&cfg)?;

    if args.dry_run {
        print_dry_run(&cfg, &watcher);
        return Ok(());
    }

    let interval = cfg.interval();
    if args.background {
        run_in_background(&mut watcher, interval)
    } else {
        watcher.monitor(interval)
    }
}

/// Load the config file named on the command line (or the default one, if
/// it exists) and layer the CLI flags on top.
fn resolve_config(args: &CliArgs) -> Result<RawConfigFile> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => {
            let path = default_config_path();
            if path.is_file() {
                info!(?path, "using config file from working directory");
                load_from_path(&path)?
            } else {
                debug!("no config file; using CLI arguments only");
                RawConfigFile::default()
            }
        }
    };
    apply_cli_overrides(&mut raw, args);
    Ok(raw)
}

/// Apply CLI flags to a raw config. Positional paths become extra watch
/// entries sharing `--filter` / `--glob`.
pub fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs) {
    if let Some(interval) = args.interval {
        raw.config.interval = interval;
    }
    if args.persistent {
        raw.config.persistent = true;
    }
    if args.no_rescan {
        raw.config.rescan_directories = false;
    }
    if let Some(exec) = &args.exec {
        raw.config.exec = Some(exec.clone());
    }

    for path in &args.paths {
        raw.watch.push(WatchEntry {
            path: path.clone(),
            filter: args.filter.clone(),
            glob: args.glob.clone(),
            exec: None,
        });
    }
}

/// Build a [`Watcher`] from validated config.
///
/// `[config].exec` (or printing to stdout) becomes the default callback;
/// a per-entry `exec` becomes the callback of every file that entry
/// registers.
pub fn build_watcher(cfg: &ConfigFile) -> Result<Watcher> {
    let default_callback = match &cfg.section().exec {
        Some(cmd) => command_callback(cmd.clone()),
        None => print_callback(),
    };
    let mut watcher = Watcher::new(cfg.options()).with_callback(default_callback);

    for entry in cfg.watches() {
        let filter = entry.file_filter()?;
        let callback = entry.exec.as_ref().map(|cmd| command_callback(cmd.clone()));
        if !watcher.add(&entry.path, filter, callback) {
            warn!(path = %entry.path, "nothing to watch at path");
        }
    }

    info!(
        watching = watcher.watching().len(),
        directories = watcher.directories().len(),
        "watch set ready"
    );
    Ok(watcher)
}

#[cfg(unix)]
fn run_in_background(watcher: &mut Watcher, interval: Duration) -> Result<()> {
    let pid = watcher.spawn(interval)?;
    info!(%pid, "watching in the background; press Ctrl-C to stop");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(tokio::signal::ctrl_c())?;

    info!("Ctrl-C received; stopping worker");
    watcher.stop()
}

#[cfg(not(unix))]
fn run_in_background(_watcher: &mut Watcher, _interval: Duration) -> Result<()> {
    Err(PollwatchError::Unsupported)
}

/// Print options and the resolved watch set.
fn print_dry_run(cfg: &ConfigFile, watcher: &Watcher) {
    println!("pollwatch dry-run");
    println!("  config.interval = {}s", cfg.section().interval);
    println!("  config.persistent = {}", cfg.section().persistent);
    println!(
        "  config.rescan_directories = {}",
        cfg.section().rescan_directories
    );
    if let Some(exec) = &cfg.section().exec {
        println!("  config.exec = {exec}");
    }
    println!();

    println!("directories ({}):", watcher.directories().len());
    for rule in watcher.directories() {
        println!("  - {}", rule.path().display());
    }

    println!("files ({}):", watcher.watching().len());
    for item in watcher.watching() {
        match item.fingerprint() {
            Some(fp) => println!("  - {} (mtime {fp})", item.path().display()),
            None => println!("  - {} (missing)", item.path().display()),
        }
        if item.callback().is_some() {
            println!("      exec: per-entry command");
        }
    }

    debug!("dry-run complete (no polling)");
}
