// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pollwatch`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "pollwatch",
    version,
    about = "Poll files and directories for changes and react to them.",
    long_about = None
)]
pub struct CliArgs {
    /// Files or directories to watch.
    ///
    /// Added after any `[[watch]]` entries from the config file.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Path to a config file (TOML).
    ///
    /// Default: `Pollwatch.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Seconds between polling passes (fractions allowed).
    #[arg(long, value_name = "SECS")]
    pub interval: Option<f64>,

    /// Keep watching files that disappear and report when they come back.
    #[arg(long)]
    pub persistent: bool,

    /// Don't re-list watched directories on each pass (new files are missed).
    #[arg(long)]
    pub no_rescan: bool,

    /// Only watch files whose name matches this regex.
    #[arg(long, value_name = "REGEX", conflicts_with = "glob")]
    pub filter: Option<String>,

    /// Only watch files whose name matches this glob.
    #[arg(long, value_name = "GLOB")]
    pub glob: Option<String>,

    /// Shell command to run for each changed file.
    ///
    /// The path is available as `$POLLWATCH_PATH`. Without this, changed
    /// paths are printed on stdout.
    #[arg(long, value_name = "CMD")]
    pub exec: Option<String>,

    /// Poll from a background worker process until Ctrl-C.
    #[arg(long)]
    pub background: bool,

    /// Resolve config and print the watch set without polling.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `POLLWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
