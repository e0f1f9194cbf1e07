// src/logging.rs

//! Log output for the `pollwatch` binary.
//!
//! stdout is reserved for change reports (one path per line when no `exec`
//! command is configured), so every log line goes to stderr.
//!
//! The filter is chosen as follows:
//! - `--log-level LEVEL` sets the level for `pollwatch` itself;
//! - otherwise `POLLWATCH_LOG` is read as an `EnvFilter` directive string,
//!   e.g. `debug` or `pollwatch::watch::scanner=trace`;
//! - otherwise `pollwatch` logs at `info`.
//!
//! Other crates stay at `warn` unless `POLLWATCH_LOG` says otherwise.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` flag is given.
pub const LOG_ENV_VAR: &str = "POLLWATCH_LOG";

/// Used when neither the flag nor the environment variable is set.
pub const DEFAULT_DIRECTIVES: &str = "warn,pollwatch=info";

/// Install the global subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let filter = log_filter(cli_level, env.as_deref())?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("installing log subscriber: {err}"))
}

/// Build the filter from the `--log-level` flag and the raw value of
/// [`LOG_ENV_VAR`]. The flag wins; a blank variable counts as unset.
pub fn log_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> Result<EnvFilter> {
    if let Some(level) = cli_level {
        return Ok(EnvFilter::new(format!("warn,pollwatch={}", level_name(level))));
    }

    match env.map(str::trim).filter(|spec| !spec.is_empty()) {
        Some(spec) => {
            EnvFilter::try_new(spec).with_context(|| format!("invalid {LOG_ENV_VAR} value '{spec}'"))
        }
        None => Ok(EnvFilter::new(DEFAULT_DIRECTIVES)),
    }
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
