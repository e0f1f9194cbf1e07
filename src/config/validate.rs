// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{PollwatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::PollwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.watch))
    }
}

/// Run every check `ConfigFile::try_from` runs, without consuming `cfg`.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_raw_config(cfg)
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_watches(cfg)?;
    validate_global_config(cfg)?;
    validate_watch_entries(cfg)?;
    Ok(())
}

fn ensure_has_watches(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.is_empty() {
        return Err(PollwatchError::ConfigError(
            "nothing to watch: add a [[watch]] entry or pass paths on the command line"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    let interval = cfg.config.interval;
    if !interval.is_finite() || interval <= 0.0 {
        return Err(PollwatchError::ConfigError(format!(
            "[config].interval must be a positive number of seconds (got {interval})"
        )));
    }
    if let Err(err) = Duration::try_from_secs_f64(interval) {
        return Err(PollwatchError::ConfigError(format!(
            "[config].interval of {interval} seconds is out of range: {err}"
        )));
    }

    if let Some(exec) = &cfg.config.exec {
        if exec.trim().is_empty() {
            return Err(PollwatchError::ConfigError(
                "[config].exec must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}

fn validate_watch_entries(cfg: &RawConfigFile) -> Result<()> {
    for (index, entry) in cfg.watch.iter().enumerate() {
        if entry.path.trim().is_empty() {
            return Err(PollwatchError::ConfigError(format!(
                "watch entry #{} has an empty `path`",
                index + 1
            )));
        }
        if entry.filter.is_some() && entry.glob.is_some() {
            return Err(PollwatchError::ConfigError(format!(
                "watch entry '{}' sets both `filter` and `glob`",
                entry.path
            )));
        }
        entry.file_filter()?;
    }
    Ok(())
}
