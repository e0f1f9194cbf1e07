// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollwatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid filter pattern '{pattern}': {reason}")]
    InvalidFilter { pattern: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[cfg(unix)]
    #[error("Failed to spawn watcher worker: {0}")]
    SpawnFailed(nix::Error),

    #[cfg(unix)]
    #[error("Failed to signal watcher worker {pid}: {source}")]
    SignalFailed { pid: i32, source: nix::Error },

    #[cfg(unix)]
    #[error("Failed to reap watcher worker {pid}: {source}")]
    ReapFailed { pid: i32, source: nix::Error },

    #[error("Background workers are not supported on this platform")]
    Unsupported,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PollwatchError>;
