// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::errors::Result;
use crate::types::{WatchOptions, DEFAULT_INTERVAL};
use crate::watch::FileFilter;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// interval = 0.5
/// persistent = false
/// rescan_directories = true
/// exec = "echo \"$POLLWATCH_PATH changed\""
///
/// [[watch]]
/// path = "src"
/// filter = "\\.rs$"
///
/// [[watch]]
/// path = "Cargo.toml"
/// exec = "cargo metadata --format-version 1 > /dev/null"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Global behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Every `[[watch]]` entry, in file order.
    #[serde(default)]
    pub watch: Vec<WatchEntry>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Seconds between polling passes. Fractions are allowed.
    #[serde(default = "default_interval_secs")]
    pub interval: f64,

    /// Keep entries for files that vanish instead of dropping them.
    #[serde(default)]
    pub persistent: bool,

    /// Re-list registered directories on every pass.
    #[serde(default = "default_rescan_directories")]
    pub rescan_directories: bool,

    /// Command run for changed files that have no `exec` of their own.
    /// If unset, changed paths are printed to stdout.
    #[serde(default)]
    pub exec: Option<String>,
}

fn default_interval_secs() -> f64 {
    DEFAULT_INTERVAL.as_secs_f64()
}

fn default_rescan_directories() -> bool {
    true
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            interval: default_interval_secs(),
            persistent: false,
            rescan_directories: default_rescan_directories(),
            exec: None,
        }
    }
}

impl ConfigSection {
    pub fn options(&self) -> WatchOptions {
        WatchOptions::default()
            .persistent(self.persistent)
            .rescan_directories(self.rescan_directories)
    }
}

/// One `[[watch]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WatchEntry {
    /// File or directory to watch.
    pub path: String,

    /// Regex applied to file names. Mutually exclusive with `glob`.
    #[serde(default)]
    pub filter: Option<String>,

    /// Glob applied to file names. Mutually exclusive with `filter`.
    #[serde(default)]
    pub glob: Option<String>,

    /// Command run when a file registered through this entry changes.
    #[serde(default)]
    pub exec: Option<String>,
}

impl WatchEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            filter: None,
            glob: None,
            exec: None,
        }
    }

    pub fn file_filter(&self) -> Result<FileFilter> {
        FileFilter::from_patterns(self.filter.as_deref(), self.glob.as_deref())
    }
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    config: ConfigSection,
    watch: Vec<WatchEntry>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, watch: Vec<WatchEntry>) -> Self {
        Self { config, watch }
    }

    pub fn section(&self) -> &ConfigSection {
        &self.config
    }

    pub fn watches(&self) -> &[WatchEntry] {
        &self.watch
    }

    pub fn options(&self) -> WatchOptions {
        self.config.options()
    }

    /// Polling interval; validated to be positive and representable.
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.config.interval).unwrap_or(DEFAULT_INTERVAL)
    }
}
