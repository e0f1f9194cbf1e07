use std::time::Duration;

use serde::Deserialize;

/// Interval used by `spawn` / `monitor` callers that don't pick one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Behavioural switches for a [`Watcher`](crate::watch::Watcher).
///
/// - `persistent`: keep entries for files that no longer exist and keep
///   reporting their vanish / reappear transitions instead of dropping them.
/// - `rescan_directories`: re-list every registered directory at the start
///   of each pass so files created later become watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WatchOptions {
    #[serde(default)]
    pub persistent: bool,

    #[serde(default = "default_rescan_directories")]
    pub rescan_directories: bool,
}

fn default_rescan_directories() -> bool {
    true
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            persistent: false,
            rescan_directories: default_rescan_directories(),
        }
    }
}

impl WatchOptions {
    pub fn persistent(mut self, value: bool) -> Self {
        self.persistent = value;
        self
    }

    pub fn rescan_directories(mut self, value: bool) -> Self {
        self.rescan_directories = value;
        self
    }
}
