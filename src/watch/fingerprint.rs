// src/watch/fingerprint.rs

use std::fmt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::fs::FileSystem;

/// Comparable snapshot of a file's state: its modification time.
///
/// Files are never read; two fingerprints differ exactly when the mtime
/// reported by the filesystem differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(SystemTime);

impl Fingerprint {
    pub fn new(modified: SystemTime) -> Self {
        Self(modified)
    }

    pub fn modified(&self) -> SystemTime {
        self.0
    }

    /// Fractional seconds since the Unix epoch (negative before it).
    pub fn as_secs_f64(&self) -> f64 {
        match self.0.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_secs_f64(),
            Err(before) => -before.duration().as_secs_f64(),
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.as_secs_f64())
    }
}

/// Fingerprint `path`, or `None` if it doesn't exist (or vanished while we
/// were looking). A missing file is an expected state, not an error.
pub fn fingerprint(fs: &dyn FileSystem, path: &Path) -> Option<Fingerprint> {
    fs.modified(path).map(Fingerprint::new)
}
