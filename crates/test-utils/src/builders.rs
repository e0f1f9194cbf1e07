#![allow(dead_code)]

use std::fs;
use std::path::Path;

use filetime::{set_file_mtime, FileTime};
use pollwatch::config::{ConfigFile, ConfigSection, RawConfigFile, WatchEntry};
use tempfile::TempDir;

/// Builder for a throwaway directory tree.
///
/// The root gets a non-hidden prefix so the tree behaves like an ordinary
/// project directory.
pub struct TreeBuilder {
    root: TempDir,
}

impl TreeBuilder {
    pub fn new() -> Self {
        let root = tempfile::Builder::new()
            .prefix("pollwatch-")
            .tempdir()
            .expect("Failed to create temp dir");
        Self { root }
    }

    /// Create `rel` (and its parents) with `contents`.
    pub fn file(self, rel: &str, contents: &str) -> Self {
        let path = self.root.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&path, contents).expect("Failed to write file");
        self
    }

    /// Create the directory `rel` (and its parents).
    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.root.path().join(rel)).expect("Failed to create dir");
        self
    }

    pub fn build(self) -> TempDir {
        self.root
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Set the modification time of `path` to `secs` seconds after the epoch.
pub fn set_mtime(path: impl AsRef<Path>, secs: i64) {
    set_file_mtime(path.as_ref(), FileTime::from_unix_time(secs, 0))
        .expect("Failed to set mtime");
}

/// Move the modification time of `path` forward by `secs` seconds.
///
/// Rewriting a file is not enough on filesystems with coarse timestamps, so
/// tests bump the mtime explicitly.
pub fn bump_mtime(path: impl AsRef<Path>, secs: i64) {
    let path = path.as_ref();
    let meta = fs::metadata(path).expect("Failed to stat file");
    let current = FileTime::from_last_modification_time(&meta);
    set_file_mtime(
        path,
        FileTime::from_unix_time(current.unix_seconds() + secs, current.nanoseconds()),
    )
    .expect("Failed to set mtime");
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                watch: Vec::new(),
            },
        }
    }

    pub fn with_watch(mut self, entry: WatchEntry) -> Self {
        self.config.watch.push(entry);
        self
    }

    pub fn with_path(self, path: impl AsRef<Path>) -> Self {
        self.with_watch(WatchEntry::new(path.as_ref().to_string_lossy()))
    }

    pub fn interval(mut self, secs: f64) -> Self {
        self.config.config.interval = secs;
        self
    }

    pub fn persistent(mut self, val: bool) -> Self {
        self.config.config.persistent = val;
        self
    }

    pub fn rescan_directories(mut self, val: bool) -> Self {
        self.config.config.rescan_directories = val;
        self
    }

    pub fn exec(mut self, cmd: &str) -> Self {
        self.config.config.exec = Some(cmd.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
