// src/watch/item.rs

use std::path::{Path, PathBuf};

use crate::watch::callback::Callback;
use crate::watch::filter::FileFilter;
use crate::watch::fingerprint::Fingerprint;

/// One watched file.
///
/// `path` is absolute and unique within a [`WatchSet`](super::WatchSet).
/// `fingerprint` is `None` while the file is missing. `callback` is `None`
/// when the watcher's default callback should be used.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchedItem {
    path: PathBuf,
    fingerprint: Option<Fingerprint>,
    callback: Option<Callback>,
}

impl WatchedItem {
    pub fn new(
        path: impl Into<PathBuf>,
        fingerprint: Option<Fingerprint>,
        callback: Option<Callback>,
    ) -> Self {
        Self {
            path: path.into(),
            fingerprint,
            callback,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fingerprint(&self) -> Option<Fingerprint> {
        self.fingerprint
    }

    pub fn callback(&self) -> Option<&Callback> {
        self.callback.as_ref()
    }

    pub(crate) fn set_fingerprint(&mut self, fingerprint: Option<Fingerprint>) {
        self.fingerprint = fingerprint;
    }

    pub(crate) fn set_callback(&mut self, callback: Option<Callback>) {
        self.callback = callback;
    }
}

/// A registered directory, re-listed on every pass to pick up new files.
///
/// New files found through a rule are registered with the rule's filter and
/// callback.
#[derive(Debug, Clone)]
pub struct DirectoryRule {
    path: PathBuf,
    filter: FileFilter,
    callback: Option<Callback>,
}

impl DirectoryRule {
    pub fn new(path: impl Into<PathBuf>, filter: FileFilter, callback: Option<Callback>) -> Self {
        Self {
            path: path.into(),
            filter,
            callback,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filter(&self) -> &FileFilter {
        &self.filter
    }

    pub fn callback(&self) -> Option<&Callback> {
        self.callback.as_ref()
    }
}
