// src/watch/set.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::fs::FileSystem;
use crate::watch::callback::Callback;
use crate::watch::filter::FileFilter;
use crate::watch::fingerprint::fingerprint;
use crate::watch::item::{DirectoryRule, WatchedItem};
use crate::watch::path_utils::normalize;
use crate::watch::scanner;

/// Ordered collection of watched files plus the directory rules that feed it.
///
/// Invariants:
/// - no two items share a path;
/// - items keep their insertion order (overwrites stay in their slot);
/// - directories never become items themselves, they only contribute rules
///   and the files they contain.
#[derive(Debug, Clone, Default)]
pub struct WatchSet {
    items: Vec<WatchedItem>,
    directories: Vec<DirectoryRule>,
}

impl WatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[WatchedItem] {
        &self.items
    }

    pub fn directories(&self) -> &[DirectoryRule] {
        &self.directories
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Position of `path` in insertion order (first match wins).
    pub fn index_of(&self, path: impl AsRef<Path>) -> Option<usize> {
        let path = normalize(path.as_ref());
        self.items.iter().position(|item| item.path() == path)
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&WatchedItem> {
        self.index_of(path).map(|index| &self.items[index])
    }

    pub fn has_directory(&self, path: &Path) -> bool {
        self.directories.iter().any(|rule| rule.path() == path)
    }

    /// Register `path`.
    ///
    /// - A regular file whose name matches `filter` is inserted (or
    ///   overwritten in place).
    /// - A directory gets a [`DirectoryRule`] for itself and every
    ///   non-hidden subdirectory, and each contained file matching `filter`
    ///   is registered individually.
    ///
    /// Returns `false` if `path` is neither a file nor a directory, or is a
    /// file the filter rejects.
    pub fn add(
        &mut self,
        fs: &dyn FileSystem,
        path: impl AsRef<Path>,
        filter: &FileFilter,
        callback: Option<Callback>,
    ) -> bool {
        let path = normalize(path.as_ref());

        if fs.is_file(&path) {
            return self.add_file(fs, path, filter, callback);
        }

        if fs.is_dir(&path) {
            self.add_directory(fs, path, filter, callback);
            return true;
        }

        debug!(?path, "not a file or directory; nothing to watch");
        false
    }

    fn add_file(
        &mut self,
        fs: &dyn FileSystem,
        path: PathBuf,
        filter: &FileFilter,
        callback: Option<Callback>,
    ) -> bool {
        if !filter.matches_name(&path) {
            debug!(?path, ?filter, "file rejected by filter");
            return false;
        }

        let current = fingerprint(fs, &path);
        self.upsert(WatchedItem::new(path, current, callback));
        true
    }

    fn add_directory(
        &mut self,
        fs: &dyn FileSystem,
        path: PathBuf,
        filter: &FileFilter,
        callback: Option<Callback>,
    ) {
        let walked = scanner::walk(fs, &path, filter);
        debug!(
            root = ?path,
            directories = walked.directories.len(),
            files = walked.files.len(),
            "expanded directory"
        );

        for dir in walked.directories {
            self.register_directory(DirectoryRule::new(dir, filter.clone(), callback.clone()));
        }
        for file in walked.files {
            self.add_file(fs, file, filter, callback.clone());
        }
    }

    /// Insert `item`, or overwrite the existing entry for the same path in
    /// place. An overwrite replaces the callback and keeps the stored
    /// fingerprint so a change that hasn't been processed yet still fires.
    ///
    /// Returns the item's index.
    pub fn upsert(&mut self, item: WatchedItem) -> usize {
        match self.items.iter().position(|existing| existing.path() == item.path()) {
            Some(index) => {
                let existing = &mut self.items[index];
                existing.set_callback(item.callback().cloned());
                debug!(path = ?existing.path(), index, "overwrote existing watch");
                index
            }
            None => {
                debug!(path = ?item.path(), fingerprint = ?item.fingerprint(), "watching file");
                self.items.push(item);
                self.items.len() - 1
            }
        }
    }

    /// Add a directory rule, replacing the filter/callback of an existing
    /// rule for the same path.
    pub fn register_directory(&mut self, rule: DirectoryRule) {
        match self.directories.iter_mut().find(|existing| existing.path() == rule.path()) {
            Some(existing) => *existing = rule,
            None => self.directories.push(rule),
        }
    }

    pub(crate) fn item_mut(&mut self, index: usize) -> &mut WatchedItem {
        &mut self.items[index]
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> WatchedItem {
        self.items.remove(index)
    }
}
