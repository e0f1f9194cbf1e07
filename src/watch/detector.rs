// src/watch/detector.rs

//! Change detection: one synchronous pass over the watch set.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::fs::FileSystem;
use crate::watch::callback::Callback;
use crate::watch::fingerprint::fingerprint;
use crate::watch::item::WatchedItem;
use crate::watch::scanner;
use crate::watch::watcher::Watcher;

/// What a single pass observed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Files newly watched because a directory rescan found them.
    pub discovered: usize,
    /// Files whose fingerprint changed (including vanishing in persistent mode).
    pub changed: Vec<PathBuf>,
    /// Files dropped because they no longer exist.
    pub removed: Vec<PathBuf>,
}

impl ScanReport {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// The item's own callback wins over the watcher-level default.
pub fn resolve_callback<'a>(
    item: &'a WatchedItem,
    default: Option<&'a Callback>,
) -> Option<&'a Callback> {
    item.callback().or(default)
}

/// Run one pass:
///
/// 1. rescan directory rules (if enabled), so new files are visible to this
///    same pass;
/// 2. drop missing files unless the watcher is persistent;
/// 3. fire the resolved callback for every item whose fingerprint differs
///    from the stored one, then store the new fingerprint.
///
/// Filesystem races are absorbed: a file that disappears mid-pass simply
/// fingerprints as absent.
pub(crate) fn process(watcher: &mut Watcher) -> ScanReport {
    let fs: Arc<dyn FileSystem> = watcher.filesystem();
    let options = *watcher.options();
    let mut report = ScanReport::default();

    if options.rescan_directories {
        report.discovered = scanner::rescan(fs.as_ref(), watcher.watch_set_mut());
    }

    let mut index = 0;
    while index < watcher.watching().len() {
        let path = watcher.watching()[index].path().to_path_buf();

        if !options.persistent && !fs.exists(&path) {
            watcher.watch_set_mut().remove_at(index);
            info!(?path, "watched file removed; no longer watching");
            report.removed.push(path);
            continue;
        }

        let current = fingerprint(fs.as_ref(), &path);
        let stored = watcher.watching()[index].fingerprint();
        if current != stored {
            debug!(?path, ?stored, ?current, "fingerprint changed");
            respond_to_change(watcher, index);
            watcher.watch_set_mut().item_mut(index).set_fingerprint(current);
            report.changed.push(path);
        }

        index += 1;
    }

    report
}

fn respond_to_change(watcher: &Watcher, index: usize) {
    let item = &watcher.watching()[index];
    match resolve_callback(item, watcher.callback()) {
        Some(callback) => callback.invoke(item, watcher),
        None => debug!(path = ?item.path(), "change detected but no callback registered"),
    }
}
