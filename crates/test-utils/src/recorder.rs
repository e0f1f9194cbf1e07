use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use pollwatch::Callback;

/// Records every callback invocation in memory.
///
/// Only useful for in-process `process()` calls; a forked worker has its own
/// copy of the recorder. Use [`MarkerLog`] there.
#[derive(Debug, Clone, Default)]
pub struct CallRecorder {
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl CallRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-argument callback recording the changed path.
    pub fn item_callback(&self) -> Callback {
        let calls = Arc::clone(&self.calls);
        Callback::item(move |item| calls.lock().unwrap().push(item.path().to_path_buf()))
    }

    /// Zero-argument callback; records an empty path per call.
    pub fn bare_callback(&self) -> Callback {
        let calls = Arc::clone(&self.calls);
        Callback::bare(move || calls.lock().unwrap().push(PathBuf::new()))
    }

    /// Two-argument callback recording the changed path. Panics if the
    /// watcher it receives doesn't know about the item.
    pub fn watcher_callback(&self) -> Callback {
        let calls = Arc::clone(&self.calls);
        Callback::item_and_watcher(move |item, watcher| {
            assert!(watcher.index_of(item.path()).is_some());
            calls.lock().unwrap().push(item.path().to_path_buf());
        })
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

/// Append-only log file a worker process can write changed paths to.
#[derive(Debug, Clone)]
pub struct MarkerLog {
    path: PathBuf,
}

impl MarkerLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Callback appending the changed path as one line.
    pub fn callback(&self) -> Callback {
        let log = self.path.clone();
        Callback::item(move |item| {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log)
                .expect("Failed to open marker log");
            writeln!(file, "{}", item.path().display()).expect("Failed to write marker log");
        })
    }

    pub fn lines(&self) -> Vec<String> {
        fs::read_to_string(&self.path)
            .map(|contents| contents.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
