// src/watch/watcher.rs

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::types::{DEFAULT_INTERVAL, WatchOptions};
use crate::watch::callback::Callback;
use crate::watch::detector::{self, ScanReport};
use crate::watch::filter::FileFilter;
use crate::watch::item::{DirectoryRule, WatchedItem};
use crate::watch::set::WatchSet;

#[cfg(unix)]
use crate::supervisor::{signals, Supervisor, WorkerId, WorkerState};

/// Longest uninterrupted sleep between shutdown checks in [`Watcher::monitor`].
const PAUSE_SLICE: Duration = Duration::from_millis(25);

/// Polling file watcher.
///
/// Register files and directories with [`add`](Self::add) /
/// [`push`](Self::push), then either call [`process`](Self::process)
/// yourself or hand the polling off to a background worker process with
/// [`spawn`](Self::spawn).
///
/// A spawned worker owns an independent copy of this watcher's state; this
/// instance only keeps the worker's id for [`stop`](Self::stop) /
/// [`halt`](Self::halt).
pub struct Watcher {
    options: WatchOptions,
    callback: Option<Callback>,
    set: WatchSet,
    fs: Arc<dyn FileSystem>,
    #[cfg(unix)]
    supervisor: Supervisor,
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Watcher");
        s.field("options", &self.options)
            .field("callback", &self.callback)
            .field("watching", &self.set.len())
            .field("directories", &self.set.directories().len());
        #[cfg(unix)]
        s.field("worker", &self.supervisor.state());
        s.finish_non_exhaustive()
    }
}

impl Default for Watcher {
    fn default() -> Self {
        Self::new(WatchOptions::default())
    }
}

impl Watcher {
    pub fn new(options: WatchOptions) -> Self {
        Self::with_filesystem(options, Arc::new(RealFileSystem))
    }

    /// Build a watcher over a custom [`FileSystem`] (e.g. the in-memory mock).
    pub fn with_filesystem(options: WatchOptions, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            options,
            callback: None,
            set: WatchSet::new(),
            fs,
            #[cfg(unix)]
            supervisor: Supervisor::default(),
        }
    }

    /// Set the default callback, used for items that have none of their own.
    pub fn with_callback(mut self, callback: Callback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn set_callback(&mut self, callback: Option<Callback>) {
        self.callback = callback;
    }

    pub fn callback(&self) -> Option<&Callback> {
        self.callback.as_ref()
    }

    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Register a file or directory.
    ///
    /// See [`WatchSet::add`] for the exact semantics. Returns `false` when
    /// there was nothing to watch.
    pub fn add(
        &mut self,
        path: impl AsRef<Path>,
        filter: FileFilter,
        callback: Option<Callback>,
    ) -> bool {
        self.set.add(self.fs.as_ref(), path, &filter, callback)
    }

    /// Register a file or directory with no filter and no per-item callback.
    pub fn push(&mut self, path: impl AsRef<Path>) -> bool {
        self.add(path, FileFilter::All, None)
    }

    /// Watched files in insertion order.
    pub fn watching(&self) -> &[WatchedItem] {
        self.set.items()
    }

    pub fn directories(&self) -> &[DirectoryRule] {
        self.set.directories()
    }

    pub fn index_of(&self, path: impl AsRef<Path>) -> Option<usize> {
        self.set.index_of(path)
    }

    pub fn watch_set(&self) -> &WatchSet {
        &self.set
    }

    pub(crate) fn watch_set_mut(&mut self) -> &mut WatchSet {
        &mut self.set
    }

    pub(crate) fn filesystem(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }

    /// One synchronous pass; returns `true` if any change was detected.
    pub fn process(&mut self) -> bool {
        self.scan().has_changes()
    }

    /// One synchronous pass with a full report of what happened.
    pub fn scan(&mut self) -> ScanReport {
        let report = detector::process(self);
        debug!(
            discovered = report.discovered,
            changed = report.changed.len(),
            removed = report.removed.len(),
            watching = self.set.len(),
            "scan finished"
        );
        report
    }

    /// Poll forever, sleeping `interval` between passes.
    ///
    /// Returns once a graceful stop (`SIGUSR1`) or interrupt (`SIGINT`) has
    /// been received; the pass in flight at that moment is always completed.
    ///
    /// While it runs, this takes over the process-wide dispositions of
    /// `SIGUSR1`, `SIGINT`, `SIGUSR2` and `SIGHUP`. The previous handlers are
    /// put back before it returns. The control signals are left unblocked
    /// on the calling thread.
    #[cfg(unix)]
    pub fn monitor(&mut self, interval: Duration) -> Result<()> {
        let _handlers = signals::install_worker_handlers()?;
        signals::reset_shutdown();
        signals::unblock_control_signals()?;

        info!(
            interval_ms = interval.as_millis() as u64,
            watching = self.set.len(),
            "monitor loop started"
        );

        while !signals::shutdown_requested() {
            self.process();
            pause(interval, signals::shutdown_requested);
        }

        info!("monitor loop asked to stop; exiting gracefully");
        Ok(())
    }

    /// Fork a worker process that runs [`monitor`](Self::monitor).
    ///
    /// If a worker is already running its id is returned and nothing else
    /// happens.
    ///
    /// Call this while the process is single-threaded, e.g. before starting
    /// an async runtime or thread pool. The worker only inherits the calling
    /// thread; a lock another thread held at the moment of the fork (the
    /// allocator, stdout/stderr, a `tracing` subscriber, anything a callback
    /// touches) stays locked forever in the worker and can hang it.
    #[cfg(unix)]
    pub fn spawn(&mut self, interval: Duration) -> Result<WorkerId> {
        let mut supervisor = std::mem::take(&mut self.supervisor);
        let spawned = supervisor.spawn(|| match self.monitor(interval) {
            Ok(()) => 0,
            Err(err) => {
                tracing::error!(error = %err, "worker loop failed");
                1
            }
        });
        self.supervisor = supervisor;
        spawned
    }

    /// Ask the worker to finish its current pass and exit, then wait for it.
    #[cfg(unix)]
    pub fn stop(&mut self) -> Result<()> {
        self.supervisor.stop()
    }

    /// Terminate the worker immediately, then wait for it.
    #[cfg(unix)]
    pub fn halt(&mut self) -> Result<()> {
        self.supervisor.halt()
    }

    /// Id of the spawned worker, if one is being tracked.
    #[cfg(unix)]
    pub fn worker(&self) -> Option<WorkerId> {
        self.supervisor.worker()
    }

    #[cfg(unix)]
    pub fn worker_state(&self) -> WorkerState {
        self.supervisor.state()
    }

    /// True if the worker is alive. A worker that exited on its own is
    /// reaped and forgotten.
    #[cfg(unix)]
    pub fn is_running(&mut self) -> bool {
        self.supervisor.running().is_some()
    }

    #[cfg(not(unix))]
    pub fn monitor(&mut self, interval: Duration) -> Result<()> {
        info!(watching = self.set.len(), "monitor loop started");
        loop {
            self.process();
            pause(interval, || false);
        }
    }

    #[cfg(not(unix))]
    pub fn spawn(&mut self, _interval: Duration) -> Result<u32> {
        Err(crate::errors::PollwatchError::Unsupported)
    }

    #[cfg(not(unix))]
    pub fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn halt(&mut self) -> Result<()> {
        Ok(())
    }

    /// Build a watcher with `callback` as its default, register every path
    /// and spawn a worker polling at [`DEFAULT_INTERVAL`].
    pub fn when_modified<I, P>(paths: I, callback: Callback) -> Result<Watcher>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut watcher = Watcher::default().with_callback(callback);
        for path in paths {
            watcher.push(path);
        }
        watcher.spawn(DEFAULT_INTERVAL)?;
        Ok(watcher)
    }
}

/// Sleep up to `interval`, waking early once `stop` reports true.
fn pause(interval: Duration, stop: impl Fn() -> bool) {
    let deadline = Instant::now() + interval;
    while !stop() {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep((deadline - now).min(PAUSE_SLICE));
    }
}
