// src/supervisor/mod.rs

//! Background worker lifecycle.
//!
//! A [`Supervisor`] forks one worker process, tracks its id, and stops it
//! with signals. The two processes share no memory after the fork; the
//! only channel between them is signals and the worker's exit status.
//!
//! ```text
//! Idle --spawn--> Running --stop--> StopRequested --reaped--> Idle
//!                    \--halt--> Halted --reaped--> Idle
//! ```

pub mod signals;

use std::panic::{self, AssertUnwindSafe};
use std::process;

use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{fork, ForkResult, Pid};
use tracing::{debug, info, warn};

use crate::errors::{PollwatchError, Result};

use self::signals::{BlockedSignals, ControlSignal};

/// Process id of a spawned worker.
pub type WorkerId = Pid;

/// Exit status used when the worker body panics.
pub const WORKER_PANIC_EXIT: i32 = 101;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    /// No worker process.
    #[default]
    Idle,
    /// Worker spawned and polling.
    Running(WorkerId),
    /// Graceful stop signalled; waiting for the worker to exit.
    StopRequested(WorkerId),
    /// Hard halt signalled; waiting for the worker to be reaped.
    Halted(WorkerId),
}

impl WorkerState {
    pub fn worker(&self) -> Option<WorkerId> {
        match *self {
            WorkerState::Idle => None,
            WorkerState::Running(pid)
            | WorkerState::StopRequested(pid)
            | WorkerState::Halted(pid) => Some(pid),
        }
    }
}

/// Owns the lifecycle of at most one worker process.
///
/// Dropping a supervisor with a live worker sends it a hangup and reaps it.
#[derive(Debug, Default)]
pub struct Supervisor {
    state: WorkerState,
}

impl Supervisor {
    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn worker(&self) -> Option<WorkerId> {
        self.state.worker()
    }

    fn transition(&mut self, next: WorkerState) {
        debug!(from = ?self.state, to = ?next, "worker state transition");
        self.state = next;
    }

    /// The running worker's id, or `None`.
    ///
    /// A worker that has already exited is reaped here and the state drops
    /// back to `Idle`, so a stale id is never handed out.
    pub fn running(&mut self) -> Option<WorkerId> {
        let WorkerState::Running(pid) = self.state else {
            return None;
        };

        match waitpid(pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => Some(pid),
            Ok(status) => {
                warn!(%pid, ?status, "worker exited on its own");
                self.transition(WorkerState::Idle);
                None
            }
            Err(errno) => {
                warn!(%pid, error = %errno, "lost track of worker");
                self.transition(WorkerState::Idle);
                None
            }
        }
    }

    /// Fork a worker that runs `body` and exits with its return value.
    ///
    /// Must be called while the process is single-threaded; see
    /// [`Watcher::spawn`](crate::watch::Watcher::spawn).
    ///
    /// The child never returns from this function. If a worker is already
    /// running, its id is returned and `body` is not run.
    pub fn spawn<F>(&mut self, body: F) -> Result<WorkerId>
    where
        F: FnOnce() -> i32,
    {
        if let Some(pid) = self.running() {
            debug!(%pid, "worker already running");
            return Ok(pid);
        }

        let blocked = BlockedSignals::block()?;

        // SAFETY: only the calling thread exists in the child, so callers
        // must spawn while single-threaded: locks held by other threads at
        // fork time (allocator, stdio, tracing) would never be released in
        // the child, which allocates, logs and runs callbacks. The child runs
        // `body` and exits without unwinding into the parent's frames.
        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                // The worker unblocks control signals itself once its
                // handlers are installed.
                std::mem::forget(blocked);
                let code = panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or(WORKER_PANIC_EXIT);
                process::exit(code);
            }
            Ok(ForkResult::Parent { child }) => {
                drop(blocked);
                info!(pid = %child, "spawned watcher worker");
                self.transition(WorkerState::Running(child));
                Ok(child)
            }
            Err(errno) => {
                drop(blocked);
                Err(PollwatchError::SpawnFailed(errno))
            }
        }
    }

    /// Graceful stop: the worker completes its current pass and exits.
    /// Blocks until the worker has been reaped. No-op without a worker.
    pub fn stop(&mut self) -> Result<()> {
        self.terminate(ControlSignal::Stop)
    }

    /// Hard halt: the worker exits immediately. Blocks until reaped.
    /// No-op without a worker.
    pub fn halt(&mut self) -> Result<()> {
        self.terminate(ControlSignal::Halt)
    }

    fn terminate(&mut self, signal: ControlSignal) -> Result<()> {
        let Some(pid) = self.state.worker() else {
            debug!(%signal, "no worker running; nothing to do");
            return Ok(());
        };

        self.transition(match signal {
            ControlSignal::Stop => WorkerState::StopRequested(pid),
            ControlSignal::Halt | ControlSignal::Hangup => WorkerState::Halted(pid),
        });

        let result = signal_and_reap(pid, signal);
        self.transition(WorkerState::Idle);
        result
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        let Some(pid) = self.state.worker() else {
            return;
        };
        debug!(%pid, "supervisor dropped with a live worker; sending hangup");
        if signals::send(pid, ControlSignal::Hangup).is_ok() {
            let _ = reap(pid);
        }
        self.state = WorkerState::Idle;
    }
}

fn signal_and_reap(pid: Pid, signal: ControlSignal) -> Result<()> {
    if let Err(source) = signals::send(pid, signal) {
        warn!(%pid, %signal, error = %source, "failed to signal worker");
        // Collect a zombie if there is one; the id is forgotten either way.
        let _ = waitpid(pid, Some(WaitPidFlag::WNOHANG));
        return Err(PollwatchError::SignalFailed {
            pid: pid.as_raw(),
            source,
        });
    }

    let status = reap(pid)?;
    info!(%pid, %signal, ?status, "worker reaped");
    Ok(())
}

/// Block until `pid` has exited or been killed.
fn reap(pid: Pid) -> Result<WaitStatus> {
    loop {
        match waitpid(pid, None) {
            Ok(status @ (WaitStatus::Exited(..) | WaitStatus::Signaled(..))) => return Ok(status),
            Ok(_) => continue,
            Err(Errno::EINTR) => continue,
            Err(source) => {
                return Err(PollwatchError::ReapFailed {
                    pid: pid.as_raw(),
                    source,
                })
            }
        }
    }
}
