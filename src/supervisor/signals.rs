// src/supervisor/signals.rs

//! Control signals between a supervisor and its worker process.
//!
//! | logical signal | OS signal | worker reaction                         |
//! |----------------|-----------|-----------------------------------------|
//! | graceful stop  | `SIGUSR1` | finish the current pass, then exit      |
//! | interrupt      | `SIGINT`  | same as graceful stop                   |
//! | hard halt      | `SIGUSR2` | terminate immediately (default action)  |
//! | hangup         | `SIGHUP`  | terminate immediately (default action)  |

use std::ffi::c_int;
use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use nix::sys::signal::{
    kill, pthread_sigmask, sigaction, SaFlags, SigAction, SigHandler, SigSet, SigmaskHow, Signal,
};
use nix::unistd::Pid;
use tracing::warn;

use crate::errors::Result;

/// Set from the signal handler; polled by the monitor loop.
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Finish the in-flight pass, then exit.
    Stop,
    /// Exit immediately.
    Halt,
    /// The supervising process is going away.
    Hangup,
}

impl ControlSignal {
    pub fn signal(self) -> Signal {
        match self {
            ControlSignal::Stop => Signal::SIGUSR1,
            ControlSignal::Halt => Signal::SIGUSR2,
            ControlSignal::Hangup => Signal::SIGHUP,
        }
    }
}

impl fmt::Display for ControlSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlSignal::Stop => "stop",
            ControlSignal::Halt => "halt",
            ControlSignal::Hangup => "hangup",
        };
        write!(f, "{name} ({})", self.signal())
    }
}

extern "C" fn request_shutdown(_signal: c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

fn control_set() -> SigSet {
    let mut set = SigSet::empty();
    for signal in [Signal::SIGUSR1, Signal::SIGUSR2, Signal::SIGINT, Signal::SIGHUP] {
        set.add(signal);
    }
    set
}

/// Dispositions replaced by [`install_worker_handlers`]; restored on drop.
#[must_use = "dropping the guard restores the previous handlers"]
pub struct WorkerHandlers {
    previous: Vec<(Signal, SigAction)>,
}

impl fmt::Debug for WorkerHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signals: Vec<Signal> = self.previous.iter().map(|(signal, _)| *signal).collect();
        f.debug_struct("WorkerHandlers")
            .field("signals", &signals)
            .finish()
    }
}

impl Drop for WorkerHandlers {
    fn drop(&mut self) {
        for (signal, action) in self.previous.drain(..).rev() {
            // SAFETY: reinstating a disposition that was in place before.
            if let Err(errno) = unsafe { sigaction(signal, &action) } {
                warn!(%signal, error = %errno, "failed to restore signal handler");
            }
        }
    }
}

/// Install the worker-side dispositions described in the module docs.
///
/// They stay in effect until the returned guard is dropped.
pub fn install_worker_handlers() -> Result<WorkerHandlers> {
    let graceful = SigAction::new(
        SigHandler::Handler(request_shutdown),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    let immediate = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());

    let mut installed = WorkerHandlers {
        previous: Vec::with_capacity(4),
    };
    let plan = [
        (Signal::SIGUSR1, &graceful),
        (Signal::SIGINT, &graceful),
        (Signal::SIGUSR2, &immediate),
        (Signal::SIGHUP, &immediate),
    ];
    for (signal, action) in plan {
        // SAFETY: the handler only stores to an atomic; the rest are defaults.
        let previous = unsafe { sigaction(signal, action) }.map_err(io::Error::from)?;
        installed.previous.push((signal, previous));
    }
    Ok(installed)
}

pub fn unblock_control_signals() -> Result<()> {
    control_set().thread_unblock().map_err(io::Error::from)?;
    Ok(())
}

pub fn shutdown_requested() -> bool {
    SHUTDOWN.load(Ordering::SeqCst)
}

pub fn reset_shutdown() {
    SHUTDOWN.store(false, Ordering::SeqCst);
}

/// Deliver `signal` to the worker `pid`.
pub fn send(pid: Pid, signal: ControlSignal) -> nix::Result<()> {
    kill(pid, signal.signal())
}

/// Control signals blocked on the current thread until dropped.
///
/// Held across `fork` so a signal sent right after spawning stays pending
/// until the worker has installed its handlers.
#[derive(Debug)]
pub struct BlockedSignals {
    previous: SigSet,
}

impl BlockedSignals {
    pub fn block() -> Result<Self> {
        let mut previous = SigSet::empty();
        pthread_sigmask(SigmaskHow::SIG_BLOCK, Some(&control_set()), Some(&mut previous))
            .map_err(io::Error::from)?;
        Ok(Self { previous })
    }
}

impl Drop for BlockedSignals {
    fn drop(&mut self) {
        if let Err(errno) = pthread_sigmask(SigmaskHow::SIG_SETMASK, Some(&self.previous), None) {
            warn!(error = %errno, "failed to restore signal mask");
        }
    }
}
