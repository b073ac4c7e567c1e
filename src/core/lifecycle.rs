//! Run-state tracking and process-signal wiring
//!
//! The run state is the only core field read across threads outside the
//! record buffer, so it lives behind an atomic. The state machine is
//! `Dead -> Running -> Dead`, and the second transition is terminal: a core
//! is never restarted, a fresh one is constructed instead.

use super::error::{LoggerError, Result};
use super::logger::{LogCore, DEFAULT_SHUTDOWN_TIMEOUT};
use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use std::process;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Weak;
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CoreState {
    Dead = 0,
    Running = 1,
}

/// Atomic wrapper around [`CoreState`].
#[derive(Debug)]
pub struct RunState(AtomicU32);

impl RunState {
    pub fn new() -> Self {
        Self(AtomicU32::new(CoreState::Dead as u32))
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::Acquire) == CoreState::Running as u32
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        !self.is_running()
    }

    /// Transition `Dead -> Running`. Returns false if already running.
    pub fn try_start(&self) -> bool {
        self.0
            .compare_exchange(
                CoreState::Dead as u32,
                CoreState::Running as u32,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Terminal transition to `Dead`.
    pub fn set_dead(&self) {
        self.0.store(CoreState::Dead as u32, Ordering::Release);
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the signal-handler thread for `core`.
///
/// Interrupt, terminate, and quit all trigger the shutdown protocol: drain
/// the record buffer, flush and close the file target, then terminate the
/// process. The handler fires at most once; the process exits before a
/// second signal can be serviced.
///
/// The thread holds only a weak handle so a core replaced by `rebuild` can
/// still drop; closing the returned [`Handle`] (done during shutdown) wakes
/// the thread and lets it exit without a signal.
pub(crate) fn spawn_signal_handler(core: Weak<LogCore>) -> Result<Handle> {
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGQUIT]).map_err(|e| {
        LoggerError::io_operation("registering signal handler", "cannot register signals", e)
    })?;
    let handle = signals.handle();

    thread::Builder::new()
        .name("rotolog-signal".to_string())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                eprintln!("[LOGGER] received signal {}, shutting down", signal);
                if let Some(core) = core.upgrade() {
                    core.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
                }
                process::exit(1);
            }
        })
        .map_err(|e| {
            LoggerError::io_operation("spawning signal thread", "cannot spawn thread", e)
        })?;

    Ok(handle)
}
