//! The logging core: sink selection, lifecycle, and the process-wide handle
//!
//! A [`LogCore`] is constructed dead, started at most once, and shut down at
//! most once; shutdown is terminal. Reconfiguration never mutates a live
//! core: [`rebuild`] constructs a fresh one and swaps the process-wide slot,
//! leaving the old core to drain independently when its last handle drops.

use super::config::{LogConfig, OutputMode};
use super::dispatch::DispatchLoop;
use super::error::{LoggerError, Result};
use super::level::LogLevel;
use super::lifecycle::{spawn_signal_handler, RunState};
use super::metrics::CoreMetrics;
use super::record::{render_into, Record, RecordPool};
use crate::sinks::{AlertSink, ConsoleSink, FileTarget};
use chrono::Local;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use signal_hook::iterator::Handle as SignalHandle;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Default shutdown timeout for core cleanup (5 seconds)
///
/// This timeout is used when the core is dropped without explicit shutdown.
/// For custom timeout control, use the `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct LogCore {
    config: LogConfig,
    min_level: RwLock<LogLevel>,
    state: Arc<RunState>,
    pool: Arc<RecordPool>,
    metrics: Arc<CoreMetrics>,
    console: ConsoleSink,
    alert: Option<Box<dyn AlertSink>>,
    bucket_tx: Sender<Record>,
    bucket_rx: Mutex<Option<Receiver<Record>>>,
    close_tx: Sender<()>,
    close_rx: Mutex<Option<Receiver<()>>>,
    ack_tx: Mutex<Option<Sender<()>>>,
    ack_rx: Receiver<()>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
    signal_handle: Mutex<Option<SignalHandle>>,
    closed: AtomicBool,
}

impl LogCore {
    /// Construct a core in the Dead state.
    ///
    /// The record buffer's capacity is fixed here from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration fails validation; this is
    /// fatal at startup.
    pub fn new(config: LogConfig) -> Result<Self> {
        config.validate()?;

        let (bucket_tx, bucket_rx) = bounded(config.bucket_capacity);
        let (close_tx, close_rx) = bounded(1);
        let (ack_tx, ack_rx) = bounded(1);
        let min_level = RwLock::new(config.min_level);

        Ok(Self {
            config,
            min_level,
            state: Arc::new(RunState::new()),
            pool: Arc::new(RecordPool::new()),
            metrics: Arc::new(CoreMetrics::new()),
            console: ConsoleSink::new(),
            alert: None,
            bucket_tx,
            bucket_rx: Mutex::new(Some(bucket_rx)),
            close_tx,
            close_rx: Mutex::new(Some(close_rx)),
            ack_tx: Mutex::new(Some(ack_tx)),
            ack_rx,
            worker: Mutex::new(None),
            signal_handle: Mutex::new(None),
            closed: AtomicBool::new(false),
        })
    }

    /// Attach the alert collaborator consulted for error-and-above records.
    #[must_use]
    pub fn with_alert(mut self, alert: Box<dyn AlertSink>) -> Self {
        self.alert = Some(alert);
        self
    }

    /// Start the dispatch loop.
    ///
    /// In stdout mode this is a no-op: records are written synchronously and
    /// no background worker exists. In file mode the file target is opened
    /// (resume-or-create) and exactly one dispatch loop is spawned.
    ///
    /// # Errors
    ///
    /// `AlreadyRunning` when a dispatch loop is active, `CoreStopped` after
    /// shutdown, or the resume-or-create error when no file can be opened at
    /// all.
    pub fn start(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(LoggerError::CoreStopped);
        }
        if self.config.mode != OutputMode::File {
            return Ok(());
        }

        if !self.state.try_start() {
            return Err(LoggerError::AlreadyRunning);
        }

        let target = match FileTarget::open(
            &self.config,
            Arc::clone(&self.state),
            Arc::clone(&self.metrics),
        ) {
            Ok(target) => target,
            Err(e) => {
                self.state.set_dead();
                return Err(e);
            }
        };

        // try_start above guarantees these are still present.
        let records = self
            .bucket_rx
            .lock()
            .take()
            .ok_or(LoggerError::AlreadyRunning)?;
        let close = self
            .close_rx
            .lock()
            .take()
            .ok_or(LoggerError::AlreadyRunning)?;
        let ack = self.ack_tx.lock().take().ok_or(LoggerError::AlreadyRunning)?;

        let dispatch = DispatchLoop {
            records,
            close,
            ack,
            target,
            pool: Arc::clone(&self.pool),
            state: Arc::clone(&self.state),
            metrics: Arc::clone(&self.metrics),
            flush_interval: self.config.flush_interval(),
        };

        let handle = thread::Builder::new()
            .name("rotolog-dispatch".to_string())
            .spawn(move || dispatch.run())
            .map_err(|e| {
                self.state.set_dead();
                LoggerError::io_operation("starting dispatch loop", "cannot spawn thread", e)
            })?;

        *self.worker.lock() = Some(handle);
        Ok(())
    }

    /// Register the process-signal handler for `core`. Idempotent.
    pub fn install_signal_handler(core: &Arc<Self>) -> Result<()> {
        let mut slot = core.signal_handle.lock();
        if slot.is_some() {
            return Ok(());
        }
        *slot = Some(spawn_signal_handler(Arc::downgrade(core))?);
        Ok(())
    }

    /// Whether records at `level` pass the configured minimum.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= *self.min_level.read()
    }

    pub fn set_min_level(&self, level: LogLevel) {
        *self.min_level.write() = level;
    }

    pub fn min_level(&self) -> LogLevel {
        *self.min_level.read()
    }

    /// Render and submit one message, capturing the caller's location.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        if !self.enabled(level) {
            return;
        }
        let caller = Location::caller();
        self.log_at(
            level,
            format_args!("{}", message.as_ref()),
            caller.file(),
            caller.line(),
        );
    }

    /// Render a line for the given source position and submit it.
    ///
    /// This is the entry point the logging macros expand to.
    pub fn log_at(&self, level: LogLevel, args: fmt::Arguments<'_>, file: &str, line: u32) {
        if !self.enabled(level) {
            return;
        }
        let mut buf = self.pool.get();
        render_into(&mut buf, level, args, file, line);
        self.submit(Record::new(level, buf));
    }

    #[track_caller]
    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Debug, message);
    }

    #[track_caller]
    #[inline]
    pub fn info(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Info, message);
    }

    #[track_caller]
    #[inline]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warn, message);
    }

    #[track_caller]
    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }

    #[track_caller]
    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Fatal, message);
    }

    /// Print a message plus a captured stack trace to the diagnostic stream.
    ///
    /// Bypasses the pipeline entirely: no buffering, no rotation, no level
    /// filtering. Meant for abnormal conditions where the pipeline itself may
    /// be suspect.
    #[track_caller]
    pub fn stack(&self, message: impl AsRef<str>) {
        let caller = Location::caller();
        let backtrace = std::backtrace::Backtrace::force_capture();
        eprintln!(
            "[STACK] {} {}:{} ❀ {}\n{}",
            Local::now().format("%m/%d %H:%M:%S"),
            caller.file(),
            caller.line(),
            message.as_ref(),
            backtrace
        );
    }

    /// Route one finished record to its sink.
    ///
    /// Error-and-above records are first forwarded to the alert collaborator
    /// when one is configured. File mode enqueues into the record buffer
    /// under the backpressure contract; stdout mode (the fallback for any
    /// other configuration) writes synchronously to the console stream.
    pub fn submit(&self, record: Record) {
        self.forward_alert(&record);

        match self.config.mode {
            OutputMode::File => self.enqueue(record),
            OutputMode::Stdout => {
                self.console.write(&record);
                self.pool.put(record.into_bytes());
            }
        }
    }

    fn forward_alert(&self, record: &Record) {
        if !self.config.alert_on_error || !record.level().is_alerting() {
            return;
        }
        let Some(alert) = self.alert.as_deref() else {
            return;
        };
        let text = String::from_utf8_lossy(record.as_bytes());
        if let Err(e) = alert.send_alert(text.trim_end()) {
            self.metrics.record_alert_failure();
            eprintln!("[LOGGER ERROR] alert sink '{}' failed: {}", alert.name(), e);
        }
    }

    /// Hand a record to the bounded buffer.
    ///
    /// Producers never drop silently on a full buffer: the fast path is a
    /// non-blocking send, and when the buffer is full the producer blocks
    /// until the dispatch loop makes room. Only a core that has already shut
    /// down discards records, and those are counted.
    fn enqueue(&self, record: Record) {
        match self.bucket_tx.try_send(record) {
            Ok(()) => {
                self.metrics.record_enqueued();
            }
            Err(TrySendError::Full(record)) => {
                self.metrics.record_queue_full();
                self.metrics.record_block();
                match self.bucket_tx.send(record) {
                    Ok(()) => {
                        self.metrics.record_enqueued();
                    }
                    Err(e) => {
                        self.metrics.record_dropped();
                        self.pool.put(e.into_inner().into_bytes());
                    }
                }
            }
            Err(TrySendError::Disconnected(record)) => {
                self.metrics.record_dropped();
                self.pool.put(record.into_bytes());
            }
        }
    }

    /// Run the shutdown protocol: close-notify the dispatch loop, wait for
    /// it to drain, flush, close the file, and mark itself dead.
    ///
    /// Runs at most once; later calls return immediately. Returns whether
    /// the loop acknowledged within `timeout`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            return true;
        }

        if let Some(handle) = self.signal_handle.lock().take() {
            handle.close();
        }

        let Some(worker) = self.worker.lock().take() else {
            // No dispatch loop ever ran (stdout mode, or never started).
            // Drop the unused receiver so later enqueues disconnect instead
            // of filling a buffer nothing will drain.
            self.bucket_rx.lock().take();
            return true;
        };

        let _ = self.close_tx.try_send(());
        let acked = self.ack_rx.recv_timeout(timeout).is_ok();
        if acked {
            if let Err(e) = worker.join() {
                eprintln!("[LOGGER ERROR] dispatch loop panicked during shutdown: {:?}", e);
                return false;
            }
        } else {
            eprintln!(
                "[LOGGER WARNING] dispatch loop did not acknowledge shutdown within {:?}. \
                 Some records may be lost.",
                timeout
            );
        }
        acked
    }

    pub fn metrics(&self) -> &CoreMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Records currently waiting in the record buffer.
    pub fn queued_len(&self) -> usize {
        self.bucket_tx.len()
    }
}

impl Drop for LogCore {
    fn drop(&mut self) {
        self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

impl fmt::Debug for LogCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogCore")
            .field("mode", &self.config.mode)
            .field("running", &self.state.is_running())
            .field("queued", &self.bucket_tx.len())
            .finish()
    }
}

// The process-wide current-core slot. Only `init`/`rebuild`/`current` touch
// it; tests construct isolated cores and never do.
static CURRENT_CORE: RwLock<Option<Arc<LogCore>>> = RwLock::new(None);

/// Construct, start, and install the process-wide core.
///
/// # Errors
///
/// Fails if a core is already installed (use [`rebuild`] to replace it), or
/// on any construction/startup error.
pub fn init(config: LogConfig) -> Result<Arc<LogCore>> {
    let mut slot = CURRENT_CORE.write();
    if slot.is_some() {
        return Err(LoggerError::AlreadyRunning);
    }
    let core = build_and_start(config)?;
    *slot = Some(Arc::clone(&core));
    Ok(core)
}

/// Atomically replace the process-wide core with a freshly built one.
///
/// The old core is not drained into the new one: its dispatch loop finishes
/// independently once the last outside handle drops, and records still
/// buffered past the drop timeout are lost. This is the accepted
/// reconfiguration loss window.
pub fn rebuild(config: LogConfig) -> Result<Arc<LogCore>> {
    let core = build_and_start(config)?;
    let old = CURRENT_CORE.write().replace(Arc::clone(&core));
    drop(old);
    Ok(core)
}

/// The currently installed process-wide core, if any.
pub fn current() -> Option<Arc<LogCore>> {
    CURRENT_CORE.read().clone()
}

fn build_and_start(config: LogConfig) -> Result<Arc<LogCore>> {
    let core = Arc::new(LogCore::new(config)?);
    core.start()?;
    LogCore::install_signal_handler(&core)?;
    Ok(core)
}
