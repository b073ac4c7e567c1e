//! # Rotolog
//!
//! An in-process asynchronous logging core: callers hand finished records to
//! a bounded buffer and a single background dispatch loop persists them to a
//! rotating on-disk file, or mirrors them to the console, without blocking
//! callers on disk I/O.
//!
//! ## Features
//!
//! - **Non-blocking producers**: disk I/O happens only on the dispatch loop
//! - **Rotating file target**: size and date rotation behind a stable
//!   symlink that `tail -f` can follow across rotations
//! - **Graceful shutdown**: process signals drain the buffer before exit
//! - **Thread safe**: designed for many concurrent producers

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        current, init, rebuild, CoreMetrics, LogConfig, LogCore, LogLevel, LoggerError,
        OutputMode, Record, RecordPool, Result, DEFAULT_SHUTDOWN_TIMEOUT,
    };
    pub use crate::sinks::{AlertSink, ConsoleSink};
}

pub use crate::core::{
    current, init, rebuild, CoreMetrics, LogConfig, LogCore, LogLevel, LoggerError, OutputMode,
    Record, RecordPool, Result, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::sinks::{AlertSink, ConsoleSink};
