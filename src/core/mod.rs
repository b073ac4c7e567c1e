//! Core pipeline types: configuration, records, the dispatch loop, and the
//! lifecycle of the logging core

pub mod config;
pub mod dispatch;
pub mod error;
pub mod level;
pub mod lifecycle;
pub mod logger;
pub mod metrics;
pub mod record;

pub use config::{LogConfig, OutputMode};
pub use error::{LoggerError, Result};
pub use level::LogLevel;
pub use lifecycle::{CoreState, RunState};
pub use logger::{current, init, rebuild, LogCore, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::CoreMetrics;
pub use record::{Record, RecordPool};
