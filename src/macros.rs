//! Logging macros for ergonomic log message formatting.
//!
//! These macros take an explicit core handle, check the minimum level
//! before formatting anything, and capture the call site's file and line.
//!
//! # Examples
//!
//! ```
//! use rotolog::prelude::*;
//! use rotolog::info;
//!
//! let core = LogCore::new(LogConfig::default()).unwrap();
//!
//! // Basic logging
//! info!(core, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(core, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rotolog::prelude::*;
/// # let core = LogCore::new(LogConfig::default()).unwrap();
/// use rotolog::log;
/// log!(core, LogLevel::Info, "Simple message");
/// log!(core, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($core:expr, $level:expr, $($arg:tt)+) => {{
        let __core = &$core;
        let __level = $level;
        if __core.enabled(__level) {
            __core.log_at(
                __level,
                ::std::format_args!($($arg)+),
                ::std::file!(),
                ::std::line!(),
            );
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rotolog::prelude::*;
/// # let core = LogCore::new(LogConfig::default()).unwrap();
/// use rotolog::debug;
/// debug!(core, "Debug information");
/// debug!(core, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($core:expr, $($arg:tt)+) => {
        $crate::log!($core, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rotolog::prelude::*;
/// # let core = LogCore::new(LogConfig::default()).unwrap();
/// use rotolog::info;
/// info!(core, "Application started");
/// info!(core, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($core:expr, $($arg:tt)+) => {
        $crate::log!($core, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rotolog::prelude::*;
/// # let core = LogCore::new(LogConfig::default()).unwrap();
/// use rotolog::warn;
/// warn!(core, "Low disk space");
/// warn!(core, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($core:expr, $($arg:tt)+) => {
        $crate::log!($core, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rotolog::prelude::*;
/// # let core = LogCore::new(LogConfig::default()).unwrap();
/// use rotolog::error;
/// error!(core, "Failed to connect to database");
/// error!(core, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($core:expr, $($arg:tt)+) => {
        $crate::log!($core, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// # Examples
///
/// ```
/// # use rotolog::prelude::*;
/// # let core = LogCore::new(LogConfig::default()).unwrap();
/// use rotolog::fatal;
/// fatal!(core, "Critical system failure");
/// fatal!(core, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($core:expr, $($arg:tt)+) => {
        $crate::log!($core, $crate::LogLevel::Fatal, $($arg)+)
    };
}
