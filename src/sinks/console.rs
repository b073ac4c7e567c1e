//! Console sink for stdout mode
//!
//! Records routed here are written synchronously: there is no queue and no
//! background worker in console mode. Error and Fatal records go to stderr,
//! everything else to stdout.

use crate::core::level::LogLevel;
use crate::core::record::Record;
use std::borrow::Cow;
use std::io::{self, Write};

pub struct ConsoleSink {
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Write one rendered record to the console stream.
    ///
    /// Write failures are swallowed: console logging is fire-and-forget and
    /// a broken pipe on stdout must not surface at the log-call site.
    pub fn write(&self, record: &Record) {
        let bytes = self.paint(record);
        let _ = match record.level() {
            LogLevel::Error | LogLevel::Fatal => io::stderr().lock().write_all(&bytes),
            _ => io::stdout().lock().write_all(&bytes),
        };
    }

    #[cfg(feature = "console")]
    fn paint<'a>(&self, record: &'a Record) -> Cow<'a, [u8]> {
        use colored::Colorize;
        if self.use_colors && record.level() >= LogLevel::Warn {
            Cow::Owned(
                String::from_utf8_lossy(record.as_bytes())
                    .color(record.level().color_code())
                    .to_string()
                    .into_bytes(),
            )
        } else {
            Cow::Borrowed(record.as_bytes())
        }
    }

    #[cfg(not(feature = "console"))]
    fn paint<'a>(&self, record: &'a Record) -> Cow<'a, [u8]> {
        Cow::Borrowed(record.as_bytes())
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}
