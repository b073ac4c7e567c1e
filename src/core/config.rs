//! Configuration surface for the logging core
//!
//! The core consumes this configuration but does not own its loading policy:
//! callers may fill a [`LogConfig`] in code, or read one from a TOML file with
//! [`LogConfig::from_toml_file`]. All fields default to the values a bare
//! `[log]` table would produce.

use super::error::{LoggerError, Result};
use super::level::LogLevel;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const MB: u64 = 1024 * 1024;

/// Where finished records are routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Write records synchronously to the console stream.
    #[default]
    Stdout,
    /// Enqueue records for the background dispatch loop and the file target.
    File,
}

impl FromStr for OutputMode {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "file" => Ok(OutputMode::File),
            "stdout" => Ok(OutputMode::Stdout),
            // Unrecognized modes fall back to the console stream.
            _ => Ok(OutputMode::Stdout),
        }
    }
}

fn mode_from_str<'de, D>(deserializer: D) -> std::result::Result<OutputMode, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s.parse().unwrap_or_default())
}

/// Configuration consumed by [`LogCore`](crate::core::logger::LogCore).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Capacity of the bounded record buffer.
    pub bucket_capacity: usize,
    /// Maximum size of the active log file before rotation, in MiB.
    pub max_file_size_mb: u64,
    /// Size of the file write buffer, in MiB.
    pub write_buffer_mb: u64,
    /// Directory holding the timestamped log files and the stable link.
    pub dir: PathBuf,
    /// Base name of the stable symlink; `<link_name>.log` inside `dir`.
    pub link_name: String,
    /// Record routing: `stdout` or `file`.
    #[serde(deserialize_with = "mode_from_str")]
    pub mode: OutputMode,
    /// Idle-flush interval for the dispatch loop, in milliseconds.
    pub flush_interval_ms: u64,
    /// Forward error-and-above records to the alert collaborator.
    pub alert_on_error: bool,
    /// Minimum severity accepted by the render macros.
    pub min_level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            bucket_capacity: 1024,
            max_file_size_mb: 256,
            write_buffer_mb: 2,
            dir: PathBuf::from("."),
            link_name: "rotolog".to_string(),
            mode: OutputMode::Stdout,
            flush_interval_ms: 500,
            alert_on_error: false,
            min_level: LogLevel::Debug,
        }
    }
}

impl LogConfig {
    /// Load a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// parsed configuration fails [`validate`](Self::validate). Both are
    /// fatal at startup.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading config file",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        let config: LogConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the core relies on.
    pub fn validate(&self) -> Result<()> {
        if self.bucket_capacity == 0 {
            return Err(LoggerError::config(
                "LogConfig",
                "bucket_capacity must be non-zero",
            ));
        }
        if self.max_file_size_mb == 0 {
            return Err(LoggerError::config(
                "LogConfig",
                "max_file_size_mb must be non-zero",
            ));
        }
        if self.write_buffer_mb == 0 {
            return Err(LoggerError::config(
                "LogConfig",
                "write_buffer_mb must be non-zero",
            ));
        }
        if self.flush_interval_ms == 0 {
            return Err(LoggerError::config(
                "LogConfig",
                "flush_interval_ms must be non-zero",
            ));
        }
        if self.link_name.is_empty() {
            return Err(LoggerError::config("LogConfig", "link_name must not be empty"));
        }
        if self.link_name.contains(std::path::is_separator) {
            return Err(LoggerError::config(
                "LogConfig",
                "link_name must not contain path separators",
            ));
        }
        Ok(())
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_file_size_mb * MB
    }

    pub fn write_buffer_bytes(&self) -> usize {
        (self.write_buffer_mb * MB) as usize
    }

    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }

    /// Path of the stable symlink callers and external tools observe.
    pub fn link_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.link_name))
    }
}
