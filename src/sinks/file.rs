//! File target: the active log file plus its stable symlink pointer
//!
//! The on-disk layout is a directory of timestamped files named
//! `YYYY.MM.DD.HH.MM.SS.log` and one stable symlink `<link_name>.log` that
//! always resolves to the newest of them while the core is running, so
//! external tools can `tail -f` one path across rotations.
//!
//! The target is owned exclusively by the dispatch loop; nothing here is
//! synchronized except the shared run-state flag consulted by rotation.

use crate::core::config::LogConfig;
use crate::core::error::{LoggerError, Result};
use crate::core::lifecycle::RunState;
use crate::core::metrics::CoreMetrics;
use chrono::{Local, NaiveDate, NaiveDateTime};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Timestamp embedded in log file names.
const FILE_STAMP_FORMAT: &str = "%Y.%m.%d.%H.%M.%S";

/// Safety margin below the size cap so a write in flight does not push the
/// file past the configured maximum.
const SIZE_DELTA: u64 = 100;

pub struct FileTarget {
    dir: PathBuf,
    link_path: PathBuf,
    file_path: PathBuf,
    writer: BufWriter<File>,
    buffer_capacity: usize,
    actual_size: u64,
    max_size: u64,
    /// YYYYMMDD of the day the active file was opened.
    date_stamp: i32,
    state: Arc<RunState>,
    metrics: Arc<CoreMetrics>,
}

impl FileTarget {
    /// Open the file target: resume the file behind the stable link, or
    /// create a fresh one when the link is missing, broken, or unparsable.
    ///
    /// # Errors
    ///
    /// Returns an error only when no file can be created at all; this is the
    /// one fatal path and aborts dispatch-loop startup.
    pub fn open(
        config: &LogConfig,
        state: Arc<RunState>,
        metrics: Arc<CoreMetrics>,
    ) -> Result<Self> {
        let dir = config.dir.clone();
        let link_path = config.link_path();
        let buffer_capacity = config.write_buffer_bytes();
        let max_size = config.max_size_bytes();

        let (writer, file_path, actual_size, date_stamp) =
            match Self::resume(&dir, &link_path, buffer_capacity) {
                Ok(resumed) => resumed,
                Err(_) => {
                    let (writer, file_path, date_stamp) =
                        Self::create(&dir, &link_path, buffer_capacity)?;
                    (writer, file_path, 0, date_stamp)
                }
            };

        Ok(Self {
            dir,
            link_path,
            file_path,
            writer,
            buffer_capacity,
            actual_size,
            max_size,
            date_stamp,
            state,
            metrics,
        })
    }

    /// Reopen the file the stable link points at, restoring its size and
    /// date stamp from disk. Errors here are recovered by `open` falling
    /// back to `create`, never surfaced to callers.
    fn resume(
        dir: &Path,
        link_path: &Path,
        buffer_capacity: usize,
    ) -> Result<(BufWriter<File>, PathBuf, u64, i32)> {
        let meta = fs::symlink_metadata(link_path)
            .map_err(|e| LoggerError::io_operation("resuming file target", "no stable link", e))?;
        if !meta.file_type().is_symlink() {
            return Err(LoggerError::file_target(
                link_path.display().to_string(),
                "stable link path is not a symlink",
            ));
        }

        let target = fs::read_link(link_path).map_err(|e| {
            LoggerError::io_operation("resuming file target", "cannot resolve stable link", e)
        })?;
        let file_path = if target.is_absolute() {
            target
        } else {
            dir.join(target)
        };

        let date_stamp = Self::parse_stamp(&file_path).ok_or_else(|| {
            LoggerError::file_target(
                file_path.display().to_string(),
                "file name carries no parsable timestamp",
            )
        })?;

        let file = OpenOptions::new().append(true).open(&file_path).map_err(|e| {
            LoggerError::io_operation("resuming file target", "cannot reopen linked file", e)
        })?;
        let actual_size = file
            .metadata()
            .map_err(|e| {
                LoggerError::io_operation("resuming file target", "cannot stat linked file", e)
            })?
            .len();

        let writer = BufWriter::with_capacity(buffer_capacity, file);
        Ok((writer, file_path, actual_size, date_stamp))
    }

    /// Create a fresh timestamped file and repoint the stable link at it.
    fn create(
        dir: &Path,
        link_path: &Path,
        buffer_capacity: usize,
    ) -> Result<(BufWriter<File>, PathBuf, i32)> {
        fs::create_dir_all(dir).map_err(|e| {
            LoggerError::io_operation(
                "creating log directory",
                format!("cannot create '{}'", dir.display()),
                e,
            )
        })?;

        let now = Local::now();
        let file_name = format!("{}.log", now.format(FILE_STAMP_FORMAT));
        let file_path = dir.join(&file_name);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)
            .map_err(|e| {
                LoggerError::file_target(
                    file_path.display().to_string(),
                    format!("cannot create log file: {}", e),
                )
            })?;

        Self::point_link(link_path, &file_name)?;

        let date_stamp = stamp_of(now.date_naive());
        Ok((BufWriter::with_capacity(buffer_capacity, file), file_path, date_stamp))
    }

    /// Repoint the stable link: remove then symlink.
    ///
    /// Not crash-atomic, but the single-writer discipline means no concurrent
    /// repoint can race this. The link target is the bare file name so the
    /// link stays valid if the directory is moved.
    fn point_link(link_path: &Path, file_name: &str) -> Result<()> {
        if fs::symlink_metadata(link_path).is_ok() {
            fs::remove_file(link_path).map_err(|e| {
                LoggerError::io_operation(
                    "repointing stable link",
                    format!("cannot remove '{}'", link_path.display()),
                    e,
                )
            })?;
        }

        #[cfg(unix)]
        std::os::unix::fs::symlink(file_name, link_path).map_err(|e| {
            LoggerError::io_operation(
                "repointing stable link",
                format!("cannot link '{}'", link_path.display()),
                e,
            )
        })?;

        #[cfg(windows)]
        std::os::windows::fs::symlink_file(file_name, link_path).map_err(|e| {
            LoggerError::io_operation(
                "repointing stable link",
                format!("cannot link '{}'", link_path.display()),
                e,
            )
        })?;

        Ok(())
    }

    /// Parse the YYYYMMDD stamp out of a timestamped file name.
    fn parse_stamp(file_path: &Path) -> Option<i32> {
        let stem = file_path.file_stem()?.to_str()?;
        let parsed = NaiveDateTime::parse_from_str(stem, FILE_STAMP_FORMAT).ok()?;
        Some(stamp_of(parsed.date()))
    }

    /// Append one record's bytes to the active file.
    pub fn write_record(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes).map_err(|e| {
            LoggerError::file_target(
                self.file_path.display().to_string(),
                format!("failed to write record: {}", e),
            )
        })?;
        self.actual_size += bytes.len() as u64;
        self.metrics.record_written(bytes.len() as u64);
        Ok(())
    }

    /// Rotate the active file if the size or date threshold is exceeded.
    ///
    /// Returns whether a rotation happened. Rotation is a no-op while the
    /// core is not running. A failed rotation leaves the previous file in
    /// use until the next successful attempt: the replacement file is opened
    /// and linked before the old writer is released.
    pub fn maybe_rotate(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }

        let today = stamp_of(Local::now().date_naive());
        if self.actual_size <= self.max_size.saturating_sub(SIZE_DELTA)
            && today <= self.date_stamp
        {
            return false;
        }

        if let Err(e) = self.writer.flush() {
            eprintln!("[LOGGER ERROR] flush before rotation failed: {}", e);
        }

        match Self::create(&self.dir, &self.link_path, self.buffer_capacity) {
            Ok((writer, file_path, date_stamp)) => {
                // Dropping the old writer closes the previous file.
                self.writer = writer;
                self.file_path = file_path;
                self.date_stamp = date_stamp;
                self.actual_size = 0;
                self.metrics.record_rotation();
                true
            }
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] rotation failed for '{}': {}",
                    self.dir.display(),
                    e
                );
                false
            }
        }
    }

    /// Whether the write buffer holds bytes not yet pushed to the OS.
    pub fn has_buffered(&self) -> bool {
        !self.writer.buffer().is_empty()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| {
            LoggerError::file_target(
                self.file_path.display().to_string(),
                format!("failed to flush: {}", e),
            )
        })
    }

    pub fn actual_size(&self) -> u64 {
        self.actual_size
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    #[cfg(test)]
    fn set_date_stamp(&mut self, stamp: i32) {
        self.date_stamp = stamp;
    }

    #[cfg(test)]
    fn set_max_size(&mut self, max_size: u64) {
        self.max_size = max_size;
    }
}

impl Drop for FileTarget {
    fn drop(&mut self) {
        // Best effort; shutdown flushes explicitly before the target drops.
        let _ = self.writer.flush();
    }
}

fn stamp_of(date: NaiveDate) -> i32 {
    use chrono::Datelike;
    date.year() * 10000 + date.month() as i32 * 100 + date.day() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_config(dir: &Path) -> LogConfig {
        LogConfig {
            dir: dir.to_path_buf(),
            link_name: "test".to_string(),
            max_file_size_mb: 1,
            write_buffer_mb: 1,
            ..LogConfig::default()
        }
    }

    fn running_state() -> Arc<RunState> {
        let state = Arc::new(RunState::new());
        assert!(state.try_start());
        state
    }

    fn open_target(dir: &Path, state: Arc<RunState>) -> FileTarget {
        FileTarget::open(&test_config(dir), state, Arc::new(CoreMetrics::new())).unwrap()
    }

    #[test]
    fn test_create_lays_out_file_and_link() {
        let dir = tempdir().unwrap();
        let target = open_target(dir.path(), running_state());

        assert!(target.file_path().exists());
        assert_eq!(target.actual_size(), 0);

        let link = dir.path().join("test.log");
        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        let resolved = dir.path().join(fs::read_link(&link).unwrap());
        assert_eq!(resolved, target.file_path());
    }

    #[test]
    fn test_file_name_carries_parsable_stamp() {
        let dir = tempdir().unwrap();
        let target = open_target(dir.path(), running_state());

        let stamp = FileTarget::parse_stamp(target.file_path()).unwrap();
        assert_eq!(stamp, stamp_of(Local::now().date_naive()));
    }

    #[test]
    fn test_resume_restores_size_and_stamp() {
        let dir = tempdir().unwrap();
        let state = running_state();

        let first_path;
        {
            let mut target = open_target(dir.path(), state.clone());
            target.write_record(b"0123456789\n").unwrap();
            target.flush().unwrap();
            first_path = target.file_path().to_path_buf();
        }

        let resumed = open_target(dir.path(), state);
        assert_eq!(resumed.file_path(), first_path);
        assert_eq!(resumed.actual_size(), 11);
        assert_eq!(resumed.date_stamp, stamp_of(Local::now().date_naive()));
    }

    #[test]
    fn test_broken_link_falls_back_to_create() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("test.log");
        #[cfg(unix)]
        std::os::unix::fs::symlink("1999.12.31.23.59.59.log", &link).unwrap();

        let target = open_target(dir.path(), running_state());
        assert!(target.file_path().exists());
        assert_eq!(target.actual_size(), 0);
    }

    #[test]
    fn test_unparsable_target_falls_back_to_create() {
        let dir = tempdir().unwrap();
        let stale = dir.path().join("not-a-timestamp.log");
        fs::write(&stale, b"old contents").unwrap();
        let link = dir.path().join("test.log");
        #[cfg(unix)]
        std::os::unix::fs::symlink("not-a-timestamp.log", &link).unwrap();

        let target = open_target(dir.path(), running_state());
        assert_ne!(target.file_path(), stale.as_path());
        assert_eq!(target.actual_size(), 0);
    }

    #[test]
    fn test_rotation_by_size_repoints_link() {
        let dir = tempdir().unwrap();
        let mut target = open_target(dir.path(), running_state());
        target.set_max_size(256);

        let old_path = target.file_path().to_path_buf();
        // Push actual_size past max - delta
        let chunk = vec![b'x'; 200];
        target.write_record(&chunk).unwrap();
        assert!(target.maybe_rotate());

        assert_eq!(target.actual_size(), 0);
        let link = dir.path().join("test.log");
        let resolved = dir.path().join(fs::read_link(&link).unwrap());
        assert_eq!(resolved, target.file_path());
        // The old file stays on disk with its contents flushed
        assert!(old_path.exists());
        assert_eq!(fs::read(&old_path).unwrap().len(), 200);
    }

    #[test]
    fn test_rotation_below_threshold_is_noop() {
        let dir = tempdir().unwrap();
        let mut target = open_target(dir.path(), running_state());
        target.set_max_size(1024);

        target.write_record(b"small\n").unwrap();
        assert!(!target.maybe_rotate());
        assert_eq!(target.actual_size(), 6);
    }

    #[test]
    fn test_rotation_by_date() {
        let dir = tempdir().unwrap();
        let mut target = open_target(dir.path(), running_state());

        // Pretend the file was opened yesterday
        target.set_date_stamp(stamp_of(Local::now().date_naive()) - 1);
        target.write_record(b"carried over\n").unwrap();
        assert!(target.maybe_rotate());
        assert_eq!(target.actual_size(), 0);
    }

    #[test]
    fn test_rotation_noop_while_dead() {
        let dir = tempdir().unwrap();
        let state = Arc::new(RunState::new());
        let mut target = open_target(dir.path(), state);
        target.set_max_size(0);
        target.set_date_stamp(0);

        assert!(!target.maybe_rotate());
    }

    #[test]
    fn test_has_buffered_tracks_writer_state() {
        let dir = tempdir().unwrap();
        let mut target = open_target(dir.path(), running_state());

        assert!(!target.has_buffered());
        target.write_record(b"buffered\n").unwrap();
        assert!(target.has_buffered());
        target.flush().unwrap();
        assert!(!target.has_buffered());
    }
}
