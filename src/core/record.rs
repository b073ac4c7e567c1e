//! Records and the reusable buffer pool
//!
//! A record is one finished log line: its severity plus the rendered bytes.
//! The bytes live in a `Vec<u8>` borrowed from a [`RecordPool`]; whichever
//! sink consumes the record hands the buffer back so steady-state logging
//! allocates nothing.

use super::level::LogLevel;
use chrono::Local;
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;

/// Buffers above this capacity are not retained by the pool.
const MAX_POOLED_CAPACITY: usize = 16 * 1024;

/// Number of free buffers the pool retains.
const MAX_POOLED_BUFFERS: usize = 256;

/// Initial capacity of a freshly allocated record buffer.
const INITIAL_CAPACITY: usize = 256;

/// An immutable, pre-rendered log line.
#[derive(Debug)]
pub struct Record {
    level: LogLevel,
    bytes: Vec<u8>,
}

impl Record {
    pub fn new(level: LogLevel, bytes: Vec<u8>) -> Self {
        Self { level, bytes }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Take back the backing buffer for recycling.
    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Pool of reusable record buffers shared by all producers.
#[derive(Debug, Default)]
pub struct RecordPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl RecordPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an empty buffer, reusing a recycled one when available.
    pub fn get(&self) -> Vec<u8> {
        self.free
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(INITIAL_CAPACITY))
    }

    /// Return a buffer once its record has been written.
    ///
    /// Oversized buffers are dropped so one huge record cannot pin its
    /// allocation for the life of the process.
    pub fn put(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < MAX_POOLED_BUFFERS {
            free.push(buf);
        }
    }

    #[cfg(test)]
    fn free_count(&self) -> usize {
        self.free.lock().len()
    }
}

/// Render one log line into `buf`.
///
/// Line shape: `[LEVEL] MM/DD HH:MM:SS file:line ❀ message\n`. The severity
/// token is padded to five columns so the message column stays aligned.
pub(crate) fn render_into(
    buf: &mut Vec<u8>,
    level: LogLevel,
    args: fmt::Arguments<'_>,
    file: &str,
    line: u32,
) {
    // Writes to a Vec cannot fail; the results are discarded on purpose.
    let _ = write!(
        buf,
        "[{:5}] {} {}:{} ❀ ",
        level.to_str(),
        Local::now().format("%m/%d %H:%M:%S"),
        file,
        line,
    );
    let _ = buf.write_fmt(args);
    buf.push(b'\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accessors() {
        let record = Record::new(LogLevel::Info, b"hello\n".to_vec());
        assert_eq!(record.level(), LogLevel::Info);
        assert_eq!(record.as_bytes(), b"hello\n");
        assert_eq!(record.len(), 6);
        assert!(!record.is_empty());
    }

    #[test]
    fn test_pool_recycles_buffers() {
        let pool = RecordPool::new();
        let mut buf = pool.get();
        buf.extend_from_slice(b"some bytes");
        let ptr = buf.as_ptr();
        pool.put(buf);
        assert_eq!(pool.free_count(), 1);

        let reused = pool.get();
        assert_eq!(reused.as_ptr(), ptr);
        assert!(reused.is_empty());
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_pool_drops_oversized_buffers() {
        let pool = RecordPool::new();
        let buf = Vec::with_capacity(MAX_POOLED_CAPACITY + 1);
        pool.put(buf);
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_render_line_shape() {
        let mut buf = Vec::new();
        render_into(
            &mut buf,
            LogLevel::Warn,
            format_args!("disk {} almost full", "/dev/sda1"),
            "src/main.rs",
            42,
        );
        let line = String::from_utf8(buf).unwrap();
        assert!(line.starts_with("[WARN ] "));
        assert!(line.contains("src/main.rs:42 ❀ disk /dev/sda1 almost full"));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_render_pads_level_token() {
        let mut buf = Vec::new();
        render_into(&mut buf, LogLevel::Info, format_args!("x"), "a.rs", 1);
        let line = String::from_utf8(buf).unwrap();
        assert!(line.starts_with("[INFO ] "), "line was {:?}", line);
    }
}
