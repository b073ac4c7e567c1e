//! Pipeline metrics for observability
//!
//! Counters for monitoring the write pipeline: queue pressure, bytes
//! persisted, rotations, and alert delivery failures. Metrics are never
//! consulted by control flow.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct CoreMetrics {
    /// Records handed to the record buffer
    enqueued: AtomicU64,

    /// Records written to the file target
    written_records: AtomicU64,

    /// Bytes written to the file target
    written_bytes: AtomicU64,

    /// Times the record buffer was found full on enqueue
    queue_full_events: AtomicU64,

    /// Times a producer blocked waiting for buffer space
    block_events: AtomicU64,

    /// Records dropped because the core had already shut down
    dropped: AtomicU64,

    /// Completed file rotations
    rotations: AtomicU64,

    /// Idle-flush cycles that pushed buffered bytes to the OS
    flush_cycles: AtomicU64,

    /// Alert forwards that failed
    alert_failures: AtomicU64,
}

impl CoreMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            written_records: AtomicU64::new(0),
            written_bytes: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            rotations: AtomicU64::new(0),
            flush_cycles: AtomicU64::new(0),
            alert_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written_records(&self) -> u64 {
        self.written_records.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written_bytes(&self) -> u64 {
        self.written_bytes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rotations(&self) -> u64 {
        self.rotations.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_cycles(&self) -> u64 {
        self.flush_cycles.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn alert_failures(&self) -> u64 {
        self.alert_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self, bytes: u64) {
        self.written_records.fetch_add(1, Ordering::Relaxed);
        self.written_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rotation(&self) -> u64 {
        self.rotations.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush_cycle(&self) -> u64 {
        self.flush_cycles.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_alert_failure(&self) -> u64 {
        self.alert_failures.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for CoreMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = CoreMetrics::new();
        assert_eq!(metrics.enqueued(), 0);
        assert_eq!(metrics.written_records(), 0);
        assert_eq!(metrics.written_bytes(), 0);
        assert_eq!(metrics.queue_full_events(), 0);
        assert_eq!(metrics.rotations(), 0);
    }

    #[test]
    fn test_metrics_record_written() {
        let metrics = CoreMetrics::new();
        metrics.record_written(128);
        metrics.record_written(64);
        assert_eq!(metrics.written_records(), 2);
        assert_eq!(metrics.written_bytes(), 192);
    }

    #[test]
    fn test_metrics_counters_accumulate() {
        let metrics = CoreMetrics::new();
        metrics.record_enqueued();
        metrics.record_enqueued();
        metrics.record_queue_full();
        metrics.record_block();
        metrics.record_dropped();
        metrics.record_rotation();
        metrics.record_flush_cycle();
        metrics.record_alert_failure();

        assert_eq!(metrics.enqueued(), 2);
        assert_eq!(metrics.queue_full_events(), 1);
        assert_eq!(metrics.block_events(), 1);
        assert_eq!(metrics.dropped(), 1);
        assert_eq!(metrics.rotations(), 1);
        assert_eq!(metrics.flush_cycles(), 1);
        assert_eq!(metrics.alert_failures(), 1);
    }
}
