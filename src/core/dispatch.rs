//! The dispatch loop: the single consumer of the record buffer
//!
//! One long-lived worker thread owns the file target exclusively and waits
//! on three independent sources: the close signal, the idle-flush ticker,
//! and record arrival. First-ready wins; writes stay serialized in buffer
//! arrival order because everything happens on this one thread.

use super::lifecycle::RunState;
use super::metrics::CoreMetrics;
use super::record::{Record, RecordPool};
use crate::sinks::FileTarget;
use crossbeam_channel::{select, tick, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

pub(crate) struct DispatchLoop {
    pub(crate) records: Receiver<Record>,
    pub(crate) close: Receiver<()>,
    pub(crate) ack: Sender<()>,
    pub(crate) target: FileTarget,
    pub(crate) pool: Arc<RecordPool>,
    pub(crate) state: Arc<RunState>,
    pub(crate) metrics: Arc<CoreMetrics>,
    pub(crate) flush_interval: Duration,
}

impl DispatchLoop {
    pub(crate) fn run(self) {
        let Self {
            records,
            close,
            ack,
            mut target,
            pool,
            state,
            metrics,
            flush_interval,
        } = self;

        let ticker = tick(flush_interval);

        loop {
            select! {
                recv(close) -> _ => break,
                recv(ticker) -> _ => {
                    if target.has_buffered() {
                        match target.flush() {
                            Ok(()) => {
                                metrics.record_flush_cycle();
                            }
                            Err(e) => eprintln!("[LOGGER ERROR] idle flush failed: {}", e),
                        }
                    }
                },
                recv(records) -> msg => match msg {
                    Ok(record) => write_one(&mut target, &pool, record),
                    // Every producer handle is gone; nothing more can arrive.
                    Err(_) => break,
                },
            }
        }

        // Ticker stops here; the remainder is the tail of the shutdown
        // protocol: drain records that arrived before the close signal,
        // flush, close the file, mark the core dead, then acknowledge.
        drop(ticker);

        while let Ok(record) = records.try_recv() {
            write_one(&mut target, &pool, record);
        }
        if let Err(e) = target.flush() {
            eprintln!("[LOGGER ERROR] final flush failed: {}", e);
        }
        drop(target);
        state.set_dead();
        let _ = ack.send(());
    }
}

/// Write one record, evaluate rotation, recycle the buffer.
fn write_one(target: &mut FileTarget, pool: &RecordPool, record: Record) {
    if let Err(e) = target.write_record(record.as_bytes()) {
        eprintln!("[LOGGER ERROR] {}", e);
    }
    target.maybe_rotate();
    pool.put(record.into_bytes());
}
