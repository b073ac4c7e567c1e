//! Criterion benchmarks for rotolog

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rotolog::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

fn file_config(dir: &std::path::Path) -> LogConfig {
    LogConfig {
        dir: dir.to_path_buf(),
        link_name: "bench".to_string(),
        mode: OutputMode::File,
        bucket_capacity: 16 * 1024,
        ..LogConfig::default()
    }
}

// ============================================================================
// Core Creation Benchmarks
// ============================================================================

fn bench_core_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("core_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("new_stdout", |b| {
        b.iter(|| {
            let core = LogCore::new(LogConfig::default()).unwrap();
            black_box(core)
        });
    });

    group.finish();
}

// ============================================================================
// Producer Path Benchmarks
// ============================================================================

fn bench_producer_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("producer_path");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().unwrap();
    let core = LogCore::new(file_config(temp_dir.path())).unwrap();
    core.start().unwrap();

    group.bench_function("info", |b| {
        b.iter(|| {
            core.info(black_box("Info message"));
        });
    });

    group.bench_function("error", |b| {
        b.iter(|| {
            core.error(black_box("Error message"));
        });
    });

    group.finish();
    core.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
}

// ============================================================================
// Concurrent Producer Benchmarks
// ============================================================================

fn bench_concurrent_producers(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_producers");

    let temp_dir = TempDir::new().unwrap();
    let core = Arc::new(LogCore::new(file_config(temp_dir.path())).unwrap());
    core.start().unwrap();

    group.bench_function("single_thread", |b| {
        let core = Arc::clone(&core);
        b.iter(|| {
            core.info(black_box("Concurrent message"));
        });
    });

    group.bench_function("multi_thread_4", |b| {
        let core = Arc::clone(&core);
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let core = Arc::clone(&core);
                    std::thread::spawn(move || {
                        core.info(black_box("Concurrent message"));
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
    core.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
}

// ============================================================================
// Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().unwrap();
    let core = LogCore::new(file_config(temp_dir.path())).unwrap();
    core.start().unwrap();
    core.set_min_level(LogLevel::Warn);

    group.bench_function("below_threshold", |b| {
        b.iter(|| {
            core.debug(black_box("This should be filtered"));
        });
    });

    group.bench_function("above_threshold", |b| {
        b.iter(|| {
            core.warn(black_box("This should be logged"));
        });
    });

    group.finish();
    core.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_core_creation,
    bench_producer_path,
    bench_concurrent_producers,
    bench_level_filtering
);

criterion_main!(benches);
