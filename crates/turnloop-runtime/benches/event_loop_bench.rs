//! Benchmarks for the event loop crate.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use turnloop_runtime::prelude::*;
use turnloop_runtime::TimerQueue;

fn bench_timer_queue_schedule_pop(c: &mut Criterion) {
    let mut queue = TimerQueue::new();

    c.bench_function("timer_queue_schedule_pop", |b| {
        b.iter(|| {
            queue.schedule(black_box(0), Duration::ZERO, ());
            black_box(queue.pop_due(1));
        });
    });
}

fn bench_lateness_record(c: &mut Criterion) {
    let mut metrics = LatenessMetrics::new();

    c.bench_function("lateness_record", |b| {
        b.iter(|| {
            metrics.record(black_box(1), black_box(10_001));
        });
    });
}

fn bench_busy_wait_manual_clock(c: &mut Criterion) {
    c.bench_function("busy_wait_10s_manual_clock", |b| {
        b.iter(|| {
            let clock = ManualClock::ticking(0, 1);
            black_box(busy_wait(&clock, Duration::from_millis(10_000)))
        });
    });
}

fn bench_driver_manual_clock(c: &mut Criterion) {
    let config = DriverConfig::default();

    c.bench_function("driver_manual_clock", |b| {
        b.iter(|| {
            let mut event_loop = EventLoop::new(ManualClock::ticking(0, 100), Vec::new());
            black_box(run_driver(&mut event_loop, &config))
        });
    });
}

criterion_group!(
    benches,
    bench_timer_queue_schedule_pop,
    bench_lateness_record,
    bench_busy_wait_manual_clock,
    bench_driver_manual_clock
);
criterion_main!(benches);
