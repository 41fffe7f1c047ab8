//! Benchmarks for per-batch work on the consumer
//!
//! Measures what runs once per emitted batch:
//! - StreamStats::apply_batch (updates plus latency percentiles)
//! - Percentiles over a full rolling window
//! - AdaptiveAlerter::observe with a warm history
//!
//! Run with: cargo bench --bench batch_processing

use divan::{Bencher, black_box};
use std::sync::Arc;
use stream_pulse::{
    AdaptiveAlerter, AlertConfig, Event, ManualClock, Percentiles, StatsConfig, StreamStats,
    UserId,
};

fn main() {
    divan::main();
}

fn make_events(count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| Event::new(UserId::new(i as u64 % 5000), 50.0 + (i % 20) as f64, 990.0))
        .collect()
}

#[divan::bench(args = [10, 100, 1000])]
fn apply_batch(bencher: Bencher, size: usize) {
    let clock = Arc::new(ManualClock::new(1_000.0));
    let mut stats = StreamStats::with_clock(&StatsConfig::default(), clock);
    let events = make_events(size);

    bencher
        .counter(divan::counter::ItemsCount::new(size))
        .bench_local(|| black_box(stats.apply_batch(black_box(&events))));
}

#[divan::bench(args = [100, 1000, 10_000])]
fn window_percentiles(bencher: Bencher, len: usize) {
    let mut values: Vec<f64> = (0..len).map(|i| ((i * 7919) % len) as f64).collect();
    values.sort_by(f64::total_cmp);
    bencher.bench(|| black_box(Percentiles::from_sorted(black_box(&values))));
}

#[divan::bench(sample_count = 1000, sample_size = 100)]
fn alerter_observe(bencher: Bencher) {
    let mut alerter = AdaptiveAlerter::new(&AlertConfig::default());
    for i in 0..30 {
        alerter.observe(40.0 + (i % 5) as f64);
    }
    let mut p99 = 40.0;
    bencher.bench_local(|| {
        p99 = if p99 > 45.0 { 40.0 } else { p99 + 0.5 };
        black_box(alerter.observe(black_box(p99)))
    });
}
