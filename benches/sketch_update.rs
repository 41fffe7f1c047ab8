//! Benchmarks for the per-event sketch updates
//!
//! Measures the hot path every event goes through:
//! - CardinalitySketch add and estimate at several precisions
//! - FrequencySketch add and point query
//! - StreamStats::update (all structures at once)
//!
//! Run with: cargo bench --bench sketch_update

use divan::{Bencher, black_box};
use stream_pulse::types::{Precision, SketchDepth, SketchWidth};
use stream_pulse::{CardinalitySketch, Event, FrequencySketch, StatsConfig, StreamStats, UserId};

fn main() {
    divan::main();
}

const KEYS: u64 = 5_000;

// =============================================================================
// Cardinality sketch
// =============================================================================

mod cardinality {
    use super::*;

    #[divan::bench(args = [4, 8, 12, 16])]
    fn add(bencher: Bencher, precision: u8) {
        let mut sketch = CardinalitySketch::new(Precision::try_new(precision).unwrap());
        let mut id = 0u64;
        bencher.bench_local(|| {
            id = (id + 1) % KEYS;
            sketch.add(black_box(UserId::new(id).key().as_bytes()));
        });
    }

    #[divan::bench(args = [4, 8, 12, 16])]
    fn estimate(bencher: Bencher, precision: u8) {
        let mut sketch = CardinalitySketch::new(Precision::try_new(precision).unwrap());
        for id in 0..KEYS {
            sketch.add(UserId::new(id).key().as_bytes());
        }
        bencher.bench(|| black_box(black_box(&sketch).estimate()));
    }
}

// =============================================================================
// Frequency sketch
// =============================================================================

mod frequency {
    use super::*;

    fn make_sketch(depth: usize) -> FrequencySketch {
        FrequencySketch::new(
            SketchWidth::new(1000).unwrap(),
            SketchDepth::new(depth).unwrap(),
        )
    }

    #[divan::bench(args = [1, 5, 10])]
    fn add(bencher: Bencher, depth: usize) {
        let mut sketch = make_sketch(depth);
        let mut id = 0u64;
        bencher.bench_local(|| {
            id = (id + 1) % KEYS;
            sketch.add(black_box(UserId::new(id).key().as_bytes()));
        });
    }

    #[divan::bench(args = [1, 5, 10])]
    fn estimate(bencher: Bencher, depth: usize) {
        let mut sketch = make_sketch(depth);
        for id in 0..KEYS {
            sketch.add(UserId::new(id).key().as_bytes());
        }
        let key = UserId::new(42).key();
        bencher.bench(|| black_box(black_box(&sketch).estimate(key.as_bytes())));
    }
}

// =============================================================================
// Whole statistics engine
// =============================================================================

#[divan::bench(sample_count = 1000, sample_size = 100)]
fn stats_update(bencher: Bencher) {
    let mut stats = StreamStats::new(&StatsConfig::default());
    let mut id = 0u64;
    bencher.bench_local(|| {
        id = (id + 1) % KEYS;
        let event = Event::new(UserId::new(id), 50.0, 0.0);
        stats.update(black_box(&event));
    });
}
