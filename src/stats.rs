//! Statistics engine
//!
//! Owns every piece of per-stream state: the exact event count, both
//! sketches, the value and latency windows and the running moments. It is
//! mutated only by the consumer task, one batch at a time.
//!
//! Latency is read from the clock for each event as it is applied, so
//! events late in a batch include the processing time of earlier ones.

use crate::config::StatsConfig;
use crate::event::{Clock, Event, SystemClock, UserId};
use crate::moments::OnlineMoments;
use crate::percentile::Percentiles;
use crate::sketch::{CardinalitySketch, FrequencySketch};
use crate::window::RollingWindow;
use std::sync::Arc;

/// Milliseconds per second, for reporting latencies
const MS_PER_SEC: f64 = 1000.0;

/// Summary of one applied batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchReport {
    /// Events in the batch
    pub size: usize,
    /// Total events consumed after this batch
    pub count: u64,
    /// Latency percentiles over the window, in milliseconds
    pub latency: Percentiles,
}

/// Streaming statistics over every consumed event
#[derive(Debug)]
pub struct StreamStats {
    clock: Arc<dyn Clock>,
    count: u64,
    cardinality: CardinalitySketch,
    /// Shared with published snapshots; copied on write while one is alive
    frequency: Arc<FrequencySketch>,
    values: RollingWindow<f64>,
    latencies: RollingWindow<f64>,
    moments: OnlineMoments,
}

impl StreamStats {
    /// Create an engine reading the system clock
    #[must_use]
    pub fn new(config: &StatsConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create an engine reading latencies from the given clock
    #[must_use]
    pub fn with_clock(config: &StatsConfig, clock: Arc<dyn Clock>) -> Self {
        let window = config.window_size.as_nonzero();
        Self {
            clock,
            count: 0,
            cardinality: CardinalitySketch::new(config.precision),
            frequency: Arc::new(FrequencySketch::new(
                config.frequency_width,
                config.frequency_depth,
            )),
            values: RollingWindow::new(window),
            latencies: RollingWindow::new(window),
            moments: OnlineMoments::new(),
        }
    }

    /// Fold a single event into every structure
    pub fn update(&mut self, event: &Event) {
        let latency = event.latency_at(self.clock.now());
        let key = event.user_id().key();

        self.count += 1;
        self.cardinality.add(key.as_bytes());
        Arc::make_mut(&mut self.frequency).add(key.as_bytes());
        self.values.push(event.value());
        self.latencies.push(latency);
        self.moments.update(event.value());
    }

    /// Apply a batch in order and report the resulting latency percentiles
    pub fn apply_batch(&mut self, events: &[Event]) -> BatchReport {
        for event in events {
            self.update(event);
        }
        BatchReport {
            size: events.len(),
            count: self.count,
            latency: self.latency_percentiles(),
        }
    }

    /// p50/p95/p99 of the latency window in milliseconds
    ///
    /// All zero while no event has been applied.
    #[must_use]
    pub fn latency_percentiles(&self) -> Percentiles {
        Percentiles::from_sorted(&self.latencies.sorted()).scaled(MS_PER_SEC)
    }

    /// Exact number of events ever applied
    #[must_use]
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Approximate number of distinct users
    #[must_use]
    pub fn unique_estimate(&self) -> f64 {
        self.cardinality.estimate()
    }

    /// Approximate number of events seen for a user (never an undercount)
    #[must_use]
    pub fn frequency(&self, user: UserId) -> u64 {
        self.frequency.estimate(user.key().as_bytes())
    }

    /// Mean of every value ever applied
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.moments.mean()
    }

    /// Sample variance of every value ever applied
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.moments.variance()
    }

    #[must_use]
    pub fn moments(&self) -> &OnlineMoments {
        &self.moments
    }

    #[must_use]
    pub fn cardinality(&self) -> &CardinalitySketch {
        &self.cardinality
    }

    /// Shared handle to the frequency sketch for lock-free reads elsewhere
    #[must_use]
    pub fn frequency_sketch(&self) -> Arc<FrequencySketch> {
        Arc::clone(&self.frequency)
    }

    #[must_use]
    pub fn value_window(&self) -> &RollingWindow<f64> {
        &self.values
    }

    #[must_use]
    pub fn latency_window(&self) -> &RollingWindow<f64> {
        &self.latencies
    }
}
