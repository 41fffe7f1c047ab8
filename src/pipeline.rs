//! Consumer pipeline: batcher → statistics → alerting → snapshot
//!
//! The pipeline exclusively owns the batcher, the statistics engine and the
//! dashboard state and runs them sequentially in one task, so none of them
//! needs a lock. The bounded queue is the only point shared with producers.
//! Observers receive a [`PipelineSnapshot`] after every batch through a
//! `watch` channel.

use crate::alert::AlertEvaluation;
use crate::batcher::{Batch, Batcher};
use crate::config::{BatchConfig, PipelineConfig};
use crate::dashboard::{DashboardState, QueueStatus};
use crate::event::{Clock, Event, SystemClock};
use crate::queue::{QueueProducer, bounded};
use crate::snapshot::PipelineSnapshot;
use crate::stats::{BatchReport, StreamStats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};

/// Result of processing one batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOutcome {
    pub report: BatchReport,
    pub evaluation: AlertEvaluation,
}

/// Simulated per-batch processing time
#[derive(Debug)]
struct WorkSimulator {
    min_ms: u64,
    max_ms: u64,
    rng: StdRng,
}

impl WorkSimulator {
    fn from_config(config: &BatchConfig, seed: Option<u64>) -> Option<Self> {
        if !config.simulates_work() {
            return None;
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Some(Self {
            min_ms: config.work_min.as_millis() as u64,
            max_ms: config.work_max.as_millis() as u64,
            rng,
        })
    }

    fn next_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.gen_range(self.min_ms..=self.max_ms))
    }
}

/// The single consumer of the event queue
#[derive(Debug)]
pub struct Pipeline {
    batcher: Batcher<Event>,
    stats: StreamStats,
    dashboard: DashboardState,
    work: Option<WorkSimulator>,
    snapshots: watch::Sender<PipelineSnapshot>,
    started: Instant,
}

impl Pipeline {
    /// Build a pipeline and the producer half of its queue
    #[must_use]
    pub fn new(config: &PipelineConfig) -> (QueueProducer<Event>, Self) {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a pipeline measuring latency against the given clock
    #[must_use]
    pub fn with_clock(config: &PipelineConfig, clock: Arc<dyn Clock>) -> (QueueProducer<Event>, Self) {
        let (producer, consumer) = bounded(config.queue.capacity);
        let (snapshots, _) = watch::channel(PipelineSnapshot::default());
        // Offset so the work delays are not the generator's own sequence
        let work_seed = config.generator.seed.map(|seed| seed.wrapping_add(1));

        let pipeline = Self {
            batcher: Batcher::from_config(consumer, &config.batch),
            stats: StreamStats::with_clock(&config.stats, clock),
            dashboard: DashboardState::new(&config.dashboard, &config.alert),
            work: WorkSimulator::from_config(&config.batch, work_seed),
            snapshots,
            started: Instant::now(),
        };
        (producer, pipeline)
    }

    /// Receive a snapshot after every processed batch
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.snapshots.subscribe()
    }

    /// Apply one batch, update alerting and publish a snapshot
    pub fn process_batch(&mut self, batch: &Batch<Event>) -> BatchOutcome {
        let report = self.stats.apply_batch(batch);
        let evaluation = self.dashboard.record_batch(&report);

        debug!(
            size = report.size,
            trigger = %batch.trigger(),
            n = report.count,
            p99_ms = report.latency.p99,
            "Processed batch"
        );

        self.snapshots.send_replace(self.snapshot());
        BatchOutcome { report, evaluation }
    }

    /// Consume batches until every producer is gone and the queue is drained
    ///
    /// Returns the final snapshot, which is also published with
    /// `finished` set.
    pub async fn run(mut self) -> PipelineSnapshot {
        info!(
            batch_size = self.batcher.batch_size().get(),
            max_delay_ms = self.batcher.max_delay().as_millis() as u64,
            queue_capacity = self.batcher.queue().capacity(),
            "Pipeline started"
        );

        while let Some(batch) = self.batcher.next_batch().await {
            if let Some(work) = self.work.as_mut() {
                tokio::time::sleep(work.next_delay()).await;
            }
            self.process_batch(&batch);
        }

        let mut last = self.snapshot();
        last.finished = true;
        self.snapshots.send_replace(last.clone());

        info!(
            events = last.events,
            batches = last.batches,
            alerts = last.alerts,
            "Pipeline drained after {}",
            last.format_uptime()
        );
        last
    }

    /// Capture the current state without processing anything
    #[must_use]
    pub fn snapshot(&self) -> PipelineSnapshot {
        let queue = self.batcher.queue();
        self.dashboard.snapshot(
            &self.stats,
            QueueStatus {
                depth: queue.depth(),
                capacity: queue.capacity(),
            },
            self.started.elapsed(),
        )
    }

    #[must_use]
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    #[must_use]
    pub fn dashboard(&self) -> &DashboardState {
        &self.dashboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ManualClock, UserId};
    use crate::types::BatchSize;

    fn config(batch: usize) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.queue.capacity = crate::types::QueueCapacity::new(64).unwrap();
        config.batch.size = BatchSize::new(batch).unwrap();
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_drains_and_finishes() {
        let clock = ManualClock::new(1_000.0);
        let (tx, pipeline) = Pipeline::with_clock(&config(4), Arc::new(clock.clone()));
        let mut rx = pipeline.subscribe();

        for i in 0..10 {
            tx.put(Event::new(UserId::new(i % 3), i as f64, 1_000.0)).await.unwrap();
        }
        drop(tx);

        let last = pipeline.run().await;
        assert_eq!(last.events, 10);
        assert_eq!(last.batches, 3);
        assert!(last.finished);
        assert!(rx.borrow_and_update().finished);
        assert!(last.frequency(UserId::new(0)) >= 4);
    }

    #[tokio::test]
    async fn test_process_batch_publishes_snapshot() {
        let clock = ManualClock::new(50.0);
        let (_tx, mut pipeline) = Pipeline::with_clock(&config(100), Arc::new(clock.clone()));
        let mut rx = pipeline.subscribe();

        clock.set(50.020);
        let events: Vec<Event> = (0..5).map(|i| Event::new(UserId::new(i), 1.0, 50.0)).collect();
        let (btx, brx) = bounded(crate::types::QueueCapacity::new(8).unwrap());
        for e in events {
            btx.put(e).await.unwrap();
        }
        drop(btx);
        let mut batcher = Batcher::new(brx, BatchSize::new(100).unwrap(), Duration::from_millis(10));
        let batch = batcher.next_batch().await.unwrap();

        let outcome = pipeline.process_batch(&batch);
        assert_eq!(outcome.report.size, 5);
        assert!((outcome.report.latency.p99 - 20.0).abs() < 1e-6);
        assert!(matches!(outcome.evaluation, AlertEvaluation::WarmingUp { samples: 1, .. }));

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.events, 5);
        assert_eq!(snapshot.batches, 1);
    }
}
