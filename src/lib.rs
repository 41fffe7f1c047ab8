//! Streaming analytics over a bounded event queue
//!
//! Events enter a bounded queue whose `put` suspends while full. A single
//! consumer groups them into batches (by size, deadline or idle timeout),
//! folds each batch into streaming statistics (exact count, HyperLogLog
//! cardinality, Count-Min frequencies, rolling value and latency windows,
//! Welford moments), computes latency percentiles and feeds the batch p99
//! to an adaptive alerter. After every batch a [`PipelineSnapshot`] is
//! published for the dashboard.
//!
//! ```no_run
//! use stream_pulse::{EventGenerator, Pipeline, PipelineConfig};
//! use tokio::sync::watch;
//!
//! # async fn run() {
//! let config = PipelineConfig::default();
//! let (producer, pipeline) = Pipeline::new(&config);
//! let (_stop_tx, stop_rx) = watch::channel(false);
//!
//! tokio::spawn(EventGenerator::new(&config.generator).run(producer, stop_rx));
//! let last = pipeline.run().await;
//! println!("{} events, ~{:.0} users", last.events, last.unique_users);
//! # }
//! ```

pub mod alert;
pub mod args;
pub mod batcher;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod event;
pub mod formatting;
pub mod generator;
pub mod logging;
pub mod moments;
pub mod percentile;
pub mod pipeline;
pub mod queue;
pub mod runtime;
pub mod sketch;
pub mod snapshot;
pub mod stats;
pub mod tui;
pub mod types;
pub mod window;

#[cfg(test)]
mod test_macros;

pub use alert::{AdaptiveAlerter, AlertEvaluation, LatencyAlert};
pub use batcher::{Batch, Batcher, FlushTrigger};
pub use config::{
    AlertConfig, BatchConfig, ConfigSource, DashboardConfig, GeneratorConfig, PipelineConfig,
    QueueConfig, StatsConfig, load_config, load_config_with_fallback,
};
pub use dashboard::{DashboardState, QueueStatus};
pub use event::{Clock, Event, ManualClock, SystemClock, UserId};
pub use generator::EventGenerator;
pub use moments::OnlineMoments;
pub use percentile::{Percentiles, percentile_sorted};
pub use pipeline::{BatchOutcome, Pipeline};
pub use queue::{Dequeued, QueueConsumer, QueueError, QueueProducer, bounded};
pub use sketch::{CardinalitySketch, FrequencySketch};
pub use snapshot::PipelineSnapshot;
pub use stats::{BatchReport, StreamStats};
pub use window::RollingWindow;
