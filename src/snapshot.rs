//! Pipeline snapshot published to observers
//!
//! An immutable copy of everything the dashboard renders, taken once per
//! batch by the consumer task and handed out through a `watch` channel.
//! Observers never touch engine state.

use crate::alert::LatencyAlert;
use crate::event::UserId;
use crate::percentile::Percentiles;
use crate::sketch::FrequencySketch;
use std::sync::Arc;
use std::time::Duration;

/// Snapshot of the pipeline after the most recent batch
///
/// Percentiles and thresholds are in milliseconds. Frequency lookups go to
/// a shared, copy-on-write handle of the engine's sketch as of the batch.
#[derive(Debug, Clone, Default)]
pub struct PipelineSnapshot {
    /// Exact number of events consumed
    pub events: u64,
    /// Estimated number of distinct users
    pub unique_users: f64,
    /// Mean of every value consumed
    pub mean: f64,
    /// Sample variance of every value consumed
    pub variance: f64,
    /// Latency percentiles over the window
    pub latency: Percentiles,
    pub queue_depth: usize,
    pub queue_capacity: usize,
    /// Samples in the value window
    pub window_len: usize,
    pub window_capacity: usize,
    /// Current alert threshold, `None` while warming up
    pub threshold_ms: Option<f64>,
    /// Whether the most recent batch raised an alert
    pub alerting: bool,
    pub last_alert: Option<LatencyAlert>,
    pub batches: u64,
    pub alerts: u64,
    /// Recent batch lines, oldest first
    pub recent_lines: Vec<String>,
    pub uptime: Duration,
    /// Set on the final snapshot after the queue drained
    pub finished: bool,
    pub(crate) frequency: Option<Arc<FrequencySketch>>,
}

impl PipelineSnapshot {
    /// Attach the frequency sketch used for per-user lookups
    #[must_use]
    pub fn with_frequency(mut self, sketch: Arc<FrequencySketch>) -> Self {
        self.frequency = Some(sketch);
        self
    }

    /// Estimated number of events seen for a user (never an undercount)
    ///
    /// Zero before the first batch.
    #[must_use]
    pub fn frequency(&self, user: UserId) -> u64 {
        self.frequency
            .as_deref()
            .map_or(0, |sketch| sketch.estimate(user.key().as_bytes()))
    }

    /// Check if the most recent batch raised an alert
    #[must_use]
    #[inline]
    pub fn is_alerting(&self) -> bool {
        self.alerting
    }

    /// Fraction of the value window in use, 0.0 to 1.0
    #[must_use]
    pub fn window_fill(&self) -> f64 {
        if self.window_capacity == 0 {
            0.0
        } else {
            self.window_len as f64 / self.window_capacity as f64
        }
    }

    /// Fraction of the queue in use, 0.0 to 1.0
    #[must_use]
    pub fn queue_fill(&self) -> f64 {
        if self.queue_capacity == 0 {
            0.0
        } else {
            self.queue_depth as f64 / self.queue_capacity as f64
        }
    }

    /// Average events consumed per second of uptime
    #[must_use]
    pub fn events_per_sec(&self) -> f64 {
        let secs = self.uptime.as_secs_f64();
        if secs > 0.0 {
            self.events as f64 / secs
        } else {
            0.0
        }
    }

    /// Format uptime as a human-readable string
    #[must_use]
    pub fn format_uptime(&self) -> String {
        let secs = self.uptime.as_secs();
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
