//! Dashboard state: batch history, alerting and snapshots
//!
//! Mutated once per processed batch by the consumer task. Alerts are
//! reported here (logged and stored), never raised as errors.

use crate::alert::{AdaptiveAlerter, AlertEvaluation, LatencyAlert};
use crate::config::{AlertConfig, DashboardConfig};
use crate::formatting::format_batch_line;
use crate::snapshot::PipelineSnapshot;
use crate::stats::{BatchReport, StreamStats};
use crate::window::RollingWindow;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, warn};

/// Queue occupancy at snapshot time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStatus {
    pub depth: usize,
    pub capacity: usize,
}

/// Per-run dashboard and alert state
#[derive(Debug, Clone)]
pub struct DashboardState {
    lines: RollingWindow<String>,
    alerter: AdaptiveAlerter,
    batches: u64,
    alerts: u64,
    last_alert: Option<LatencyAlert>,
    last_evaluation: Option<AlertEvaluation>,
}

impl DashboardState {
    #[must_use]
    pub fn new(dashboard: &DashboardConfig, alert: &AlertConfig) -> Self {
        Self {
            lines: RollingWindow::new(dashboard.history_lines.as_nonzero()),
            alerter: AdaptiveAlerter::new(alert),
            batches: 0,
            alerts: 0,
            last_alert: None,
            last_evaluation: None,
        }
    }

    /// Record a processed batch stamped with the local wall-clock time
    pub fn record_batch(&mut self, report: &BatchReport) -> AlertEvaluation {
        self.record_batch_at(&Local::now(), report)
    }

    /// Record a processed batch stamped with the given time
    ///
    /// Appends the render line, feeds the batch p99 to the alerter and
    /// logs an alert at `warn` when the threshold is exceeded.
    pub fn record_batch_at<Tz>(&mut self, at: &DateTime<Tz>, report: &BatchReport) -> AlertEvaluation
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        self.batches += 1;
        self.lines.push(format_batch_line(at, report));

        let evaluation = self.alerter.observe(report.latency.p99);
        match evaluation {
            AlertEvaluation::Alert(alert) => {
                self.alerts += 1;
                self.last_alert = Some(alert);
                warn!(
                    p99_ms = alert.p99_ms,
                    threshold_ms = alert.threshold_ms,
                    batch = alert.at_batch,
                    "High latency p99={:.2}ms exceeds dynamic threshold {:.2}ms",
                    alert.p99_ms,
                    alert.threshold_ms
                );
            }
            AlertEvaluation::WarmingUp { samples, required } => {
                debug!("Alerter warming up ({}/{} p99 values)", samples, required);
            }
            AlertEvaluation::Normal { .. } => {}
        }
        self.last_evaluation = Some(evaluation);
        evaluation
    }

    /// Capture an immutable view of the engine and dashboard state
    #[must_use]
    pub fn snapshot(&self, stats: &StreamStats, queue: QueueStatus, uptime: Duration) -> PipelineSnapshot {
        let values = stats.value_window();
        PipelineSnapshot {
            events: stats.count(),
            unique_users: stats.unique_estimate(),
            mean: stats.mean(),
            variance: stats.variance(),
            latency: stats.latency_percentiles(),
            queue_depth: queue.depth,
            queue_capacity: queue.capacity,
            window_len: values.len(),
            window_capacity: values.capacity(),
            threshold_ms: self.alerter.threshold(),
            alerting: self.last_evaluation.is_some_and(|e| e.is_alert()),
            last_alert: self.last_alert,
            batches: self.batches,
            alerts: self.alerts,
            recent_lines: self.lines.to_vec(),
            uptime,
            finished: false,
            frequency: None,
        }
        .with_frequency(stats.frequency_sketch())
    }

    /// Recent render lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    #[must_use]
    pub fn alerter(&self) -> &AdaptiveAlerter {
        &self.alerter
    }

    #[must_use]
    pub fn batches(&self) -> u64 {
        self.batches
    }

    #[must_use]
    pub fn alerts(&self) -> u64 {
        self.alerts
    }

    #[must_use]
    pub fn last_alert(&self) -> Option<&LatencyAlert> {
        self.last_alert.as_ref()
    }
}
