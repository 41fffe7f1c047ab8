//! Adaptive p99 latency alerting
//!
//! The threshold follows recent behaviour instead of being fixed: it is
//! `max(baseline, mean + K * pstdev)` over the last `H` batch p99 values,
//! recomputed from the full history on every batch. Until enough history
//! exists (`max(10, H/3)` values) no threshold is reported at all.
//!
//! The current batch's p99 joins the history before the threshold is
//! evaluated, so a spike raises its own threshold a little.

use crate::config::AlertConfig;
use crate::constants::alert::MIN_WARMUP;
use crate::moments::OnlineMoments;
use crate::window::RollingWindow;
use std::fmt;

/// A batch whose p99 exceeded the dynamic threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyAlert {
    /// The offending p99 in milliseconds
    pub p99_ms: f64,
    /// The threshold it exceeded, in milliseconds
    pub threshold_ms: f64,
    /// 1-based number of the batch that raised it
    pub at_batch: u64,
}

impl fmt::Display for LatencyAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p99={:.1}ms exceeds {:.1}ms (batch {})",
            self.p99_ms, self.threshold_ms, self.at_batch
        )
    }
}

/// Result of feeding one p99 value to the alerter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertEvaluation {
    /// Not enough history for a meaningful threshold
    WarmingUp { samples: usize, required: usize },
    /// p99 is at or below the threshold
    Normal { p99_ms: f64, threshold_ms: f64 },
    /// p99 is above the threshold
    Alert(LatencyAlert),
}

impl AlertEvaluation {
    #[must_use]
    pub const fn is_alert(&self) -> bool {
        matches!(self, Self::Alert(_))
    }

    /// The threshold in effect, if warmed up
    #[must_use]
    pub const fn threshold_ms(&self) -> Option<f64> {
        match self {
            Self::WarmingUp { .. } => None,
            Self::Normal { threshold_ms, .. } => Some(*threshold_ms),
            Self::Alert(alert) => Some(alert.threshold_ms),
        }
    }
}

/// Self-adjusting p99 threshold over a bounded history
#[derive(Debug, Clone)]
pub struct AdaptiveAlerter {
    history: RollingWindow<f64>,
    multiplier: f64,
    min_baseline_ms: f64,
    observed: u64,
}

impl AdaptiveAlerter {
    #[must_use]
    pub fn new(config: &AlertConfig) -> Self {
        Self {
            history: RollingWindow::new(config.history_size.as_nonzero()),
            multiplier: config.multiplier.get(),
            min_baseline_ms: config.min_baseline_ms,
            observed: 0,
        }
    }

    /// History length required before a threshold exists
    #[must_use]
    pub fn warmup_len(&self) -> usize {
        MIN_WARMUP.max(self.history.capacity() / 3)
    }

    /// Append a p99 value (milliseconds) to the history
    pub fn record_p99(&mut self, p99_ms: f64) {
        self.history.push(p99_ms);
        self.observed += 1;
    }

    /// Current threshold, or `None` while warming up
    ///
    /// With a history shorter than `max(10, H/3)` this is always `None`,
    /// never zero. A history capacity below 10 therefore never warms up.
    #[must_use]
    pub fn threshold(&self) -> Option<f64> {
        if self.history.len() < self.warmup_len() {
            return None;
        }
        let moments = OnlineMoments::from_values(self.history.iter().copied());
        let dynamic = moments.mean() + self.multiplier * moments.population_std_dev();
        Some(self.min_baseline_ms.max(dynamic))
    }

    /// Record a batch p99 and evaluate it against the updated threshold
    pub fn observe(&mut self, p99_ms: f64) -> AlertEvaluation {
        self.record_p99(p99_ms);
        match self.threshold() {
            None => AlertEvaluation::WarmingUp {
                samples: self.history.len(),
                required: self.warmup_len(),
            },
            Some(threshold_ms) if p99_ms > threshold_ms => AlertEvaluation::Alert(LatencyAlert {
                p99_ms,
                threshold_ms,
                at_batch: self.observed,
            }),
            Some(threshold_ms) => AlertEvaluation::Normal {
                p99_ms,
                threshold_ms,
            },
        }
    }

    #[must_use]
    pub fn history(&self) -> &RollingWindow<f64> {
        &self.history
    }

    /// Number of p99 values observed over the alerter's lifetime
    #[must_use]
    pub fn observed(&self) -> u64 {
        self.observed
    }
}
