//! Configuration validation
//!
//! Capacities and ranges are enforced by the types themselves (non-zero
//! newtypes, validated precision and multiplier). This checks the
//! remaining cross-field constraints and warns about legal but suspicious
//! values.

use anyhow::{Result, bail};

use super::types::PipelineConfig;
use crate::constants::{alert::MIN_WARMUP, stats::MIN_RECOMMENDED_WINDOW};

impl PipelineConfig {
    /// Validate configuration for correctness
    ///
    /// # Errors
    /// Returns an error when:
    /// - the simulated work range is inverted
    /// - the alert baseline is negative or not finite
    /// - the generator parameters cannot produce events
    pub fn validate(&self) -> Result<()> {
        if self.batch.work_min > self.batch.work_max {
            bail!(
                "batch.work_min_ms ({}) must not exceed batch.work_max_ms ({})",
                self.batch.work_min.as_millis(),
                self.batch.work_max.as_millis()
            );
        }

        if !self.alert.min_baseline_ms.is_finite() || self.alert.min_baseline_ms < 0.0 {
            bail!(
                "alert.min_baseline_ms must be a finite, non-negative number (got {})",
                self.alert.min_baseline_ms
            );
        }

        let generator = &self.generator;
        if generator.max_user_id == 0 {
            bail!("generator.max_user_id must be at least 1");
        }
        if !generator.value_mean.is_finite() {
            bail!("generator.value_mean must be finite");
        }
        if !generator.value_std_dev.is_finite() || generator.value_std_dev < 0.0 {
            bail!(
                "generator.value_std_dev must be a finite, non-negative number (got {})",
                generator.value_std_dev
            );
        }

        self.warn_suspicious();
        Ok(())
    }

    fn warn_suspicious(&self) {
        let history = self.alert.history_size.get();
        if history < MIN_WARMUP {
            tracing::warn!(
                "alert.history_size is {} (< {}). The alerter needs {} p99 values \
                 to warm up and will never report a threshold.",
                history,
                MIN_WARMUP,
                MIN_WARMUP
            );
        }

        let window = self.stats.window_size.get();
        if window < MIN_RECOMMENDED_WINDOW {
            tracing::warn!(
                "stats.window_size is {} (< {}). p99 collapses onto the largest sample \
                 with this few latencies.",
                window,
                MIN_RECOMMENDED_WINDOW
            );
        }

        if self.batch.max_delay.is_zero() {
            tracing::warn!("batch.max_delay_ms is 0; every event will be flushed on its own");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_work_range_rejected() {
        let mut config = PipelineConfig::default();
        config.batch.work_min = Duration::from_millis(50);
        config.batch.work_max = Duration::from_millis(10);
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("work_min_ms"));
    }

    #[test]
    fn test_bad_baseline_rejected() {
        let mut config = PipelineConfig::default();
        config.alert.min_baseline_ms = -1.0;
        assert!(config.validate().is_err());
        config.alert.min_baseline_ms = f64::NAN;
        assert!(config.validate().is_err());
        config.alert.min_baseline_ms = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generator_checks() {
        let mut config = PipelineConfig::default();
        config.generator.max_user_id = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.generator.value_std_dev = -2.0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.generator.value_mean = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_small_history_is_legal() {
        let mut config = PipelineConfig::default();
        config.alert.history_size = crate::types::HistorySize::new(5).unwrap();
        assert!(config.validate().is_ok());
    }
}
