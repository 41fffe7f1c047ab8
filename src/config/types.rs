//! Configuration type definitions
//!
//! One struct per TOML section. Every field has a default, so an empty file
//! (or no file) yields a runnable pipeline.

use crate::types::{
    AlertMultiplier, BatchSize, HistorySize, LineHistorySize, Precision, QueueCapacity,
    SketchDepth, SketchWidth, WindowSize, duration_ms_serde,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PipelineConfig {
    /// Bounded queue between producer and consumer
    #[serde(default)]
    pub queue: QueueConfig,
    /// Micro-batching triggers and simulated per-batch work
    #[serde(default)]
    pub batch: BatchConfig,
    /// Windows and sketch dimensions of the statistics engine
    #[serde(default)]
    pub stats: StatsConfig,
    /// Adaptive p99 alerting
    #[serde(default)]
    pub alert: AlertConfig,
    /// Dashboard history and refresh rate
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// Synthetic event source
    #[serde(default)]
    pub generator: GeneratorConfig,
}

/// Bounded queue settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct QueueConfig {
    /// Events held before `put` suspends (default: 10)
    pub capacity: QueueCapacity,
}

/// Batcher settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchConfig {
    /// Buffered events that trigger a size flush (default: 100)
    #[serde(default)]
    pub size: BatchSize,
    /// Maximum age of a non-empty batch (default: 100ms)
    #[serde(
        rename = "max_delay_ms",
        with = "duration_ms_serde",
        default = "super::defaults::max_delay"
    )]
    pub max_delay: Duration,
    /// Lower bound of the simulated per-batch processing time
    #[serde(
        rename = "work_min_ms",
        with = "duration_ms_serde",
        default = "super::defaults::work_min"
    )]
    pub work_min: Duration,
    /// Upper bound of the simulated per-batch processing time (0 disables it)
    #[serde(
        rename = "work_max_ms",
        with = "duration_ms_serde",
        default = "super::defaults::work_max"
    )]
    pub work_max: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            size: BatchSize::default(),
            max_delay: super::defaults::max_delay(),
            work_min: super::defaults::work_min(),
            work_max: super::defaults::work_max(),
        }
    }
}

impl BatchConfig {
    /// Check if the consumer sleeps before applying each batch
    #[must_use]
    pub fn simulates_work(&self) -> bool {
        !self.work_max.is_zero()
    }
}

/// Statistics engine settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct StatsConfig {
    /// Capacity of the value and latency windows (default: 1000)
    pub window_size: WindowSize,
    /// Cardinality sketch precision, 4..=16 (default: 8)
    pub precision: Precision,
    /// Counters per frequency sketch row (default: 1000)
    pub frequency_width: SketchWidth,
    /// Frequency sketch rows (default: 5)
    pub frequency_depth: SketchDepth,
}

/// Alerting settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AlertConfig {
    /// Number of recent p99 values kept (default: 30)
    #[serde(default)]
    pub history_size: HistorySize,
    /// Standard deviations above the mean that count as an alert (default: 2.0)
    #[serde(default)]
    pub multiplier: AlertMultiplier,
    /// Floor of the dynamic threshold in milliseconds (default: 50.0)
    #[serde(default = "super::defaults::min_baseline_ms")]
    pub min_baseline_ms: f64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            history_size: HistorySize::default(),
            multiplier: AlertMultiplier::default(),
            min_baseline_ms: super::defaults::min_baseline_ms(),
        }
    }
}

/// Dashboard settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Recent batch lines kept for rendering (default: 5)
    #[serde(default = "super::defaults::history_lines")]
    pub history_lines: LineHistorySize,
    /// Redraw interval (default: 250ms)
    #[serde(
        rename = "refresh_interval_ms",
        with = "duration_ms_serde",
        default = "super::defaults::refresh_interval"
    )]
    pub refresh_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            history_lines: super::defaults::history_lines(),
            refresh_interval: super::defaults::refresh_interval(),
        }
    }
}

/// Synthetic generator settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    /// User ids are drawn uniformly from `1..=max_user_id` (default: 5000)
    #[serde(default = "super::defaults::max_user_id")]
    pub max_user_id: u64,
    /// Mean of the normally distributed event value (default: 50.0)
    #[serde(default = "super::defaults::value_mean")]
    pub value_mean: f64,
    /// Standard deviation of the event value (default: 10.0)
    #[serde(default = "super::defaults::value_std_dev")]
    pub value_std_dev: f64,
    /// Upper bound of the uniform pause between events (default: 20ms)
    #[serde(
        rename = "max_interarrival_ms",
        with = "duration_ms_serde",
        default = "super::defaults::max_interarrival"
    )]
    pub max_interarrival: Duration,
    /// Fixed RNG seed for reproducible runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_user_id: super::defaults::max_user_id(),
            value_mean: super::defaults::value_mean(),
            value_std_dev: super::defaults::value_std_dev(),
            max_interarrival: super::defaults::max_interarrival(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_is_default() {
        let config: PipelineConfig = toml::from_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.queue.capacity.get(), 10);
        assert_eq!(config.batch.size.get(), 100);
        assert_eq!(config.batch.max_delay, Duration::from_millis(100));
        assert!(!config.batch.simulates_work());
        assert_eq!(config.stats.window_size.get(), 1000);
        assert_eq!(config.alert.history_size.get(), 30);
        assert_eq!(config.dashboard.history_lines.get(), 5);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: PipelineConfig = toml::from_str(
            r#"
            [batch]
            size = 25
            work_max_ms = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.batch.size.get(), 25);
        assert_eq!(config.batch.max_delay, Duration::from_millis(100));
        assert_eq!(config.batch.work_max, Duration::from_millis(40));
        assert!(config.batch.simulates_work());
        assert_eq!(config.stats, StatsConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config: PipelineConfig = toml::from_str(
            r#"
            [queue]
            capacity = 2

            [batch]
            size = 10
            max_delay_ms = 50

            [stats]
            window_size = 200
            precision = 12
            frequency_width = 2048
            frequency_depth = 4

            [alert]
            history_size = 60
            multiplier = 3.0
            min_baseline_ms = 25.0

            [dashboard]
            history_lines = 8
            refresh_interval_ms = 500

            [generator]
            max_user_id = 100
            value_mean = 0.0
            value_std_dev = 1.0
            max_interarrival_ms = 5
            seed = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.queue.capacity.get(), 2);
        assert_eq!(config.batch.max_delay, Duration::from_millis(50));
        assert_eq!(config.stats.precision.get(), 12);
        assert_eq!(config.stats.frequency_depth.get(), 4);
        assert_eq!(config.alert.multiplier.get(), 3.0);
        assert_eq!(config.alert.min_baseline_ms, 25.0);
        assert_eq!(config.dashboard.refresh_interval, Duration::from_millis(500));
        assert_eq!(config.generator.seed, Some(7));
    }

    #[test]
    fn test_invalid_values_rejected_at_parse() {
        assert!(toml::from_str::<PipelineConfig>("[queue]\ncapacity = 0").is_err());
        assert!(toml::from_str::<PipelineConfig>("[stats]\nprecision = 20").is_err());
        assert!(toml::from_str::<PipelineConfig>("[alert]\nmultiplier = -1.0").is_err());
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let mut config = PipelineConfig::default();
        config.generator.seed = Some(42);
        config.batch.work_max = Duration::from_millis(60);
        let text = toml::to_string(&config).unwrap();
        let parsed: PipelineConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_line_history_is_its_own_type() {
        let err = toml::from_str::<PipelineConfig>("[dashboard]\nhistory_lines = 0\n")
            .unwrap_err();
        assert!(err.to_string().contains("LineHistorySize cannot be 0"));

        let config: PipelineConfig =
            toml::from_str("[alert]\nhistory_size = 12\n").unwrap();
        assert_eq!(config.alert.history_size.get(), 12);
        assert_eq!(config.dashboard.history_lines, LineHistorySize::DEFAULT);
    }
}
