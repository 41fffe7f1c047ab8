//! Constants used throughout the pipeline
//!
//! This module centralizes the default tuning values so the config
//! defaults, the CLI and the tests agree on a single source.

/// Bounded queue constants
pub mod queue {
    /// Default number of events the queue holds before producers suspend
    pub const CAPACITY: usize = 10;
}

/// Micro-batching constants
pub mod batch {
    /// Default number of events that triggers a size flush
    pub const SIZE: usize = 100;

    /// Default maximum age of a batch window (100ms)
    pub const MAX_DELAY_MS: u64 = 100;

    /// Simulated per-batch work used by the demo configuration (20-60ms)
    pub const DEMO_WORK_MIN_MS: u64 = 20;
    pub const DEMO_WORK_MAX_MS: u64 = 60;
}

/// Statistics engine constants
pub mod stats {
    /// Default capacity of the value and latency windows
    pub const WINDOW_SIZE: usize = 1000;

    /// Default cardinality precision (2^8 = 256 registers)
    pub const CARDINALITY_PRECISION: u8 = 8;

    /// Smallest and largest supported cardinality precision
    pub const MIN_PRECISION: u8 = 4;
    pub const MAX_PRECISION: u8 = 16;

    /// Default frequency sketch dimensions
    pub const FREQUENCY_WIDTH: usize = 1000;
    pub const FREQUENCY_DEPTH: usize = 5;

    /// Window sizes below this make p99 collapse onto the maximum sample
    pub const MIN_RECOMMENDED_WINDOW: usize = 100;
}

/// Adaptive alerting constants
pub mod alert {
    /// Number of recent p99 values kept for the dynamic threshold
    pub const HISTORY_SIZE: usize = 30;

    /// Standard deviations above the mean that trigger an alert
    pub const STDDEV_MULTIPLIER: f64 = 2.0;

    /// Floor for the dynamic threshold in milliseconds
    pub const MIN_BASELINE_MS: f64 = 50.0;

    /// Minimum history length before a threshold is reported
    pub const MIN_WARMUP: usize = 10;
}

/// Dashboard constants
pub mod dashboard {
    /// Number of recent batch lines kept for rendering
    pub const HISTORY_LINES: usize = 5;

    /// Dashboard refresh interval (4 times per second)
    pub const REFRESH_INTERVAL_MS: u64 = 250;
}

/// Synthetic generator constants
pub mod generator {
    /// User ids are drawn uniformly from `1..=MAX_USER_ID`
    pub const MAX_USER_ID: u64 = 5000;

    /// Parameters of the normally distributed event value
    pub const VALUE_MEAN: f64 = 50.0;
    pub const VALUE_STD_DEV: f64 = 10.0;

    /// Upper bound of the uniform inter-arrival sleep (about 100 events/s)
    pub const MAX_INTERARRIVAL_MS: u64 = 20;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warmup_floor_fits_default_history() {
        // The alerter can only warm up if the history can hold the floor
        assert!(alert::HISTORY_SIZE >= alert::MIN_WARMUP);
        assert!(alert::HISTORY_SIZE / 3 <= alert::HISTORY_SIZE);
    }

    #[test]
    fn test_default_precision_in_range() {
        assert!(stats::CARDINALITY_PRECISION >= stats::MIN_PRECISION);
        assert!(stats::CARDINALITY_PRECISION <= stats::MAX_PRECISION);
    }

    #[test]
    fn test_demo_work_range_ordered() {
        assert!(batch::DEMO_WORK_MIN_MS <= batch::DEMO_WORK_MAX_MS);
    }
}
