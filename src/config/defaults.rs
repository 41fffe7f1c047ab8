//! Default values for configuration fields
//!
//! This module centralizes the default value functions used in serde
//! deserialization, all derived from [`crate::constants`].

use crate::constants;
use crate::types::LineHistorySize;
use std::time::Duration;

/// Default maximum batch age (100ms)
#[inline]
pub fn max_delay() -> Duration {
    Duration::from_millis(constants::batch::MAX_DELAY_MS)
}

/// Default simulated work lower bound (none)
#[inline]
pub fn work_min() -> Duration {
    Duration::ZERO
}

/// Default simulated work upper bound (none, so no sleep per batch)
#[inline]
pub fn work_max() -> Duration {
    Duration::ZERO
}

/// Default alert threshold floor in milliseconds
#[inline]
pub fn min_baseline_ms() -> f64 {
    constants::alert::MIN_BASELINE_MS
}

/// Default number of render lines kept by the dashboard
#[inline]
pub fn history_lines() -> LineHistorySize {
    LineHistorySize::DEFAULT
}

/// Default dashboard refresh interval
#[inline]
pub fn refresh_interval() -> Duration {
    Duration::from_millis(constants::dashboard::REFRESH_INTERVAL_MS)
}

/// Default largest generated user id
#[inline]
pub fn max_user_id() -> u64 {
    constants::generator::MAX_USER_ID
}

/// Default mean of generated values
#[inline]
pub fn value_mean() -> f64 {
    constants::generator::VALUE_MEAN
}

/// Default standard deviation of generated values
#[inline]
pub fn value_std_dev() -> f64 {
    constants::generator::VALUE_STD_DEV
}

/// Default upper bound of the generator's inter-arrival pause
#[inline]
pub fn max_interarrival() -> Duration {
    Duration::from_millis(constants::generator::MAX_INTERARRIVAL_MS)
}
