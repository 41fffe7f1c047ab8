//! Percentiles over sorted samples with linear interpolation
//!
//! For a sorted slice of `m` samples the k-th percentile sits at the
//! fractional index `k/100 * (m - 1)`; the result interpolates between the
//! two neighbouring samples.

/// Interpolated percentile of an ascending slice
///
/// `q` is in percent and clamped to `[0, 100]`. An empty slice yields 0.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted {
        [] => 0.0,
        [only] => *only,
        _ => {
            let rank = q.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let fraction = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
        }
    }
}

/// The three latency percentiles reported per batch
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Percentiles {
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

impl Percentiles {
    /// All-zero percentiles, reported while no samples exist
    pub const ZERO: Self = Self {
        p50: 0.0,
        p95: 0.0,
        p99: 0.0,
    };

    /// Compute p50/p95/p99 from an ascending slice
    #[must_use]
    pub fn from_sorted(sorted: &[f64]) -> Self {
        Self {
            p50: percentile_sorted(sorted, 50.0),
            p95: percentile_sorted(sorted, 95.0),
            p99: percentile_sorted(sorted, 99.0),
        }
    }

    /// Multiply every percentile by `factor` (seconds to milliseconds)
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            p50: self.p50 * factor,
            p95: self.p95 * factor,
            p99: self.p99 * factor,
        }
    }
}
