//! Running mean and variance (Welford's method)
//!
//! Single pass, constant memory, and free of the cancellation error of the
//! naive sum-of-squares formula. Covers the whole stream, not a window.

/// Online accumulator of count, mean and sum of squared deviations
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OnlineMoments {
    count: u64,
    mean: f64,
    m2: f64,
}

impl OnlineMoments {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Fold one observation into the accumulator
    #[inline]
    pub fn update(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Build an accumulator from a sequence of observations
    #[must_use]
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let mut moments = Self::new();
        for value in values {
            moments.update(value);
        }
        moments
    }

    #[must_use]
    #[inline]
    pub const fn count(&self) -> u64 {
        self.count
    }

    #[must_use]
    #[inline]
    pub const fn mean(&self) -> f64 {
        self.mean
    }

    /// Sum of squared deviations from the mean
    #[must_use]
    #[inline]
    pub const fn m2(&self) -> f64 {
        self.m2
    }

    /// Sample variance, `M2 / (n - 1)`; zero until two observations exist
    #[must_use]
    pub fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / (self.count - 1) as f64
        } else {
            0.0
        }
    }

    /// Population variance, `M2 / n`; zero when empty
    #[must_use]
    pub fn population_variance(&self) -> f64 {
        if self.count > 0 {
            self.m2 / self.count as f64
        } else {
            0.0
        }
    }

    /// Sample standard deviation
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Population standard deviation
    #[must_use]
    pub fn population_std_dev(&self) -> f64 {
        self.population_variance().sqrt()
    }
}
