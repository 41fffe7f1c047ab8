//! Range-validated tuning parameters

use crate::constants;
use nutype::nutype;

/// Cardinality sketch precision `p` (the sketch keeps `2^p` registers)
///
/// Valid range is 4..=16, giving between 16 and 65536 registers.
#[nutype(
    validate(greater_or_equal = 4, less_or_equal = 16),
    derive(
        Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TryFrom, Into, Serialize,
        Deserialize,
    )
)]
pub struct Precision(u8);

impl Default for Precision {
    fn default() -> Self {
        Self::try_new(constants::stats::CARDINALITY_PRECISION).expect("default precision is valid")
    }
}

impl Precision {
    /// Get the precision value
    #[inline]
    pub fn get(&self) -> u8 {
        self.into_inner()
    }

    /// Number of registers selected by this precision
    #[inline]
    pub fn registers(&self) -> usize {
        1usize << self.into_inner()
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p={}", self.into_inner())
    }
}

/// Number of standard deviations above the mean p99 that raise an alert
#[nutype(
    validate(finite, greater_or_equal = 0.0),
    derive(Debug, Clone, Copy, PartialEq, PartialOrd, TryFrom, Into, Serialize, Deserialize)
)]
pub struct AlertMultiplier(f64);

impl Default for AlertMultiplier {
    fn default() -> Self {
        Self::try_new(constants::alert::STDDEV_MULTIPLIER).expect("default multiplier is valid")
    }
}

impl AlertMultiplier {
    /// Get the multiplier value
    #[inline]
    pub fn get(&self) -> f64 {
        self.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_bounds() {
        assert!(Precision::try_new(3).is_err());
        assert!(Precision::try_new(4).is_ok());
        assert!(Precision::try_new(16).is_ok());
        assert!(Precision::try_new(17).is_err());
    }

    #[test]
    fn test_precision_registers() {
        assert_eq!(Precision::default().get(), 8);
        assert_eq!(Precision::default().registers(), 256);
        assert_eq!(Precision::try_new(4).unwrap().registers(), 16);
    }

    #[test]
    fn test_precision_display() {
        assert_eq!(Precision::try_new(12).unwrap().to_string(), "p=12");
    }

    #[test]
    fn test_precision_deserialize_validates() {
        #[derive(serde::Deserialize)]
        struct Wrapper {
            p: Precision,
        }

        let ok: Wrapper = toml::from_str("p = 10").unwrap();
        assert_eq!(ok.p.get(), 10);
        assert!(toml::from_str::<Wrapper>("p = 20").is_err());
    }

    #[test]
    fn test_multiplier_validation() {
        assert_eq!(AlertMultiplier::default().get(), 2.0);
        assert!(AlertMultiplier::try_new(0.0).is_ok());
        assert!(AlertMultiplier::try_new(-1.0).is_err());
        assert!(AlertMultiplier::try_new(f64::NAN).is_err());
        assert!(AlertMultiplier::try_new(f64::INFINITY).is_err());
    }
}
