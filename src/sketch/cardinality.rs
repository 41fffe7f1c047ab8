//! HyperLogLog distinct-count estimator

use super::hash_key;
use crate::types::Precision;

const SEED: u64 = 0x5eed_c4a2_d1a1_17e5;

/// 2^32, the size of the hash space
const HASH_SPACE: f64 = 4_294_967_296.0;

/// HyperLogLog sketch over 32-bit hashes
///
/// The low `p` bits of a key's hash select a register; the register keeps
/// the largest rank (1-based position of the leftmost set bit) seen in the
/// remaining `32 - p` bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardinalitySketch {
    precision: Precision,
    registers: Box<[u8]>,
}

impl CardinalitySketch {
    #[must_use]
    pub fn new(precision: Precision) -> Self {
        Self {
            precision,
            registers: vec![0u8; precision.registers()].into_boxed_slice(),
        }
    }

    /// Observe a key
    #[inline]
    pub fn add(&mut self, key: &[u8]) {
        let p = u32::from(self.precision.get());
        let hash = hash_key(key, SEED) as u32;
        let index = (hash & ((1u32 << p) - 1)) as usize;
        // The top p bits of w are zero, so they are subtracted back out.
        // All-zero w yields 32 - p + 1.
        let w = hash >> p;
        let rank = (w.leading_zeros() - p + 1) as u8;
        let register = &mut self.registers[index];
        if rank > *register {
            *register = rank;
        }
    }

    /// Estimated number of distinct keys observed
    #[must_use]
    pub fn estimate(&self) -> f64 {
        let m = self.registers.len() as f64;
        let mut sum = 0.0_f64;
        let mut zeros = 0usize;
        for &register in self.registers.iter() {
            sum += f64::exp2(-f64::from(register));
            if register == 0 {
                zeros += 1;
            }
        }

        let raw = alpha(self.registers.len()) * m * m / sum;

        if raw <= 2.5 * m && zeros > 0 {
            m * (m / zeros as f64).ln()
        } else if raw > HASH_SPACE / 30.0 {
            // Saturated registers at low precision push raw past 2^32
            let ratio = (raw / HASH_SPACE).min(1.0 - f64::EPSILON);
            -HASH_SPACE * (1.0 - ratio).ln()
        } else {
            raw
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|&r| r == 0)
    }

    #[must_use]
    #[inline]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Number of registers, `2^p`
    #[must_use]
    #[inline]
    pub fn registers(&self) -> usize {
        self.registers.len()
    }

    /// Expected relative standard error, `1.04 / sqrt(m)`
    #[must_use]
    pub fn relative_error(&self) -> f64 {
        1.04 / (self.registers.len() as f64).sqrt()
    }
}

impl Default for CardinalitySketch {
    fn default() -> Self {
        Self::new(Precision::default())
    }
}

fn alpha(m: usize) -> f64 {
    match m {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / m as f64),
    }
}
