//! Count-Min per-key frequency estimator

use super::hash_key;
use crate::types::{SketchDepth, SketchWidth};

const SEED_BASE: u64 = 0x9e37_79b9_7f4a_7c15;

/// Count-Min sketch of `depth` rows by `width` saturating counters
///
/// Estimates never undercount: `estimate(k) >= true_count(k)`. The
/// overcount is at most `e / width * total()` with probability
/// `1 - e^-depth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencySketch {
    width: usize,
    depth: usize,
    /// Row-major `depth x width` matrix
    counters: Box<[u64]>,
    total: u64,
}

impl FrequencySketch {
    #[must_use]
    pub fn new(width: SketchWidth, depth: SketchDepth) -> Self {
        let (width, depth) = (width.get(), depth.get());
        Self {
            width,
            depth,
            counters: vec![0u64; width * depth].into_boxed_slice(),
            total: 0,
        }
    }

    #[inline]
    fn slot(&self, row: usize, key: &[u8]) -> usize {
        let column = hash_key(key, SEED_BASE.wrapping_add(row as u64)) % self.width as u64;
        row * self.width + column as usize
    }

    /// Record one occurrence of a key
    pub fn add(&mut self, key: &[u8]) {
        for row in 0..self.depth {
            let slot = self.slot(row, key);
            self.counters[slot] = self.counters[slot].saturating_add(1);
        }
        self.total = self.total.saturating_add(1);
    }

    /// Upper-bound estimate of how often a key was added
    #[must_use]
    pub fn estimate(&self, key: &[u8]) -> u64 {
        (0..self.depth)
            .map(|row| self.counters[self.slot(row, key)])
            .min()
            .unwrap_or(0)
    }

    /// Sum of all counts ever added
    #[must_use]
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Default for FrequencySketch {
    fn default() -> Self {
        Self::new(SketchWidth::default(), SketchDepth::default())
    }
}
