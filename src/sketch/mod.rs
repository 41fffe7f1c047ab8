//! Fixed-memory approximate sketches
//!
//! - [`CardinalitySketch`]: HyperLogLog distinct counting over `2^p`
//!   one-byte registers
//! - [`FrequencySketch`]: Count-Min per-key counts with one-sided error
//!
//! Both are keyed by raw bytes and never fail on any input. Memory is fixed
//! at construction and independent of stream length. Hashing is xxh3 with
//! per-sketch (and per-row) seeds.

mod cardinality;
mod frequency;

pub use cardinality::CardinalitySketch;
pub use frequency::FrequencySketch;

use xxhash_rust::xxh3::xxh3_64_with_seed;

#[inline]
pub(crate) fn hash_key(key: &[u8], seed: u64) -> u64 {
    xxh3_64_with_seed(key, seed)
}
