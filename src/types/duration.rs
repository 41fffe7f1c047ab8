//! Duration serialization helpers for configuration files

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Helper for (de)serializing a Duration as whole milliseconds
///
/// Batch delays and generator pacing live in the tens of milliseconds, so
/// the TOML config expresses them as integers in ms (`max_delay_ms = 100`).
pub mod duration_ms_serde {
    use super::*;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
