//! Validated domain types shared by the configuration and the engine
//!
//! Capacities are non-zero by construction, tuning parameters are range
//! checked, so invalid values are rejected when the config is parsed.

mod capacity;
pub mod duration;
mod tuning;
pub mod validated;

pub use capacity::{
    BatchSize, HistorySize, LineHistorySize, QueueCapacity, SketchDepth, SketchWidth, ThreadCount,
    WindowSize,
};
pub use duration::duration_ms_serde;
pub use tuning::{AlertMultiplier, Precision};
pub use validated::{ConfigPath, ValidationError};
