//! Configuration module
//!
//! This module handles the configuration types, defaults, loading and
//! validation for the pipeline.

mod defaults;
mod loading;
mod types;
mod validation;

// Re-export public types
pub use loading::{
    ConfigSource, ENV_BATCH_SIZE, ENV_MAX_DELAY_MS, ENV_QUEUE_CAPACITY, ENV_WINDOW_SIZE,
    apply_env_overrides, apply_overrides, create_default_config, has_env_overrides, load_config,
    load_config_with_fallback, parse_config,
};
pub use types::{
    AlertConfig, BatchConfig, DashboardConfig, GeneratorConfig, PipelineConfig, QueueConfig,
    StatsConfig,
};

// Re-export default functions for use in tests and other modules
pub use defaults::{
    history_lines, max_delay, max_interarrival, min_baseline_ms, refresh_interval,
};
