//! Configuration loading from files and environment variables
//!
//! The TOML file is read first; `STREAM_PULSE_*` environment variables are
//! applied on top so container deployments can tune the pipeline without
//! editing the file.

use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

use super::types::PipelineConfig;
use crate::constants;

/// Environment variable overriding `queue.capacity`
pub const ENV_QUEUE_CAPACITY: &str = "STREAM_PULSE_QUEUE_CAPACITY";
/// Environment variable overriding `batch.size`
pub const ENV_BATCH_SIZE: &str = "STREAM_PULSE_BATCH_SIZE";
/// Environment variable overriding `batch.max_delay_ms`
pub const ENV_MAX_DELAY_MS: &str = "STREAM_PULSE_MAX_DELAY_MS";
/// Environment variable overriding `stats.window_size`
pub const ENV_WINDOW_SIZE: &str = "STREAM_PULSE_WINDOW_SIZE";

/// Where the active configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Read from the TOML file at the given path
    File,
    /// The file was missing, so the demo configuration was written there
    DefaultCreated,
    /// The file was missing and could not be created; built-in defaults
    Default,
}

impl ConfigSource {
    /// Human-readable description for startup logging
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::File => "configuration file",
            Self::DefaultCreated => "default configuration (created)",
            Self::Default => "built-in defaults",
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

fn parse_override<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

/// Apply overrides read through `lookup` (an environment accessor)
///
/// Unparseable or zero values are logged and ignored.
pub fn apply_overrides(config: &mut PipelineConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(capacity) = parse_override(&lookup, ENV_QUEUE_CAPACITY) {
        config.queue.capacity = capacity;
    }
    if let Some(size) = parse_override(&lookup, ENV_BATCH_SIZE) {
        config.batch.size = size;
    }
    if let Some(millis) = parse_override::<u64>(&lookup, ENV_MAX_DELAY_MS) {
        config.batch.max_delay = Duration::from_millis(millis);
    }
    if let Some(window) = parse_override(&lookup, ENV_WINDOW_SIZE) {
        config.stats.window_size = window;
    }
}

/// Apply `STREAM_PULSE_*` overrides from the process environment
pub fn apply_env_overrides(config: &mut PipelineConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Check if any pipeline override is set in the environment
#[must_use]
pub fn has_env_overrides() -> bool {
    [
        ENV_QUEUE_CAPACITY,
        ENV_BATCH_SIZE,
        ENV_MAX_DELAY_MS,
        ENV_WINDOW_SIZE,
    ]
    .iter()
    .any(|key| std::env::var(key).is_ok())
}

/// Parse a configuration from TOML text without touching the environment
///
/// # Errors
/// Returns an error if the text is not valid TOML, a field value is out of
/// range, or the result fails validation.
pub fn parse_config(text: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig = toml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file, with environment variable overrides
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if the final
/// configuration fails validation.
pub fn load_config(config_path: &str) -> Result<PipelineConfig> {
    let config_content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file '{config_path}'"))?;

    let mut config: PipelineConfig = toml::from_str(&config_content)
        .with_context(|| format!("Failed to parse config file '{config_path}'"))?;

    if has_env_overrides() {
        info!("Applying STREAM_PULSE_* environment overrides");
    }
    apply_env_overrides(&mut config);

    config.validate()?;

    Ok(config)
}

/// Load the file if it exists, otherwise fall back to the demo configuration
///
/// A missing file is created with the demo configuration so the user has
/// something to edit. Environment overrides apply in every case.
///
/// # Errors
/// Returns an error if an existing file cannot be read or parsed, or the
/// configuration fails validation.
pub fn load_config_with_fallback(config_path: &str) -> Result<(PipelineConfig, ConfigSource)> {
    if Path::new(config_path).exists() {
        return Ok((load_config(config_path)?, ConfigSource::File));
    }

    let mut config = create_default_config();
    let source = match toml::to_string_pretty(&config)
        .context("Failed to serialize default config")
        .and_then(|text| {
            std::fs::write(config_path, text)
                .with_context(|| format!("Failed to write config file '{config_path}'"))
        }) {
        Ok(()) => {
            info!("Created default config file at '{}'", config_path);
            ConfigSource::DefaultCreated
        }
        Err(e) => {
            warn!("{:#}; continuing with built-in defaults", e);
            ConfigSource::Default
        }
    };

    apply_env_overrides(&mut config);
    config.validate()?;

    Ok((config, source))
}

/// Create the demo configuration
///
/// Identical to [`PipelineConfig::default`] except that each batch sleeps
/// 20-60ms before being applied, which makes queueing latency and alerts
/// visible on the dashboard.
#[must_use]
pub fn create_default_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.batch.work_min = Duration::from_millis(constants::batch::DEMO_WORK_MIN_MS);
    config.batch.work_max = Duration::from_millis(constants::batch::DEMO_WORK_MAX_MS);
    config
}
