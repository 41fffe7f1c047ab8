//! Command-line argument parsing for the stream-pulse binary
//!
//! Precedence, lowest first: defaults, config file, environment, flags.

use crate::config::PipelineConfig;
use crate::types::{BatchSize, ConfigPath, QueueCapacity, ThreadCount};
use clap::Parser;
use std::time::Duration;

/// Streaming analytics over a synthetic event stream with a live dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "stream-pulse", version, about)]
pub struct CommonArgs {
    /// Configuration file path (created with demo settings when missing)
    #[arg(short, long, default_value = "stream-pulse.toml", env = "STREAM_PULSE_CONFIG")]
    pub config: ConfigPath,

    /// Number of worker threads (default: 1)
    #[arg(short, long, env = "STREAM_PULSE_THREADS")]
    pub threads: Option<ThreadCount>,

    /// Events per batch (overrides config file)
    #[arg(short, long)]
    pub batch_size: Option<BatchSize>,

    /// Bounded queue capacity (overrides config file)
    #[arg(short, long)]
    pub queue_capacity: Option<QueueCapacity>,

    /// Seed the generator for a reproducible stream
    #[arg(long)]
    pub seed: Option<u64>,

    /// Stop producing after this many seconds, then drain and exit
    #[arg(short, long)]
    pub duration_secs: Option<u64>,

    /// Print plain-text dashboard frames instead of the interactive UI
    #[arg(long)]
    pub no_tui: bool,
}

impl CommonArgs {
    /// Apply command-line overrides on top of a loaded configuration
    pub fn apply_to(&self, config: &mut PipelineConfig) {
        if let Some(size) = self.batch_size {
            config.batch.size = size;
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue.capacity = capacity;
        }
        if self.seed.is_some() {
            config.generator.seed = self.seed;
        }
    }

    /// How long the generator runs, `None` for until interrupted
    #[must_use]
    pub fn run_duration(&self) -> Option<Duration> {
        self.duration_secs.map(Duration::from_secs)
    }

    /// Whether to run without the interactive UI
    #[must_use]
    pub const fn headless(&self) -> bool {
        self.no_tui
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CommonArgs {
        CommonArgs::try_parse_from(std::iter::once("stream-pulse").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.config.as_str(), "stream-pulse.toml");
        assert!(args.batch_size.is_none());
        assert!(args.queue_capacity.is_none());
        assert!(args.run_duration().is_none());
        assert!(!args.headless());
    }

    #[test]
    fn test_overrides_applied() {
        let args = parse(&[
            "--batch-size",
            "25",
            "--queue-capacity",
            "64",
            "--seed",
            "7",
            "--duration-secs",
            "3",
            "--no-tui",
        ]);
        let mut config = PipelineConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.batch.size.get(), 25);
        assert_eq!(config.queue.capacity.get(), 64);
        assert_eq!(config.generator.seed, Some(7));
        assert_eq!(args.run_duration(), Some(Duration::from_secs(3)));
        assert!(args.headless());
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = PipelineConfig::default();
        config.generator.seed = Some(11);
        parse(&[]).apply_to(&mut config);

        assert_eq!(config.generator.seed, Some(11));
        assert_eq!(config.batch.size, BatchSize::DEFAULT);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = CommonArgs::try_parse_from(["stream-pulse", "--batch-size", "0"]);
        assert!(result.is_err());
    }
}
