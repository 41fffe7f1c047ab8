//! Tokio runtime configuration and shared startup utilities
//!
//! This module provides:
//! - Testable runtime configuration and builder logic
//! - Configuration loading with startup logging
//! - Shutdown signal handling

use crate::config::{ConfigSource, PipelineConfig, load_config_with_fallback};
use crate::types::ThreadCount;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Number of worker threads
    worker_threads: usize,
}

impl RuntimeConfig {
    /// Create runtime config from optional thread count
    ///
    /// If `threads` is None, defaults to 1 thread.
    /// Single-threaded runtime is used if threads == 1.
    #[must_use]
    pub fn from_args(threads: Option<ThreadCount>) -> Self {
        Self {
            worker_threads: threads.map(|t| t.get()).unwrap_or(1),
        }
    }

    /// Get number of worker threads
    #[must_use]
    pub const fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    /// Check if single-threaded
    #[must_use]
    pub const fn is_single_threaded(&self) -> bool {
        self.worker_threads == 1
    }

    /// Build the tokio runtime
    ///
    /// Creates either a current-thread or multi-threaded runtime based on
    /// the configured worker thread count. The pipeline itself runs as one
    /// task either way; extra workers only serve the producer and the UI.
    ///
    /// # Errors
    /// Returns error if runtime creation fails
    pub fn build_runtime(self) -> Result<tokio::runtime::Runtime> {
        let rt = if self.is_single_threaded() {
            info!("Starting pipeline with single-threaded runtime");
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?
        } else {
            let num_cpus = std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1);
            info!(
                "Starting pipeline with {} worker threads (detected {} CPUs)",
                self.worker_threads, num_cpus
            );
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(self.worker_threads)
                .enable_all()
                .build()?
        };

        Ok(rt)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_args(None)
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM on Unix)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Flip `stop` to `true` on Ctrl+C or SIGTERM
///
/// The generator watches this flag; once it stops and drops its producer,
/// the pipeline drains the queue and exits.
pub fn spawn_shutdown_handler(stop: Arc<watch::Sender<bool>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = shutdown_signal() => {
                info!("Shutdown signal received, draining queue");
                let _ = stop.send(true);
            }
            // Someone else already requested shutdown
            _ = stop.closed() => {}
        }
    })
}

/// Load configuration and log the effective pipeline settings
///
/// # Errors
/// Returns error if configuration loading fails
pub fn load_and_log_config(config_path: &str) -> Result<(PipelineConfig, ConfigSource)> {
    let (config, source) = load_config_with_fallback(config_path)?;
    log_config(&config, source);
    Ok((config, source))
}

/// Log the effective settings at startup
pub fn log_config(config: &PipelineConfig, source: ConfigSource) {
    info!("Loaded configuration from {}", source.description());
    info!(
        "Queue capacity {}, batch size {}, max delay {}ms",
        config.queue.capacity,
        config.batch.size,
        config.batch.max_delay.as_millis()
    );
    info!(
        "Window {}, cardinality {}, frequency {}x{}",
        config.stats.window_size,
        config.stats.precision,
        config.stats.frequency_depth,
        config.stats.frequency_width
    );
    info!(
        "Alert history {}, K={}, baseline {}ms",
        config.alert.history_size,
        config.alert.multiplier.get(),
        config.alert.min_baseline_ms
    );
    if config.batch.simulates_work() {
        info!(
            "Simulating {}-{}ms of work per batch",
            config.batch.work_min.as_millis(),
            config.batch.work_max.as_millis()
        );
    }
}
