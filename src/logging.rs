//! Centralized logging setup with dual output (stdout or TUI buffer + debug.log)
//!
//! Both outputs use the level from `RUST_LOG`, defaulting to `info`.
//! The file appender guard is forgotten so the background writer lives for
//! the rest of the program.

use crate::tui::{LogBuffer, LogMakeWriter};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// File receiving a plain-text copy of every log line
pub const LOG_FILE: &str = "debug.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging with dual output: stdout + debug.log file
pub fn init_dual_logging() {
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(env_filter()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(env_filter()),
        )
        .init();

    std::mem::forget(guard);
}

/// Initialize logging for the dashboard
///
/// Headless mode logs to stdout like [`init_dual_logging`] and returns
/// `None`. Otherwise lines go to an in-memory buffer that the TUI shows in
/// its log pane, so nothing is written over the alternate screen. Both
/// modes also write to debug.log.
pub fn init_tui_logging(headless: bool) -> Option<LogBuffer> {
    if headless {
        init_dual_logging();
        return None;
    }

    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let log_buffer = LogBuffer::new();
    let log_writer = LogMakeWriter::new(log_buffer.clone());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_writer)
                .with_ansi(false)
                .with_target(false)
                .compact()
                .with_filter(env_filter()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(env_filter()),
        )
        .init();

    std::mem::forget(guard);
    Some(log_buffer)
}
