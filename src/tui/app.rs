//! TUI application state and logic

use crate::snapshot::PipelineSnapshot;
use crate::tui::constants::chart;
use crate::tui::log_capture::LogBuffer;
use crate::window::RollingWindow;
use std::num::NonZeroUsize;
use tokio::sync::watch;

/// Which panes the dashboard shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Statistics, chart and recent batches
    #[default]
    Normal,
    /// Captured log lines fill the screen
    LogsFullscreen,
}

/// One batch's p99 and the threshold in force after it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatencyPoint {
    pub p99_ms: f64,
    pub threshold_ms: Option<f64>,
}

/// TUI application state
#[derive(Debug)]
pub struct TuiApp {
    snapshots: watch::Receiver<PipelineSnapshot>,
    snapshot: PipelineSnapshot,
    latency_history: RollingWindow<LatencyPoint>,
    log_buffer: Option<LogBuffer>,
    view_mode: ViewMode,
}

impl TuiApp {
    /// Create a new TUI application over the pipeline's snapshot channel
    pub fn new(snapshots: watch::Receiver<PipelineSnapshot>) -> Self {
        let snapshot = snapshots.borrow().clone();
        let points = NonZeroUsize::new(chart::HISTORY_POINTS).unwrap_or(NonZeroUsize::MIN);
        Self {
            snapshots,
            snapshot,
            latency_history: RollingWindow::new(points),
            log_buffer: None,
            view_mode: ViewMode::Normal,
        }
    }

    /// Show captured log lines below the dashboard
    #[must_use]
    pub fn with_log_buffer(mut self, log_buffer: LogBuffer) -> Self {
        self.log_buffer = Some(log_buffer);
        self
    }

    /// Pull the latest snapshot
    ///
    /// Returns true when at least one batch was processed since the last
    /// update.
    pub fn update(&mut self) -> bool {
        let latest = self.snapshots.borrow_and_update().clone();
        let new_batch = latest.batches > self.snapshot.batches;
        if new_batch {
            self.latency_history.push(LatencyPoint {
                p99_ms: latest.latency.p99,
                threshold_ms: latest.threshold_ms,
            });
        }
        self.snapshot = latest;
        new_batch
    }

    /// Get current snapshot
    #[must_use]
    pub fn snapshot(&self) -> &PipelineSnapshot {
        &self.snapshot
    }

    /// p99 per observed batch, oldest first
    pub fn latency_history(&self) -> impl ExactSizeIterator<Item = &LatencyPoint> + '_ {
        self.latency_history.iter()
    }

    #[must_use]
    pub fn log_buffer(&self) -> Option<&LogBuffer> {
        self.log_buffer.as_ref()
    }

    #[must_use]
    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn toggle_log_fullscreen(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Normal => ViewMode::LogsFullscreen,
            ViewMode::LogsFullscreen => ViewMode::Normal,
        };
    }

    /// Whether the pipeline has drained and published its final snapshot
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.snapshot.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::percentile::Percentiles;

    fn snapshot(batches: u64, p99: f64) -> PipelineSnapshot {
        PipelineSnapshot {
            batches,
            latency: Percentiles { p50: 1.0, p95: 2.0, p99 },
            ..Default::default()
        }
    }

    #[test]
    fn test_update_tracks_new_batches_only() {
        let (tx, rx) = watch::channel(PipelineSnapshot::default());
        let mut app = TuiApp::new(rx);
        assert!(!app.update());

        tx.send_replace(snapshot(1, 12.0));
        assert!(app.update());
        assert!(!app.update());

        tx.send_replace(snapshot(3, 30.0));
        assert!(app.update());

        let p99s: Vec<f64> = app.latency_history().map(|p| p.p99_ms).collect();
        assert_eq!(p99s, vec![12.0, 30.0]);
        assert_eq!(app.snapshot().batches, 3);
    }

    #[test]
    fn test_history_is_bounded() {
        let (tx, rx) = watch::channel(PipelineSnapshot::default());
        let mut app = TuiApp::new(rx);
        for i in 1..=(chart::HISTORY_POINTS as u64 + 10) {
            tx.send_replace(snapshot(i, i as f64));
            app.update();
        }
        assert_eq!(app.latency_history().len(), chart::HISTORY_POINTS);
        assert_eq!(app.latency_history().next().map(|p| p.p99_ms), Some(11.0));
    }

    #[test]
    fn test_update_after_sender_dropped() {
        let (tx, rx) = watch::channel(PipelineSnapshot::default());
        let mut app = TuiApp::new(rx);
        tx.send_replace(PipelineSnapshot {
            finished: true,
            ..snapshot(2, 5.0)
        });
        drop(tx);

        app.update();
        assert!(app.is_finished());
    }

    #[test]
    fn test_toggle_view_mode() {
        let (_tx, rx) = watch::channel(PipelineSnapshot::default());
        let mut app = TuiApp::new(rx);
        assert_eq!(app.view_mode(), ViewMode::Normal);
        app.toggle_log_fullscreen();
        assert_eq!(app.view_mode(), ViewMode::LogsFullscreen);
        app.toggle_log_fullscreen();
        assert_eq!(app.view_mode(), ViewMode::Normal);
    }
}
