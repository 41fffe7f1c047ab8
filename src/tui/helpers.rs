//! TUI rendering helper functions

use ratatui::style::Color;

use super::constants::{chart, status};
use crate::tui::TuiApp;

/// Chart series for the latency pane
///
/// Pre-computed once per frame so rendering never walks the history twice.
#[derive(Debug, Default, PartialEq)]
pub struct LatencyChartData {
    /// (batch index, p99 ms)
    pub p99_points: Vec<(f64, f64)>,
    /// (batch index, threshold ms), only for batches past warm-up
    pub threshold_points: Vec<(f64, f64)>,
    /// Largest value across both series
    pub max_ms: f64,
}

/// Build both chart series and their maximum in one pass over the history
#[must_use]
pub fn build_chart_data(app: &TuiApp) -> LatencyChartData {
    app.latency_history().enumerate().fold(
        LatencyChartData::default(),
        |mut data, (idx, point)| {
            let x = idx as f64;
            data.p99_points.push((x, point.p99_ms));
            data.max_ms = data.max_ms.max(point.p99_ms);
            if let Some(threshold) = point.threshold_ms {
                data.threshold_points.push((x, threshold));
                data.max_ms = data.max_ms.max(threshold);
            }
            data
        },
    )
}

/// Round a latency up to a readable axis ceiling
///
/// - above 1000ms: next 500ms
/// - above 100ms: next 50ms
/// - otherwise: next 10ms, never below the chart minimum
#[must_use]
pub fn round_up_latency(value: f64) -> f64 {
    let rounded = if value > 1_000.0 {
        (value / 500.0).ceil() * 500.0
    } else if value > 100.0 {
        (value / 50.0).ceil() * 50.0
    } else {
        (value / 10.0).ceil() * 10.0
    };
    rounded.max(chart::MIN_LATENCY_MS)
}

/// Format a millisecond value for axis labels
#[must_use]
pub fn format_latency_label(ms: f64) -> String {
    if ms >= 1_000.0 {
        format!("{:.1}s", ms / 1_000.0)
    } else {
        format!("{:.0}ms", ms)
    }
}

/// Color for a fill ratio between 0.0 and 1.0
#[inline]
#[must_use]
pub fn fill_color(ratio: f64) -> Color {
    if ratio >= status::CRITICAL_FILL {
        status::CRITICAL
    } else if ratio >= status::WARNING_FILL {
        status::WARNING
    } else {
        status::OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::percentile::Percentiles;
    use crate::snapshot::PipelineSnapshot;
    use tokio::sync::watch;

    #[test]
    fn test_round_up_latency() {
        assert_eq!(round_up_latency(1_240.0), 1_500.0);
        assert_eq!(round_up_latency(130.0), 150.0);
        assert_eq!(round_up_latency(73.0), 80.0);
        assert_eq!(round_up_latency(3.0), chart::MIN_LATENCY_MS);
        assert_eq!(round_up_latency(0.0), chart::MIN_LATENCY_MS);
    }

    #[test]
    fn test_round_up_latency_exact_boundaries() {
        assert_eq!(round_up_latency(1_000.0), 1_000.0);
        assert_eq!(round_up_latency(100.0), 100.0);
    }

    #[test]
    fn test_format_latency_label() {
        assert_eq!(format_latency_label(0.0), "0ms");
        assert_eq!(format_latency_label(250.0), "250ms");
        assert_eq!(format_latency_label(1_500.0), "1.5s");
    }

    #[test]
    fn test_fill_color() {
        assert_eq!(fill_color(0.0), Color::Green);
        assert_eq!(fill_color(0.5), Color::Yellow);
        assert_eq!(fill_color(0.95), Color::Red);
        assert_eq!(fill_color(1.0), Color::Red);
    }

    #[test]
    fn test_build_chart_data() {
        let (tx, rx) = watch::channel(PipelineSnapshot::default());
        let mut app = TuiApp::new(rx);
        let points = [(10.0, None), (40.0, None), (20.0, Some(75.0))];
        for (i, (p99, threshold_ms)) in points.into_iter().enumerate() {
            tx.send_replace(PipelineSnapshot {
                batches: i as u64 + 1,
                latency: Percentiles { p50: 0.0, p95: 0.0, p99 },
                threshold_ms,
                ..Default::default()
            });
            app.update();
        }

        let data = build_chart_data(&app);
        assert_eq!(data.p99_points, vec![(0.0, 10.0), (1.0, 40.0), (2.0, 20.0)]);
        assert_eq!(data.threshold_points, vec![(2.0, 75.0)]);
        assert_eq!(data.max_ms, 75.0);
    }

    #[test]
    fn test_build_chart_data_empty() {
        let (_tx, rx) = watch::channel(PipelineSnapshot::default());
        let data = build_chart_data(&TuiApp::new(rx));
        assert!(data.p99_points.is_empty());
        assert_eq!(data.max_ms, 0.0);
    }
}
