//! Text formatting for batch lines and the headless dashboard

use crate::percentile::Percentiles;
use crate::snapshot::PipelineSnapshot;
use crate::stats::BatchReport;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Width of the separator rule in the text dashboard
const RULE_WIDTH: usize = 54;

/// Title line of the text dashboard
pub const TITLE: &str = "stream-pulse - live dashboard";

/// One-line summary of a batch, prefixed with wall-clock time
///
/// `HH:MM:SS | n=<count> | p50=... p95=... p99=...`
#[must_use]
pub fn format_batch_line<Tz>(at: &DateTime<Tz>, report: &BatchReport) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Percentiles { p50, p95, p99 } = report.latency;
    format!(
        "{} | n={:<6} | p50={:>6.1} p95={:>6.1} p99={:>6.1}",
        at.format("%H:%M:%S"),
        report.count,
        p50,
        p95,
        p99
    )
}

/// Format the alert threshold, or "warming up" when none exists yet
#[must_use]
pub fn format_threshold(threshold_ms: Option<f64>) -> String {
    threshold_ms.map_or_else(|| "warming up".to_string(), |t| format!("{t:.2}ms"))
}

/// Render the full text dashboard, one string per line
#[must_use]
pub fn render_text(snapshot: &PipelineSnapshot) -> Vec<String> {
    let rule = "-".repeat(RULE_WIDTH);
    let Percentiles { p50, p95, p99 } = snapshot.latency;

    let mut lines = vec![
        TITLE.to_string(),
        rule.clone(),
        format!(
            "Events: {:<8} Unique Users(est): {:<8.0} Queue: {}/{}",
            snapshot.events, snapshot.unique_users, snapshot.queue_depth, snapshot.queue_capacity
        ),
        format!(
            "Mean: {:>6.2}  Var: {:>7.2}  Window: {}/{}",
            snapshot.mean, snapshot.variance, snapshot.window_len, snapshot.window_capacity
        ),
        format!("Latency ms: p50={p50:>7.2}  p95={p95:>7.2}  p99={p99:>7.2}"),
        format!(
            "Threshold: {}  Batches: {}  Alerts: {}  Uptime: {}",
            format_threshold(snapshot.threshold_ms),
            snapshot.batches,
            snapshot.alerts,
            snapshot.format_uptime()
        ),
        rule,
        "Recent batches:".to_string(),
    ];
    lines.extend(snapshot.recent_lines.iter().map(|line| format!("  {line}")));

    if snapshot.is_alerting()
        && let Some(alert) = &snapshot.last_alert
    {
        lines.push(String::new());
        lines.push(format!(
            "ALERT: High latency p99={:.2}ms exceeds dynamic threshold {:.2}ms",
            alert.p99_ms, alert.threshold_ms
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::LatencyAlert;
    use chrono::Utc;

    fn report(count: u64, p50: f64, p95: f64, p99: f64) -> BatchReport {
        BatchReport {
            size: 10,
            count,
            latency: Percentiles { p50, p95, p99 },
        }
    }

    #[test]
    fn test_format_batch_line() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 3, 7).unwrap();
        let line = format_batch_line(&at, &report(1234, 1.24, 20.0, 153.46));
        assert_eq!(line, "09:03:07 | n=1234   | p50=   1.2 p95=  20.0 p99= 153.5");
    }

    #[test]
    fn test_format_threshold() {
        assert_eq!(format_threshold(None), "warming up");
        assert_eq!(format_threshold(Some(51.234)), "51.23ms");
    }

    #[test]
    fn test_render_text_layout() {
        let snapshot = PipelineSnapshot {
            events: 500,
            unique_users: 431.6,
            mean: 50.126,
            variance: 99.5,
            latency: Percentiles { p50: 10.0, p95: 20.0, p99: 30.0 },
            queue_depth: 3,
            queue_capacity: 10,
            window_len: 500,
            window_capacity: 1000,
            recent_lines: vec!["a".into(), "b".into()],
            ..Default::default()
        };
        let lines = render_text(&snapshot);

        assert_eq!(lines[0], TITLE);
        assert_eq!(lines[1].len(), RULE_WIDTH);
        assert_eq!(
            lines[2],
            "Events: 500      Unique Users(est): 432      Queue: 3/10"
        );
        assert_eq!(lines[3], "Mean:  50.13  Var:   99.50  Window: 500/1000");
        assert_eq!(lines[4], "Latency ms: p50=  10.00  p95=  20.00  p99=  30.00");
        assert!(lines[5].starts_with("Threshold: warming up"));
        assert_eq!(lines[7], "Recent batches:");
        assert_eq!(&lines[8..], &["  a".to_string(), "  b".to_string()]);
    }

    #[test]
    fn test_render_text_alert_line() {
        let snapshot = PipelineSnapshot {
            alerting: true,
            last_alert: Some(LatencyAlert {
                p99_ms: 240.0,
                threshold_ms: 120.5,
                at_batch: 40,
            }),
            ..Default::default()
        };
        let lines = render_text(&snapshot);
        assert_eq!(
            lines.last().unwrap(),
            "ALERT: High latency p99=240.00ms exceeds dynamic threshold 120.50ms"
        );
    }

    #[test]
    fn test_stale_alert_not_rendered() {
        let snapshot = PipelineSnapshot {
            alerting: false,
            last_alert: Some(LatencyAlert {
                p99_ms: 240.0,
                threshold_ms: 120.5,
                at_batch: 40,
            }),
            ..Default::default()
        };
        assert!(!render_text(&snapshot).iter().any(|l| l.starts_with("ALERT")));
    }
}
