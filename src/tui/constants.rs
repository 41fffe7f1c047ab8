//! TUI constants and configuration

// ============================================================================
// Layout Constants
// ============================================================================

/// Layout constraints for main UI sections
pub mod layout {
    use ratatui::layout::Constraint;

    pub const TITLE_HEIGHT: u16 = 3;
    pub const SUMMARY_HEIGHT: u16 = 6;
    pub const FOOTER_HEIGHT: u16 = 3;
    pub const MIN_CHART_HEIGHT: u16 = 8;
    pub const LOG_WINDOW_HEIGHT: u16 = 10;
    /// Below this terminal height the log pane is hidden
    pub const MIN_HEIGHT_FOR_LOGS: u16 = 40;

    pub const CHART_WIDTH_PCT: u16 = 60;
    pub const BATCHES_WIDTH_PCT: u16 = 40;

    pub fn main_sections(show_logs: bool) -> Vec<Constraint> {
        let mut sections = vec![
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Length(SUMMARY_HEIGHT),
            Constraint::Min(MIN_CHART_HEIGHT),
        ];
        if show_logs {
            sections.push(Constraint::Length(LOG_WINDOW_HEIGHT));
        }
        sections.push(Constraint::Length(FOOTER_HEIGHT));
        sections
    }

    pub fn latency_columns() -> [Constraint; 2] {
        [
            Constraint::Percentage(CHART_WIDTH_PCT),
            Constraint::Percentage(BATCHES_WIDTH_PCT),
        ]
    }
}

// ============================================================================
// Chart Configuration
// ============================================================================

/// Latency chart configuration
pub mod chart {
    /// Number of p99 samples kept for the chart
    pub const HISTORY_POINTS: usize = 60;
    /// Smallest y-axis ceiling in milliseconds
    pub const MIN_LATENCY_MS: f64 = 50.0;

    pub const Y_LABEL_ZERO: &str = "0";
    pub const TITLE: &str = "p99 latency (ms)";
    pub const P99_LABEL: &str = "p99";
    pub const THRESHOLD_LABEL: &str = "threshold";
}

// ============================================================================
// Color Palette
// ============================================================================

/// Fill-level colors for gauges
pub mod status {
    use ratatui::style::Color;

    pub const OK: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const CRITICAL: Color = Color::Red;

    /// Fill ratio at which a gauge turns yellow
    pub const WARNING_FILL: f64 = 0.5;
    /// Fill ratio at which a gauge turns red
    pub const CRITICAL_FILL: f64 = 0.9;
}

/// UI text styles
pub mod styles {
    use ratatui::style::Color;

    pub const LABEL: Color = Color::Gray;
    pub const VALUE_PRIMARY: Color = Color::Green;
    pub const VALUE_SECONDARY: Color = Color::Yellow;
    pub const VALUE_INFO: Color = Color::Cyan;
    pub const VALUE_NEUTRAL: Color = Color::Blue;
    pub const ALERT: Color = Color::Red;
    pub const BORDER_ACTIVE: Color = Color::Cyan;
    pub const BORDER_NORMAL: Color = Color::White;
}

// ============================================================================
// Text Constants
// ============================================================================

/// UI text constants
pub mod text {
    pub const TITLE: &str = "stream-pulse ";
    pub const SUBTITLE: &str = "- Streaming Analytics Dashboard";
    pub const WARMING_UP: &str = "warming up";
    pub const DRAINED: &str = "drained";
    pub const RUNNING: &str = "running";
    pub const NO_BATCHES: &str = "waiting for first batch";
}
