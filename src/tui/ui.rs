//! TUI rendering and layout

use crate::formatting::format_threshold;
use crate::snapshot::PipelineSnapshot;
use crate::tui::app::{TuiApp, ViewMode};
use crate::tui::constants::{chart, layout, styles, text};
use crate::tui::helpers::{build_chart_data, fill_color, format_latency_label, round_up_latency};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, List, ListItem, Paragraph},
};

fn label(s: &str) -> Span<'_> {
    Span::styled(s, Style::default().fg(styles::LABEL))
}

fn bold(value: String, color: ratatui::style::Color) -> Span<'static> {
    Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

/// Render the main UI
pub fn render_ui(f: &mut Frame, app: &TuiApp) {
    if app.view_mode() == ViewMode::LogsFullscreen && app.log_buffer().is_some() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(1), Constraint::Length(layout::FOOTER_HEIGHT)])
            .split(f.area());
        render_logs(f, chunks[0], app);
        render_footer(f, chunks[1]);
        return;
    }

    let show_logs = app.log_buffer().is_some() && f.area().height >= layout::MIN_HEIGHT_FOR_LOGS;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(layout::main_sections(show_logs))
        .split(f.area());

    let snapshot = app.snapshot();
    render_title(f, chunks[0], snapshot);
    render_summary(f, chunks[1], snapshot);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(layout::latency_columns())
        .split(chunks[2]);
    render_latency_chart(f, columns[0], app);
    render_recent_batches(f, columns[1], snapshot);

    if show_logs {
        render_logs(f, chunks[3], app);
    }
    render_footer(f, chunks[chunks.len() - 1]);
}

/// Render the title bar
fn render_title(f: &mut Frame, area: Rect, snapshot: &PipelineSnapshot) {
    let (state, state_color) = if snapshot.finished {
        (text::DRAINED, styles::VALUE_NEUTRAL)
    } else {
        (text::RUNNING, styles::VALUE_PRIMARY)
    };

    let title = Paragraph::new(vec![
        Line::from(vec![
            bold(text::TITLE.to_string(), styles::VALUE_INFO),
            Span::styled(text::SUBTITLE, Style::default().fg(styles::BORDER_NORMAL)),
        ]),
        Line::from(vec![
            label("Uptime: "),
            bold(snapshot.format_uptime(), styles::VALUE_PRIMARY),
            label("  |  Batches: "),
            bold(snapshot.batches.to_string(), styles::VALUE_SECONDARY),
            label("  |  Rate: "),
            Span::styled(
                format!("{:.1} ev/s", snapshot.events_per_sec()),
                Style::default().fg(styles::VALUE_NEUTRAL),
            ),
            label("  |  "),
            Span::styled(state, Style::default().fg(state_color)),
        ]),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(styles::BORDER_ACTIVE)),
    )
    .alignment(Alignment::Center);

    f.render_widget(title, area);
}

/// Render counts, moments and the queue gauge
fn render_summary(f: &mut Frame, area: Rect, snapshot: &PipelineSnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Summary")
        .border_style(Style::default().fg(styles::BORDER_NORMAL));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let counts = Paragraph::new(Line::from(vec![
        label("Events: "),
        bold(snapshot.events.to_string(), styles::VALUE_PRIMARY),
        label("  |  Unique users: "),
        bold(format!("~{:.0}", snapshot.unique_users), styles::VALUE_INFO),
        label("  |  Mean: "),
        bold(format!("{:.2}", snapshot.mean), styles::VALUE_SECONDARY),
        label("  Var: "),
        bold(format!("{:.2}", snapshot.variance), styles::VALUE_SECONDARY),
    ]));
    f.render_widget(counts, rows[0]);

    let threshold_color = if snapshot.is_alerting() {
        styles::ALERT
    } else {
        styles::VALUE_NEUTRAL
    };
    let latency = Paragraph::new(Line::from(vec![
        label("Latency p50/p95/p99: "),
        bold(
            format!(
                "{:.1} / {:.1} / {:.1} ms",
                snapshot.latency.p50, snapshot.latency.p95, snapshot.latency.p99
            ),
            styles::VALUE_INFO,
        ),
        label("  |  Threshold: "),
        bold(format_threshold(snapshot.threshold_ms), threshold_color),
        label("  |  Alerts: "),
        bold(snapshot.alerts.to_string(), threshold_color),
    ]));
    f.render_widget(latency, rows[1]);

    render_fill_gauge(
        f,
        rows[2],
        "Queue ",
        snapshot.queue_fill(),
        format!("{}/{}", snapshot.queue_depth, snapshot.queue_capacity),
    );
    render_fill_gauge(
        f,
        rows[3],
        "Window",
        snapshot.window_fill(),
        format!("{}/{}", snapshot.window_len, snapshot.window_capacity),
    );
}

fn render_fill_gauge(f: &mut Frame, area: Rect, name: &str, ratio: f64, caption: String) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(8), Constraint::Min(10)])
        .split(area);

    f.render_widget(Paragraph::new(Line::from(label(name))), columns[0]);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(fill_color(ratio)))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(caption);
    f.render_widget(gauge, columns[1]);
}

/// Render the p99 history against the alert threshold
fn render_latency_chart(f: &mut Frame, area: Rect, app: &TuiApp) {
    let data = build_chart_data(app);
    let y_max = round_up_latency(data.max_ms);
    let x_max = (chart::HISTORY_POINTS.saturating_sub(1)).max(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name(chart::P99_LABEL)
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(styles::VALUE_INFO))
            .data(&data.p99_points),
        Dataset::default()
            .name(chart::THRESHOLD_LABEL)
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(styles::ALERT))
            .data(&data.threshold_points),
    ];

    let chart_widget = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(chart::TITLE)
                .border_style(Style::default().fg(styles::BORDER_NORMAL)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(styles::LABEL))
                .bounds([0.0, x_max]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(styles::LABEL))
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw(chart::Y_LABEL_ZERO),
                    Span::raw(format_latency_label(y_max / 2.0)),
                    Span::raw(format_latency_label(y_max)),
                ]),
        );

    f.render_widget(chart_widget, area);
}

/// Render the recent batch lines and the alert banner
fn render_recent_batches(f: &mut Frame, area: Rect, snapshot: &PipelineSnapshot) {
    let mut items: Vec<ListItem> = if snapshot.recent_lines.is_empty() {
        vec![ListItem::new(Line::from(label(text::NO_BATCHES)))]
    } else {
        snapshot
            .recent_lines
            .iter()
            .rev()
            .map(|line| {
                ListItem::new(Line::from(Span::styled(
                    line.as_str(),
                    Style::default().fg(styles::BORDER_NORMAL),
                )))
            })
            .collect()
    };

    if snapshot.is_alerting()
        && let Some(alert) = snapshot.last_alert
    {
        items.insert(
            0,
            ListItem::new(Line::from(bold(format!("ALERT {}", alert), styles::ALERT))),
        );
    }

    let border = if snapshot.is_alerting() {
        styles::ALERT
    } else {
        styles::BORDER_NORMAL
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Recent batches")
            .border_style(Style::default().fg(border)),
    );

    f.render_widget(list, area);
}

/// Render the captured log pane
fn render_logs(f: &mut Frame, area: Rect, app: &TuiApp) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<ListItem> = app
        .log_buffer()
        .map(|buffer| buffer.recent_lines(visible))
        .unwrap_or_default()
        .into_iter()
        .map(|line| ListItem::new(Line::from(Span::styled(line, Style::default().fg(styles::LABEL)))))
        .collect();

    let list = List::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Logs")
            .border_style(Style::default().fg(styles::BORDER_NORMAL)),
    );
    f.render_widget(list, area);
}

/// Render footer with help text
fn render_footer(f: &mut Frame, area: Rect) {
    let key = |k: &'static str| {
        Span::styled(
            k,
            Style::default()
                .fg(styles::VALUE_INFO)
                .add_modifier(Modifier::BOLD),
        )
    };
    let footer = Paragraph::new(Line::from(vec![
        label("Press "),
        key("q"),
        label(" or "),
        key("Esc"),
        label(" to stop and drain  |  "),
        key("l"),
        label(" toggle logs  |  "),
        key("Ctrl+C"),
        label(" to shutdown"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(styles::LABEL)),
    )
    .alignment(Alignment::Center);

    f.render_widget(footer, area);
}
