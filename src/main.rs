use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

use stream_pulse::args::CommonArgs;
use stream_pulse::formatting::render_text;
use stream_pulse::logging::init_tui_logging;
use stream_pulse::runtime::{RuntimeConfig, log_config, spawn_shutdown_handler};
use stream_pulse::tui::{self, LogBuffer, TuiApp};
use stream_pulse::{EventGenerator, Pipeline, PipelineSnapshot, load_config_with_fallback};

fn main() -> Result<()> {
    let args = CommonArgs::parse();

    let log_buffer = init_tui_logging(args.headless());

    let runtime_config = RuntimeConfig::from_args(args.threads);
    let rt = runtime_config.build_runtime()?;

    rt.block_on(run_pipeline(args, log_buffer))
}

async fn run_pipeline(args: CommonArgs, log_buffer: Option<LogBuffer>) -> Result<()> {
    let (mut config, source) = load_config_with_fallback(args.config.as_str())?;
    args.apply_to(&mut config);
    log_config(&config, source);

    let (producer, pipeline) = Pipeline::new(&config);
    let snapshots = pipeline.subscribe();

    // Flipped to true by signals, the TUI or the run duration
    let stop = Arc::new(watch::channel(false).0);

    let generator = EventGenerator::new(&config.generator);
    let generator_handle = tokio::spawn(generator.run(producer, stop.subscribe()));
    let pipeline_handle = tokio::spawn(pipeline.run());
    let signal_handle = spawn_shutdown_handler(Arc::clone(&stop));

    if let Some(limit) = args.run_duration() {
        let stop = Arc::clone(&stop);
        tokio::spawn(async move {
            tokio::time::sleep(limit).await;
            info!("Run duration of {}s elapsed, draining", limit.as_secs());
            let _ = stop.send(true);
        });
    }

    let refresh = config.dashboard.refresh_interval;
    if args.headless() {
        render_headless(snapshots, stop.subscribe(), refresh).await;
    } else {
        let app = match log_buffer {
            Some(log_buffer) => TuiApp::new(snapshots).with_log_buffer(log_buffer),
            None => TuiApp::new(snapshots),
        };
        if let Err(e) = tui::run_tui(app, Arc::clone(&stop), refresh).await {
            error!("TUI error: {}", e);
            let _ = stop.send(true);
        }
    }

    // The generator drops its producer on exit, which lets the pipeline drain
    let produced = generator_handle.await?;
    let last = pipeline_handle.await?;
    signal_handle.abort();

    let mut stdout = std::io::stdout().lock();
    for line in render_text(&last) {
        writeln!(stdout, "{}", line)?;
    }
    info!(
        produced,
        consumed = last.events,
        batches = last.batches,
        alerts = last.alerts,
        "Shutdown complete"
    );

    Ok(())
}

/// Print a text frame whenever a new snapshot arrives, until stopped
async fn render_headless(
    mut snapshots: watch::Receiver<PipelineSnapshot>,
    mut stop: watch::Receiver<bool>,
    refresh: Duration,
) {
    let mut interval = tokio::time::interval(refresh.max(Duration::from_millis(10)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
            _ = interval.tick() => {
                match snapshots.has_changed() {
                    Ok(true) => {}
                    Ok(false) => continue,
                    // Pipeline gone
                    Err(_) => break,
                }
                let snapshot = snapshots.borrow_and_update().clone();
                println!();
                for line in render_text(&snapshot) {
                    println!("{}", line);
                }
                if snapshot.finished {
                    break;
                }
            }
        }
    }
}
