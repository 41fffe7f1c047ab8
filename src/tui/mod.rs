//! Terminal User Interface (TUI) for the pipeline dashboard
//!
//! Renders the latest [`PipelineSnapshot`](crate::snapshot::PipelineSnapshot)
//! at the configured refresh interval when running in an interactive terminal.

mod app;
mod constants;
mod helpers;
pub mod log_capture;
mod ui;

pub use app::{LatencyPoint, TuiApp, ViewMode};
pub use log_capture::{LogBuffer, LogMakeWriter};
pub use ui::render_ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Setup the terminal for TUI rendering
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

/// Restore the terminal to its original state
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    // Clear first so escape sequences do not leak to the shell
    terminal.clear()?;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

/// What a key press asks the event loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Quit,
    ToggleLogs,
    None,
}

fn key_action(key: &event::KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
            KeyAction::Quit
        }
        KeyCode::Char('l') => KeyAction::ToggleLogs,
        _ => KeyAction::None,
    }
}

/// Run the TUI event loop
///
/// Runs until the user presses `q`, `Esc` or Ctrl+C, until `stop` is set
/// elsewhere (signal handler, run duration), or until the pipeline
/// publishes its final snapshot. Leaving on a key press sets `stop`, which
/// stops the generator and lets the pipeline drain.
///
/// # Errors
/// Returns an error if terminal operations fail
pub async fn run_tui(
    mut app: TuiApp,
    stop: Arc<watch::Sender<bool>>,
    refresh: Duration,
) -> Result<()> {
    let mut terminal = setup_terminal()?;

    // Restore the terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_app(&mut terminal, &mut app, stop.subscribe(), refresh).await;

    restore_terminal(&mut terminal)?;

    // Request shutdown when the TUI exits
    let _ = stop.send(true);

    result
}

/// Main TUI event loop
async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut TuiApp,
    mut stop_rx: watch::Receiver<bool>,
    refresh: Duration,
) -> Result<()> {
    let mut update_interval = tokio::time::interval(refresh.max(Duration::from_millis(10)));

    loop {
        terminal.draw(|f| ui::render_ui(f, app))?;

        if app.is_finished() {
            break;
        }

        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
            _ = update_interval.tick() => {
                app.update();

                // Non-blocking keyboard check
                if event::poll(Duration::from_millis(0))?
                    && let Event::Key(key) = event::read()?
                    && key.kind == KeyEventKind::Press
                {
                    match key_action(&key) {
                        KeyAction::Quit => break,
                        KeyAction::ToggleLogs => app.toggle_log_fullscreen(),
                        KeyAction::None => {}
                    }
                }
            }
        }
    }

    Ok(())
}
