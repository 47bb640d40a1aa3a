//! keygrid-tui - keyboard-driven grid navigation demo.
//!
//! Responsibilities:
//! - Orchestrate application startup and shutdown.
//! - Initialize terminal, logging, and async runtime.
//! - Run the main event loop.
//!
//! Does NOT handle:
//! - Hotkey matching, grid movement or search (see `keygrid-core`).
//! - Configuration parsing (see `keygrid-config`).
//!
//! Invariants:
//! - The TUI enters raw mode and alternate screen on startup.
//! - Logs go to a daily rolling file; the terminal is never written to by tracing.
//! - Configuration precedence: CLI args > env vars > config file > defaults.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use keygrid_core::HorizontalWrap;
use keygrid_tui::cli::Cli;
use keygrid_tui::runtime::{
    EVENT_CHANNEL_CAPACITY, UI_TICK_MS, config::load_config, terminal::TerminalGuard,
};
use keygrid_tui::{App, demo_items, ui};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tokio::sync::mpsc::channel;
use tracing_appender::non_blocking;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    std::fs::create_dir_all(&cli.log_dir)
        .with_context(|| format!("Failed to create log directory {}", cli.log_dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(&cli.log_dir, "keygrid-tui.log");
    // The guard must live for the entire run so buffered logs are flushed.
    let (non_blocking, _guard) = non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    let config = load_config(&cli)?;
    let wrap = if cli.row_wrap {
        HorizontalWrap::Row
    } else {
        HorizontalWrap::Sequence
    };
    let mut app = App::new(&config, demo_items(cli.items), cli.tile_width, wrap)?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard::new();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.resize(Rect::new(0, 0, size.width, size.height))?;

    let (tx, mut rx) = channel::<Event>(EVENT_CHANNEL_CAPACITY);
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(event_result) = reader.next().await {
            match event_result {
                Ok(event) => {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read terminal event");
                    break;
                }
            }
        }
    });

    let mut tick_interval =
        tokio::time::interval(tokio::time::Duration::from_millis(UI_TICK_MS));

    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        tokio::select! {
            event = rx.recv() => match event {
                Some(Event::Key(key)) => {
                    app.handle_key(key).await;
                }
                Some(Event::Resize(width, height)) => {
                    if let Err(e) = app.resize(Rect::new(0, 0, width, height)) {
                        tracing::warn!(error = %e, "Failed to relayout tiles");
                    }
                }
                Some(_) => {}
                None => {
                    tracing::info!("Terminal event stream closed");
                    break;
                }
            },
            _ = tick_interval.tick() => {}
        }

        if app.should_quit() {
            break;
        }
    }

    tracing::info!("Shutting down");
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
