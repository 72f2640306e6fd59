//! authwatch - A terminal admin console for authentication monitoring
//!
//! This is the main entry point for the authwatch application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::tui::{Tui, TuiEvent};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter, e.g. `AUTHWATCH_LOG=debug`
const LOG_ENV: &str = "AUTHWATCH_LOG";

fn main() -> Result<()> {
    let config = match Config::load() {
        Some(config) => config,
        None => {
            let config = Config::default();
            if let Err(e) = config.save() {
                eprintln!("Warning: could not write default config: {:#}", e);
            }
            config
        }
    };

    // The terminal belongs to the UI, so logs go to a file
    let _log_guard = init_logging(&config.data_dir())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting authwatch");

    // Setup terminal
    let tick_rate = Duration::from_millis(config.tick_rate_ms.max(10));
    let mut tui = Tui::new()?.with_tick_rate(tick_rate);
    tui.enter()?;

    // Create app state
    let mut app = App::new(config);
    app.init()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        tracing::error!(error = ?err, "event loop failed");
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    tracing::info!("authwatch exited");
    Ok(())
}

/// Install a file logger in `dir`. The returned guard flushes on drop.
fn init_logging(dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, "authwatch.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    Ok(guard)
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        let action = match tui.next_event()? {
            Some(TuiEvent::Key(key)) => app.handle_key_event(key)?,
            Some(TuiEvent::Resize(w, h)) => Some(Action::Resize(w, h)),
            Some(TuiEvent::Tick) => Some(Action::Tick),
            None => None,
        };

        // Action might produce a follow-up action
        let mut current_action = action;
        while let Some(a) = current_action {
            current_action = app.update(a)?;
        }
    }

    Ok(())
}
