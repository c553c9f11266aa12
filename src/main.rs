//! Main entry point for RustyConsole.
//!
//! Loads configuration, initializes logging and the TUI terminal, runs the
//! control loop, and restores the terminal on exit (including on panic).

use anyhow::Result;
use rusty_console::app::App;
use rusty_console::config::ConsoleConfig;
use rusty_console::utils;
use rusty_console::utils::guard::RestoreGuard;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConsoleConfig::load()?;

    // Initialize logging before anything else; the guard flushes on exit.
    let _log_guard = utils::logger::init_logging(config.log_dir.as_deref());
    tracing::info!(?config, "Starting RustyConsole");

    // Fail before touching the terminal if the start directory is unusable.
    let mut app = App::new(&config)?;

    let mut terminal = ratatui::init();
    let _restore = RestoreGuard::new(ratatui::restore);

    // draw 1st frame
    app.draw(&mut terminal)?;
    app.run(&mut terminal).await
}
