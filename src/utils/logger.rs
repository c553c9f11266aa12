//! Logging initialization and configuration.
//!
//! Logs go to a file so they never draw over the TUI. Each run gets its own
//! file, e.g. `logs/rusty-console.2024-12-06-14-30-25.log`.
//!
//! The log level is controlled via the `RUST_LOG` environment variable
//! (default `info`). Useful targets:
//! - `RUST_LOG=rusty_console::session=debug` - state machine transitions
//! - `RUST_LOG=rusty_console::shell=debug` - process spawn/kill details

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_PREFIX: &str = "rusty-console";

/// `logs/` next to the executable, or `./logs` if that cannot be found.
pub fn default_log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

pub fn log_file_name(now: DateTime<Local>) -> String {
    format!("{}.{}.log", LOG_PREFIX, now.format("%Y-%m-%d-%H-%M-%S"))
}

/// Initialize the logging system.
///
/// Returns the writer guard; keep it alive for the whole program so buffered
/// lines are flushed on exit. Returns `None` (and logs nowhere) if the log
/// file cannot be created, since a console without logs is still usable.
pub fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let log_dir = log_dir.map(Path::to_path_buf).unwrap_or_else(default_log_dir);

    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create logs directory {}: {}", log_dir.display(), e);
        return None;
    }

    let log_path = log_dir.join(log_file_name(Local::now()));
    let log_file = match fs::File::create(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: Failed to create log file {}: {}", log_path.display(), e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .try_init()
    {
        eprintln!("Warning: Logging already initialized: {}", e);
        return None;
    }

    tracing::info!("Logging initialized - writing to {}", log_path.display());
    Some(guard)
}
