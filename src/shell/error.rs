//! Errors raised while driving a subordinate shell.
//!
//! None of these escape the runner: they are rendered into a failed
//! [`Outcome`](super::Outcome) so the session stays usable.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    /// The shell process could not be created (missing binary, permissions,
    /// bad working directory).
    #[error("failed to spawn `{shell}` in {}: {source}", .cwd.display())]
    Spawn {
        shell: String,
        cwd: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for command: {0}")]
    Wait(#[source] io::Error),

    #[error("command timed out after {} seconds", .0.as_secs())]
    TimedOut(Duration),
}
