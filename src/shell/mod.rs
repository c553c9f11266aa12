//! Subordinate shell execution.
//!
//! This module spawns one `sh -c` process per command, captures its output
//! streams, recovers the working directory it ends in, and reports a single
//! [`Outcome`] back to the control loop.

mod error;
mod execution;
mod outcome;
mod runner;

pub use error::RunError;
pub use execution::ExecutionHandle;
pub use outcome::{split_output, strip_trailing_newline, ExecutionId, Outcome};
pub use runner::{wrap_command, ShellRunner, DEFAULT_SHELL};
