//! Handle to the single in-flight execution.

use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::ExecutionId;

/// Owned by the session while a command runs.
///
/// Dropping the handle requests cancellation, so clearing the active slot on
/// any path also releases the subordinate process.
#[derive(Debug)]
pub struct ExecutionHandle {
    id: ExecutionId,
    command: String,
    cancel: CancellationToken,
    started: Instant,
    task: JoinHandle<()>,
}

impl ExecutionHandle {
    pub(super) fn new(
        id: ExecutionId,
        command: String,
        cancel: CancellationToken,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            id,
            command,
            cancel,
            started: Instant::now(),
            task,
        }
    }

    pub fn id(&self) -> ExecutionId {
        self.id
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Asks the worker to kill the shell. Safe to call more than once and
    /// concurrently with the worker's wait.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// True once the worker has posted its outcome.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Cancels the execution and waits for its worker to finish.
    ///
    /// Once this returns the shell and its process group have been killed
    /// and reaped, so nothing outlives the runtime.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Err(e) = (&mut self.task).await {
            warn!(id = self.id, "Execution worker ended abnormally: {}", e);
        }
    }
}

impl Drop for ExecutionHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
