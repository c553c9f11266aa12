//! The session state machine.
//!
//! ```text
//!            execute (non-blank)
//!   Idle ─────────────────────────▶ Running
//!    ▲                                 │
//!    └──── outcome / cancel ◀──────────┘
//!
//!   any ── quit ──▶ Closed
//! ```
//!
//! The controller is the only writer of the buffer and the current directory,
//! and owns the single active-execution slot. Workers report back through
//! [`AppEvent::ExecutionFinished`]; outcomes for an execution that is no longer
//! active (it was cancelled) are dropped.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::console::EditableBuffer;
use crate::event::{Action, AppEvent};
use crate::shell::{ExecutionHandle, ExecutionId, Outcome, ShellRunner};

use super::CommandLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    /// Quit was requested. Terminal state.
    Closed,
}

pub struct SessionController {
    buffer: EditableBuffer,
    current_directory: String,
    active: Option<ExecutionHandle>,
    /// Cancelled executions whose workers may still be killing their shell.
    retired: Vec<ExecutionHandle>,
    next_id: ExecutionId,
    closed: bool,
    runner: ShellRunner,
    event_sink: UnboundedSender<AppEvent>,
    command_log: CommandLog,
}

impl SessionController {
    /// Starts a session in `directory` with a single prompt.
    pub fn new(
        directory: String,
        runner: ShellRunner,
        event_sink: UnboundedSender<AppEvent>,
    ) -> Self {
        info!(directory = %directory, shell = runner.shell(), "Session started");
        Self {
            buffer: EditableBuffer::new(&directory),
            current_directory: directory,
            active: None,
            retired: Vec::new(),
            next_id: 1,
            closed: false,
            runner,
            event_sink,
            command_log: CommandLog::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        if self.closed {
            SessionState::Closed
        } else if self.active.is_some() {
            SessionState::Running
        } else {
            SessionState::Idle
        }
    }

    pub fn buffer(&self) -> &EditableBuffer {
        &self.buffer
    }

    pub fn current_directory(&self) -> &str {
        &self.current_directory
    }

    pub fn active_execution(&self) -> Option<&ExecutionHandle> {
        self.active.as_ref()
    }

    pub fn command_log(&self) -> &CommandLog {
        &self.command_log
    }

    /// Applies one user action.
    pub fn dispatch(&mut self, action: Action) {
        if self.closed {
            return;
        }
        let idle = self.active.is_none();
        match action {
            Action::Execute => {
                self.execute();
            }
            Action::Cancel => self.cancel(),
            Action::Clear => self.clear(),
            Action::Quit => self.quit(),
            // The live line belongs to the running command until it finishes.
            Action::Insert(_) | Action::DeleteBackward | Action::DeleteForward if !idle => {}
            Action::Insert(c) => self.buffer.insert(c),
            Action::DeleteBackward => {
                if !self.buffer.delete_backward() {
                    debug!("Backspace rejected at command boundary");
                }
            }
            Action::DeleteForward => {
                self.buffer.delete_forward();
            }
            Action::MoveCaret(movement) => self.buffer.move_caret(movement),
        }
    }

    /// Starts the pending command. Returns false when nothing was started:
    /// the line is blank, a command is already running, or the session is
    /// closed.
    pub fn execute(&mut self) -> bool {
        if self.closed {
            return false;
        }
        if let Some(active) = &self.active {
            debug!(id = active.id(), "Execute ignored, command already running");
            return false;
        }
        let command = self.buffer.pending_command();
        if command.trim().is_empty() {
            return false;
        }
        let command = command.to_string();

        let id = self.next_id;
        self.next_id += 1;
        info!(id, dir = %self.current_directory, "Executing `{}`", command);

        let handle = self.runner.spawn(
            id,
            command,
            PathBuf::from(&self.current_directory),
            self.event_sink.clone(),
        );
        self.active = Some(handle);
        true
    }

    /// Cancels the running command, or abandons the pending line when idle.
    ///
    /// Either way a fresh prompt is printed and nothing is appended to
    /// history. The slot is cleared immediately, so a new command can be
    /// started before the killed process has been reaped.
    pub fn cancel(&mut self) {
        if self.closed {
            return;
        }
        match self.active.take() {
            Some(handle) => {
                handle.cancel();
                info!(id = handle.id(), "Cancelled `{}`", handle.command());
                self.command_log.record(
                    handle.id(),
                    handle.command(),
                    &Outcome::Cancelled,
                    handle.elapsed(),
                );
                self.retire(handle);
            }
            None => debug!("Pending line abandoned"),
        }
        self.buffer.new_prompt(&self.current_directory);
    }

    /// Resets the transcript to a single prompt. Ignored while running.
    pub fn clear(&mut self) {
        if self.closed || self.active.is_some() {
            return;
        }
        self.buffer.clear(&self.current_directory);
    }

    /// Ends the session. Any running command is killed; call
    /// [`shutdown`](Self::shutdown) before exiting to wait for that.
    pub fn quit(&mut self) {
        if self.closed {
            return;
        }
        if let Some(handle) = self.active.take() {
            info!(id = handle.id(), "Killing `{}` on quit", handle.command());
            handle.cancel();
            self.retire(handle);
        }
        self.closed = true;
        info!("Session closed");
    }

    /// Kills every execution still alive and waits until each shell has been
    /// reaped.
    pub async fn shutdown(&mut self) {
        if let Some(handle) = self.active.take() {
            self.retire(handle);
        }
        let retired = std::mem::take(&mut self.retired);
        debug!(count = retired.len(), "Waiting for execution workers");
        for handle in retired {
            handle.shutdown().await;
        }
    }

    fn retire(&mut self, handle: ExecutionHandle) {
        self.retired.retain(|h| !h.is_finished());
        self.retired.push(handle);
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ExecutionFinished {
                id,
                outcome,
                elapsed,
            } => self.on_outcome(id, outcome, elapsed),
        }
    }

    /// Applies a worker's outcome to the transcript.
    pub fn on_outcome(&mut self, id: ExecutionId, outcome: Outcome, elapsed: Duration) {
        let Some(handle) = self.active.take_if(|active| active.id() == id) else {
            debug!(id, outcome = outcome.kind(), "Dropping outcome of inactive execution");
            return;
        };
        info!(id, outcome = outcome.kind(), ?elapsed, "`{}` finished", handle.command());
        self.command_log.record(id, handle.command(), &outcome, elapsed);

        match outcome {
            Outcome::Succeeded { output, directory } => {
                // Empty output still yields one blank line before the prompt.
                self.buffer.append_history(&output);
                if let Some(directory) = directory {
                    if directory != self.current_directory {
                        debug!(
                            from = %self.current_directory,
                            to = %directory,
                            "Directory changed"
                        );
                    }
                    self.current_directory = directory;
                }
            }
            Outcome::Failed { error_text, .. } => {
                self.buffer.append_history(&error_text);
            }
            Outcome::Cancelled => {}
        }
        self.buffer.new_prompt(&self.current_directory);
    }
}
