//! Event handling system for the application.
//!
//! Two channels feed the control loop:
//!
//! - **User Events**: raw terminal input, read on a dedicated thread so the
//!   loop never blocks on the terminal.
//! - **App Events**: messages from background workers. A worker finishing a
//!   command posts its [`Outcome`] here instead of touching the buffer, so
//!   every buffer mutation happens on the control loop.
//!
//! # Submodules
//!
//! - `input`: maps key events to session [`Action`]s

pub mod input;

pub use input::{route_key, Action};

use std::io::Result;
use std::thread;
use std::time::Duration;

use tokio::sync::mpsc::{self, Receiver, UnboundedReceiver, UnboundedSender};

use crate::shell::{ExecutionId, Outcome};

/// Type alias for user input events from the terminal.
pub type UserEvent = crossterm::event::Event;

/// Initializes the user event stream.
///
/// Spawns a thread that blocks on `crossterm::event::read()` and forwards each
/// event. The thread exits once the receiver is dropped.
pub fn init_user_event() -> Receiver<Result<UserEvent>> {
    let (tx, rx) = mpsc::channel(64);
    thread::spawn(move || {
        loop {
            if tx.blocking_send(crossterm::event::read()).is_err() {
                break;
            }
        }
    });
    rx
}

/// Application-wide events for inter-component communication.
#[non_exhaustive]
#[derive(Debug)]
pub enum AppEvent {
    /// A worker finished an execution. Posted exactly once per execution,
    /// including cancelled ones.
    ExecutionFinished {
        id: ExecutionId,
        outcome: Outcome,
        elapsed: Duration,
    },
}

/// Initializes the application event system.
///
/// Unbounded because at most one outcome is in flight per execution and the
/// sender must never block a worker.
pub fn init_app_eventsource() -> (UnboundedSender<AppEvent>, UnboundedReceiver<AppEvent>) {
    mpsc::unbounded_channel()
}
