//! RustyConsole - a line-oriented terminal in a single editable buffer
//!
//! The user types a command after a prompt and presses Enter; the command runs
//! in a subordinate `sh`, its output is appended to the transcript, the
//! working directory the shell ends in is tracked, and a new prompt is printed.
//!
//! This library provides:
//! - [`console`]: the transcript buffer and its protected history boundary
//! - [`shell`]: spawning, capturing and cancelling subordinate shells
//! - [`session`]: the state machine tying the two together
//! - [`event`]: input routing and the worker-to-control-loop channel
//! - [`ui`] and [`app`]: the ratatui front end
//!
//! # Example
//!
//! ```no_run
//! use rusty_console::event::{init_app_eventsource, Action};
//! use rusty_console::session::SessionController;
//! use rusty_console::shell::ShellRunner;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (event_sink, mut events) = init_app_eventsource();
//!     let runner = ShellRunner::default();
//!     let mut session = SessionController::new("/tmp".to_string(), runner, event_sink);
//!
//!     for c in "echo hi".chars() {
//!         session.dispatch(Action::Insert(c));
//!     }
//!     session.dispatch(Action::Execute);
//!
//!     // The worker posts its outcome; only the owner of the session applies it.
//!     if let Some(event) = events.recv().await {
//!         session.handle_app_event(event);
//!     }
//!     assert_eq!(session.buffer().text(), "/tmp$ echo hi\nhi\n/tmp$ ");
//! }
//! ```

pub mod app;
pub mod config;
pub mod console;
pub mod event;
pub mod session;
pub mod shell;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use app::App;
pub use config::ConsoleConfig;
pub use console::EditableBuffer;
pub use event::{init_app_eventsource, init_user_event, Action, AppEvent, UserEvent};
pub use session::{SessionController, SessionState};
pub use shell::{Outcome, ShellRunner};
