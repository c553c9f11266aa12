//! One console session: transcript, working directory and the single
//! in-flight command.

mod command_log;
mod controller;

pub use command_log::{CommandLog, CommandRecord};
pub use controller::{SessionController, SessionState};
