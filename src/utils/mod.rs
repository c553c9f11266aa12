//! Utility modules for common functionality.
//!
//! Logging setup and the terminal restore guard used by `main`.

pub mod guard;
pub mod logger;
