//! Transcript buffer with a protected history region.
//!
//! The buffer is only ever mutated from the control task; workers hand their
//! results back as messages instead of writing here.

mod buffer;

pub use buffer::{prompt, CaretMove, EditVerdict, EditableBuffer, PROMPT_SUFFIX};
