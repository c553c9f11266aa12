//! Key event routing for the console.
//!
//! Raw crossterm key events are translated into [`Action`]s here so the
//! session state machine never sees host key codes.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::console::CaretMove;

/// Something the user asked the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Run the pending command line.
    Execute,
    /// Interrupt the running command, or abandon the pending line.
    Cancel,
    /// Clear the screen back to a single prompt.
    Clear,
    Quit,
    Insert(char),
    DeleteBackward,
    DeleteForward,
    MoveCaret(CaretMove),
}

/// Maps a key event to an action. Returns `None` for key releases and keys
/// the console does not handle.
///
/// | Key            | Action           |
/// |----------------|------------------|
/// | Enter          | `Execute`        |
/// | Ctrl+C         | `Cancel`         |
/// | Ctrl+L         | `Clear`          |
/// | Ctrl+Q, Esc    | `Quit`           |
/// | Backspace      | `DeleteBackward` |
/// | Delete         | `DeleteForward`  |
/// | arrows, Home/End, Ctrl+A/E | `MoveCaret` |
pub fn route_key(key_event: KeyEvent) -> Option<Action> {
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    let KeyEvent { code, modifiers, .. } = key_event;

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);

    let action = match code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'c' => Action::Cancel,
            'l' => Action::Clear,
            'q' => Action::Quit,
            'a' => Action::MoveCaret(CaretMove::LineStart),
            'e' => Action::MoveCaret(CaretMove::LineEnd),
            _ => return None,
        },
        KeyCode::Char(_) if alt => return None,
        KeyCode::Char(c) => Action::Insert(c),
        KeyCode::Enter => Action::Execute,
        KeyCode::Esc => Action::Quit,
        KeyCode::Backspace => Action::DeleteBackward,
        KeyCode::Delete => Action::DeleteForward,
        KeyCode::Left => Action::MoveCaret(CaretMove::Left),
        KeyCode::Right => Action::MoveCaret(CaretMove::Right),
        KeyCode::Home => Action::MoveCaret(CaretMove::LineStart),
        KeyCode::End => Action::MoveCaret(CaretMove::LineEnd),
        _ => return None,
    };
    Some(action)
}
