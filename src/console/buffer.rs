//! The single editable transcript buffer.
//!
//! Everything before the command boundary is immutable history. Everything at
//! or after it is the live command line the user is typing. The boundary only
//! moves forward (when a new prompt is printed) except on a full reset.
//!
//! All offsets exposed by this type are character indices, not byte indices.

/// Suffix printed after the directory to form a prompt.
pub const PROMPT_SUFFIX: &str = "$ ";

/// Builds the prompt text for a directory, e.g. `/tmp$ `.
pub fn prompt(directory: &str) -> String {
    format!("{directory}{PROMPT_SUFFIX}")
}

/// Verdict returned by [`EditableBuffer::guard_edit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditVerdict {
    /// The edit or movement may proceed unchanged.
    Allowed,
    /// The edit would reach into history and must be dropped.
    Rejected,
    /// The caret would land outside the live line; use this position instead.
    Clamped(usize),
}

/// A caret movement request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMove {
    Left,
    Right,
    /// Start of the live command line (the boundary).
    LineStart,
    /// End of the buffer.
    LineEnd,
    /// Absolute character position, e.g. from a pointer click.
    To(usize),
}

#[derive(Debug, Clone)]
pub struct EditableBuffer {
    text: String,
    /// Character length of `text`, cached.
    len: usize,
    command_start: usize,
    caret: usize,
}

impl EditableBuffer {
    /// Creates a buffer holding a single prompt for `directory`.
    pub fn new(directory: &str) -> Self {
        let mut buffer = Self {
            text: String::new(),
            len: 0,
            command_start: 0,
            caret: 0,
        };
        buffer.initialize(directory);
        buffer
    }

    /// Resets the buffer to `"<directory>$ "` with the boundary at its end.
    pub fn initialize(&mut self, directory: &str) {
        self.text = prompt(directory);
        self.len = self.text.chars().count();
        self.command_start = self.len;
        self.caret = self.len;
    }

    /// Discards all history. Same as [`initialize`](Self::initialize).
    pub fn clear(&mut self, directory: &str) {
        self.initialize(directory);
    }

    /// Appends `"\n" + text` without moving the boundary.
    ///
    /// Callers follow this with [`new_prompt`](Self::new_prompt), which turns
    /// the appended text into history.
    pub fn append_history(&mut self, text: &str) {
        self.push_str("\n");
        self.push_str(text);
    }

    /// Prints a fresh prompt on a new line and moves the boundary to the end.
    ///
    /// This is the only operation that advances the boundary.
    pub fn new_prompt(&mut self, directory: &str) {
        self.push_str("\n");
        self.push_str(&prompt(directory));
        self.command_start = self.len;
    }

    /// The live, still-uncommitted command text.
    pub fn pending_command(&self) -> &str {
        &self.text[self.byte_index(self.command_start)..]
    }

    /// Checks a proposed caret position against the boundary.
    ///
    /// For a deletion, `proposed_caret` is the caret position the character
    /// before which would be removed.
    pub fn guard_edit(&self, proposed_caret: usize, is_deletion: bool) -> EditVerdict {
        if is_deletion {
            if proposed_caret <= self.command_start || proposed_caret > self.len {
                return EditVerdict::Rejected;
            }
            return EditVerdict::Allowed;
        }
        if proposed_caret < self.command_start {
            EditVerdict::Clamped(self.command_start)
        } else if proposed_caret > self.len {
            EditVerdict::Clamped(self.len)
        } else {
            EditVerdict::Allowed
        }
    }

    /// Inserts a character at the caret and advances the caret past it.
    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.caret);
        self.text.insert(at, c);
        self.len += 1;
        self.caret += 1;
    }

    /// Removes the character before the caret. Returns false when rejected
    /// at the boundary.
    pub fn delete_backward(&mut self) -> bool {
        if self.guard_edit(self.caret, true) == EditVerdict::Rejected {
            return false;
        }
        let at = self.byte_index(self.caret - 1);
        self.text.remove(at);
        self.len -= 1;
        self.caret -= 1;
        true
    }

    /// Removes the character under the caret. Returns false at the end of the
    /// buffer.
    pub fn delete_forward(&mut self) -> bool {
        if self.caret >= self.len {
            return false;
        }
        let at = self.byte_index(self.caret);
        self.text.remove(at);
        self.len -= 1;
        true
    }

    /// Moves the caret, clamping it into the live command line.
    pub fn move_caret(&mut self, movement: CaretMove) {
        let proposed = match movement {
            CaretMove::Left => self.caret.saturating_sub(1),
            CaretMove::Right => self.caret.saturating_add(1),
            CaretMove::LineStart => self.command_start,
            CaretMove::LineEnd => self.len,
            CaretMove::To(position) => position,
        };
        self.caret = match self.guard_edit(proposed, false) {
            EditVerdict::Clamped(position) => position,
            EditVerdict::Allowed | EditVerdict::Rejected => proposed,
        };
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn command_start(&self) -> usize {
        self.command_start
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.len += s.chars().count();
        self.caret = self.len;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(buffer: &mut EditableBuffer, s: &str) {
        for c in s.chars() {
            buffer.insert(c);
        }
    }

    #[test]
    fn test_initialize_places_boundary_after_prompt() {
        let buffer = EditableBuffer::new("/tmp");
        assert_eq!(buffer.text(), "/tmp$ ");
        assert_eq!(buffer.command_start(), 6);
        assert_eq!(buffer.caret(), 6);
        assert_eq!(buffer.pending_command(), "");
    }

    #[test]
    fn test_pending_command_is_text_after_boundary() {
        let mut buffer = EditableBuffer::new("/tmp");
        typed(&mut buffer, "echo hi");
        assert_eq!(buffer.pending_command(), "echo hi");
        assert_eq!(buffer.text(), "/tmp$ echo hi");
    }

    #[test]
    fn test_append_history_keeps_boundary() {
        let mut buffer = EditableBuffer::new("/tmp");
        typed(&mut buffer, "echo hi");
        let before = buffer.command_start();
        buffer.append_history("hi");
        assert_eq!(buffer.command_start(), before);
        assert_eq!(buffer.text(), "/tmp$ echo hi\nhi");
    }

    #[test]
    fn test_new_prompt_moves_boundary_to_end() {
        let mut buffer = EditableBuffer::new("/tmp");
        typed(&mut buffer, "cd /");
        buffer.append_history("");
        buffer.new_prompt("/");
        assert_eq!(buffer.text(), "/tmp$ cd /\n\n/$ ");
        assert_eq!(buffer.command_start(), buffer.len());
        assert_eq!(buffer.pending_command(), "");
    }

    #[test]
    fn test_new_prompt_then_pending_is_empty() {
        let mut buffer = EditableBuffer::new("/a");
        typed(&mut buffer, "ls");
        buffer.new_prompt("/b");
        assert!(buffer.pending_command().is_empty());
    }

    #[test]
    fn test_backspace_rejected_at_boundary() {
        let mut buffer = EditableBuffer::new("/tmp");
        assert_eq!(buffer.guard_edit(buffer.command_start(), true), EditVerdict::Rejected);
        assert!(!buffer.delete_backward());
        assert_eq!(buffer.text(), "/tmp$ ");
    }

    #[test]
    fn test_backspace_allowed_after_boundary() {
        let mut buffer = EditableBuffer::new("/tmp");
        typed(&mut buffer, "ab");
        for caret in buffer.command_start() + 1..=buffer.len() {
            assert_eq!(buffer.guard_edit(caret, true), EditVerdict::Allowed);
        }
        assert!(buffer.delete_backward());
        assert!(buffer.delete_backward());
        assert!(!buffer.delete_backward());
        assert_eq!(buffer.text(), "/tmp$ ");
    }

    #[test]
    fn test_caret_movement_clamped_to_boundary() {
        let mut buffer = EditableBuffer::new("/tmp");
        typed(&mut buffer, "ls");
        assert_eq!(buffer.guard_edit(0, false), EditVerdict::Clamped(6));
        buffer.move_caret(CaretMove::To(2));
        assert_eq!(buffer.caret(), 6);
        buffer.move_caret(CaretMove::Left);
        assert_eq!(buffer.caret(), 6);
        buffer.move_caret(CaretMove::To(100));
        assert_eq!(buffer.caret(), buffer.len());
    }

    #[test]
    fn test_insert_in_middle_of_line() {
        let mut buffer = EditableBuffer::new("/");
        typed(&mut buffer, "eco");
        buffer.move_caret(CaretMove::Left);
        buffer.insert('h');
        buffer.move_caret(CaretMove::LineEnd);
        typed(&mut buffer, " é");
        assert_eq!(buffer.pending_command(), "echo é");
        buffer.move_caret(CaretMove::LineStart);
        assert_eq!(buffer.caret(), buffer.command_start());
        assert!(buffer.delete_forward());
        assert_eq!(buffer.pending_command(), "cho é");
    }

    #[test]
    fn test_multibyte_history_offsets() {
        let mut buffer = EditableBuffer::new("/home/ünï");
        buffer.append_history("héllo wörld");
        buffer.new_prompt("/home/ünï");
        typed(&mut buffer, "ls");
        assert_eq!(buffer.pending_command(), "ls");
        assert_eq!(buffer.len(), buffer.text().chars().count());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut buffer = EditableBuffer::new("/tmp");
        typed(&mut buffer, "echo hi");
        buffer.append_history("hi");
        buffer.new_prompt("/tmp");
        buffer.clear("/tmp");
        let once = buffer.clone();
        buffer.clear("/tmp");
        assert_eq!(buffer.text(), once.text());
        assert_eq!(buffer.command_start(), once.command_start());
        assert_eq!(buffer.text(), "/tmp$ ");
    }
}
