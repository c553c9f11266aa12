//! Renders the transcript buffer and locates the caret on screen.

use ratatui::prelude::{Buffer, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};
use unicode_width::UnicodeWidthChar;

use crate::console::EditableBuffer;

const TAB_WIDTH: usize = 8;

/// The buffer broken into screen rows for a given width.
#[derive(Debug, PartialEq, Eq)]
pub struct WrappedText {
    pub rows: Vec<String>,
    /// Caret as (row, column), column in display cells.
    pub caret: (usize, usize),
}

/// Hard-wraps `text` at `width` display cells, tracking where the character
/// index `caret` lands.
pub fn wrap(text: &str, caret: usize, width: usize) -> WrappedText {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut col = 0usize;
    let mut caret_at = None;

    for (i, c) in text.chars().enumerate() {
        if c == '\n' {
            if i == caret {
                caret_at = Some((rows.len(), col));
            }
            rows.push(std::mem::take(&mut row));
            col = 0;
            continue;
        }

        let (glyph, w) = match c {
            '\t' => (None, TAB_WIDTH - col % TAB_WIDTH),
            c if c.is_control() => (Some(' '), 1),
            c => (Some(c), c.width().unwrap_or(0)),
        };
        if col + w > width && col > 0 {
            rows.push(std::mem::take(&mut row));
            col = 0;
        }
        if i == caret {
            caret_at = Some((rows.len(), col));
        }
        match glyph {
            Some(g) => row.push(g),
            None => row.extend(std::iter::repeat_n(' ', w.min(width))),
        }
        col += w;
    }

    let caret = match caret_at {
        Some(at) => at,
        None if col >= width => {
            rows.push(std::mem::take(&mut row));
            (rows.len(), 0)
        }
        None => (rows.len(), col),
    };
    rows.push(row);
    WrappedText { rows, caret }
}

/// First visible row: follow the bottom of the transcript, but never scroll
/// the caret off the top.
fn scroll_offset(wrapped: &WrappedText, height: usize) -> usize {
    wrapped
        .rows
        .len()
        .saturating_sub(height.max(1))
        .min(wrapped.caret.0)
}

pub struct ConsoleView<'a> {
    buffer: &'a EditableBuffer,
}

impl<'a> ConsoleView<'a> {
    pub fn new(buffer: &'a EditableBuffer) -> Self {
        Self { buffer }
    }

    fn wrapped(&self, area: Rect) -> WrappedText {
        wrap(self.buffer.text(), self.buffer.caret(), area.width as usize)
    }

    /// Screen position of the caret inside `area`, if it is visible.
    pub fn cursor_position(&self, area: Rect) -> Option<(u16, u16)> {
        if area.width == 0 || area.height == 0 {
            return None;
        }
        let wrapped = self.wrapped(area);
        let offset = scroll_offset(&wrapped, area.height as usize);
        let (row, col) = wrapped.caret;
        let row = u16::try_from(row.checked_sub(offset)?).ok()?;
        let col = u16::try_from(col).ok()?;
        (row < area.height && col < area.width).then(|| (area.x + col, area.y + row))
    }
}

impl Widget for ConsoleView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let wrapped = self.wrapped(area);
        let offset = scroll_offset(&wrapped, area.height as usize);
        let lines: Vec<Line> = wrapped
            .rows
            .into_iter()
            .skip(offset)
            .take(area.height as usize)
            .map(Line::from)
            .collect();
        Paragraph::new(lines).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_splits_on_newlines() {
        let wrapped = wrap("/tmp$ echo hi\nhi\n/tmp$ ", 23, 80);
        assert_eq!(wrapped.rows, vec!["/tmp$ echo hi", "hi", "/tmp$ "]);
        assert_eq!(wrapped.caret, (2, 6));
    }

    #[test]
    fn test_wrap_long_line() {
        let wrapped = wrap("abcdefg", 7, 3);
        assert_eq!(wrapped.rows, vec!["abc", "def", "g"]);
        assert_eq!(wrapped.caret, (2, 1));
    }

    #[test]
    fn test_caret_at_exact_width_moves_to_next_row() {
        let wrapped = wrap("abc", 3, 3);
        assert_eq!(wrapped.rows, vec!["abc", ""]);
        assert_eq!(wrapped.caret, (1, 0));
    }

    #[test]
    fn test_wide_characters_wrap_by_cells() {
        let wrapped = wrap("日本語", 1, 4);
        assert_eq!(wrapped.rows, vec!["日本", "語"]);
        assert_eq!(wrapped.caret, (0, 2));
    }

    #[test]
    fn test_tab_expands() {
        let wrapped = wrap("a\tb", 2, 80);
        assert_eq!(wrapped.rows, vec!["a       b"]);
        assert_eq!(wrapped.caret, (0, 8));
    }

    #[test]
    fn test_cursor_follows_bottom() {
        let mut buffer = EditableBuffer::new("/");
        for i in 0..10 {
            buffer.append_history(&format!("line {i}"));
        }
        buffer.new_prompt("/");
        let view = ConsoleView::new(&buffer);
        let area = Rect::new(1, 1, 20, 4);
        assert_eq!(view.cursor_position(area), Some((1 + 3, 1 + 3)));
    }

    #[test]
    fn test_render_shows_last_rows() {
        let mut buffer = EditableBuffer::new("/");
        buffer.append_history("out");
        buffer.new_prompt("/");
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        ConsoleView::new(&buffer).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "o");
        assert_eq!(buf[(0, 1)].symbol(), "/");
        assert_eq!(buf[(1, 1)].symbol(), "$");
    }
}
