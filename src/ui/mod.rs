//! User interface for the console window.
//!
//! The window is a single bordered pane. The top border carries the title and
//! session state, the bottom border the current directory and the last exit
//! code. The transcript itself is drawn by [`console::ConsoleView`].

use ratatui::{
    layout::Rect,
    style::Stylize,
    text::Line,
    widgets::{Block, Borders, Widget},
};

use crate::app::App;
use crate::session::SessionState;

pub mod console;

pub use console::ConsoleView;

/// Area inside the window border where the transcript is drawn.
pub fn transcript_area(area: Rect) -> Rect {
    Block::new().borders(Borders::ALL).inner(area)
}

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "IDLE",
        SessionState::Running => "RUNNING",
        SessionState::Closed => "CLOSED",
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut ratatui::prelude::Buffer) {
        let session = self.session();
        let title = format!(" {} [{}] ", self.title(), state_label(session.state()));
        let top = Line::from(title.bold());

        let dir = session.current_directory();
        let status = match session.command_log().last() {
            Some(record) => match record.exit_code {
                Some(code) => format!(" {dir} | last: {} ({code}) ", record.outcome),
                None => format!(" {dir} | last: {} ", record.outcome),
            },
            None => format!(" {dir} "),
        };

        let outer_block = Block::new()
            .borders(Borders::ALL)
            .title(top)
            .title_bottom(Line::from(status).dim());
        let inner_area = outer_block.inner(area);
        outer_block.render(area, buf);

        ConsoleView::new(session.buffer()).render(inner_area, buf);
    }
}
