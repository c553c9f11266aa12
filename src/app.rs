//! Application state management.
//!
//! This module defines the main App struct that owns the console session and
//! both event sources, and runs the control loop. The control loop is the
//! only place the session (and therefore the transcript buffer) is mutated.

use anyhow::{Context, Result};
use crossterm::event::KeyEventKind;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc::{Receiver, UnboundedReceiver};
use tracing::info;

use crate::config::ConsoleConfig;
use crate::event::{init_app_eventsource, init_user_event, route_key, AppEvent, UserEvent};
use crate::session::{SessionController, SessionState};
use crate::shell::ShellRunner;
use crate::ui::{transcript_area, ConsoleView};

pub struct App {
    session: SessionController,
    title: String,

    // events sources
    user_events: Receiver<std::io::Result<UserEvent>>, // User input
    app_events: UnboundedReceiver<AppEvent>,           // Worker outcomes
}

impl App {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let (event_sink, app_events) = init_app_eventsource();
        let directory = config.initial_directory()?;
        let runner = ShellRunner::from_config(config);
        let session = SessionController::new(directory, runner, event_sink);

        Ok(Self {
            session,
            title: config.title.clone(),
            user_events: init_user_event(),
            app_events,
        })
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn should_exit(&self) -> bool {
        self.session.state() == SessionState::Closed
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            if self.should_exit() {
                // Reap killed shells while the runtime is still alive.
                self.session.shutdown().await;
                info!("Leaving control loop");
                break Ok(());
            }
            tokio::select! {
                res = self.user_events.recv() => {
                    let usr_evt = res
                        .with_context(|| anyhow::anyhow!("User event stream is ended."))?;
                    self.handle_user_event(usr_evt?);
                }
                res = self.app_events.recv() => {
                    let app_evt = res
                        .with_context(|| anyhow::anyhow!("App event stream is ended"))?;
                    self.session.handle_app_event(app_evt);
                }
            }
            self.draw(terminal)?;
        }
    }

    pub fn draw(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        terminal.draw(|frame| {
            let area = frame.area();
            use ratatui::widgets::Widget;
            (&*self).render(area, frame.buffer_mut());
        })?;

        self.update_cursor_position(terminal)?;
        Ok(())
    }

    fn update_cursor_position(&self, terminal: &mut DefaultTerminal) -> Result<()> {
        let size = terminal.size()?;
        let area = transcript_area(ratatui::layout::Rect::new(0, 0, size.width, size.height));
        match ConsoleView::new(self.session.buffer()).cursor_position(area) {
            Some(position) => {
                terminal.show_cursor()?;
                terminal.set_cursor_position(position)?;
            }
            None => terminal.hide_cursor()?,
        }
        Ok(())
    }

    fn handle_user_event(&mut self, event: UserEvent) {
        match event {
            UserEvent::Key(key_evt)
                if matches!(key_evt.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
            {
                if let Some(action) = route_key(key_evt) {
                    self.session.dispatch(action);
                }
            }
            // Resize and everything else just trigger the redraw in `run`.
            _ => {}
        }
    }
}
