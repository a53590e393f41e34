use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode};

use crate::domain::{GridConfig, GridError, Message};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            event_poll_time: config.event_poll_time,
        }
    }

    pub fn handle_event(&self) -> Result<Option<Message>, GridError> {
        if event::poll(Duration::from_millis(self.event_poll_time))?
            && let Event::Key(key) = event::read()?
                && key.kind == event::KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Message::Quit),
            KeyCode::Left | KeyCode::Char('h') => Some(Message::CursorLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(Message::CursorRight),
            KeyCode::Enter | KeyCode::Char('s') => Some(Message::SortColumn),
            KeyCode::Char('n') | KeyCode::PageDown => Some(Message::NextPage),
            KeyCode::Char('p') | KeyCode::PageUp => Some(Message::PreviousPage),
            KeyCode::Char('r') => Some(Message::Refresh),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
