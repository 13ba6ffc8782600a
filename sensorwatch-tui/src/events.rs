//! Terminal event handling.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Ignore key releases (Windows terminals report both).
    if key.kind == KeyEventKind::Release {
        return;
    }

    // A blocking alert captures all input until dismissed.
    if app.alert.is_some() {
        app.dismiss_alert();
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab | KeyCode::BackTab => app.next_view(),
        KeyCode::Char('1') => app.set_view(View::Dashboard),
        KeyCode::Char('2') => app.set_view(View::History),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Right | KeyCode::Char('l') => {
            app.next_view()
        }

        // Connection lifecycle
        KeyCode::Char('c') => app.toggle_connection(),
        KeyCode::Char('m') => app.cycle_mode(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_interval(250),
        KeyCode::Char('-') => app.adjust_interval(-250),

        // Actuator
        KeyCode::Char('a') => app.toggle_actuator(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}
