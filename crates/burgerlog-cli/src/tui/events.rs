//! Keyboard handling for the ledger browser.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};

use crate::tui::app::{Action, App, Screen};

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next_event(&mut self) -> anyhow::Result<TuiEvent> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => Ok(TuiEvent::Key(key)),
                Event::Resize(w, h) => Ok(TuiEvent::Resize(w, h)),
                _ => Ok(TuiEvent::Tick),
            }
        } else {
            Ok(TuiEvent::Tick)
        }
    }
}

/// Applies a key to the app and returns ledger work, if any.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Option<Action> {
    if app.pending_delete.is_some() {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete(),
            _ => {
                app.cancel_delete();
                None
            }
        };
    }
    if app.filtering {
        handle_filter_keys(app, key);
        return None;
    }
    handle_normal_keys(app, key)
}

fn handle_filter_keys(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Enter => app.filtering = false,
        KeyCode::Backspace => app.pop_filter(),
        KeyCode::Char(c) => app.push_filter(c),
        KeyCode::Up => app.select_prev(),
        KeyCode::Down => app.select_next(),
        _ => {}
    }
}

fn handle_normal_keys(app: &mut App, key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => app.next_screen(),
        KeyCode::Char('1') => app.current_screen = Screen::Cards,
        KeyCode::Char('2') => app.current_screen = Screen::Table,
        KeyCode::Char('/') => app.filtering = true,
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('r') => return Some(Action::Reload),
        _ => {}
    }
    None
}
