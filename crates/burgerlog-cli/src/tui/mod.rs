//! Interactive ledger browser.
//!
//! Two views over the same records:
//! - cards with the full score breakdown of the selected visit
//! - a compact table of every visit
//!
//! Records can be filtered by venue and deleted after confirmation.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::warn;

use ledger::Ledger;

use crate::commands::Session;

mod app;
mod events;
mod ui;

pub use app::{Action, App};
use events::{EventHandler, TuiEvent};

pub fn run_tui(session: &Session) -> Result<()> {
    if !available() {
        return Err(anyhow::anyhow!("browse needs an interactive terminal"));
    }
    let mut ledger = session.ledger()?;
    let source = format!("{}: {}", session.config.journal.title, ledger.describe());
    let mut app = App::new(ledger.list_all()?, source);

    terminal::enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let mut event_handler = EventHandler::new(Duration::from_millis(250));

    let result = run_event_loop(&mut terminal, &mut app, &mut event_handler, &mut ledger);

    terminal::disable_raw_mode().context("disable raw mode")?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("leave alternate screen")?;
    terminal.show_cursor().context("show cursor")?;

    result
}

fn run_event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_handler: &mut EventHandler,
    ledger: &mut Ledger,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::render(f, app))?;

        if let TuiEvent::Key(key) = event_handler.next_event()? {
            if let Some(action) = events::handle_key_event(app, key) {
                apply_action(app, ledger, action);
            }
        }
    }
    Ok(())
}

/// Runs ledger work for the browser; failures land in the status line.
fn apply_action(app: &mut App, ledger: &mut Ledger, action: Action) {
    let outcome = match &action {
        Action::Delete(id) => ledger.remove(id).map(|removed| {
            if removed {
                format!("Kayıt silindi: {id}")
            } else {
                format!("Kayıt bulunamadı: {id}")
            }
        }),
        Action::Reload => Ok(String::new()),
    };
    let outcome = outcome.and_then(|message| {
        app.set_records(ledger.list_all()?);
        Ok(message)
    });
    match outcome {
        Ok(message) if !message.is_empty() => app.status = message,
        Ok(_) => {}
        Err(err) => {
            warn!("browser action {:?} failed: {err:#}", action);
            app.status = format!("Hata: {err}");
        }
    }
}

/// Checks if the TUI is available (stdout is a terminal)
pub fn available() -> bool {
    atty::is(atty::Stream::Stdout)
}
