//! Terminal front end
//!
//! `run` owns the terminal for one session: raw mode and the alternate screen are
//! entered here and always restored by [`TerminalGuard`], even on error.

pub mod app;
pub mod input;
pub mod mode;
pub mod render;
pub mod text_input;

pub use app::{BrowserApp, Flow};
pub use mode::Mode;
pub use text_input::TextInput;

use crate::config::BrowserSettings;
use crate::error::BrowserError;
use crate::session::Session;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::{Duration, Instant};
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Browse `session` until the user quits.
pub fn run(session: Session, settings: &BrowserSettings) -> Result<(), BrowserError> {
    let mut app = BrowserApp::new(session, settings);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        app.expire_status(Instant::now());
        terminal.draw(|f| render::draw(f, &mut app))?;
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                continue;
            }
            if app.handle_key(key) == Flow::Quit {
                break;
            }
        }
    }

    info!(db = %app.session().db_path().display(), "Browser closed");
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}
