//! Browser state machine: turns key presses into session operations.
//!
//! Failures never escape a key handler; they become a transient status message.

use super::input::{action_for_key, Action};
use super::mode::Mode;
use super::text_input::TextInput;
use crate::config::BrowserSettings;
use crate::error::BrowserError;
use crate::export;
use crate::format::stringify;
use crate::session::Session;
use crate::tree::{Direction, PathKey, Resolved};
use crossterm::event::{KeyCode, KeyEvent};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const HELP_HINT: &str = "Press '?' for help";
const DEFAULT_PAGE_ROWS: usize = 20;

/// What the event loop should do after a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub shown_at: Instant,
}

/// Where the cursor points right now
enum Target {
    Nothing,
    Bucket(PathKey),
    Pair(PathKey),
}

pub struct BrowserApp {
    session: Session,
    mode: Mode,
    status: Option<StatusMessage>,
    message_timeout: Duration,
    no_value: bool,
    split_width: u16,
    detail_scroll: u16,
    page_rows: usize,
}

impl BrowserApp {
    pub fn new(session: Session, settings: &BrowserSettings) -> Self {
        let mut app = Self {
            session,
            mode: Mode::Browsing,
            status: None,
            message_timeout: settings.message_timeout(),
            no_value: settings.no_value,
            split_width: settings.split_width,
            detail_scroll: 0,
            page_rows: DEFAULT_PAGE_ROWS,
        };
        app.ensure_root_prompt();
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn no_value(&self) -> bool {
        self.no_value
    }

    pub fn split_width(&self) -> u16 {
        self.split_width
    }

    pub fn detail_scroll(&self) -> u16 {
        self.detail_scroll
    }

    /// Clamp the detail scroll to what the pane can show.
    pub fn clamp_detail_scroll(&mut self, max: u16) {
        self.detail_scroll = self.detail_scroll.min(max);
    }

    /// Height of the tree pane, used for half-page jumps.
    pub fn set_page_rows(&mut self, rows: usize) {
        self.page_rows = rows.max(1);
    }

    /// Footer text: the last message, or the help hint.
    pub fn status_text(&self) -> &str {
        self.status
            .as_ref()
            .map(|s| s.text.as_str())
            .unwrap_or(HELP_HINT)
    }

    /// Drop the status message once it is older than the configured timeout.
    pub fn expire_status(&mut self, now: Instant) {
        if let Some(status) = &self.status {
            if now.saturating_duration_since(status.shown_at) >= self.message_timeout {
                self.status = None;
            }
        }
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            shown_at: Instant::now(),
        });
    }

    fn report(&mut self, error: &BrowserError) {
        warn!(error = %error, "Operation failed");
        self.set_message(error.to_string());
    }

    fn target(&self) -> Target {
        let Some(cursor) = self.session.cursor() else {
            return Target::Nothing;
        };
        match self.session.forest().resolve(cursor) {
            Resolved::Bucket(..) => Target::Bucket(cursor.clone()),
            Resolved::Pair(..) => Target::Pair(cursor.clone()),
            Resolved::NotFound => Target::Nothing,
        }
    }

    /// An empty writable database can only be used by creating a root bucket.
    fn ensure_root_prompt(&mut self) {
        if self.mode != Mode::Browsing || !self.session.forest().is_empty() {
            return;
        }
        if self.session.is_read_only() {
            if self.status.is_none() {
                self.set_message("Database is empty");
            }
            return;
        }
        self.mode = Mode::InsertingBucket {
            parent: PathKey::root(),
            input: TextInput::new(),
        };
    }

    fn writable(&mut self) -> bool {
        if self.session.is_read_only() {
            self.report(&BrowserError::ReadOnly);
            return false;
        }
        true
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let flow = if self.mode == Mode::Help {
            self.mode = Mode::Browsing;
            Flow::Continue
        } else if matches!(self.mode, Mode::ConfirmingDelete { .. }) {
            self.handle_confirm(key)
        } else if self.mode.is_text_entry() {
            self.handle_text(action_for_key(key, true))
        } else {
            self.handle_browse(action_for_key(key, false))
        };
        if flow == Flow::Continue {
            self.ensure_root_prompt();
        }
        flow
    }

    fn handle_browse(&mut self, action: Action) -> Flow {
        let before = self.session.cursor().cloned();
        match action {
            Action::Quit => return Flow::Quit,
            Action::MoveDown => self.session.move_down(),
            Action::MoveUp => self.session.move_up(),
            Action::MoveTop => self.session.move_to_top(),
            Action::MoveBottom => self.session.move_to_bottom(),
            Action::HalfPageDown => {
                let distance = self.half_page();
                self.session.jump(distance, Direction::Down);
            }
            Action::HalfPageUp => {
                let distance = self.half_page();
                self.session.jump(distance, Direction::Up);
            }
            Action::ScrollDetailDown => self.detail_scroll = self.detail_scroll.saturating_add(1),
            Action::ScrollDetailUp => self.detail_scroll = self.detail_scroll.saturating_sub(1),
            Action::Activate => self.activate(),
            Action::Collapse => {
                if let Err(e) = self.session.collapse_current() {
                    self.report(&e);
                }
            }
            Action::ExpandAll => self.session.expand_all(),
            Action::Reload => self.reload(),
            Action::ToggleHelp => self.mode = Mode::Help,
            Action::StartFilter => {
                self.mode = Mode::Filtering {
                    input: TextInput::with_text(self.session.filter()),
                }
            }
            Action::InsertBucket { at_parent } => {
                if self.writable() {
                    self.mode = Mode::InsertingBucket {
                        parent: self.insert_parent(at_parent),
                        input: TextInput::new(),
                    };
                }
            }
            Action::InsertPair { at_parent } => {
                if self.writable() {
                    self.mode = Mode::InsertingPairKey {
                        parent: self.insert_parent(at_parent),
                        input: TextInput::new(),
                    };
                }
            }
            Action::EditValue => match self.target() {
                Target::Bucket(_) => {
                    self.set_message("Cannot edit a bucket, did you mean to (r)ename?")
                }
                Target::Pair(path) => self.start_edit(path),
                Target::Nothing => {}
            },
            Action::Rename => {
                if let Some(target) = self.session.cursor().cloned() {
                    if self.writable() {
                        let current = target.last().unwrap_or_default().to_string();
                        self.mode = Mode::Renaming {
                            target,
                            input: TextInput::with_text(&current),
                        };
                    }
                }
            }
            Action::Delete => {
                if let Some(target) = self.session.cursor().cloned() {
                    if self.writable() {
                        self.mode = Mode::ConfirmingDelete { target };
                    }
                }
            }
            Action::ExportValue => match self.target() {
                Target::Pair(target) => {
                    self.mode = Mode::ExportingValue {
                        target,
                        input: TextInput::new(),
                    }
                }
                Target::Bucket(path) => self.set_message(format!(
                    "Couldn't do string export on {} (did you mean 'X'?)",
                    stringify(path.last().unwrap_or_default().as_bytes())
                )),
                Target::Nothing => {}
            },
            Action::ExportJson => {
                if let Some(target) = self.session.cursor().cloned() {
                    self.mode = Mode::ExportingJson {
                        target,
                        input: TextInput::new(),
                    };
                }
            }
            _ => {}
        }
        if self.session.cursor() != before.as_ref() {
            self.detail_scroll = 0;
        }
        Flow::Continue
    }

    fn half_page(&self) -> usize {
        (self.page_rows / 2).max(1)
    }

    /// Bucket a new node goes into. A pair cursor stands for its bucket.
    fn insert_parent(&self, at_parent: bool) -> PathKey {
        let base = match self.target() {
            Target::Nothing => return PathKey::root(),
            Target::Bucket(path) => path,
            Target::Pair(path) => path.parent().unwrap_or_default(),
        };
        if at_parent {
            base.parent().unwrap_or_default()
        } else {
            base
        }
    }

    fn activate(&mut self) {
        match self.target() {
            Target::Bucket(path) => {
                if let Err(e) = self.session.toggle(&path) {
                    self.report(&e);
                }
            }
            Target::Pair(path) => self.start_edit(path),
            Target::Nothing => {}
        }
    }

    fn start_edit(&mut self, target: PathKey) {
        if !self.writable() {
            return;
        }
        let value = match self.session.forest().resolve(&target) {
            Resolved::Pair(_, pair) => match std::str::from_utf8(&pair.value) {
                Ok(text) => text.to_string(),
                Err(_) => {
                    self.set_message(format!("'{}' is not text; cannot edit", target));
                    return;
                }
            },
            _ => String::new(),
        };
        self.mode = Mode::EditingValue {
            target,
            input: TextInput::with_text(&value),
        };
    }

    fn reload(&mut self) {
        match self.session.refresh() {
            Ok(()) => {
                let issues = self.session.forest().issues().len();
                if issues > 0 {
                    self.set_message(format!("Reloaded; {} bucket(s) could not be read", issues));
                }
            }
            Err(e) => self.report(&e),
        }
    }

    fn handle_confirm(&mut self, key: KeyEvent) -> Flow {
        let Mode::ConfirmingDelete { target } = std::mem::replace(&mut self.mode, Mode::Browsing)
        else {
            return Flow::Continue;
        };
        if key.code == KeyCode::Char('y') {
            debug!(path = %target, "Delete confirmed");
            if let Err(e) = self.session.delete(&target) {
                self.report(&e);
            }
        }
        Flow::Continue
    }

    fn handle_text(&mut self, action: Action) -> Flow {
        match action {
            Action::Cancel => {
                let root_prompt = matches!(self.mode, Mode::InsertingBucket { .. });
                if root_prompt && self.session.forest().is_empty() {
                    return Flow::Quit;
                }
                self.mode = Mode::Browsing;
            }
            Action::SubmitText => {
                let mode = std::mem::replace(&mut self.mode, Mode::Browsing);
                self.submit(mode);
            }
            other => {
                if let Some(input) = self.mode.input_mut() {
                    match other {
                        Action::InputChar(c) => input.insert(c),
                        Action::Backspace => input.backspace(),
                        Action::CaretLeft => input.left(),
                        Action::CaretRight => input.right(),
                        Action::CaretHome => input.home(),
                        Action::CaretEnd => input.end(),
                        _ => {}
                    }
                }
            }
        }
        Flow::Continue
    }

    fn submit(&mut self, mode: Mode) {
        match mode {
            Mode::Filtering { input } => self.session.set_filter(input.text()),
            Mode::Renaming { target, input } => {
                match self.session.rename(&target, &input.text()) {
                    Ok(_) => self.set_message("Renamed!"),
                    Err(e) => self.report(&e),
                }
            }
            Mode::EditingValue { target, input } => {
                match self.session.update_value(&target, input.text().as_bytes()) {
                    Ok(()) => self.set_message("Pair updated!"),
                    Err(e) => self.report(&e),
                }
            }
            Mode::InsertingBucket { parent, input } => {
                if let Err(e) = self.session.insert_bucket(&parent, &input.text()) {
                    self.report(&e);
                }
            }
            Mode::InsertingPairKey { parent, input } => {
                match self.session.insert_pair(&parent, &input.text(), b"") {
                    Ok(target) => {
                        self.mode = Mode::EditingValue {
                            target,
                            input: TextInput::new(),
                        }
                    }
                    Err(e) => self.report(&e),
                }
            }
            Mode::ExportingValue { target, input } => {
                let file = input.text();
                match export::export_value(self.session.forest(), &target, Path::new(&file)) {
                    Ok(()) => self.set_message(format!("Value exported to file: {}", file)),
                    Err(e) => self.report(&e),
                }
            }
            Mode::ExportingJson { target, input } => {
                let file = input.text();
                match export::export_json(self.session.forest(), &target, Path::new(&file)) {
                    Ok(()) => self.set_message(format!("Value exported to file: {}", file)),
                    Err(e) => self.report(&e),
                }
            }
            Mode::Browsing | Mode::ConfirmingDelete { .. } | Mode::Help => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::time::Duration;
    use tempfile::TempDir;

    fn p(parts: &[&str]) -> PathKey {
        PathKey::from(parts)
    }

    fn open(read_only: bool) -> (TempDir, BrowserApp) {
        let dir = TempDir::new().unwrap();
        let session =
            Session::open(&dir.path().join("db"), Duration::from_secs(1), read_only).unwrap();
        (dir, BrowserApp::new(session, &BrowserSettings::default()))
    }

    fn press(app: &mut BrowserApp, code: KeyCode) -> Flow {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut BrowserApp, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_empty_database_forces_root_prompt() {
        let (_dir, mut app) = open(false);
        assert!(matches!(app.mode(), Mode::InsertingBucket { parent, .. } if parent.is_empty()));
        assert_eq!(press(&mut app, KeyCode::Esc), Flow::Quit);
    }

    #[test]
    fn test_insert_pair_then_edit_value() {
        let (_dir, mut app) = open(false);
        type_text(&mut app, "A");
        assert_eq!(app.mode(), &Mode::Browsing);
        assert_eq!(app.session().cursor(), Some(&p(&["A"])));

        press(&mut app, KeyCode::Char('p'));
        type_text(&mut app, "key");
        assert!(matches!(app.mode(), Mode::EditingValue { target, .. } if *target == p(&["A", "key"])));
        type_text(&mut app, "hello");
        assert_eq!(app.status_text(), "Pair updated!");

        match app.session().forest().resolve(&p(&["A", "key"])) {
            Resolved::Pair(_, pair) => assert_eq!(pair.value, b"hello"),
            _ => panic!("pair missing"),
        }
    }

    #[test]
    fn test_binary_value_is_not_editable() {
        let (_dir, mut app) = open(false);
        type_text(&mut app, "A");
        let raw = [0xff, 0xfe, 0x00, 0x80];
        app.session.insert_pair(&p(&["A"]), "bin", &raw).unwrap();
        assert_eq!(app.session().cursor(), Some(&p(&["A", "bin"])));

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.mode(), &Mode::Browsing);
        assert!(app.status_text().contains("cannot edit"));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode(), &Mode::Browsing);

        match app.session().forest().resolve(&p(&["A", "bin"])) {
            Resolved::Pair(_, pair) => assert_eq!(pair.value, raw),
            _ => panic!("pair missing"),
        }
    }

    #[test]
    fn test_delete_requires_y() {
        let (_dir, mut app) = open(false);
        type_text(&mut app, "A");
        press(&mut app, KeyCode::Char('D'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.session().forest().roots().len(), 1);

        press(&mut app, KeyCode::Char('b'));
        type_text(&mut app, "B");
        press(&mut app, KeyCode::Char('D'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.session().cursor(), Some(&p(&["A"])));
    }

    #[test]
    fn test_errors_become_status_messages() {
        let (_dir, mut app) = open(false);
        type_text(&mut app, "A");
        press(&mut app, KeyCode::Char('B'));
        type_text(&mut app, "A");
        assert!(app.status_text().contains("already exists"));
        assert_eq!(app.mode(), &Mode::Browsing);

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(
            app.status_text(),
            "Cannot edit a bucket, did you mean to (r)ename?"
        );
    }

    #[test]
    fn test_status_expires() {
        let (_dir, mut app) = open(false);
        app.set_message("hi");
        app.expire_status(Instant::now());
        assert_eq!(app.status_text(), "hi");
        app.expire_status(Instant::now() + Duration::from_secs(5));
        assert_eq!(app.status_text(), HELP_HINT);
    }

    #[test]
    fn test_read_only_blocks_edit_modes() {
        let (_dir, mut app) = open(true);
        assert_eq!(app.mode(), &Mode::Browsing);
        assert_eq!(app.status_text(), "Database is empty");
        press(&mut app, KeyCode::Char('b'));
        assert_eq!(app.mode(), &Mode::Browsing);
        assert_eq!(app.status_text(), "Database is in read-only mode");
    }

    #[test]
    fn test_filter_prompt_prefills_current_filter() {
        let (_dir, mut app) = open(false);
        type_text(&mut app, "A");
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "ab");
        assert_eq!(app.session().filter(), "ab");
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode().input().map(|i| i.text()), Some("ab".to_string()));
    }
}
