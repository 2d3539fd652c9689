use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveDown,
    MoveUp,
    MoveTop,
    MoveBottom,
    HalfPageDown,
    HalfPageUp,
    Activate,
    Collapse,
    ScrollDetailDown,
    ScrollDetailUp,
    InsertPair { at_parent: bool },
    InsertBucket { at_parent: bool },
    EditValue,
    Rename,
    Delete,
    ExportValue,
    ExportJson,
    StartFilter,
    Reload,
    ExpandAll,
    ToggleHelp,
    Quit,
    SubmitText,
    Cancel,
    Backspace,
    CaretLeft,
    CaretRight,
    CaretHome,
    CaretEnd,
    InputChar(char),
    Noop,
}

pub fn action_for_key(key: KeyEvent, text_mode: bool) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if text_mode {
        return match key.code {
            KeyCode::Char('c') if ctrl => Action::Cancel,
            KeyCode::Enter => Action::SubmitText,
            KeyCode::Esc => Action::Cancel,
            KeyCode::Backspace => Action::Backspace,
            KeyCode::Left => Action::CaretLeft,
            KeyCode::Right => Action::CaretRight,
            KeyCode::Home => Action::CaretHome,
            KeyCode::End => Action::CaretEnd,
            KeyCode::Char(_) if ctrl => Action::Noop,
            KeyCode::Char(c) => Action::InputChar(c),
            _ => Action::Noop,
        };
    }

    if ctrl {
        return match key.code {
            KeyCode::Char('f') => Action::HalfPageDown,
            KeyCode::Char('b') => Action::HalfPageUp,
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Char('c') => Action::Quit,
            _ => Action::Noop,
        };
    }

    match key.code {
        KeyCode::Down => Action::MoveDown,
        KeyCode::Up => Action::MoveUp,
        KeyCode::Right | KeyCode::Enter => Action::Activate,
        KeyCode::Left => Action::Collapse,
        KeyCode::Esc => Action::Quit,
        KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Char('g') => Action::MoveTop,
        KeyCode::Char('G') => Action::MoveBottom,
        KeyCode::Char('l') => Action::Activate,
        KeyCode::Char('h') => Action::Collapse,
        KeyCode::Char('J') => Action::ScrollDetailDown,
        KeyCode::Char('K') => Action::ScrollDetailUp,
        KeyCode::Char('p') => Action::InsertPair { at_parent: false },
        KeyCode::Char('P') => Action::InsertPair { at_parent: true },
        KeyCode::Char('b') => Action::InsertBucket { at_parent: false },
        KeyCode::Char('B') => Action::InsertBucket { at_parent: true },
        KeyCode::Char('e') => Action::EditValue,
        KeyCode::Char('r') => Action::Rename,
        KeyCode::Char('D') => Action::Delete,
        KeyCode::Char('x') => Action::ExportValue,
        KeyCode::Char('X') => Action::ExportJson,
        KeyCode::Char('/') => Action::StartFilter,
        KeyCode::Char('O') => Action::ExpandAll,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Noop,
    }
}
