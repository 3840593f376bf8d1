use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the keyboard is currently driving; the same key means different things per mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Login,
    Dashboard,
    /// Typing a path into the upload prompt
    Prompt,
    /// A modal alert is open
    Alert,
}

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    Submit,
    Cancel,
    NextField,
    ToggleRemember,
    Guest,
    Input(char),
    DeleteChar,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    SwitchTab,
    /// 1-based table column
    SortColumn(usize),
    StartUpload,
    Export,
    Logout,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration, mode: InputMode) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        return Ok(key_to_action(key, mode));
    }
    Ok(Action::None)
}

pub fn key_to_action(key: KeyEvent, mode: InputMode) -> Action {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return Action::Quit;
    }

    match mode {
        InputMode::Login => login_action(key),
        InputMode::Dashboard => dashboard_action(key),
        InputMode::Prompt => prompt_action(key),
        InputMode::Alert => match key.code {
            KeyCode::Enter | KeyCode::Esc => Action::Cancel,
            _ => Action::None,
        },
    }
}

fn login_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => Action::NextField,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::ToggleRemember,
        (KeyCode::Char('g'), KeyModifiers::CONTROL) => Action::Guest,
        (KeyCode::Backspace, _) => Action::DeleteChar,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::Input(c)
        }
        _ => Action::None,
    }
}

fn dashboard_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,

        // History navigation (Vim style too)
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Action::MoveUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,
        (KeyCode::Enter, _) => Action::Submit,

        (KeyCode::Tab, _) => Action::SwitchTab,
        (KeyCode::Char(c @ '1'..='5'), KeyModifiers::NONE) => {
            Action::SortColumn(c as usize - '0' as usize)
        }

        (KeyCode::Char('u'), KeyModifiers::NONE) => Action::StartUpload,
        (KeyCode::Char('e'), KeyModifiers::NONE) => Action::Export,
        (KeyCode::Char('o'), KeyModifiers::NONE) => Action::Logout,

        _ => Action::None,
    }
}

fn prompt_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::Cancel,
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Backspace, _) => Action::DeleteChar,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::Input(c)
        }
        _ => Action::None,
    }
}
