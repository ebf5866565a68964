use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Which part of the screen receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Email,
    Digest,
}

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    ToggleFocus,
    // Email field
    Input(char),
    DeleteChar,
    SaveEmail,
    // Digest panel
    Generate,
    NextTopic,
    PrevTopic,
    AllTopics,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    CopyFinding,
    Dismiss,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration, focus: Focus) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind == KeyEventKind::Press
    {
        return Ok(key_to_action(key, focus));
    }
    Ok(Action::None)
}

pub fn key_to_action(key: KeyEvent, focus: Focus) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Action::Quit,
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => return Action::ToggleFocus,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => return Action::CopyFinding,
        _ => {}
    }

    match focus {
        Focus::Email => email_key(key),
        Focus::Digest => digest_key(key),
    }
}

fn email_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => Action::SaveEmail,
        (KeyCode::Esc, _) => Action::ToggleFocus,
        (KeyCode::Backspace, _) => Action::DeleteChar,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::Input(c)
        }
        _ => Action::None,
    }
}

fn digest_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('g') | KeyCode::Enter => Action::Generate,
        KeyCode::Char('e') => Action::ToggleFocus,
        KeyCode::Right | KeyCode::Char('l') => Action::NextTopic,
        KeyCode::Left | KeyCode::Char('h') => Action::PrevTopic,
        KeyCode::Char('a') => Action::AllTopics,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Char('y') => Action::CopyFinding,
        KeyCode::Esc | KeyCode::Char('x') => Action::Dismiss,
        _ => Action::None,
    }
}
