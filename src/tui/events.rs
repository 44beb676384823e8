//! Keyboard mapping: crossterm key events to controller intents.
//!
//! The same key means different things per state ('p' jumps to PROD on the
//! dashboard but is text while searching), so mapping takes the state.

use crate::catalog::Category;
use crate::tui::types::{Intent, SessionState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key press to an intent, or `None` when the key means nothing here.
#[must_use]
pub fn intent_for(state: SessionState, key: KeyEvent) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Intent::Quit);
    }

    match state {
        SessionState::Splash | SessionState::Summary => Some(match key.code {
            KeyCode::Char('q') if state == SessionState::Summary => Intent::Quit,
            _ => Intent::Dismiss,
        }),
        SessionState::Main => main_key(key.code),
        SessionState::Search => match key.code {
            KeyCode::Enter => Some(Intent::Confirm),
            KeyCode::Esc => Some(Intent::Cancel),
            KeyCode::Backspace => Some(Intent::SearchBackspace),
            KeyCode::Up => Some(Intent::Up),
            KeyCode::Down => Some(Intent::Down),
            KeyCode::Char(c) => Some(Intent::SearchInput(c)),
            _ => None,
        },
        SessionState::Preview => match key.code {
            KeyCode::Enter | KeyCode::Char('y' | 'Y') => Some(Intent::Confirm),
            KeyCode::Esc | KeyCode::Char('q' | 'n' | 'N') => Some(Intent::Cancel),
            _ => None,
        },
        SessionState::Confirm => match key.code {
            KeyCode::Char('y' | 'Y') => Some(Intent::Confirm),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('n' | 'N' | 'q') => {
                Some(Intent::Cancel)
            }
            _ => None,
        },
        // Only Ctrl+C, handled above.
        SessionState::Updating => None,
    }
}

fn main_key(code: KeyCode) -> Option<Intent> {
    let intent = match code {
        KeyCode::Up | KeyCode::Char('k') => Intent::Up,
        KeyCode::Down | KeyCode::Char('j') => Intent::Down,
        KeyCode::Home => Intent::Top,
        KeyCode::End => Intent::Bottom,
        KeyCode::Tab => Intent::NextCategory,
        KeyCode::Char(' ') => Intent::Toggle,
        KeyCode::Char('g' | 'G') => Intent::ToggleGroup,
        KeyCode::Char('a' | 'A') => Intent::ToggleAll,
        KeyCode::Char('/') => Intent::EnterSearch,
        KeyCode::Char('d' | 'D') => Intent::Preview,
        KeyCode::Enter => Intent::Commit,
        KeyCode::Esc => Intent::Cancel,
        KeyCode::Char('q' | 'Q') => Intent::Quit,
        KeyCode::Char(c) => Intent::JumpCategory(Category::from_jump_key(c)?),
        _ => return None,
    };
    Some(intent)
}
