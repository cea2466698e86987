//! Event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit application.
    Quit,
    /// Leave the current screen.
    Back,
    /// Open the selected item.
    Open,
    /// Discard the feed and reload from the first page.
    Refresh,
    /// Move the selection by tiles.
    Move(isize),
    /// Move the selection by rows.
    MoveRows(isize),
    /// Key has no binding.
    Ignored,
}

/// Terminal event handler.
pub struct EventHandler;

impl EventHandler {
    /// Maps a key press to an action.
    #[must_use]
    pub fn action(key: &KeyEvent) -> KeyAction {
        if key.kind != KeyEventKind::Press {
            return KeyAction::Ignored;
        }
        if Self::is_quit_event(key) {
            return KeyAction::Quit;
        }
        if Self::is_submit_event(key) {
            return KeyAction::Open;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Backspace => KeyAction::Back,
            KeyCode::Char('r') | KeyCode::F(5) => KeyAction::Refresh,
            KeyCode::Left | KeyCode::Char('h') => KeyAction::Move(-1),
            KeyCode::Right | KeyCode::Char('l') => KeyAction::Move(1),
            KeyCode::Up | KeyCode::Char('k') => KeyAction::MoveRows(-1),
            KeyCode::Down | KeyCode::Char('j') => KeyAction::MoveRows(1),
            KeyCode::PageUp => KeyAction::MoveRows(-5),
            KeyCode::PageDown => KeyAction::MoveRows(5),
            _ => KeyAction::Ignored,
        }
    }

    /// Checks if key is a quit event.
    #[must_use]
    pub fn is_quit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Char('q'),
                modifiers: KeyModifiers::NONE,
                ..
            } | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            }
        )
    }

    /// Checks if key is a submit event.
    #[must_use]
    pub fn is_submit_event(key: &KeyEvent) -> bool {
        matches!(
            key,
            KeyEvent {
                code: KeyCode::Enter,
                ..
            }
        )
    }
}
