//! Key mapping from terminal events to cursor actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the selection cursor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorAction {
    /// Move the cursor by one cell; `dy` is positive toward the top row.
    Move { dx: i32, dy: i32 },
    /// Select the cell under the cursor (first or second selection).
    Select,
    /// Drop the pending selection.
    Cancel,
    Restart,
}

/// Map keyboard input to cursor actions.
pub fn handle_key_event(key: KeyEvent) -> Option<CursorAction> {
    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(CursorAction::Move { dx: -1, dy: 0 })
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(CursorAction::Move { dx: 1, dy: 0 })
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(CursorAction::Move { dx: 0, dy: -1 })
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(CursorAction::Move { dx: 0, dy: 1 })
        }

        // Selection
        KeyCode::Char(' ') | KeyCode::Enter => Some(CursorAction::Select),
        KeyCode::Esc | KeyCode::Backspace => Some(CursorAction::Cancel),

        KeyCode::Char('r') | KeyCode::Char('R') => Some(CursorAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
