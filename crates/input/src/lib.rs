//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`CursorAction`]s and turns those into
//! `select_first` / `select_second` / `commit` gestures through a
//! [`SelectionCursor`].

pub mod cursor;
pub mod map;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use cursor::{CursorOutcome, SelectionCursor};
pub use map::{handle_key_event, should_quit, CursorAction};
