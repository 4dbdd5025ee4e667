//! Terminal rendering for the match-3 board.
//!
//! The board is drawn into a plain framebuffer, two columns per cell, and the
//! renderer flushes only the cells that changed since the previous frame.
//! Nothing here touches engine state; views render from a `BoardSnapshot`.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_match3_core as core;
pub use tui_match3_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{changed_runs, encode_diff_into, encode_full_into, Run, TerminalRenderer};
