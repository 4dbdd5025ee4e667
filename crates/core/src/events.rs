//! Events module - notifications from the engine to its collaborators
//!
//! Every effect, animation and score notification is recorded as a
//! [`BoardEvent`]. Events are queued for the driver to drain and, when a
//! [`BoardHooks`] implementation is installed, forwarded to it immediately.
//! Nothing the hooks do feeds back into engine logic.

use serde::Serialize;

use crate::piece::PieceId;
use crate::types::{Coord, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BoardEvent {
    PieceCleared {
        x: i32,
        y: i32,
    },
    BombTriggered {
        x: i32,
        y: i32,
    },
    TileBroken {
        break_level: u8,
        x: i32,
        y: i32,
    },
    /// Advisory animation request; the engine paces itself independently.
    PieceMoved {
        piece: PieceId,
        to_x: i32,
        to_y: i32,
        duration_ms: u32,
    },
    Score {
        base_points: u32,
        multiplier: u32,
        bonus: u32,
    },
    SwapRejected {
        first: Coord,
        second: Coord,
    },
    SessionEnded {
        outcome: Outcome,
    },
}

/// Callback surface for effect, animation and score collaborators.
///
/// All methods default to doing nothing, so an implementation only overrides
/// what it cares about.
pub trait BoardHooks {
    fn on_piece_cleared(&mut self, _x: i32, _y: i32) {}

    fn on_bomb_triggered(&mut self, _x: i32, _y: i32) {}

    fn on_tile_broken(&mut self, _break_level: u8, _x: i32, _y: i32) {}

    fn move_piece(&mut self, _piece: PieceId, _to_x: i32, _to_y: i32, _duration_ms: u32) {}

    fn report_score(&mut self, _base_points: u32, _multiplier: u32, _bonus: u32) {}

    fn on_session_ended(&mut self, _outcome: Outcome) {}
}

/// Event queue plus optional hooks
#[derive(Default)]
pub struct EventBus {
    queue: Vec<BoardEvent>,
    hooks: Option<Box<dyn BoardHooks>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_hooks(&mut self, hooks: Option<Box<dyn BoardHooks>>) {
        self.hooks = hooks;
    }

    pub fn emit(&mut self, event: BoardEvent) {
        if let Some(hooks) = self.hooks.as_mut() {
            match event {
                BoardEvent::PieceCleared { x, y } => hooks.on_piece_cleared(x, y),
                BoardEvent::BombTriggered { x, y } => hooks.on_bomb_triggered(x, y),
                BoardEvent::TileBroken { break_level, x, y } => {
                    hooks.on_tile_broken(break_level, x, y)
                }
                BoardEvent::PieceMoved {
                    piece,
                    to_x,
                    to_y,
                    duration_ms,
                } => hooks.move_piece(piece, to_x, to_y, duration_ms),
                BoardEvent::Score {
                    base_points,
                    multiplier,
                    bonus,
                } => hooks.report_score(base_points, multiplier, bonus),
                BoardEvent::SessionEnded { outcome } => hooks.on_session_ended(outcome),
                BoardEvent::SwapRejected { .. } => {}
            }
        }
        self.queue.push(event);
    }

    /// Take every queued event in emission order
    pub fn drain(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("queue", &self.queue)
            .field("hooks", &self.hooks.is_some())
            .finish()
    }
}
