//! Snapshot module - a serializable copy of everything a view needs
//!
//! Cells are stored row-major from the bottom row, matching grid coordinates.

use serde::Serialize;

use crate::piece::{Piece, PieceId};
use crate::types::{Coord, InputState, MatchValue, Outcome, SpecialKind, TileKind};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PieceSnapshot {
    pub id: PieceId,
    pub match_value: MatchValue,
    pub special: SpecialKind,
    pub collectible: bool,
    pub visual_x: f32,
    pub visual_y: f32,
}

impl From<&Piece> for PieceSnapshot {
    fn from(piece: &Piece) -> Self {
        let (visual_x, visual_y) = piece.visual();
        Self {
            id: piece.id(),
            match_value: piece.match_value(),
            special: piece.special(),
            collectible: piece.is_collectible(),
            visual_x,
            visual_y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CellSnapshot {
    pub tile: TileKind,
    pub piece: Option<PieceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<CellSnapshot>,
    pub score: u32,
    pub score_goal: u32,
    pub moves_left: u32,
    pub multiplier: u32,
    pub input_state: InputState,
    pub first_selection: Option<Coord>,
    pub second_selection: Option<Coord>,
    pub outcome: Option<Outcome>,
    pub collectibles: u32,
    pub max_collectibles: u32,
}

impl BoardSnapshot {
    /// Cell at (x, y), `None` if out of bounds
    pub fn cell(&self, x: i32, y: i32) -> Option<&CellSnapshot> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        self.cells.get((y * self.width + x) as usize)
    }

    pub fn is_playable(&self) -> bool {
        self.outcome.is_none()
            && matches!(
                self.input_state,
                InputState::AwaitingFirstSelection | InputState::AwaitingSecondSelection
            )
    }

    pub fn is_selected(&self, x: i32, y: i32) -> bool {
        let c = Coord::new(x, y);
        self.first_selection == Some(c) || self.second_selection == Some(c)
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            cells: Vec::new(),
            score: 0,
            score_goal: 0,
            moves_left: 0,
            multiplier: 1,
            input_state: InputState::Idle,
            first_selection: None,
            second_selection: None,
            outcome: None,
            collectibles: 0,
            max_collectibles: 0,
        }
    }
}
