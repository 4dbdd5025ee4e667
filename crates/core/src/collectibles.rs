//! Collectibles module - spawn budget and bottom-row exit rule
//!
//! Collectibles enter at the top row during fills and leave the board only by
//! reaching row 0. The tracker keeps the live count within the level's budget.

use crate::grid::Grid;
use crate::piece::{Piece, PieceSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectibleTracker {
    count: u32,
    max: u32,
}

impl CollectibleTracker {
    pub fn new(max: u32) -> Self {
        Self { count: 0, max }
    }

    /// Collectibles currently on the board
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// True if another collectible may be spawned
    pub fn has_budget(&self) -> bool {
        self.count < self.max
    }

    /// Count a spawn. Returns false (and counts nothing) when over budget.
    pub fn record_spawn(&mut self) -> bool {
        if !self.has_budget() {
            return false;
        }
        self.count += 1;
        true
    }

    /// Subtract collectibles that actually left the board
    pub fn record_cleared(&mut self, cleared: u32) {
        self.count = self.count.saturating_sub(cleared);
    }

    /// Recount from the grid after level overrides placed collectibles
    /// directly. The budget grows to fit if the level placed more than it
    /// allows.
    pub fn sync_from_grid(&mut self, grid: &Grid) {
        self.count = all_collectibles(grid).len() as u32;
        if self.count > self.max {
            tracing::warn!(
                count = self.count,
                max = self.max,
                "level places more collectibles than its budget; raising budget"
            );
            self.max = self.count;
        }
    }
}

/// Collectibles in row `y`, left to right
pub fn collectibles_in_row(grid: &Grid, y: i32) -> PieceSet {
    (0..grid.width())
        .filter_map(|x| grid.piece(x, y))
        .filter(|p| p.is_collectible())
        .map(Piece::piece_ref)
        .collect()
}

pub fn all_collectibles(grid: &Grid) -> PieceSet {
    grid.pieces()
        .filter(|p| p.is_collectible())
        .map(Piece::piece_ref)
        .collect()
}

/// Collectibles that have reached row 0 and exit there
pub fn bottom_row_clearable(grid: &Grid) -> PieceSet {
    let mut set = collectibles_in_row(grid, 0);
    set.retain(|r| {
        grid.resolve(*r)
            .and_then(Piece::collectible)
            .is_some_and(|c| c.cleared_only_at_bottom_row)
    });
    set
}
