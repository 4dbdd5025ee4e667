//! Scoring module - per-piece points and the running total
//!
//! Every cleared piece scores `base * multiplier + bonus`. The multiplier
//! starts at 1 for a resolution and grows by one per cascade round. The bonus
//! applies to every piece of a round whose match set, before bomb expansion,
//! had at least `BOMB_MATCH_SIZE` pieces.

use crate::types::{BOMB_MATCH_SIZE, MATCH_BONUS};

/// Bonus awarded per cleared piece in a round that matched `matched` pieces
pub fn clear_bonus(matched: usize) -> u32 {
    if matched >= BOMB_MATCH_SIZE {
        MATCH_BONUS
    } else {
        0
    }
}

pub fn piece_points(base_points: u32, multiplier: u32, bonus: u32) -> u32 {
    base_points.saturating_mul(multiplier).saturating_add(bonus)
}

/// Running score for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreKeeper {
    total: u32,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one score report; returns the points it was worth
    pub fn add(&mut self, base_points: u32, multiplier: u32, bonus: u32) -> u32 {
        let points = piece_points(base_points, multiplier, bonus);
        self.total = self.total.saturating_add(points);
        points
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn reset(&mut self) {
        self.total = 0;
    }
}
