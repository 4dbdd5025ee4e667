//! Swap resolution as an explicit stage machine.
//!
//! ```text
//! commit -> EvaluateSwap -+-> Reverting -> Ready
//!                         |
//!                         +-> ClearRound -> Collapse -> AwaitCollapse -> MatchMoved
//!                                 ^                                         |
//!                                 +------------- matches -------------------+
//!                                 |                                         | none
//!                                 |                                         v
//!                                 +--- matches --- CheckBoard <- AwaitRefill <- Refill
//!                                                      | none
//!                                                      v
//!                                                    Ready
//! ```
//!
//! Every stage either arms `delay_ms` (a fixed pacing pause) or waits for the
//! moving pieces to settle before handing over to the next one.

use tracing::{debug, info};

use super::GameState;
use crate::bombs::{color_bomb_triggers, drop_bomb, expand_bombs_chained};
use crate::collectibles::bottom_row_clearable;
use crate::events::BoardEvent;
use crate::matcher::{all_matches, matches_at, matches_at_pieces};
use crate::piece::{Piece, PieceRef, PieceSet};
use crate::scoring::clear_bonus;
use crate::types::{
    Coord, SpecialKind, CLEAR_TO_COLLAPSE_MS, COLLAPSE_MS_PER_CELL, ROUND_DELAY_MS,
};

#[derive(Debug, Clone, Default)]
pub(super) enum Stage {
    #[default]
    Ready,
    EvaluateSwap {
        first: Coord,
        second: Coord,
    },
    Reverting,
    ClearRound {
        set: PieceSet,
    },
    Collapse {
        columns: Vec<i32>,
    },
    AwaitCollapse {
        moving: PieceSet,
    },
    MatchMoved {
        moving: PieceSet,
    },
    Refill,
    AwaitRefill {
        filled: PieceSet,
    },
    CheckBoard,
}

impl GameState {
    /// Swap the two pieces and wait for the swap animation before judging it.
    pub(super) fn begin_swap(&mut self, first: Coord, second: Coord) -> bool {
        if !first.is_adjacent(second) || !self.grid.swap_pieces(first, second) {
            return false;
        }
        self.locked = true;
        self.animate_swap(first, second);
        self.stage = Stage::EvaluateSwap { first, second };
        self.delay_ms = self.config.swap_ms;
        debug!(
            first_x = first.x,
            first_y = first.y,
            second_x = second.x,
            second_y = second.y,
            "swap started"
        );
        true
    }

    fn animate_swap(&mut self, a: Coord, b: Coord) {
        let duration_ms = self.config.swap_ms;
        for c in [a, b] {
            if let Some(piece) = self.grid.piece_mut(c.x, c.y) {
                piece.start_motion(duration_ms);
                let id = piece.id();
                self.events.emit(BoardEvent::PieceMoved {
                    piece: id,
                    to_x: c.x,
                    to_y: c.y,
                    duration_ms,
                });
            }
        }
    }

    /// Run the current stage once. Returns false while waiting on pieces to
    /// settle or when there is nothing to do.
    pub(super) fn step(&mut self) -> bool {
        match std::mem::take(&mut self.stage) {
            Stage::Ready => return false,
            Stage::EvaluateSwap { first, second } => self.evaluate_swap(first, second),
            Stage::Reverting => {
                self.locked = false;
            }
            Stage::ClearRound { set } => self.clear_round(set),
            Stage::Collapse { columns } => self.collapse(&columns),
            Stage::AwaitCollapse { moving } => {
                if !self.grid.is_settled(&moving) {
                    self.stage = Stage::AwaitCollapse { moving };
                    return false;
                }
                self.stage = Stage::MatchMoved { moving };
                self.delay_ms = ROUND_DELAY_MS;
            }
            Stage::MatchMoved { moving } => {
                let mut set = matches_at_pieces(&self.grid, &moving);
                set.union_with(&bottom_row_clearable(&self.grid));
                self.next_round_or(set, Stage::Refill);
            }
            Stage::Refill => {
                let filled = self.refill();
                self.stage = Stage::AwaitRefill { filled };
            }
            Stage::AwaitRefill { filled } => {
                if !self.grid.is_settled(&filled) {
                    self.stage = Stage::AwaitRefill { filled };
                    return false;
                }
                self.stage = Stage::CheckBoard;
                self.delay_ms = ROUND_DELAY_MS;
            }
            Stage::CheckBoard => {
                let mut set = all_matches(&self.grid);
                set.union_with(&bottom_row_clearable(&self.grid));
                if set.is_empty() {
                    self.finish_resolution();
                } else {
                    self.next_round_or(set, Stage::Ready);
                }
            }
        }
        true
    }

    fn evaluate_swap(&mut self, first: Coord, second: Coord) {
        let first_matches = matches_at(&self.grid, first.x, first.y);
        let second_matches = matches_at(&self.grid, second.x, second.y);
        let triggered = color_bomb_triggers(&mut self.grid, first, second);

        let mut set = first_matches.clone();
        set.union_with(&second_matches);
        set.union_with(&triggered);

        if set.is_empty() {
            self.grid.swap_pieces(first, second);
            self.animate_swap(first, second);
            self.events.emit(BoardEvent::SwapRejected { first, second });
            self.stage = Stage::Reverting;
            self.delay_ms = self.config.swap_ms;
            debug!("swap reverted: no match");
            return;
        }

        self.session.consume_move();
        self.resolutions += 1;

        let direction = first.direction_to(second);
        self.pending_bombs.clear();
        for (cell, matched) in [(first, &first_matches), (second, &second_matches)] {
            let Some(mut bomb) = drop_bomb(&self.grid, &mut self.factory, cell.x, cell.y, direction, matched)
            else {
                continue;
            };
            // Takes the color of the partner piece now resting in that cell
            if bomb.special() != SpecialKind::ColorBomb {
                if let Some(partner) = self.grid.piece_at(cell).filter(|p| p.is_matchable()) {
                    bomb.change_color(partner.match_value());
                }
            }
            debug!(x = cell.x, y = cell.y, kind = bomb.special().as_str(), "bomb earned");
            self.pending_bombs.push(bomb);
        }

        self.multiplier = 1;
        debug!(matched = set.len(), moves_left = self.session.moves_left(), "swap accepted");
        self.stage = Stage::ClearRound { set };
        self.delay_ms = ROUND_DELAY_MS;
    }

    /// Start another round for `set`, or move on to `otherwise` if it is empty.
    fn next_round_or(&mut self, set: PieceSet, otherwise: Stage) {
        if set.is_empty() {
            self.stage = otherwise;
            return;
        }
        self.multiplier += 1;
        self.stage = Stage::ClearRound { set };
        self.delay_ms = ROUND_DELAY_MS;
    }

    /// Clear a match set together with bottom-row collectibles and everything
    /// its bombs reach, then place any bombs earned by the swap.
    fn clear_round(&mut self, matched: PieceSet) {
        let bonus = clear_bonus(matched.len());
        let mut seeds = matched;
        seeds.union_with(&bottom_row_clearable(&self.grid));
        let set = expand_bombs_chained(&self.grid, &seeds);

        for r in &set {
            let Some(piece) = self.grid.resolve(*r) else {
                continue;
            };
            if matches!(
                piece.special(),
                SpecialKind::RowBomb | SpecialKind::ColumnBomb | SpecialKind::AdjacentBomb
            ) {
                self.events.emit(BoardEvent::BombTriggered {
                    x: r.coord.x,
                    y: r.coord.y,
                });
            }
        }

        let mut cleared = 0;
        let mut collectibles_cleared = 0;
        for r in &set {
            if let Some(piece) = self.clear_piece(*r, bonus) {
                cleared += 1;
                if piece.is_collectible() {
                    collectibles_cleared += 1;
                }
            }
        }
        self.collectibles.record_cleared(collectibles_cleared);

        for bomb in self.pending_bombs.drain(..) {
            let (x, y) = (bomb.x(), bomb.y());
            if self.grid.is_vacant(x, y) {
                self.grid.place_piece(bomb, x, y);
            } else {
                debug!(x, y, "bomb cell still occupied; bomb discarded");
            }
        }

        info!(
            multiplier = self.multiplier,
            cleared,
            collectibles = collectibles_cleared,
            score = self.score.total(),
            "cascade round"
        );

        self.stage = Stage::Collapse {
            columns: set.columns(),
        };
        self.delay_ms = CLEAR_TO_COLLAPSE_MS;
    }

    /// Remove one piece, score it and hit the tile under it. Stale references
    /// clear nothing.
    fn clear_piece(&mut self, r: PieceRef, bonus: u32) -> Option<Piece> {
        let piece = self.grid.take_piece(r)?;
        let (x, y) = (r.coord.x, r.coord.y);
        self.events.emit(BoardEvent::PieceCleared { x, y });

        let base_points = self.config.piece_score;
        self.score.add(base_points, self.multiplier, bonus);
        self.events.emit(BoardEvent::Score {
            base_points,
            multiplier: self.multiplier,
            bonus,
        });

        if let Some(break_level) = self.grid.break_tile_at(x, y) {
            self.events.emit(BoardEvent::TileBroken { break_level, x, y });
        }
        Some(piece)
    }

    /// Let the affected columns fall and animate every moved piece.
    fn collapse(&mut self, columns: &[i32]) {
        let mut moving = PieceSet::new();
        for &x in columns {
            for (r, distance) in self.grid.collapse_column(x) {
                let duration_ms = COLLAPSE_MS_PER_CELL * distance.unsigned_abs();
                if let Some(piece) = self.grid.piece_mut(r.coord.x, r.coord.y) {
                    piece.start_motion(duration_ms);
                }
                self.events.emit(BoardEvent::PieceMoved {
                    piece: r.id,
                    to_x: r.coord.x,
                    to_y: r.coord.y,
                    duration_ms,
                });
                moving.insert(r);
            }
        }
        self.stage = Stage::AwaitCollapse { moving };
    }

    /// Unlock input and settle the session once the board is quiet.
    fn finish_resolution(&mut self) {
        self.locked = false;
        self.stage = Stage::Ready;
        if let Some(outcome) = self.session.evaluate(self.score.total()) {
            info!(?outcome, score = self.score.total(), "session ended");
            self.events.emit(BoardEvent::SessionEnded { outcome });
        }
        debug!(score = self.score.total(), multiplier = self.multiplier, "board stable");
    }
}
