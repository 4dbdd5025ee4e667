//! Selection cursor: turns cursor actions into swap gestures.
//!
//! The first `Select` picks the cell under the cursor. A `Select` on an
//! adjacent cell picks the second cell and commits the swap at once. Selecting
//! the same cell again drops it, and selecting a cell further away moves the
//! first selection there.

use crate::core::GameState;
use crate::map::CursorAction;
use crate::types::Coord;

/// What applying an action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorOutcome {
    Moved,
    Selected,
    Committed,
    Cancelled,
    Restarted,
    /// The engine refused the gesture (locked, empty cell, session over).
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionCursor {
    pos: Coord,
    width: i32,
    height: i32,
}

impl SelectionCursor {
    /// Cursor for a `width x height` board, starting at the bottom-left cell
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            pos: Coord::new(0, 0),
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn position(&self) -> Coord {
        self.pos
    }

    /// Move by (dx, dy), clamped to the board. Returns false at an edge.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> bool {
        let next = Coord::new(
            (self.pos.x + dx).clamp(0, self.width - 1),
            (self.pos.y + dy).clamp(0, self.height - 1),
        );
        if next == self.pos {
            return false;
        }
        self.pos = next;
        true
    }

    pub fn apply(&mut self, action: CursorAction, game: &mut GameState) -> CursorOutcome {
        match action {
            CursorAction::Move { dx, dy } => {
                if self.move_by(dx, dy) {
                    CursorOutcome::Moved
                } else {
                    CursorOutcome::Ignored
                }
            }
            CursorAction::Select => self.select(game),
            CursorAction::Cancel => {
                game.cancel_selection();
                CursorOutcome::Cancelled
            }
            CursorAction::Restart => {
                if game.restart() {
                    CursorOutcome::Restarted
                } else {
                    CursorOutcome::Ignored
                }
            }
        }
    }

    fn select(&mut self, game: &mut GameState) -> CursorOutcome {
        let Coord { x, y } = self.pos;
        let Some(first) = game.first_selection() else {
            return if game.select_first(x, y) {
                CursorOutcome::Selected
            } else {
                CursorOutcome::Ignored
            };
        };

        if first == self.pos {
            game.cancel_selection();
            return CursorOutcome::Cancelled;
        }

        if game.select_second(x, y) {
            return if game.commit() {
                CursorOutcome::Committed
            } else {
                CursorOutcome::Ignored
            };
        }

        // Not a neighbour: start over from this cell
        game.cancel_selection();
        if game.select_first(x, y) {
            CursorOutcome::Selected
        } else {
            CursorOutcome::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LevelConfig;

    fn game() -> GameState {
        GameState::from_level(LevelConfig {
            width: 4,
            height: 4,
            chance_for_collectible: 0.0,
            fill_y_offset: 0,
            ..LevelConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_cursor_clamps_to_board() {
        let mut cursor = SelectionCursor::new(4, 4);
        assert!(!cursor.move_by(-1, 0));
        assert!(cursor.move_by(0, 1));
        assert!(cursor.move_by(5, 5));
        assert_eq!(cursor.position(), Coord::new(3, 3));
    }

    #[test]
    fn test_select_then_adjacent_commits() {
        let mut game = game();
        let mut cursor = SelectionCursor::new(4, 4);

        assert_eq!(cursor.apply(CursorAction::Select, &mut game), CursorOutcome::Selected);
        cursor.apply(CursorAction::Move { dx: 1, dy: 0 }, &mut game);
        assert_eq!(cursor.apply(CursorAction::Select, &mut game), CursorOutcome::Committed);
        assert!(game.is_locked());
        assert!(game.first_selection().is_none());

        // Input is locked until the swap resolves
        assert_eq!(cursor.apply(CursorAction::Select, &mut game), CursorOutcome::Ignored);
    }

    #[test]
    fn test_far_selection_moves_first() {
        let mut game = game();
        let mut cursor = SelectionCursor::new(4, 4);
        cursor.apply(CursorAction::Select, &mut game);
        cursor.apply(CursorAction::Move { dx: 2, dy: 2 }, &mut game);
        assert_eq!(cursor.apply(CursorAction::Select, &mut game), CursorOutcome::Selected);
        assert_eq!(game.first_selection(), Some(Coord::new(2, 2)));

        assert_eq!(cursor.apply(CursorAction::Select, &mut game), CursorOutcome::Cancelled);
        assert!(game.first_selection().is_none());
    }
}
