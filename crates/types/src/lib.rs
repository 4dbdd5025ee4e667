//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no game logic, so they can be shared by the
//! engine, the terminal view and level files alike.
//!
//! # Coordinates
//!
//! Cells are addressed by integer `(x, y)` coordinates:
//!
//! - **x** grows left to right, starting at column 0
//! - **y** grows bottom to top, so row 0 is the bottom row
//!
//! Pieces fall toward row 0 and collectibles leave the board through it.
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds and drive the engine's own pacing.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed driver timestep (~60 FPS) |
//! | `SWAP_MS` | 500 | Swap (and swap-back) animation time |
//! | `FILL_MOVE_MS` | 500 | Drop time for freshly spawned pieces |
//! | `COLLAPSE_MS_PER_CELL` | 100 | Collapse time per cell fallen |
//! | `ROUND_DELAY_MS` | 200 | Pause before a clear round and after a settle |
//! | `CLEAR_TO_COLLAPSE_MS` | 250 | Pause between clearing and collapsing |
//!
//! # Examples
//!
//! ```
//! use tui_match3_types::{Coord, MatchValue, SpecialKind};
//!
//! let color = MatchValue::from_str("teal").unwrap();
//! assert_eq!(color, MatchValue::Teal);
//! assert!(color.is_color());
//! assert!(!MatchValue::None.is_color());
//!
//! assert!(SpecialKind::RowBomb.is_bomb());
//! assert!(Coord::new(2, 3).is_adjacent(Coord::new(2, 4)));
//! assert!(!Coord::new(2, 3).is_adjacent(Coord::new(3, 4)));
//! ```

use serde::{Deserialize, Serialize};

/// Default board width in cells
pub const DEFAULT_WIDTH: i32 = 8;

/// Default board height in cells
pub const DEFAULT_HEIGHT: i32 = 9;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Swap animation time; the engine waits this long before evaluating a swap.
pub const SWAP_MS: u32 = 500;

/// Drop time for pieces spawned by the fill engine.
pub const FILL_MOVE_MS: u32 = 500;

/// Rows above its cell a freshly spawned piece starts from.
pub const FILL_Y_OFFSET: i32 = 10;

/// Collapse animation time for every cell a piece falls.
pub const COLLAPSE_MS_PER_CELL: u32 = 100;

/// Pause before each clear round and after each settle.
pub const ROUND_DELAY_MS: u32 = 200;

/// Pause between clearing a round and collapsing its columns.
pub const CLEAR_TO_COLLAPSE_MS: u32 = 250;

/// A piece is settled once its visual position is this close to its cell.
pub const SETTLE_EPSILON: f32 = 0.001;

/// Attempts the fill engine makes per cell before accepting a matching piece.
pub const MAX_FILL_ATTEMPTS: u32 = 100;

/// Minimum run length that counts as a match.
pub const MIN_MATCH_LENGTH: usize = 3;

/// Match size from which a bomb is dropped (and the clear bonus applies).
pub const BOMB_MATCH_SIZE: usize = 4;

/// Match size from which a non-corner match drops a color bomb.
pub const COLOR_BOMB_MATCH_SIZE: usize = 5;

/// Base points awarded per cleared piece.
pub const DEFAULT_PIECE_SCORE: u32 = 20;

/// Flat bonus per cleared piece in a cascade round that matched 4+ pieces.
pub const MATCH_BONUS: u32 = 20;

/// Moves granted by the default level.
pub const DEFAULT_MOVES: u32 = 30;

/// Score goal of the default level.
pub const DEFAULT_SCORE_GOAL: u32 = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacing_defaults() {
        assert_eq!(TICK_MS, 16);
        assert_eq!(SWAP_MS, 500);
        assert_eq!(FILL_MOVE_MS, 500);
        assert_eq!(FILL_Y_OFFSET, 10);
        assert_eq!(ROUND_DELAY_MS, 200);
        assert_eq!(MAX_FILL_ATTEMPTS, 100);
        assert_eq!(MATCH_BONUS, 20);
    }

    #[test]
    fn adjacency_is_manhattan_one() {
        let c = Coord::new(3, 3);
        assert!(c.is_adjacent(Coord::new(2, 3)));
        assert!(c.is_adjacent(Coord::new(4, 3)));
        assert!(c.is_adjacent(Coord::new(3, 2)));
        assert!(c.is_adjacent(Coord::new(3, 4)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coord::new(4, 4)));
        assert!(!c.is_adjacent(Coord::new(5, 3)));
    }

    #[test]
    fn breakable_tile_steps_down_to_normal() {
        let mut tile = TileKind::Breakable {
            level: 2,
            max_level: 2,
        };
        assert_eq!(tile.break_once(), Some(2));
        assert_eq!(
            tile,
            TileKind::Breakable {
                level: 1,
                max_level: 2
            }
        );
        assert_eq!(tile.break_once(), Some(1));
        assert_eq!(tile, TileKind::Normal);
        assert_eq!(tile.break_once(), None);
    }

    #[test]
    fn spent_breakable_tile_acts_normal() {
        let mut tile = TileKind::Breakable {
            level: 0,
            max_level: 2,
        };
        assert_eq!(tile.break_once(), None);
        assert_eq!(tile, TileKind::Normal);
    }

    #[test]
    fn match_value_parse_roundtrip() {
        for color in MatchValue::ALL {
            assert_eq!(MatchValue::from_str(color.as_str()), Some(color));
        }
        assert_eq!(MatchValue::from_str("none"), Some(MatchValue::None));
        assert_eq!(MatchValue::from_str("purple"), None);
    }
}

/// Integer cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Unit step from `self` toward `other` (the swap direction).
    pub fn direction_to(self, other: Coord) -> (i32, i32) {
        ((other.x - self.x).signum(), (other.y - self.y).signum())
    }

    /// True when `other` is exactly one step away horizontally or vertically.
    pub fn is_adjacent(self, other: Coord) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

/// Piece colors plus the `None` sentinel.
///
/// `None` marks pieces that never match by color: fresh color bombs and
/// collectibles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchValue {
    Yellow,
    Blue,
    Magenta,
    Indigo,
    Green,
    Teal,
    Red,
    Cyan,
    None,
}

impl MatchValue {
    /// Every real color, in palette order.
    pub const ALL: [MatchValue; 8] = [
        MatchValue::Yellow,
        MatchValue::Blue,
        MatchValue::Magenta,
        MatchValue::Indigo,
        MatchValue::Green,
        MatchValue::Teal,
        MatchValue::Red,
        MatchValue::Cyan,
    ];

    /// Palette used by the default level.
    pub const DEFAULT_PALETTE: [MatchValue; 6] = [
        MatchValue::Yellow,
        MatchValue::Blue,
        MatchValue::Magenta,
        MatchValue::Green,
        MatchValue::Red,
        MatchValue::Cyan,
    ];

    /// True for every value except the `None` sentinel.
    pub fn is_color(&self) -> bool {
        !matches!(self, MatchValue::None)
    }

    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "yellow" => Some(MatchValue::Yellow),
            "blue" => Some(MatchValue::Blue),
            "magenta" => Some(MatchValue::Magenta),
            "indigo" => Some(MatchValue::Indigo),
            "green" => Some(MatchValue::Green),
            "teal" => Some(MatchValue::Teal),
            "red" => Some(MatchValue::Red),
            "cyan" => Some(MatchValue::Cyan),
            "none" => Some(MatchValue::None),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchValue::Yellow => "yellow",
            MatchValue::Blue => "blue",
            MatchValue::Magenta => "magenta",
            MatchValue::Indigo => "indigo",
            MatchValue::Green => "green",
            MatchValue::Teal => "teal",
            MatchValue::Red => "red",
            MatchValue::Cyan => "cyan",
            MatchValue::None => "none",
        }
    }
}

/// Special behavior carried by a piece.
///
/// - **RowBomb**: clears its whole row
/// - **ColumnBomb**: clears its whole column
/// - **AdjacentBomb**: clears the 3x3 block around it
/// - **ColorBomb**: swapped with a colored piece, clears every piece of that color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    #[default]
    None,
    RowBomb,
    ColumnBomb,
    AdjacentBomb,
    ColorBomb,
}

impl SpecialKind {
    pub fn is_bomb(&self) -> bool {
        !matches!(self, SpecialKind::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpecialKind::None => "none",
            SpecialKind::RowBomb => "row_bomb",
            SpecialKind::ColumnBomb => "column_bomb",
            SpecialKind::AdjacentBomb => "adjacent_bomb",
            SpecialKind::ColorBomb => "color_bomb",
        }
    }
}

/// Structural type of a cell.
///
/// Obstacles never host a piece. Breakable tiles lose one level each time a
/// piece on them is cleared and turn into `Normal` once the level hits zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TileKind {
    #[default]
    Normal,
    Obstacle,
    Breakable { level: u8, max_level: u8 },
}

impl TileKind {
    /// Breakable tile with `level` hits left.
    pub fn breakable(level: u8) -> Self {
        if level == 0 {
            return TileKind::Normal;
        }
        TileKind::Breakable {
            level,
            max_level: level,
        }
    }

    pub fn is_obstacle(&self) -> bool {
        matches!(self, TileKind::Obstacle)
    }

    /// Apply one hit. Returns the level the tile had before the hit, or `None`
    /// if the tile is not breakable. A breakable tile already at level 0
    /// counts as normal and is turned into one.
    pub fn break_once(&mut self) -> Option<u8> {
        let TileKind::Breakable { level, max_level } = *self else {
            return None;
        };
        if level == 0 {
            *self = TileKind::Normal;
            return None;
        }
        let next = level - 1;
        *self = if next == 0 {
            TileKind::Normal
        } else {
            TileKind::Breakable {
                level: next,
                max_level,
            }
        };
        Some(level)
    }
}

/// Current input/resolution state of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputState {
    /// Board not set up yet, or the session is over; gestures are ignored.
    Idle,
    /// Ready for the first cell of a swap.
    AwaitingFirstSelection,
    /// First cell chosen; waiting for an adjacent second cell and a commit.
    AwaitingSecondSelection,
    /// A swap is being resolved; input is locked.
    Resolving,
}

/// How a finished session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
}
