//! Level module - declarative board configuration
//!
//! A level fixes the board size, the color palette, per-cell overrides and the
//! pacing and session rules. Levels are plain JSON:
//!
//! ```json
//! {
//!   "width": 6,
//!   "height": 6,
//!   "colors": ["red", "blue", "green", "yellow"],
//!   "tiles": [{ "x": 2, "y": 3, "tile": { "type": "obstacle" } }],
//!   "pieces": [{ "x": 0, "y": 5, "piece": { "kind": "collectible" } }],
//!   "moves": 20
//! }
//! ```
//!
//! Every field is optional and falls back to [`LevelConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::piece::PieceSpec;
use crate::types::{
    MatchValue, TileKind, DEFAULT_HEIGHT, DEFAULT_MOVES, DEFAULT_PIECE_SCORE, DEFAULT_SCORE_GOAL,
    DEFAULT_WIDTH, FILL_MOVE_MS, FILL_Y_OFFSET, MIN_MATCH_LENGTH, SWAP_MS,
};

/// Largest accepted side length
pub const MAX_DIMENSION: i32 = 64;

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("invalid level json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("board size {width}x{height} is out of range (1..={max})")]
    BadSize { width: i32, height: i32, max: i32 },
    #[error("palette needs at least {min} distinct colors, got {got}")]
    PaletteTooSmall { min: usize, got: usize },
    #[error("collectible chance {0} is outside 0.0..=1.0")]
    InvalidChance(f32),
    #[error("breakable tile at ({x}, {y}) has level {level} above its max {max_level}")]
    BadBreakable { x: i32, y: i32, level: u8, max_level: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileOverride {
    pub x: i32,
    pub y: i32,
    pub tile: TileKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceOverride {
    pub x: i32,
    pub y: i32,
    pub piece: PieceSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: i32,
    pub height: i32,
    /// Colors the fill engine draws from
    pub colors: Vec<MatchValue>,
    pub tiles: Vec<TileOverride>,
    pub pieces: Vec<PieceOverride>,
    pub chance_for_collectible: f32,
    pub max_collectibles: u32,
    /// Rows above its cell a spawned piece starts its drop from
    pub fill_y_offset: i32,
    pub fill_move_ms: u32,
    pub swap_ms: u32,
    pub moves: u32,
    pub score_goal: u32,
    pub piece_score: u32,
    pub seed: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            colors: MatchValue::DEFAULT_PALETTE.to_vec(),
            tiles: Vec::new(),
            pieces: Vec::new(),
            chance_for_collectible: 0.1,
            max_collectibles: 3,
            fill_y_offset: FILL_Y_OFFSET,
            fill_move_ms: FILL_MOVE_MS,
            swap_ms: SWAP_MS,
            moves: DEFAULT_MOVES,
            score_goal: DEFAULT_SCORE_GOAL,
            piece_score: DEFAULT_PIECE_SCORE,
            seed: 12345,
        }
    }
}

impl LevelConfig {
    /// Parse and validate a level from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a level file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the engine relies on.
    ///
    /// With fewer than three colors the fill engine cannot avoid matches and
    /// cascades need not end, so such palettes are rejected. Overrides that
    /// fall outside the board are not errors; setup ignores them.
    pub fn validate(&self) -> Result<(), LevelError> {
        let in_range = |v: i32| (1..=MAX_DIMENSION).contains(&v);
        if !in_range(self.width) || !in_range(self.height) {
            return Err(LevelError::BadSize {
                width: self.width,
                height: self.height,
                max: MAX_DIMENSION,
            });
        }

        let distinct = self.palette().len();
        if distinct < MIN_MATCH_LENGTH {
            return Err(LevelError::PaletteTooSmall {
                min: MIN_MATCH_LENGTH,
                got: distinct,
            });
        }

        if !(0.0..=1.0).contains(&self.chance_for_collectible) {
            return Err(LevelError::InvalidChance(self.chance_for_collectible));
        }

        for o in &self.tiles {
            if let TileKind::Breakable { level, max_level } = o.tile {
                if level > max_level {
                    return Err(LevelError::BadBreakable {
                        x: o.x,
                        y: o.y,
                        level,
                        max_level,
                    });
                }
            }
        }

        Ok(())
    }

    /// Configured colors with `None` and duplicates removed
    pub fn palette(&self) -> Vec<MatchValue> {
        let mut palette = Vec::with_capacity(self.colors.len());
        for &c in &self.colors {
            if c.is_color() && !palette.contains(&c) {
                palette.push(c);
            }
        }
        palette
    }
}
