//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the match-3 rules, the board state and the resolution
//! state machine. It has **no dependencies** on the terminal or any other
//! I/O apart from optional level file loading, making it:
//!
//! - **Deterministic**: The same seed and gestures replay the same game
//! - **Testable**: Every rule can be driven without a front end
//! - **Portable**: Runs in the terminal, headless, or under a bench harness
//!
//! # Module Structure
//!
//! - [`grid`]: fixed-size tile and piece matrices with fail-soft bounds checks
//! - [`piece`]: pieces, piece references/sets and the piece factory
//! - [`matcher`]: directional, per-cell and whole-board match search
//! - [`fill`]: populating empty cells with anti-match retries and collectibles
//! - [`bombs`]: bomb creation from match shape and blast expansion
//! - [`collectibles`]: collectible budget and the bottom-row exit rule
//! - [`game_state`]: gestures, timers and the cascade state machine
//! - [`events`]: effect, animation and score notifications
//! - [`level`]: JSON level configuration
//! - [`scoring`], [`session`]: points, moves and win/lose
//! - [`snapshot`]: serializable view of the board
//!
//! # Game Rules
//!
//! - **Swap**: two adjacent pieces trade places; the swap stands only if it
//!   creates a match (or triggers a color bomb), otherwise it is reverted
//! - **Bombs**: 4 in a line drops a row/column bomb, an L/T shape an adjacent
//!   bomb, 5 in a line a color bomb
//! - **Cascade**: clear, collapse, re-match, refill until the board is quiet;
//!   the score multiplier grows by one every round
//! - **Collectibles**: spawned in the top row, leave the board at the bottom
//!
//! # Example
//!
//! ```
//! use tui_match3_core::{GameState, LevelConfig};
//!
//! let mut game = GameState::from_level(LevelConfig::default()).unwrap();
//!
//! // Pick two neighbouring cells and try the swap
//! game.select_first(0, 0);
//! game.select_second(1, 0);
//! game.commit();
//!
//! // Drive the engine until the swap is resolved or reverted
//! assert!(game.run_until_stable(10_000));
//! assert!(!game.is_locked());
//! ```
//!
//! # Timing
//!
//! The engine paces itself with fixed delays and waits for moving pieces to
//! settle. Call [`GameState::tick`](game_state::GameState::tick) every frame
//! with the elapsed time.

pub mod bombs;
pub mod collectibles;
pub mod events;
pub mod fill;
pub mod game_state;
pub mod grid;
pub mod level;
pub mod matcher;
pub mod piece;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use tui_match3_types as types;

// Re-export commonly used types for convenience
pub use collectibles::CollectibleTracker;
pub use events::{BoardEvent, BoardHooks, EventBus};
pub use fill::{FillContext, FillParams};
pub use game_state::GameState;
pub use grid::Grid;
pub use level::{LevelConfig, LevelError, PieceOverride, TileOverride};
pub use piece::{Piece, PieceFactory, PieceId, PieceRef, PieceSet, PieceSpec};
pub use rng::SimpleRng;
pub use scoring::ScoreKeeper;
pub use session::Session;
pub use snapshot::{BoardSnapshot, CellSnapshot, PieceSnapshot};
