//! Game state module - the board, its collaborators and the gesture surface
//!
//! `GameState` ties together the grid, piece factory, RNG, collectible budget,
//! score and session. The gesture layer drives it with `select_first`,
//! `select_second` and `commit`; an external loop calls `tick` with the time
//! elapsed so the engine can run its own timers and settle checks. The
//! resolution stages themselves live in the `cascade` submodule.

mod cascade;

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::collectibles::CollectibleTracker;
use crate::events::{BoardEvent, BoardHooks, EventBus};
use crate::fill::{self, FillContext, FillParams};
use crate::grid::Grid;
use crate::level::{LevelConfig, LevelError, PieceOverride, TileOverride, MAX_DIMENSION};
use crate::piece::{Piece, PieceFactory, PieceSet};
use crate::rng::SimpleRng;
use crate::scoring::ScoreKeeper;
use crate::session::Session;
use crate::snapshot::{BoardSnapshot, CellSnapshot, PieceSnapshot};
use crate::types::{Coord, InputState, Outcome, TICK_MS};

use cascade::Stage;

/// Board shape and overrides of the last setup, kept for restarts
#[derive(Debug, Clone, Default)]
struct Layout {
    width: i32,
    height: i32,
    tiles: Vec<TileOverride>,
    pieces: Vec<PieceOverride>,
}

#[derive(Debug)]
pub struct GameState {
    config: LevelConfig,
    fill_params: FillParams,
    grid: Grid,
    factory: PieceFactory,
    rng: SimpleRng,
    collectibles: CollectibleTracker,
    events: EventBus,
    score: ScoreKeeper,
    session: Session,
    layout: Option<Layout>,
    first: Option<Coord>,
    second: Option<Coord>,
    /// Set while a resolution is in flight; gestures are rejected.
    locked: bool,
    multiplier: u32,
    stage: Stage,
    delay_ms: u32,
    /// Bombs earned by the current swap, placed after its first clear round
    pending_bombs: ArrayVec<Piece, 2>,
    /// Committed swaps since setup
    resolutions: u32,
}

impl GameState {
    /// Create an engine for `config`. The board stays empty until `setup`.
    pub fn new(config: LevelConfig) -> Result<Self, LevelError> {
        config.validate()?;
        Ok(Self::unchecked(config))
    }

    /// Create an engine and set the board up from the level's own layout
    pub fn from_level(config: LevelConfig) -> Result<Self, LevelError> {
        let mut state = Self::new(config)?;
        let (width, height) = (state.config.width, state.config.height);
        let tiles = state.config.tiles.clone();
        let pieces = state.config.pieces.clone();
        state.setup(width, height, &tiles, &pieces);
        Ok(state)
    }

    fn unchecked(config: LevelConfig) -> Self {
        let fill_params = FillParams {
            palette: config.palette(),
            chance_for_collectible: config.chance_for_collectible,
            y_offset: config.fill_y_offset,
            move_ms: config.fill_move_ms,
        };
        Self {
            fill_params,
            grid: Grid::new(0, 0),
            factory: PieceFactory::new(),
            rng: SimpleRng::new(config.seed),
            collectibles: CollectibleTracker::new(config.max_collectibles),
            events: EventBus::new(),
            score: ScoreKeeper::new(),
            session: Session::new(config.moves, config.score_goal),
            layout: None,
            first: None,
            second: None,
            locked: false,
            multiplier: 1,
            stage: Stage::Ready,
            delay_ms: 0,
            pending_bombs: ArrayVec::new(),
            resolutions: 0,
            config,
        }
    }

    /// Build the board: apply tile overrides, place override pieces, then fill
    /// every remaining cell.
    ///
    /// Only the first call has any effect. Overrides outside the board are
    /// ignored. Returns false if the board was already set up or either side
    /// is outside `1..=MAX_DIMENSION`.
    pub fn setup(
        &mut self,
        width: i32,
        height: i32,
        tiles: &[TileOverride],
        pieces: &[PieceOverride],
    ) -> bool {
        let in_range = |v: i32| (1..=MAX_DIMENSION).contains(&v);
        if self.layout.is_some() || !in_range(width) || !in_range(height) {
            return false;
        }
        let layout = Layout {
            width,
            height,
            tiles: tiles.to_vec(),
            pieces: pieces.to_vec(),
        };
        self.build(&layout);
        self.layout = Some(layout);
        true
    }

    fn build(&mut self, layout: &Layout) {
        self.grid = Grid::new(layout.width, layout.height);
        for t in &layout.tiles {
            self.grid.set_tile(t.x, t.y, t.tile);
        }

        for p in &layout.pieces {
            // A later override for the same cell wins
            self.grid.clear_cell(p.x, p.y);
            if let Some(r) = self.factory.spawn(&mut self.grid, p.piece, p.x, p.y) {
                fill::start_drop(
                    &mut self.grid,
                    &mut self.events,
                    r,
                    self.fill_params.y_offset,
                    self.fill_params.move_ms,
                );
            }
        }

        self.collectibles = CollectibleTracker::new(self.config.max_collectibles);
        self.collectibles.sync_from_grid(&self.grid);
        let filled = self.refill();

        info!(
            width = layout.width,
            height = layout.height,
            overrides = layout.tiles.len() + layout.pieces.len(),
            filled = filled.len(),
            "board set up"
        );
    }

    pub(crate) fn refill(&mut self) -> PieceSet {
        let mut ctx = FillContext {
            grid: &mut self.grid,
            factory: &mut self.factory,
            rng: &mut self.rng,
            collectibles: &mut self.collectibles,
            events: &mut self.events,
        };
        fill::fill(&mut ctx, &self.fill_params)
    }

    /// Rebuild the board from the same layout with a fresh score and move
    /// budget. The RNG keeps going, so the new board differs.
    pub fn restart(&mut self) -> bool {
        let Some(layout) = self.layout.clone() else {
            return false;
        };
        self.score.reset();
        self.session = Session::new(self.config.moves, self.config.score_goal);
        self.first = None;
        self.second = None;
        self.locked = false;
        self.multiplier = 1;
        self.stage = Stage::Ready;
        self.delay_ms = 0;
        self.pending_bombs.clear();
        self.resolutions = 0;
        self.build(&layout);
        info!("board restarted");
        true
    }

    /// Install (or remove) the effect, animation and score collaborator
    pub fn set_hooks(&mut self, hooks: Option<Box<dyn BoardHooks>>) {
        self.events.set_hooks(hooks);
    }

    // ---- gestures ----

    pub fn is_set_up(&self) -> bool {
        self.layout.is_some()
    }

    /// True if gestures are currently accepted
    pub fn accepts_input(&self) -> bool {
        self.is_set_up() && !self.locked && !self.session.is_over()
    }

    pub fn input_state(&self) -> InputState {
        if !self.is_set_up() || self.session.is_over() {
            InputState::Idle
        } else if self.locked {
            InputState::Resolving
        } else if self.first.is_some() {
            InputState::AwaitingSecondSelection
        } else {
            InputState::AwaitingFirstSelection
        }
    }

    /// Record the first cell of a swap. Ignored while a first cell is already
    /// pending, while resolving, or if the cell holds no piece.
    pub fn select_first(&mut self, x: i32, y: i32) -> bool {
        if !self.accepts_input() || self.first.is_some() {
            debug!(x, y, state = ?self.input_state(), "first selection ignored");
            return false;
        }
        if self.grid.piece(x, y).is_none() {
            debug!(x, y, "first selection on an empty cell");
            return false;
        }
        self.first = Some(Coord::new(x, y));
        true
    }

    /// Record the second cell. Only cells adjacent to the first are accepted;
    /// a later valid call replaces an earlier second cell.
    pub fn select_second(&mut self, x: i32, y: i32) -> bool {
        let Some(first) = self.first else {
            debug!(x, y, "second selection without a first");
            return false;
        };
        if !self.accepts_input() {
            return false;
        }
        let target = Coord::new(x, y);
        if !first.is_adjacent(target) || self.grid.piece(x, y).is_none() {
            debug!(x, y, first_x = first.x, first_y = first.y, "invalid second selection");
            return false;
        }
        self.second = Some(target);
        true
    }

    /// Start the swap if both cells are selected. The selections are cleared
    /// either way. Returns true if a swap started.
    pub fn commit(&mut self) -> bool {
        let first = self.first.take();
        let second = self.second.take();
        let (Some(first), Some(second)) = (first, second) else {
            return false;
        };
        if !self.accepts_input() {
            return false;
        }
        self.begin_swap(first, second)
    }

    /// Drop any pending selection
    pub fn cancel_selection(&mut self) {
        self.first = None;
        self.second = None;
    }

    // ---- driver ----

    /// Advance animations and timers by `elapsed_ms` and run every resolution
    /// step that becomes due. Returns true if any step ran.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.is_set_up() {
            return false;
        }

        self.grid.advance(elapsed_ms);

        if self.delay_ms > 0 {
            self.delay_ms = self.delay_ms.saturating_sub(elapsed_ms);
            if self.delay_ms > 0 {
                return false;
            }
        }

        let mut progressed = false;
        while self.delay_ms == 0 && self.step() {
            progressed = true;
        }
        progressed
    }

    /// Tick at the fixed timestep until the board is idle again.
    /// Returns false if it is still resolving after `max_ticks`.
    pub fn run_until_stable(&mut self, max_ticks: u32) -> bool {
        for _ in 0..max_ticks {
            if self.is_stable() {
                return true;
            }
            self.tick(TICK_MS);
        }
        self.is_stable()
    }

    /// True when no resolution is running and every piece has landed
    pub fn is_stable(&self) -> bool {
        matches!(self.stage, Stage::Ready) && self.grid.is_fully_settled()
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.events.drain()
    }

    // ---- accessors ----

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.score.total()
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn moves_left(&self) -> u32 {
        self.session.moves_left()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.session.outcome()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn first_selection(&self) -> Option<Coord> {
        self.first
    }

    pub fn second_selection(&self) -> Option<Coord> {
        self.second
    }

    pub fn collectible_count(&self) -> u32 {
        self.collectibles.count()
    }

    pub fn max_collectibles(&self) -> u32 {
        self.collectibles.max()
    }

    pub fn resolutions(&self) -> u32 {
        self.resolutions
    }

    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mut snap = BoardSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Fill `out` in place, reusing its cell buffer
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.width = self.grid.width();
        out.height = self.grid.height();
        out.cells.clear();
        for y in 0..self.grid.height() {
            for x in 0..self.grid.width() {
                out.cells.push(CellSnapshot {
                    tile: self.grid.tile(x, y).unwrap_or_default(),
                    piece: self.grid.piece(x, y).map(PieceSnapshot::from),
                });
            }
        }
        out.score = self.score.total();
        out.score_goal = self.session.score_goal();
        out.moves_left = self.session.moves_left();
        out.multiplier = self.multiplier;
        out.input_state = self.input_state();
        out.first_selection = self.first;
        out.second_selection = self.second;
        out.outcome = self.session.outcome();
        out.collectibles = self.collectibles.count();
        out.max_collectibles = self.collectibles.max();
    }
}

impl Default for GameState {
    fn default() -> Self {
        let mut state = Self::unchecked(LevelConfig::default());
        let (width, height) = (state.config.width, state.config.height);
        state.setup(width, height, &[], &[]);
        state
    }
}
