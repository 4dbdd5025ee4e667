//! Fill module - populate empty cells
//!
//! Cells are visited column by column from the bottom-left. Each empty,
//! non-obstacle cell receives a random color from the palette, redrawn while
//! it would complete a run of three with the pieces already below or to its
//! left. After `MAX_FILL_ATTEMPTS` redraws the match is accepted. Cells in the
//! top row may receive a collectible instead while the budget allows.

use crate::collectibles::CollectibleTracker;
use crate::events::{BoardEvent, EventBus};
use crate::grid::Grid;
use crate::matcher::has_immediate_match_at;
use crate::piece::{PieceFactory, PieceRef, PieceSet, PieceSpec};
use crate::rng::SimpleRng;
use crate::types::{MatchValue, FILL_MOVE_MS, FILL_Y_OFFSET, MAX_FILL_ATTEMPTS};

/// Per-level fill parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FillParams {
    pub palette: Vec<MatchValue>,
    pub chance_for_collectible: f32,
    /// Rows above its cell each new piece starts from; 0 places it directly
    pub y_offset: i32,
    pub move_ms: u32,
}

impl Default for FillParams {
    fn default() -> Self {
        Self {
            palette: MatchValue::DEFAULT_PALETTE.to_vec(),
            chance_for_collectible: 0.0,
            y_offset: FILL_Y_OFFSET,
            move_ms: FILL_MOVE_MS,
        }
    }
}

/// Mutable state the fill engine draws on
pub struct FillContext<'a> {
    pub grid: &'a mut Grid,
    pub factory: &'a mut PieceFactory,
    pub rng: &'a mut SimpleRng,
    pub collectibles: &'a mut CollectibleTracker,
    pub events: &'a mut EventBus,
}

/// Fill every empty cell. Returns the pieces created.
pub fn fill(ctx: &mut FillContext<'_>, params: &FillParams) -> PieceSet {
    let mut filled = PieceSet::new();
    let top = ctx.grid.height() - 1;

    for x in 0..ctx.grid.width() {
        for y in 0..ctx.grid.height() {
            if !ctx.grid.is_vacant(x, y) {
                continue;
            }

            let spawned = if y == top && ctx.collectibles.has_budget() && roll_collectible(ctx, params) {
                let spec = PieceSpec::Collectible {
                    cleared_only_at_bottom_row: true,
                };
                let spawned = spawn_dropping(ctx, spec, x, y, params);
                if spawned.is_some() {
                    ctx.collectibles.record_spawn();
                    tracing::debug!(x, y, count = ctx.collectibles.count(), "collectible spawned");
                }
                spawned
            } else {
                fill_random_at(ctx, x, y, params)
            };

            if let Some(r) = spawned {
                filled.insert(r);
            }
        }
    }

    filled
}

fn roll_collectible(ctx: &mut FillContext<'_>, params: &FillParams) -> bool {
    ctx.rng.next_unit() < params.chance_for_collectible
}

/// Place a random color at (x, y), redrawing while it completes a match.
fn fill_random_at(ctx: &mut FillContext<'_>, x: i32, y: i32, params: &FillParams) -> Option<PieceRef> {
    let color = ctx.rng.pick(&params.palette)?;
    let piece = ctx.factory.create(ctx.grid, PieceSpec::Normal { color }, x, y)?;
    let r = piece.piece_ref();
    ctx.grid.place_piece(piece, x, y);

    let mut attempts = 0;
    while has_immediate_match_at(ctx.grid, x, y) {
        attempts += 1;
        if attempts >= MAX_FILL_ATTEMPTS {
            tracing::warn!(x, y, attempts, "fill retry budget exhausted; accepting match");
            break;
        }
        let Some(color) = ctx.rng.pick(&params.palette) else {
            break;
        };
        if let Some(p) = ctx.grid.piece_mut(x, y) {
            p.change_color(color);
        }
    }

    start_drop(ctx.grid, ctx.events, r, params.y_offset, params.move_ms);
    Some(r)
}

fn spawn_dropping(
    ctx: &mut FillContext<'_>,
    spec: PieceSpec,
    x: i32,
    y: i32,
    params: &FillParams,
) -> Option<PieceRef> {
    let r = ctx.factory.spawn(ctx.grid, spec, x, y)?;
    start_drop(ctx.grid, ctx.events, r, params.y_offset, params.move_ms);
    Some(r)
}

/// Lift a freshly placed piece `y_offset` rows and let it fall into place.
pub(crate) fn start_drop(grid: &mut Grid, events: &mut EventBus, r: PieceRef, y_offset: i32, move_ms: u32) {
    if y_offset == 0 {
        return;
    }
    let (x, y) = (r.coord.x, r.coord.y);
    let Some(piece) = grid.piece_mut(x, y).filter(|p| p.id() == r.id) else {
        return;
    };
    piece.set_visual(x as f32, (y + y_offset) as f32);
    piece.start_motion(move_ms);
    events.emit(BoardEvent::PieceMoved {
        piece: r.id,
        to_x: x,
        to_y: y,
        duration_ms: move_ms,
    });
}
