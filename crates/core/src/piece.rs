//! Piece module - movable, matchable pieces and the factory that makes them
//!
//! A piece is owned by the grid cell it sits in. It also carries its own
//! coordinates, which the grid keeps equal to the hosting cell. On top of the
//! logical position every piece has a visual position used for animation; the
//! two only differ while a motion is running.

use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::types::{Coord, MatchValue, SpecialKind, SETTLE_EPSILON};

/// Unique id of a piece for the lifetime of a board.
pub type PieceId = u32;

/// Marks a piece as a collectible.
///
/// Collectibles never match and are never caught in a bomb blast. With
/// `cleared_only_at_bottom_row` set they are cleared once they reach row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectibleTrait {
    pub cleared_only_at_bottom_row: bool,
}

/// Declarative description of a piece to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PieceSpec {
    Normal {
        color: MatchValue,
    },
    Bomb {
        special: SpecialKind,
        #[serde(default = "none_color")]
        color: MatchValue,
    },
    Collectible {
        #[serde(default = "default_true")]
        cleared_only_at_bottom_row: bool,
    },
}

fn none_color() -> MatchValue {
    MatchValue::None
}

fn default_true() -> bool {
    true
}

/// Linear motion of a piece's visual position toward its cell.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Motion {
    from: (f32, f32),
    duration_ms: u32,
    elapsed_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    id: PieceId,
    x: i32,
    y: i32,
    match_value: MatchValue,
    special: SpecialKind,
    collectible: Option<CollectibleTrait>,
    visual: (f32, f32),
    motion: Option<Motion>,
}

impl Piece {
    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    /// Identity plus current position.
    pub fn piece_ref(&self) -> PieceRef {
        PieceRef {
            id: self.id,
            coord: self.coord(),
        }
    }

    pub fn match_value(&self) -> MatchValue {
        self.match_value
    }

    pub fn special(&self) -> SpecialKind {
        self.special
    }

    pub fn collectible(&self) -> Option<CollectibleTrait> {
        self.collectible
    }

    pub fn is_bomb(&self) -> bool {
        self.special.is_bomb()
    }

    pub fn is_color_bomb(&self) -> bool {
        self.special == SpecialKind::ColorBomb
    }

    pub fn is_collectible(&self) -> bool {
        self.collectible.is_some()
    }

    /// True if this piece can take part in a color match.
    pub fn is_matchable(&self) -> bool {
        self.match_value.is_color() && self.collectible.is_none()
    }

    /// Repaint the piece (color bomb conversion, bomb recoloring).
    pub fn change_color(&mut self, value: MatchValue) {
        self.match_value = value;
    }

    pub(crate) fn set_coord(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Visual position in cell units.
    pub fn visual(&self) -> (f32, f32) {
        self.visual
    }

    /// Snap the visual position to the logical cell and drop any motion.
    pub(crate) fn snap_to_cell(&mut self) {
        self.visual = (self.x as f32, self.y as f32);
        self.motion = None;
    }

    /// Move the visual position to an arbitrary point without animating.
    pub(crate) fn set_visual(&mut self, x: f32, y: f32) {
        self.visual = (x, y);
        self.motion = None;
    }

    /// Start animating from the current visual position toward the cell.
    pub(crate) fn start_motion(&mut self, duration_ms: u32) {
        if duration_ms == 0 {
            self.snap_to_cell();
            return;
        }
        self.motion = Some(Motion {
            from: self.visual,
            duration_ms,
            elapsed_ms: 0,
        });
    }

    pub(crate) fn advance(&mut self, elapsed_ms: u32) {
        let Some(mut motion) = self.motion else {
            return;
        };
        motion.elapsed_ms = motion.elapsed_ms.saturating_add(elapsed_ms);
        if motion.elapsed_ms >= motion.duration_ms {
            self.snap_to_cell();
            return;
        }
        let t = motion.elapsed_ms as f32 / motion.duration_ms as f32;
        let (fx, fy) = motion.from;
        self.visual = (
            fx + (self.x as f32 - fx) * t,
            fy + (self.y as f32 - fy) * t,
        );
        self.motion = Some(motion);
    }

    /// True once the visual position has reached the logical cell.
    pub fn is_settled(&self) -> bool {
        (self.visual.0 - self.x as f32).abs() <= SETTLE_EPSILON
            && (self.visual.1 - self.y as f32).abs() <= SETTLE_EPSILON
    }
}

/// A piece identity together with the cell it occupied when the reference
/// was taken. Operations on a stale reference (cell emptied or re-occupied)
/// are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceRef {
    pub id: PieceId,
    pub coord: Coord,
}

/// Insertion-ordered set of pieces, de-duplicated by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceSet {
    items: Vec<PieceRef>,
}

impl PieceSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.items.iter().any(|r| r.id == id)
    }

    pub fn contains_coord(&self, coord: Coord) -> bool {
        self.items.iter().any(|r| r.coord == coord)
    }

    /// Insert a piece; returns false if it was already present.
    pub fn insert(&mut self, piece: PieceRef) -> bool {
        if self.contains(piece.id) {
            return false;
        }
        self.items.push(piece);
        true
    }

    /// Add every piece of `other` not already present.
    pub fn union_with(&mut self, other: &PieceSet) {
        for &r in &other.items {
            self.insert(r);
        }
    }

    pub fn union(mut self, other: &PieceSet) -> PieceSet {
        self.union_with(other);
        self
    }

    pub fn retain(&mut self, f: impl FnMut(&PieceRef) -> bool) {
        self.items.retain(f);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PieceRef> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[PieceRef] {
        &self.items
    }

    /// Distinct columns, in first-appearance order.
    pub fn columns(&self) -> Vec<i32> {
        let mut columns = Vec::new();
        for r in &self.items {
            if !columns.contains(&r.coord.x) {
                columns.push(r.coord.x);
            }
        }
        columns
    }
}

impl FromIterator<PieceRef> for PieceSet {
    fn from_iter<I: IntoIterator<Item = PieceRef>>(iter: I) -> Self {
        let mut set = PieceSet::new();
        for r in iter {
            set.insert(r);
        }
        set
    }
}

impl<'a> IntoIterator for &'a PieceSet {
    type Item = &'a PieceRef;
    type IntoIter = std::slice::Iter<'a, PieceRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Creates pieces with unique ids.
#[derive(Debug, Clone, Default)]
pub struct PieceFactory {
    next_id: PieceId,
}

impl PieceFactory {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Number of pieces created so far.
    pub fn created(&self) -> u32 {
        self.next_id.saturating_sub(1)
    }

    /// Create an unplaced piece destined for `(x, y)`.
    ///
    /// Returns `None` if the cell is out of bounds or an obstacle. Color bombs
    /// always start with `MatchValue::None`; collectibles never carry a color.
    pub fn create(&mut self, grid: &Grid, spec: PieceSpec, x: i32, y: i32) -> Option<Piece> {
        if !grid.is_within_bounds(x, y) || grid.tile(x, y).is_some_and(|t| t.is_obstacle()) {
            return None;
        }

        let (match_value, special, collectible) = match spec {
            PieceSpec::Normal { color } => (color, SpecialKind::None, None),
            PieceSpec::Bomb {
                special: SpecialKind::ColorBomb,
                ..
            } => (MatchValue::None, SpecialKind::ColorBomb, None),
            PieceSpec::Bomb { special, color } => (color, special, None),
            PieceSpec::Collectible {
                cleared_only_at_bottom_row,
            } => (
                MatchValue::None,
                SpecialKind::None,
                Some(CollectibleTrait {
                    cleared_only_at_bottom_row,
                }),
            ),
        };

        let id = self.next_id.max(1);
        self.next_id = id.wrapping_add(1);

        Some(Piece {
            id,
            x,
            y,
            match_value,
            special,
            collectible,
            visual: (x as f32, y as f32),
            motion: None,
        })
    }

    /// Create a piece and place it into the grid.
    pub fn spawn(&mut self, grid: &mut Grid, spec: PieceSpec, x: i32, y: i32) -> Option<PieceRef> {
        let piece = self.create(grid, spec, x, y)?;
        let r = piece.piece_ref();
        grid.place_piece(piece, x, y);
        Some(r)
    }
}
