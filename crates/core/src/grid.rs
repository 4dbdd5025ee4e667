//! Grid module - owns the tile and piece matrices
//!
//! The grid is a `width x height` matrix created once at setup and never
//! resized. Both matrices use flat row-major storage (`y * width + x`).
//! Coordinates: (x, y) where x grows to the right and y grows upward, so row 0
//! is the bottom row pieces fall toward.
//!
//! All lookups are fail-soft: out-of-bounds reads return `None` and
//! out-of-bounds writes are ignored.

use crate::level::MAX_DIMENSION;
use crate::piece::{Piece, PieceRef, PieceSet};
use crate::types::{Coord, TileKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    tiles: Vec<TileKind>,
    pieces: Vec<Option<Piece>>,
}

impl Grid {
    /// Create a grid of normal, empty cells. Each side is clamped to
    /// `0..=MAX_DIMENSION`.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.clamp(0, MAX_DIMENSION);
        let height = height.clamp(0, MAX_DIMENSION);
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![TileKind::Normal; len],
            pieces: vec![None; len],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.is_within_bounds(x, y) {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn is_within_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Tile at (x, y), `None` if out of bounds
    pub fn tile(&self, x: i32, y: i32) -> Option<TileKind> {
        self.index(x, y).map(|idx| self.tiles[idx])
    }

    /// Replace the tile at (x, y). Turning a cell into an obstacle evicts its
    /// piece. Returns false if out of bounds.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileKind) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        self.tiles[idx] = match tile {
            TileKind::Breakable { level: 0, .. } => TileKind::Normal,
            other => other,
        };
        if tile.is_obstacle() {
            self.pieces[idx] = None;
        }
        true
    }

    /// Apply one hit to a breakable tile. Returns its level before the hit.
    pub fn break_tile_at(&mut self, x: i32, y: i32) -> Option<u8> {
        let idx = self.index(x, y)?;
        self.tiles[idx].break_once()
    }

    /// Piece at (x, y), `None` if out of bounds or empty
    pub fn piece(&self, x: i32, y: i32) -> Option<&Piece> {
        self.index(x, y).and_then(|idx| self.pieces[idx].as_ref())
    }

    pub fn piece_mut(&mut self, x: i32, y: i32) -> Option<&mut Piece> {
        let idx = self.index(x, y)?;
        self.pieces[idx].as_mut()
    }

    pub fn piece_at(&self, coord: Coord) -> Option<&Piece> {
        self.piece(coord.x, coord.y)
    }

    /// Resolve a reference; `None` if the cell no longer holds that piece.
    pub fn resolve(&self, r: PieceRef) -> Option<&Piece> {
        self.piece_at(r.coord).filter(|p| p.id() == r.id)
    }

    /// True if (x, y) is in bounds, not an obstacle and has no piece.
    pub fn is_vacant(&self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some(idx) => self.pieces[idx].is_none() && !self.tiles[idx].is_obstacle(),
            None => false,
        }
    }

    /// Put a piece into (x, y) and set its coordinates to match.
    ///
    /// Returns whatever did not end up on the grid: the previous occupant of
    /// the cell, or the piece itself when (x, y) is out of bounds. In the
    /// latter case the piece's coordinates are still updated.
    pub fn place_piece(&mut self, mut piece: Piece, x: i32, y: i32) -> Option<Piece> {
        piece.set_coord(x, y);
        piece.snap_to_cell();
        match self.index(x, y) {
            Some(idx) => self.pieces[idx].replace(piece),
            None => Some(piece),
        }
    }

    /// Remove and return the piece at (x, y) without destroying it
    pub fn clear_cell(&mut self, x: i32, y: i32) -> Option<Piece> {
        let idx = self.index(x, y)?;
        self.pieces[idx].take()
    }

    /// Remove the referenced piece if it is still where the reference says.
    pub fn take_piece(&mut self, r: PieceRef) -> Option<Piece> {
        self.resolve(r)?;
        self.clear_cell(r.coord.x, r.coord.y)
    }

    /// Exchange the pieces of two cells, keeping their visual positions so the
    /// caller can animate the swap. Both cells must hold a piece.
    pub fn swap_pieces(&mut self, a: Coord, b: Coord) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a.x, a.y), self.index(b.x, b.y)) else {
            return false;
        };
        if ia == ib || self.pieces[ia].is_none() || self.pieces[ib].is_none() {
            return false;
        }
        self.pieces.swap(ia, ib);
        if let Some(p) = self.pieces[ia].as_mut() {
            p.set_coord(a.x, a.y);
        }
        if let Some(p) = self.pieces[ib].as_mut() {
            p.set_coord(b.x, b.y);
        }
        true
    }

    /// Let pieces in a column fall into the empty non-obstacle cells below
    /// them, preserving their order. Pieces pass over obstacles but never land
    /// on one. Visual positions are left in place for the caller to animate.
    ///
    /// Returns every moved piece with the number of rows it fell.
    pub fn collapse_column(&mut self, x: i32) -> Vec<(PieceRef, i32)> {
        let mut moved = Vec::new();
        if x < 0 || x >= self.width {
            return moved;
        }

        for y in 0..self.height - 1 {
            if !self.is_vacant(x, y) {
                continue;
            }
            for above in y + 1..self.height {
                if let Some(mut piece) = self.clear_cell(x, above) {
                    piece.set_coord(x, y);
                    let r = piece.piece_ref();
                    if let Some(idx) = self.index(x, y) {
                        self.pieces[idx] = Some(piece);
                    }
                    moved.push((r, above - y));
                    break;
                }
            }
        }

        moved
    }

    /// Step every running motion
    pub fn advance(&mut self, elapsed_ms: u32) {
        for piece in self.pieces.iter_mut().flatten() {
            piece.advance(elapsed_ms);
        }
    }

    /// True once every listed piece that is still on the board has reached
    /// its cell.
    pub fn is_settled(&self, set: &PieceSet) -> bool {
        set.iter()
            .filter_map(|r| self.pieces.iter().flatten().find(|p| p.id() == r.id))
            .all(Piece::is_settled)
    }

    /// True once no piece on the board is moving
    pub fn is_fully_settled(&self) -> bool {
        self.pieces.iter().flatten().all(Piece::is_settled)
    }

    /// Iterate every piece, column-major from the bottom-left cell
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).filter_map(move |y| self.piece(x, y)))
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.iter().flatten().count()
    }

    /// References to every piece in a row, left to right
    pub fn row_pieces(&self, y: i32) -> PieceSet {
        (0..self.width)
            .filter_map(|x| self.piece(x, y))
            .map(Piece::piece_ref)
            .collect()
    }

    /// References to every piece in a column, bottom to top
    pub fn column_pieces(&self, x: i32) -> PieceSet {
        (0..self.height)
            .filter_map(|y| self.piece(x, y))
            .map(Piece::piece_ref)
            .collect()
    }

    /// References to every piece within `offset` cells of (x, y), clamped
    pub fn adjacent_pieces(&self, x: i32, y: i32, offset: i32) -> PieceSet {
        let mut set = PieceSet::new();
        for i in x - offset..=x + offset {
            for j in y - offset..=y + offset {
                if let Some(p) = self.piece(i, j) {
                    set.insert(p.piece_ref());
                }
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{PieceFactory, PieceSpec};
    use crate::types::MatchValue;

    fn red() -> PieceSpec {
        PieceSpec::Normal {
            color: MatchValue::Red,
        }
    }

    #[test]
    fn test_grid_index_calculation() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(3, 0), Some(3));
        assert_eq!(grid.index(0, 1), Some(4));
        assert_eq!(grid.index(3, 2), Some(11));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(4, 0), None);
        assert_eq!(grid.index(0, 3), None);
    }

    #[test]
    fn test_new_clamps_dimensions() {
        let grid = Grid::new(100_000, -3);
        assert_eq!((grid.width(), grid.height()), (MAX_DIMENSION, 0));
        assert!(!grid.is_within_bounds(0, 0));

        let grid = Grid::new(i32::MAX, i32::MAX);
        assert_eq!((grid.width(), grid.height()), (MAX_DIMENSION, MAX_DIMENSION));
    }

    #[test]
    fn test_spent_breakable_tile_is_stored_as_normal() {
        let mut grid = Grid::new(2, 2);
        let spent = TileKind::Breakable {
            level: 0,
            max_level: 3,
        };
        assert!(grid.set_tile(1, 1, spent));
        assert_eq!(grid.tile(1, 1), Some(TileKind::Normal));
        assert_eq!(grid.break_tile_at(1, 1), None);
    }

    #[test]
    fn test_place_out_of_bounds_updates_coordinates_only() {
        let mut grid = Grid::new(3, 3);
        let mut factory = PieceFactory::new();
        let piece = factory.create(&grid, red(), 0, 0).unwrap();

        let rejected = grid.place_piece(piece, 5, 7).expect("piece handed back");
        assert_eq!(rejected.coord(), Coord::new(5, 7));
        assert_eq!(grid.piece_count(), 0);
    }

    #[test]
    fn test_place_returns_displaced_occupant() {
        let mut grid = Grid::new(3, 3);
        let mut factory = PieceFactory::new();
        let first = factory.spawn(&mut grid, red(), 1, 1).unwrap();
        let second = factory.create(&grid, red(), 0, 0).unwrap();

        let displaced = grid.place_piece(second, 1, 1).unwrap();
        assert_eq!(displaced.id(), first.id);
        assert_eq!(grid.piece(1, 1).unwrap().id(), second.id());
        assert_eq!(grid.piece(1, 1).unwrap().coord(), Coord::new(1, 1));
    }

    #[test]
    fn test_take_piece_ignores_stale_reference() {
        let mut grid = Grid::new(3, 3);
        let mut factory = PieceFactory::new();
        let r = factory.spawn(&mut grid, red(), 2, 2).unwrap();

        assert!(grid.take_piece(r).is_some());
        assert!(grid.take_piece(r).is_none());

        let replacement = factory.spawn(&mut grid, red(), 2, 2).unwrap();
        assert!(grid.take_piece(r).is_none());
        assert!(grid.resolve(replacement).is_some());
    }

    #[test]
    fn test_collapse_skips_obstacles_and_preserves_order() {
        let mut grid = Grid::new(1, 5);
        let mut factory = PieceFactory::new();
        grid.set_tile(0, 1, TileKind::Obstacle);
        let a = factory
            .spawn(&mut grid, PieceSpec::Normal { color: MatchValue::Red }, 0, 2)
            .unwrap();
        let b = factory
            .spawn(&mut grid, PieceSpec::Normal { color: MatchValue::Blue }, 0, 4)
            .unwrap();

        let moved = grid.collapse_column(0);

        assert_eq!(grid.piece(0, 0).unwrap().id(), a.id);
        assert!(grid.piece(0, 1).is_none(), "obstacles never receive pieces");
        assert_eq!(grid.piece(0, 2).unwrap().id(), b.id);
        assert!(grid.piece(0, 4).is_none());
        assert_eq!(moved.len(), 2);
        assert_eq!(moved[0].1, 2);
        assert_eq!(moved[1].1, 2);
        for p in grid.pieces() {
            assert_eq!(grid.piece_at(p.coord()).unwrap().id(), p.id());
        }
    }

    #[test]
    fn test_swap_requires_two_pieces() {
        let mut grid = Grid::new(2, 1);
        let mut factory = PieceFactory::new();
        factory.spawn(&mut grid, red(), 0, 0).unwrap();
        assert!(!grid.swap_pieces(Coord::new(0, 0), Coord::new(1, 0)));

        factory
            .spawn(&mut grid, PieceSpec::Normal { color: MatchValue::Blue }, 1, 0)
            .unwrap();
        assert!(grid.swap_pieces(Coord::new(0, 0), Coord::new(1, 0)));
        assert_eq!(grid.piece(0, 0).unwrap().match_value(), MatchValue::Blue);
        assert_eq!(grid.piece(0, 0).unwrap().coord(), Coord::new(0, 0));
        assert_eq!(grid.piece(1, 0).unwrap().coord(), Coord::new(1, 0));
    }

    #[test]
    fn test_adjacent_pieces_clamped_to_bounds() {
        let mut grid = Grid::new(3, 3);
        let mut factory = PieceFactory::new();
        for x in 0..3 {
            for y in 0..3 {
                factory.spawn(&mut grid, red(), x, y).unwrap();
            }
        }
        assert_eq!(grid.adjacent_pieces(1, 1, 1).len(), 9);
        assert_eq!(grid.adjacent_pieces(0, 0, 1).len(), 4);
        assert_eq!(grid.adjacent_pieces(2, 1, 1).len(), 6);
    }
}
