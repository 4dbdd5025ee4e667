//! Matcher module - directional and whole-board match search
//!
//! A match is a contiguous run of at least `MIN_MATCH_LENGTH` pieces sharing a
//! color along one axis. The horizontal and vertical runs through a cell are
//! unioned, so an L or T cluster comes back as one set sharing its pivot. That
//! union is the corner shape the bomb rules look for.

use crate::grid::Grid;
use crate::piece::{Piece, PieceSet};
use crate::types::{MatchValue, MIN_MATCH_LENGTH};

/// Walk from (x, y) in unit steps of (dx, dy) collecting same-colored pieces.
///
/// The walk stops at the board edge, an empty cell, a piece that cannot match
/// or a piece of another color. Returns the run (start cell included) if it
/// holds at least `min_length` pieces, `None` otherwise. Steps are clamped to
/// -1..=1 and a zero step yields at most the start piece.
pub fn scan_directional(
    grid: &Grid,
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
    min_length: usize,
) -> Option<PieceSet> {
    let start = grid.piece(x, y).filter(|p| p.is_matchable())?;
    let (dx, dy) = (dx.clamp(-1, 1), dy.clamp(-1, 1));

    let mut run = PieceSet::new();
    run.insert(start.piece_ref());

    if dx != 0 || dy != 0 {
        let (mut cx, mut cy) = (x + dx, y + dy);
        while let Some(next) = grid.piece(cx, cy) {
            if !next.is_matchable() || next.match_value() != start.match_value() {
                break;
            }
            run.insert(next.piece_ref());
            cx += dx;
            cy += dy;
        }
    }

    (run.len() >= min_length).then_some(run)
}

/// Union of two opposite partial scans, kept only if long enough.
fn axis_matches(grid: &Grid, x: i32, y: i32, dx: i32, dy: i32) -> Option<PieceSet> {
    let forward = scan_directional(grid, x, y, dx, dy, 2);
    let backward = scan_directional(grid, x, y, -dx, -dy, 2);

    let combined = match (forward, backward) {
        (Some(f), Some(b)) => f.union(&b),
        (Some(f), None) => f,
        (None, Some(b)) => b,
        (None, None) => return None,
    };

    (combined.len() >= MIN_MATCH_LENGTH).then_some(combined)
}

pub fn horizontal_matches(grid: &Grid, x: i32, y: i32) -> Option<PieceSet> {
    axis_matches(grid, x, y, 1, 0)
}

pub fn vertical_matches(grid: &Grid, x: i32, y: i32) -> Option<PieceSet> {
    axis_matches(grid, x, y, 0, 1)
}

/// Horizontal and vertical matches through (x, y); empty if there are none.
pub fn matches_at(grid: &Grid, x: i32, y: i32) -> PieceSet {
    let mut set = horizontal_matches(grid, x, y).unwrap_or_default();
    if let Some(vertical) = vertical_matches(grid, x, y) {
        set.union_with(&vertical);
    }
    set
}

/// Union of `matches_at` over the current cells of every listed piece.
/// References whose piece has left its cell are skipped.
pub fn matches_at_pieces(grid: &Grid, pieces: &PieceSet) -> PieceSet {
    let mut set = PieceSet::new();
    for r in pieces {
        if grid.resolve(*r).is_none() {
            continue;
        }
        set.union_with(&matches_at(grid, r.coord.x, r.coord.y));
    }
    set
}

/// Every match on the board
pub fn all_matches(grid: &Grid) -> PieceSet {
    let mut set = PieceSet::new();
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            set.union_with(&matches_at(grid, x, y));
        }
    }
    set
}

/// True if the piece at (x, y) completes a run of three to its left or below.
///
/// The fill engine works bottom-up, left to right, so these are the only
/// neighbors already present when it places a piece.
pub fn has_immediate_match_at(grid: &Grid, x: i32, y: i32) -> bool {
    scan_directional(grid, x, y, -1, 0, MIN_MATCH_LENGTH).is_some()
        || scan_directional(grid, x, y, 0, -1, MIN_MATCH_LENGTH).is_some()
}

/// True if the set spans more than one column and more than one row.
pub fn is_corner_match(set: &PieceSet) -> bool {
    let mut xs = set.iter().map(|r| r.coord.x);
    let mut ys = set.iter().map(|r| r.coord.y);
    let multi_x = xs.next().is_some_and(|first| xs.any(|x| x != first));
    let multi_y = ys.next().is_some_and(|first| ys.any(|y| y != first));
    multi_x && multi_y
}

/// Every matchable piece on the board with the given color
pub fn pieces_with_value(grid: &Grid, value: MatchValue) -> PieceSet {
    grid.pieces()
        .filter(|p| p.is_matchable() && p.match_value() == value)
        .map(Piece::piece_ref)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{PieceFactory, PieceSpec};
    use crate::types::{Coord, TileKind};

    /// Build a grid from rows listed top to bottom. `.` is empty, `#` an
    /// obstacle, `c` a collectible, letters are colors.
    fn grid_from(rows: &[&str]) -> Grid {
        let height = rows.len() as i32;
        let width = rows[0].len() as i32;
        let mut grid = Grid::new(width, height);
        let mut factory = PieceFactory::new();
        for (row, line) in rows.iter().enumerate() {
            let y = height - 1 - row as i32;
            for (x, ch) in line.chars().enumerate() {
                let x = x as i32;
                let spec = match ch {
                    'r' => PieceSpec::Normal { color: MatchValue::Red },
                    'b' => PieceSpec::Normal { color: MatchValue::Blue },
                    'g' => PieceSpec::Normal { color: MatchValue::Green },
                    'y' => PieceSpec::Normal { color: MatchValue::Yellow },
                    'c' => PieceSpec::Collectible {
                        cleared_only_at_bottom_row: true,
                    },
                    '#' => {
                        grid.set_tile(x, y, TileKind::Obstacle);
                        continue;
                    }
                    _ => continue,
                };
                factory.spawn(&mut grid, spec, x, y);
            }
        }
        grid
    }

    fn coords(set: &PieceSet) -> Vec<Coord> {
        let mut v: Vec<Coord> = set.iter().map(|r| r.coord).collect();
        v.sort();
        v
    }

    #[test]
    fn test_scan_distinguishes_short_run_from_empty() {
        let grid = grid_from(&["rrb"]);
        assert_eq!(scan_directional(&grid, 0, 0, 1, 0, 2).map(|s| s.len()), Some(2));
        assert!(scan_directional(&grid, 0, 0, 1, 0, 3).is_none());
        // Empty start cell is "not found", not an empty run
        let grid = grid_from(&[".rr"]);
        assert!(scan_directional(&grid, 0, 0, 1, 0, 1).is_none());
    }

    #[test]
    fn test_scan_stops_at_gap_and_collectible() {
        let grid = grid_from(&["rr.rr", "rrcrr"]);
        let top = scan_directional(&grid, 0, 1, 1, 0, 1).unwrap();
        assert_eq!(top.len(), 2);
        let bottom = scan_directional(&grid, 0, 0, 1, 0, 1).unwrap();
        assert_eq!(bottom.len(), 2);
    }

    #[test]
    fn test_horizontal_match_from_middle() {
        let grid = grid_from(&["brrrb"]);
        let set = horizontal_matches(&grid, 2, 0).unwrap();
        assert_eq!(
            coords(&set),
            vec![Coord::new(1, 0), Coord::new(2, 0), Coord::new(3, 0)]
        );
        assert!(vertical_matches(&grid, 2, 0).is_none());
    }

    #[test]
    fn test_corner_union_shares_pivot() {
        let grid = grid_from(&["r..", "r..", "rrr"]);
        let set = matches_at(&grid, 0, 0);
        assert_eq!(set.len(), 5);
        assert!(is_corner_match(&set));

        let line = matches_at(&grid, 2, 0);
        assert_eq!(line.len(), 3);
        assert!(!is_corner_match(&line));
    }

    #[test]
    fn test_all_matches_on_mixed_board() {
        let grid = grid_from(&["gby", "rrr", "bgb"]);
        assert_eq!(all_matches(&grid).len(), 3);

        let none = grid_from(&["gby", "rbr", "bgb"]);
        assert!(all_matches(&none).is_empty());
    }

    #[test]
    fn test_matches_across_obstacle_do_not_join() {
        let grid = grid_from(&["rr#rr"]);
        assert!(all_matches(&grid).is_empty());
    }

    #[test]
    fn test_immediate_match_only_looks_left_and_down() {
        let grid = grid_from(&["rrr"]);
        assert!(has_immediate_match_at(&grid, 2, 0));
        assert!(!has_immediate_match_at(&grid, 0, 0));

        let column = grid_from(&["g", "g", "g"]);
        assert!(!has_immediate_match_at(&column, 0, 0));
        assert!(has_immediate_match_at(&column, 0, 2));
    }

    #[test]
    fn test_pieces_with_value_ignores_other_colors() {
        let grid = grid_from(&["rbr", "brc"]);
        assert_eq!(pieces_with_value(&grid, MatchValue::Red).len(), 3);
        assert_eq!(pieces_with_value(&grid, MatchValue::None).len(), 0);
    }
}
