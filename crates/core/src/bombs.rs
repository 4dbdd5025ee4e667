//! Bombs module - bomb creation from match shape and blast expansion
//!
//! | Matched pieces | Bomb |
//! |----------------|------|
//! | fewer than 4 | none |
//! | corner (L/T) shape | `AdjacentBomb` |
//! | 5 or more in a line | `ColorBomb` |
//! | 4 in a line | `RowBomb` for a horizontal swap, `ColumnBomb` for a vertical one |
//!
//! Row, column and adjacent bombs detonate when they are part of a clear set.
//! Color bombs only go off when swapped, see [`color_bomb_triggers`].

use crate::grid::Grid;
use crate::matcher::{is_corner_match, pieces_with_value};
use crate::piece::{Piece, PieceFactory, PieceSet, PieceSpec};
use crate::types::{Coord, MatchValue, SpecialKind, BOMB_MATCH_SIZE, COLOR_BOMB_MATCH_SIZE};

/// Which bomb a match of this shape and size produces for a swap in
/// direction `(dx, dy)`
pub fn bomb_kind_for(matched: &PieceSet, direction: (i32, i32)) -> Option<SpecialKind> {
    if matched.len() < BOMB_MATCH_SIZE {
        return None;
    }
    let kind = if is_corner_match(matched) {
        SpecialKind::AdjacentBomb
    } else if matched.len() >= COLOR_BOMB_MATCH_SIZE {
        SpecialKind::ColorBomb
    } else if direction.0 != 0 {
        SpecialKind::RowBomb
    } else {
        SpecialKind::ColumnBomb
    };
    Some(kind)
}

/// Create (but do not place) the bomb earned by `matched` at (x, y).
///
/// The bomb takes the color of the first colored piece in the match; color
/// bombs stay colorless. Returns `None` if the match is too small or the cell
/// cannot host a piece.
pub fn drop_bomb(
    grid: &Grid,
    factory: &mut PieceFactory,
    x: i32,
    y: i32,
    direction: (i32, i32),
    matched: &PieceSet,
) -> Option<Piece> {
    let special = bomb_kind_for(matched, direction)?;
    let color = matched
        .iter()
        .filter_map(|r| grid.resolve(*r))
        .map(Piece::match_value)
        .find(MatchValue::is_color)
        .unwrap_or(MatchValue::None);

    if special != SpecialKind::ColorBomb && !color.is_color() {
        return None;
    }

    factory.create(grid, PieceSpec::Bomb { special, color }, x, y)
}

/// Pieces caught in one bomb's blast, bomb included
pub fn blast_set(grid: &Grid, bomb: &Piece) -> PieceSet {
    match bomb.special() {
        SpecialKind::RowBomb => grid.row_pieces(bomb.y()),
        SpecialKind::ColumnBomb => grid.column_pieces(bomb.x()),
        SpecialKind::AdjacentBomb => grid.adjacent_pieces(bomb.x(), bomb.y(), 1),
        SpecialKind::ColorBomb | SpecialKind::None => PieceSet::new(),
    }
}

/// Seeds plus everything their bombs blast, in one pass.
///
/// Collectibles are dropped from the blast-derived part; a collectible that
/// was itself a seed stays.
pub fn expand_bombs(grid: &Grid, seeds: &PieceSet) -> PieceSet {
    let mut blasted = PieceSet::new();
    for r in seeds {
        if let Some(bomb) = grid.resolve(*r).filter(|p| p.is_bomb()) {
            blasted.union_with(&blast_set(grid, bomb));
        }
    }

    blasted.retain(|r| {
        seeds.contains(r.id)
            || !grid.resolve(*r).is_some_and(Piece::is_collectible)
    });

    seeds.clone().union(&blasted)
}

/// Expand until no further bomb is caught. Returns the full clear set.
pub fn expand_bombs_chained(grid: &Grid, seeds: &PieceSet) -> PieceSet {
    let mut set = seeds.clone();
    loop {
        let next = expand_bombs(grid, &set);
        if next.len() == set.len() {
            return next;
        }
        set = next;
    }
}

/// Pieces cleared by swapping the pieces now at `a` and `b`.
///
/// A color bomb swapped with a colored piece takes that color and clears every
/// piece of it. Two color bombs swapped together clear every colored piece on
/// the board plus both bombs. Any other pair triggers nothing.
pub fn color_bomb_triggers(grid: &mut Grid, a: Coord, b: Coord) -> PieceSet {
    let (Some(pa), Some(pb)) = (grid.piece_at(a).copied(), grid.piece_at(b).copied()) else {
        return PieceSet::new();
    };

    match (pa.is_color_bomb(), pb.is_color_bomb()) {
        (true, true) => {
            let mut set: PieceSet = grid
                .pieces()
                .filter(|p| p.is_matchable())
                .map(Piece::piece_ref)
                .collect();
            set.insert(pa.piece_ref());
            set.insert(pb.piece_ref());
            set
        }
        (true, false) => convert_and_collect(grid, pa, pb),
        (false, true) => convert_and_collect(grid, pb, pa),
        (false, false) => PieceSet::new(),
    }
}

fn convert_and_collect(grid: &mut Grid, bomb: Piece, partner: Piece) -> PieceSet {
    if !partner.is_matchable() {
        return PieceSet::new();
    }
    let color = partner.match_value();
    if let Some(p) = grid.piece_mut(bomb.x(), bomb.y()) {
        p.change_color(color);
    }
    let mut set = pieces_with_value(grid, color);
    set.insert(bomb.piece_ref());
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceRef;

    fn line(n: i32, horizontal: bool) -> PieceSet {
        (0..n)
            .map(|i| PieceRef {
                id: i as u32 + 1,
                coord: if horizontal {
                    Coord::new(i, 0)
                } else {
                    Coord::new(0, i)
                },
            })
            .collect()
    }

    fn spawn(grid: &mut Grid, factory: &mut PieceFactory, spec: PieceSpec, x: i32, y: i32) -> PieceRef {
        factory.spawn(grid, spec, x, y).unwrap()
    }

    fn normal(color: MatchValue) -> PieceSpec {
        PieceSpec::Normal { color }
    }

    #[test]
    fn test_bomb_kind_table() {
        assert_eq!(bomb_kind_for(&line(3, true), (1, 0)), None);
        assert_eq!(bomb_kind_for(&line(4, true), (1, 0)), Some(SpecialKind::RowBomb));
        assert_eq!(bomb_kind_for(&line(4, false), (0, 1)), Some(SpecialKind::ColumnBomb));
        assert_eq!(bomb_kind_for(&line(5, true), (0, -1)), Some(SpecialKind::ColorBomb));

        let corner: PieceSet = [(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)]
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| PieceRef {
                id: i as u32 + 1,
                coord: Coord::new(x, y),
            })
            .collect();
        assert_eq!(corner.len(), 5);
        assert_eq!(bomb_kind_for(&corner, (1, 0)), Some(SpecialKind::AdjacentBomb));
    }

    #[test]
    fn test_drop_bomb_inherits_first_color() {
        let mut grid = Grid::new(5, 1);
        let mut factory = PieceFactory::new();
        let matched: PieceSet = (0..4)
            .map(|x| spawn(&mut grid, &mut factory, normal(MatchValue::Teal), x, 0))
            .collect();

        let bomb = drop_bomb(&grid, &mut factory, 1, 0, (1, 0), &matched).unwrap();
        assert_eq!(bomb.special(), SpecialKind::RowBomb);
        assert_eq!(bomb.match_value(), MatchValue::Teal);
        assert_eq!(bomb.coord(), Coord::new(1, 0));
        // Not placed yet
        assert_ne!(grid.piece(1, 0).unwrap().id(), bomb.id());

        let small: PieceSet = matched.iter().take(3).copied().collect();
        assert!(drop_bomb(&grid, &mut factory, 1, 0, (1, 0), &small).is_none());
    }

    #[test]
    fn test_row_bomb_blast_spares_collectibles() {
        let mut grid = Grid::new(4, 2);
        let mut factory = PieceFactory::new();
        let bomb = spawn(
            &mut grid,
            &mut factory,
            PieceSpec::Bomb {
                special: SpecialKind::RowBomb,
                color: MatchValue::Red,
            },
            0,
            1,
        );
        spawn(&mut grid, &mut factory, normal(MatchValue::Blue), 1, 1);
        let keeper = spawn(
            &mut grid,
            &mut factory,
            PieceSpec::Collectible {
                cleared_only_at_bottom_row: true,
            },
            2,
            1,
        );
        let fragile = spawn(
            &mut grid,
            &mut factory,
            PieceSpec::Collectible {
                cleared_only_at_bottom_row: false,
            },
            3,
            1,
        );
        spawn(&mut grid, &mut factory, normal(MatchValue::Blue), 0, 0);

        let seeds: PieceSet = [bomb].into_iter().collect();
        let cleared = expand_bombs(&grid, &seeds);

        assert_eq!(cleared.len(), 2);
        assert!(cleared.contains(bomb.id));
        assert!(!cleared.contains(keeper.id));
        assert!(!cleared.contains(fragile.id));
    }

    #[test]
    fn test_column_and_adjacent_blasts() {
        let mut grid = Grid::new(3, 3);
        let mut factory = PieceFactory::new();
        for x in 0..3 {
            for y in 0..3 {
                spawn(&mut grid, &mut factory, normal(MatchValue::Green), x, y);
            }
        }
        let col_bomb = factory
            .create(
                &grid,
                PieceSpec::Bomb {
                    special: SpecialKind::ColumnBomb,
                    color: MatchValue::Green,
                },
                2,
                2,
            )
            .unwrap();
        grid.place_piece(col_bomb, 2, 2);
        assert_eq!(blast_set(&grid, &col_bomb).len(), 3);
        assert_eq!(grid.adjacent_pieces(1, 1, 1).len(), 9);

        let adj = factory
            .create(
                &grid,
                PieceSpec::Bomb {
                    special: SpecialKind::AdjacentBomb,
                    color: MatchValue::Green,
                },
                0,
                0,
            )
            .unwrap();
        grid.place_piece(adj, 0, 0);
        assert_eq!(blast_set(&grid, grid.piece(0, 0).unwrap()).len(), 4);
    }

    #[test]
    fn test_chained_expansion_reaches_second_bomb() {
        let mut grid = Grid::new(3, 3);
        let mut factory = PieceFactory::new();
        for x in 0..3 {
            for y in 0..3 {
                spawn(&mut grid, &mut factory, normal(MatchValue::Green), x, y);
            }
        }
        let row = factory
            .create(
                &grid,
                PieceSpec::Bomb {
                    special: SpecialKind::RowBomb,
                    color: MatchValue::Green,
                },
                0,
                0,
            )
            .unwrap();
        grid.place_piece(row, 0, 0);
        let column = factory
            .create(
                &grid,
                PieceSpec::Bomb {
                    special: SpecialKind::ColumnBomb,
                    color: MatchValue::Green,
                },
                2,
                0,
            )
            .unwrap();
        grid.place_piece(column, 2, 0);

        let seeds: PieceSet = [row.piece_ref()].into_iter().collect();
        assert_eq!(expand_bombs(&grid, &seeds).len(), 3);
        assert_eq!(expand_bombs_chained(&grid, &seeds).len(), 5);
    }

    #[test]
    fn test_color_bomb_swap_converts_and_collects() {
        let mut grid = Grid::new(3, 2);
        let mut factory = PieceFactory::new();
        spawn(
            &mut grid,
            &mut factory,
            PieceSpec::Bomb {
                special: SpecialKind::ColorBomb,
                color: MatchValue::None,
            },
            0,
            0,
        );
        spawn(&mut grid, &mut factory, normal(MatchValue::Red), 1, 0);
        spawn(&mut grid, &mut factory, normal(MatchValue::Red), 2, 1);
        spawn(&mut grid, &mut factory, normal(MatchValue::Blue), 0, 1);

        let set = color_bomb_triggers(&mut grid, Coord::new(0, 0), Coord::new(1, 0));
        assert_eq!(set.len(), 3);
        assert_eq!(grid.piece(0, 0).unwrap().match_value(), MatchValue::Red);
        assert!(!set.contains_coord(Coord::new(0, 1)));

        assert!(color_bomb_triggers(&mut grid, Coord::new(1, 0), Coord::new(2, 1)).is_empty());
    }

    #[test]
    fn test_two_color_bombs_clear_every_color() {
        let mut grid = Grid::new(3, 1);
        let mut factory = PieceFactory::new();
        let color_bomb = PieceSpec::Bomb {
            special: SpecialKind::ColorBomb,
            color: MatchValue::None,
        };
        spawn(&mut grid, &mut factory, color_bomb, 0, 0);
        spawn(&mut grid, &mut factory, color_bomb, 1, 0);
        spawn(&mut grid, &mut factory, normal(MatchValue::Cyan), 2, 0);

        let set = color_bomb_triggers(&mut grid, Coord::new(0, 0), Coord::new(1, 0));
        assert_eq!(set.len(), 3);
    }
}
