//! Shared helpers for building boards from text.

#![allow(dead_code)]

use tui_match3::core::{BoardEvent, GameState, LevelConfig, PieceOverride, PieceSpec, TileOverride};
use tui_match3::types::{MatchValue, SpecialKind, TileKind};

/// Level with fixed content and no randomness beyond refills: no collectible
/// spawns and pieces appear in place.
pub fn quiet_level(width: i32, height: i32) -> LevelConfig {
    LevelConfig {
        width,
        height,
        chance_for_collectible: 0.0,
        max_collectibles: 0,
        fill_y_offset: 0,
        seed: 7,
        ..LevelConfig::default()
    }
}

/// Build a level from rows written top to bottom.
///
/// `Y B M G R C` are colors, `*` a collectible, `@` a color bomb, `#` an
/// obstacle and `.` a cell left to the fill engine.
pub fn level_from_rows(rows: &[&str]) -> LevelConfig {
    let height = rows.len() as i32;
    let width = rows.first().map_or(0, |r| r.chars().count()) as i32;
    let mut config = quiet_level(width, height);

    for (i, row) in rows.iter().enumerate() {
        let y = height - 1 - i as i32;
        for (x, ch) in row.chars().enumerate() {
            let x = x as i32;
            let piece = match ch {
                '#' => {
                    config.tiles.push(TileOverride {
                        x,
                        y,
                        tile: TileKind::Obstacle,
                    });
                    continue;
                }
                '.' => continue,
                '*' => PieceSpec::Collectible {
                    cleared_only_at_bottom_row: true,
                },
                '@' => PieceSpec::Bomb {
                    special: SpecialKind::ColorBomb,
                    color: MatchValue::None,
                },
                other => PieceSpec::Normal {
                    color: color_of(other),
                },
            };
            config.pieces.push(PieceOverride { x, y, piece });
        }
    }
    config
}

pub fn color_of(ch: char) -> MatchValue {
    match ch {
        'Y' => MatchValue::Yellow,
        'B' => MatchValue::Blue,
        'M' => MatchValue::Magenta,
        'G' => MatchValue::Green,
        'R' => MatchValue::Red,
        'C' => MatchValue::Cyan,
        other => panic!("unknown color code {other:?}"),
    }
}

pub fn game_from_rows(rows: &[&str]) -> GameState {
    GameState::from_level(level_from_rows(rows)).expect("valid test level")
}

/// Select, commit and drive the swap to completion.
pub fn swap_and_settle(game: &mut GameState, a: (i32, i32), b: (i32, i32)) -> bool {
    assert!(game.select_first(a.0, a.1), "first selection at {a:?}");
    assert!(game.select_second(b.0, b.1), "second selection at {b:?}");
    let started = game.commit();
    assert!(game.run_until_stable(100_000), "resolution did not settle");
    started
}

/// Score events reported at the given multiplier
pub fn scores_at(events: &[BoardEvent], multiplier: u32) -> Vec<(u32, u32)> {
    events
        .iter()
        .filter_map(|e| match *e {
            BoardEvent::Score {
                base_points,
                multiplier: m,
                bonus,
            } if m == multiplier => Some((base_points, bonus)),
            _ => None,
        })
        .collect()
}
