//! GameView: maps a `core::BoardSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The board is drawn with row 0 at the bottom. Pieces are drawn at their
//! rounded visual position, so falling and swapping pieces move across the
//! screen while the engine animates them.

use crate::core::{BoardSnapshot, PieceSnapshot};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Coord, InputState, MatchValue, Outcome, SpecialKind, TileKind};

const BOARD_BG: Rgb = Rgb::new(28, 28, 38);
const CURSOR_BG: Rgb = Rgb::new(70, 70, 95);
const SELECTED_BG: Rgb = Rgb::new(120, 100, 40);
const OBSTACLE_FG: Rgb = Rgb::new(110, 110, 120);
const BREAKABLE_BG: Rgb = Rgb::new(90, 70, 60);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// A lightweight terminal renderer for the match-3 board.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2 columns per cell keeps cells roughly square.
        Self { cell_w: 2 }
    }
}

/// Where the board frame landed inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Render the snapshot into an existing framebuffer, with the cursor drawn
    /// at `cursor` if given.
    pub fn render_into(
        &self,
        snap: &BoardSnapshot,
        cursor: Option<Coord>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let board_w = snap.width.max(0) as u16 * self.cell_w;
        let board_h = snap.height.max(0) as u16;
        let frame = Frame {
            x: viewport.width.saturating_sub(board_w + 2 + PANEL_W) / 2,
            y: viewport.height.saturating_sub(board_h + 2) / 2,
            w: board_w + 2,
            h: board_h + 2,
        };

        fb.fill_rect(frame.x + 1, frame.y + 1, board_w, board_h, ' ', CellStyle::new(BOARD_BG, BOARD_BG));
        fb.draw_box(frame.x, frame.y, frame.w, frame.h, CellStyle::new(Rgb::new(200, 200, 200), Rgb::default()));

        for y in 0..snap.height {
            for x in 0..snap.width {
                self.draw_tile(fb, frame, snap, Coord::new(x, y), cursor);
            }
        }

        for y in 0..snap.height {
            for x in 0..snap.width {
                if let Some(piece) = snap.cell(x, y).and_then(|c| c.piece) {
                    self.draw_piece(fb, frame, snap, &piece, cursor);
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        match snap.outcome {
            Some(Outcome::Won) => self.draw_overlay_text(fb, frame, "GOAL REACHED"),
            Some(Outcome::Lost) => self.draw_overlay_text(fb, frame, "OUT OF MOVES"),
            None => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &BoardSnapshot, cursor: Option<Coord>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    /// Terminal position of board cell (x, y), `None` if outside the board.
    fn cell_origin(&self, frame: Frame, snap: &BoardSnapshot, x: i32, y: i32) -> Option<(u16, u16)> {
        if x < 0 || y < 0 || x >= snap.width || y >= snap.height {
            return None;
        }
        let col = frame.x + 1 + x as u16 * self.cell_w;
        let row = frame.y + 1 + (snap.height - 1 - y) as u16;
        Some((col, row))
    }

    fn cell_bg(snap: &BoardSnapshot, x: i32, y: i32, tile: TileKind, cursor: Option<Coord>) -> Rgb {
        if snap.is_selected(x, y) {
            SELECTED_BG
        } else if cursor == Some(Coord::new(x, y)) {
            CURSOR_BG
        } else if let TileKind::Breakable { level, max_level } = tile {
            BREAKABLE_BG.scaled(level as u16 + 1, max_level as u16 + 1)
        } else {
            BOARD_BG
        }
    }

    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        snap: &BoardSnapshot,
        at: Coord,
        cursor: Option<Coord>,
    ) {
        let (Some(cell), Some((col, row))) = (
            snap.cell(at.x, at.y),
            self.cell_origin(frame, snap, at.x, at.y),
        ) else {
            return;
        };
        let bg = Self::cell_bg(snap, at.x, at.y, cell.tile, cursor);
        let (ch, fg) = match cell.tile {
            TileKind::Obstacle => ('▓', OBSTACLE_FG),
            _ => ('·', Rgb::new(80, 80, 95)),
        };
        let style = CellStyle::new(fg, bg).dim();
        fb.put_char(col, row, ch, style);
        for dx in 1..self.cell_w {
            let fill = if cell.tile.is_obstacle() { ch } else { ' ' };
            fb.put_char(col + dx, row, fill, style);
        }
    }

    fn draw_piece(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        snap: &BoardSnapshot,
        piece: &PieceSnapshot,
        cursor: Option<Coord>,
    ) {
        let x = piece.visual_x.round() as i32;
        let y = piece.visual_y.round() as i32;
        // Pieces still dropping in from above the board are not drawn yet
        let Some((col, row)) = self.cell_origin(frame, snap, x, y) else {
            return;
        };
        let tile = snap.cell(x, y).map(|c| c.tile).unwrap_or_default();
        let bg = Self::cell_bg(snap, x, y, tile, cursor);
        let style = CellStyle {
            fg: piece_color(piece),
            bg,
            bold: piece.special.is_bomb(),
            dim: false,
        };
        fb.put_char(col, row, piece_glyph(piece), style);
        for dx in 1..self.cell_w {
            fb.put_char(col + dx, row, ' ', style);
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &BoardSnapshot, viewport: Viewport, frame: Frame) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x.saturating_add(10) > viewport.width {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::default());

        let mut y = frame.y;
        let mut field = |fb: &mut FrameBuffer, name: &str, n: u32| {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, n, value);
            y = y.saturating_add(3);
        };
        field(fb, "SCORE", snap.score);
        field(fb, "GOAL", snap.score_goal);
        field(fb, "MOVES", snap.moves_left);
        field(fb, "COMBO", snap.multiplier);
        if snap.max_collectibles > 0 {
            field(fb, "ITEMS", snap.collectibles);
        }

        let state_y = frame.y + frame.h.saturating_sub(1);
        fb.put_str(panel_x, state_y, state_label(snap.input_state), value.dim());
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, frame: Frame, text: &str) {
        let mid_y = frame.y.saturating_add(frame.h / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::default()).bold();
        let text_w = text.chars().count() as u16;
        let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
        fb.put_str(x, mid_y, text, style);

        let hint = "r: restart";
        let hint_w = hint.chars().count() as u16;
        let hx = frame.x.saturating_add(frame.w.saturating_sub(hint_w) / 2);
        fb.put_str(hx, mid_y.saturating_add(1), hint, style.dim());
    }
}

/// Columns reserved for the side panel when centering.
const PANEL_W: u16 = 12;

fn piece_glyph(piece: &PieceSnapshot) -> char {
    if piece.collectible {
        return '★';
    }
    match piece.special {
        SpecialKind::None => '●',
        SpecialKind::RowBomb => '↔',
        SpecialKind::ColumnBomb => '↕',
        SpecialKind::AdjacentBomb => '✱',
        SpecialKind::ColorBomb => '◆',
    }
}

fn piece_color(piece: &PieceSnapshot) -> Rgb {
    if piece.collectible {
        return Rgb::new(255, 215, 0);
    }
    match piece.match_value {
        MatchValue::Yellow => Rgb::new(240, 220, 80),
        MatchValue::Blue => Rgb::new(80, 120, 230),
        MatchValue::Magenta => Rgb::new(220, 80, 200),
        MatchValue::Indigo => Rgb::new(110, 80, 200),
        MatchValue::Green => Rgb::new(100, 220, 120),
        MatchValue::Teal => Rgb::new(60, 170, 160),
        MatchValue::Red => Rgb::new(225, 70, 70),
        MatchValue::Cyan => Rgb::new(80, 220, 230),
        MatchValue::None => Rgb::new(245, 245, 245),
    }
}

fn state_label(state: InputState) -> &'static str {
    match state {
        InputState::Idle => "idle",
        InputState::AwaitingFirstSelection => "pick a piece",
        InputState::AwaitingSecondSelection => "pick a neighbour",
        InputState::Resolving => "resolving...",
    }
}
