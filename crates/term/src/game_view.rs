//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{GameSnapshot, Piece};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceKind, BOARD_HEIGHT, BOARD_WIDTH, PREVIEW_SIZE};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

const BLOCK: char = '█';
const GHOST: char = '░';
const GRID_DOT: char = '·';

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Where the board frame landed inside the viewport.
#[derive(Debug, Clone, Copy)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// Board, ghost, active piece, side panel and overlays.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for typical terminal glyph aspect ratio.
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Smallest viewport that fits the centered board frame and the full
    /// side panel to its right.
    pub fn min_viewport(&self) -> Viewport {
        let frame_w = BOARD_WIDTH as u16 * self.cell_w + 2;
        let frame_h = BOARD_HEIGHT as u16 * self.cell_h + 2;
        let panel_w = 2 + (PREVIEW_SIZE as u16 * self.cell_w).max(12);
        Viewport::new(frame_w + 2 * panel_w, frame_h)
    }

    /// Render into an existing framebuffer, resizing it to `viewport`.
    ///
    /// Callers can reuse one framebuffer across frames.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let w = BOARD_WIDTH as u16 * self.cell_w + 2;
        let h = BOARD_HEIGHT as u16 * self.cell_h + 2;
        let frame = Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(h) / 2,
                AnchorY::Top => 0,
            },
            w,
            h,
        };

        let play_bg = CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG);
        fb.fill_rect(frame.x + 1, frame.y + 1, w - 2, h - 2, ' ', play_bg);
        draw_border(fb, frame, CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG));

        let grid_style = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();
        for (row, cells) in snap.board.iter().enumerate() {
            for (col, &cell) in cells.iter().enumerate() {
                let (row, col) = (row as u16, col as u16);
                let (ch, style) = match PieceKind::from_cell(cell) {
                    Some(kind) => (BLOCK, piece_style(kind)),
                    None => (GRID_DOT, grid_style),
                };
                self.fill_board_cell(fb, frame, row, col, ch, style);
            }
        }

        if let (Some(active), Some(ghost)) = (snap.active, snap.ghost) {
            let style = piece_style(active.kind()).dim();
            for (row, col) in active.board_cells_at(ghost) {
                if let Some((row, col)) = on_board(row, col) {
                    self.fill_board_cell(fb, frame, row, col, GHOST, style);
                }
            }
        }

        if let Some(active) = snap.active {
            let style = piece_style(active.kind()).bold();
            for (row, col) in active.board_cells() {
                if let Some((row, col)) = on_board(row, col) {
                    self.fill_board_cell(fb, frame, row, col, BLOCK, style);
                }
            }
        }

        self.draw_side_panel(fb, snap, viewport, frame);

        if snap.paused {
            draw_overlay_text(fb, frame, "PAUSED");
        } else if snap.game_over {
            draw_overlay_text(fb, frame, "GAME OVER");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn fill_board_cell(
        &self,
        fb: &mut FrameBuffer,
        frame: Frame,
        row: u16,
        col: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = frame.x + 1 + col * self.cell_w;
        let py = frame.y + 1 + row * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        frame: Frame,
    ) {
        let panel_x = frame.x.saturating_add(frame.w).saturating_add(2);
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = frame.y;
        for (name, n) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), n, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        self.draw_preview(fb, snap.next, panel_x, y);
        y = y.saturating_add(PREVIEW_SIZE as u16 * self.cell_h + 1);

        let hint = value.dim();
        for line in ["p pause", "r restart", "q quit"] {
            if y >= frame.y.saturating_add(frame.h) {
                break;
            }
            fb.put_str(panel_x, y, line, hint);
            y = y.saturating_add(1);
        }
    }

    /// Next piece centered in a `PREVIEW_SIZE` square grid.
    fn draw_preview(&self, fb: &mut FrameBuffer, next: Option<PieceKind>, x: u16, y: u16) {
        let size = PREVIEW_SIZE as u16;
        let bg = CellStyle::new(Rgb::new(80, 80, 90), SCREEN_BG);
        fb.fill_rect(x, y, size * self.cell_w, size * self.cell_h, ' ', bg);

        let Some(kind) = next else {
            return;
        };
        let piece = Piece::new(kind);
        let off_x = (size - piece.width() as u16) * self.cell_w / 2;
        let off_y = (size - piece.height() as u16) * self.cell_h / 2;
        let style = piece_style(kind);
        for (dr, dc) in piece.cells() {
            fb.fill_rect(
                x + off_x + dc as u16 * self.cell_w,
                y + off_y + dr as u16 * self.cell_h,
                self.cell_w,
                self.cell_h,
                BLOCK,
                style,
            );
        }
    }
}

fn piece_style(kind: PieceKind) -> CellStyle {
    CellStyle::new(kind.color().into(), BOARD_BG)
}

fn on_board(row: i8, col: i8) -> Option<(u16, u16)> {
    let inside = (0..BOARD_HEIGHT as i8).contains(&row) && (0..BOARD_WIDTH as i8).contains(&col);
    inside.then_some((row as u16, col as u16))
}

fn draw_border(fb: &mut FrameBuffer, frame: Frame, style: CellStyle) {
    let Frame { x, y, w, h } = frame;
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay_text(fb: &mut FrameBuffer, frame: Frame, text: &str) {
    let mid_y = frame.y.saturating_add(frame.h / 2);
    let text_w = text.chars().count() as u16;
    let x = frame.x.saturating_add(frame.w.saturating_sub(text_w) / 2);
    let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
    fb.put_str(x, mid_y, text, style);
}
