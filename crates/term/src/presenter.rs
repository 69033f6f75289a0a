//! [`Presenter`] implementations for the terminal.
//!
//! - [`ColorPresenter`]: full-color framebuffer view with diffed output.
//! - [`AsciiPresenter`]: plain characters only, for terminals without color
//!   support or for piping frames into a file.

use std::io::{self, Write};

use anyhow::Result;
use crossterm::{cursor, terminal, QueueableCommand};

use crate::core::{GameSnapshot, Piece, Presenter};
use crate::fb::FrameBuffer;
use crate::game_view::{GameView, Viewport};
use crate::renderer::{enter_terminal, leave_terminal, TerminalRenderer};
use crate::types::{PieceKind, BOARD_WIDTH, EMPTY, PREVIEW_SIZE};

/// Colored board drawn through [`GameView`] and [`TerminalRenderer`].
pub struct ColorPresenter<W: Write = io::Stdout> {
    view: GameView,
    renderer: TerminalRenderer<W>,
    fb: FrameBuffer,
    viewport: Option<Viewport>,
}

impl ColorPresenter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_renderer(GameView::default(), TerminalRenderer::new())
    }
}

impl Default for ColorPresenter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ColorPresenter<W> {
    pub fn with_renderer(view: GameView, renderer: TerminalRenderer<W>) -> Self {
        Self {
            view,
            renderer,
            fb: FrameBuffer::new(0, 0),
            viewport: None,
        }
    }

    /// Render at a fixed size instead of querying the terminal.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    pub fn renderer(&self) -> &TerminalRenderer<W> {
        &self.renderer
    }

    pub fn enter(&mut self) -> Result<()> {
        self.renderer.enter()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.renderer.exit()
    }

    /// Call on terminal resize.
    pub fn invalidate(&mut self) {
        self.renderer.invalidate();
    }

    fn current_viewport(&self) -> Result<Viewport> {
        if let Some(vp) = self.viewport {
            return Ok(vp);
        }
        let (w, h) = terminal::size()?;
        Ok(Viewport::new(w, h))
    }
}

impl<W: Write> Presenter for ColorPresenter<W> {
    type Error = anyhow::Error;

    fn present(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        let viewport = self.current_viewport()?;
        self.view.render_into(snapshot, viewport, &mut self.fb);
        self.renderer.draw_swap(&mut self.fb)
    }
}

/// Board as text: `#` locked, `@` falling piece, `+` ghost, `.` empty.
pub struct AsciiPresenter<W: Write = io::Stdout> {
    out: W,
    frame: String,
}

impl AsciiPresenter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for AsciiPresenter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> AsciiPresenter<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            frame: String::with_capacity(1024),
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn enter(&mut self) -> Result<()> {
        enter_terminal(&mut self.out)
    }

    pub fn exit(&mut self) -> Result<()> {
        leave_terminal(&mut self.out)
    }
}

impl<W: Write> Presenter for AsciiPresenter<W> {
    type Error = anyhow::Error;

    fn present(&mut self, snapshot: &GameSnapshot) -> Result<()> {
        self.frame.clear();
        render_ascii_into(snapshot, &mut self.frame);

        self.out.queue(cursor::MoveTo(0, 0))?;
        for line in self.frame.lines() {
            self.out.write_all(line.as_bytes())?;
            self.out
                .queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
            self.out.write_all(b"\r\n")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Text frame of a snapshot, one `\n`-terminated line per row.
pub fn render_ascii(snapshot: &GameSnapshot) -> String {
    let mut out = String::new();
    render_ascii_into(snapshot, &mut out);
    out
}

fn render_ascii_into(snap: &GameSnapshot, out: &mut String) {
    let mut grid = snap.board.map(|row| row.map(|c| if c == EMPTY { '.' } else { '#' }));
    if let Some(active) = snap.active {
        let mut paint = |cells: &mut dyn Iterator<Item = (i8, i8)>, ch: char| {
            for (row, col) in cells {
                if let Some(slot) = usize::try_from(row)
                    .ok()
                    .and_then(|r| grid.get_mut(r))
                    .and_then(|r| usize::try_from(col).ok().and_then(|c| r.get_mut(c)))
                {
                    *slot = ch;
                }
            }
        };
        if let Some(ghost) = snap.ghost {
            paint(&mut active.board_cells_at(ghost), '+');
        }
        paint(&mut active.board_cells(), '@');
    }

    let side = side_lines(snap);
    let border: String = std::iter::repeat('-').take(BOARD_WIDTH as usize).collect();

    push_line(out, &format!("+{border}+"), side.first());
    for (i, row) in grid.iter().enumerate() {
        let body: String = row.iter().collect();
        push_line(out, &format!("|{body}|"), side.get(i + 1));
    }
    push_line(out, &format!("+{border}+"), None);
}

fn push_line(out: &mut String, board: &str, side: Option<&String>) {
    out.push_str(board);
    if let Some(side) = side.filter(|s| !s.is_empty()) {
        out.push_str("  ");
        out.push_str(side);
    }
    out.push('\n');
}

fn side_lines(snap: &GameSnapshot) -> Vec<String> {
    let mut lines = vec![
        format!("SCORE {}", snap.score),
        format!("LEVEL {}", snap.level),
        format!("LINES {}", snap.lines),
        String::new(),
        "NEXT".to_string(),
    ];
    lines.extend(preview_rows(snap.next));
    lines.push(String::new());
    if snap.game_over {
        lines.push("GAME OVER".to_string());
    } else if snap.paused {
        lines.push("PAUSED".to_string());
    }
    lines
}

/// Next piece centered in the preview square.
fn preview_rows(next: Option<PieceKind>) -> Vec<String> {
    let size = PREVIEW_SIZE as usize;
    let mut rows = vec![vec!['.'; size]; size];
    if let Some(kind) = next {
        let piece = Piece::new(kind);
        let off_c = (size - piece.width()) / 2;
        let off_r = (size - piece.height()) / 2;
        for (dr, dc) in piece.cells() {
            rows[off_r + dr as usize][off_c + dc as usize] = '#';
        }
    }
    rows.into_iter().map(|r| r.into_iter().collect()).collect()
}
