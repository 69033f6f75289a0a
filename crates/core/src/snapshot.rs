//! Read-only view of the game handed to presentation layers.

use crate::pieces::{ActivePiece, Position};
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};

/// Board cells, row-major, row 0 at the top
pub type BoardGrid = [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: BoardGrid,
    pub active: Option<ActivePiece>,
    pub ghost: Option<Position>,
    pub next: Option<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub drop_interval_ms: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[EMPTY; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            drop_interval_ms: 0,
            paused: false,
            game_over: false,
        }
    }
}
