//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the game.
//! All types are pure data with no external dependencies, so they can be used
//! by the engine, the input layer and any renderer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Preview**: 4x4 grid for the next piece
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds and only matter to the drive layer; the
//! engine itself has no notion of time.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 16 | Fixed frame interval (~60 FPS) |
//! | `BASE_DROP_MS` | 1000 | Gravity interval at level 1 |
//! | `DROP_STEP_MS` | 50 | Gravity speed-up per level |
//! | `DROP_INTERVAL_MIN_MS` | 100 | Fastest gravity interval |
//! | `MOVE_DELAY_MS` | 100 | Minimum gap between repeated held-key moves |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Direction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::T;
//! assert_eq!(piece.as_str(), "T");
//! assert_eq!(piece.cell(), 3);
//! assert_eq!(PieceKind::from_cell(3), Some(PieceKind::T));
//!
//! assert_eq!(Direction::Left.offset(), (0, -1));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Side length of the next-piece preview grid
pub const PREVIEW_SIZE: u8 = 4;

/// Size of one block in pixels for pixel-based renderers
pub const BLOCK_SIZE: u16 = 30;

/// Cumulative cleared lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per clear, indexed by the number of lines cleared at once.
///
/// The value is multiplied by the level in effect before the clear.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Frame interval in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Gravity interval at level 1
pub const BASE_DROP_MS: u32 = 1000;

/// Gravity interval reduction per level above 1
pub const DROP_STEP_MS: u32 = 50;

/// Gravity never gets faster than this
pub const DROP_INTERVAL_MIN_MS: u32 = 100;

/// Minimum gap between repeated moves while a direction key is held
pub const MOVE_DELAY_MS: u32 = 100;

/// Board cell value: 0 is empty, 1..=7 is the [`PieceKind::cell`] of the
/// piece that was merged there.
pub type Cell = u8;

/// The empty cell value
pub const EMPTY: Cell = 0;

/// The seven polyomino shapes, in catalog order.
///
/// The catalog index doubles as the color index and, offset by one, as the
/// value written into the board when a piece is merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl PieceKind {
    /// All kinds in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Position in the shape catalog (0-based)
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::O => 1,
            PieceKind::T => 2,
            PieceKind::L => 3,
            PieceKind::J => 4,
            PieceKind::S => 5,
            PieceKind::Z => 6,
        }
    }

    /// Look up a kind by catalog index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Value written into board cells occupied by this kind (never [`EMPTY`])
    pub fn cell(self) -> Cell {
        self.index() as Cell + 1
    }

    /// Inverse of [`PieceKind::cell`]; `None` for empty or unknown values
    pub fn from_cell(cell: Cell) -> Option<Self> {
        match cell {
            EMPTY => None,
            c => Self::from_index(c as usize - 1),
        }
    }

    /// Display color as (r, g, b)
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            PieceKind::I => (0, 255, 255),
            PieceKind::O => (255, 255, 0),
            PieceKind::T => (255, 0, 255),
            PieceKind::L => (255, 165, 0),
            PieceKind::J => (0, 0, 255),
            PieceKind::S => (0, 255, 0),
            PieceKind::Z => (255, 0, 0),
        }
    }

    /// Uppercase letter for compact displays
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
        }
    }
}

/// Direction of a single-step move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row, column) delta for one step
    pub fn offset(self) -> (i8, i8) {
        match self {
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Discrete commands a front-end forwards to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Move(Direction),
    Rotate,
    HardDrop,
    Pause,
    Restart,
}
