//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains all the game rules and state management. It has
//! **zero dependencies** on UI, terminals or I/O:
//!
//! - **Deterministic**: the same seed produces the same piece sequence
//! - **Turn-based**: every operation is a bounded, synchronous step
//! - **Portable**: any renderer that reads a [`GameSnapshot`] can front it
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid, collision predicate and simultaneous line clearing
//! - [`pieces`]: shape catalog, matrix rotation, spawn placement
//! - [`rng`]: uniform random piece selection
//! - [`scoring`]: line-clear points, levels and gravity intervals
//! - [`game_state`]: the [`GameEngine`] command and query surface
//! - [`snapshot`]: read-only state handed to renderers
//! - [`session`]: gravity/pause/restart drive layer and the [`Presenter`] trait
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: each piece is drawn independently from 7 shapes
//! - **Matrix rotation**: clockwise transpose-and-reverse, no wall kicks
//! - **Ghost piece**: shows where the current piece would land
//! - **Scoring**: 100/300/500/800 per 1/2/3/4 lines, times the level
//! - **Levels**: one level per 10 cleared lines, starting at level 1
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameEngine;
//! use blockfall_core::types::{Direction, PieceKind};
//!
//! let mut game = GameEngine::new(12345);
//! game.set_next_piece(PieceKind::I);
//! game.spawn_piece();
//!
//! game.move_piece(Direction::Left);
//! game.rotate();
//! game.hard_drop();
//!
//! assert_eq!(game.board().filled_count(), 4);
//! assert_eq!(game.score(), 0);
//! ```

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{GameEngine, Landing, MoveOutcome};
pub use pieces::{ActivePiece, Piece, Position, ShapeMatrix};
pub use rng::SimpleRng;
pub use scoring::{drop_interval_ms, level_for_lines, line_clear_points};
pub use session::{Presenter, Session};
pub use snapshot::{BoardGrid, GameSnapshot};
