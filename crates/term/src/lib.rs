//! Terminal front-end for the game.
//!
//! This is a small, game-oriented rendering layer. It avoids widget/layout
//! frameworks and renders into a simple framebuffer that is flushed to the
//! terminal with crossterm.
//!
//! - [`fb`]: styled character framebuffer
//! - [`game_view`]: pure snapshot-to-framebuffer mapping
//! - [`renderer`]: diffing flush to a real terminal
//! - [`presenter`]: [`Presenter`](crate::core::Presenter) implementations

pub mod fb;
pub mod game_view;
pub mod presenter;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use presenter::{render_ascii, AsciiPresenter, ColorPresenter};
pub use renderer::{
    encode_diff_into, encode_full_into, enter_terminal, leave_terminal, TerminalRenderer,
};
