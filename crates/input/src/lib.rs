//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] and provides
//! a held-key repeat handler suitable for terminal environments (including
//! terminals without key-release events).

pub mod handler;
pub mod map;

pub use blockfall_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, held_direction, should_quit};
