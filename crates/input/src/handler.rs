//! Held-key repeat handler for terminal environments.
//!
//! A freshly pressed direction moves immediately. While it stays held, the
//! move repeats, but all held directions share one timer and fire at most
//! once per `MOVE_DELAY_MS`. Terminals that never send key-release events are
//! handled with a timeout: a key counts as released once no key event has
//! arrived for a while.

use crossterm::event::KeyCode;

use arrayvec::ArrayVec;

use crate::map::held_direction;
use crate::types::{Direction, GameAction, MOVE_DELAY_MS};

/// Repeated moves produced by one [`InputHandler::update`]
pub type Repeats = ArrayVec<GameAction, 3>;

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that keeps repeating.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

/// Tracks which directions are held and when they last fired.
#[derive(Debug, Clone)]
pub struct InputHandler {
    left_held: bool,
    right_held: bool,
    down_held: bool,
    since_move_ms: u32,
    since_key_ms: u32,
    move_delay_ms: u32,
    key_release_timeout_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_move_delay(MOVE_DELAY_MS)
    }

    pub fn with_move_delay(move_delay_ms: u32) -> Self {
        Self {
            left_held: false,
            right_held: false,
            down_held: false,
            since_move_ms: 0,
            since_key_ms: 0,
            move_delay_ms,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn is_held(&self, direction: Direction) -> bool {
        *self.flag(direction)
    }

    fn flag(&self, direction: Direction) -> &bool {
        match direction {
            Direction::Left => &self.left_held,
            Direction::Right => &self.right_held,
            Direction::Down => &self.down_held,
        }
    }

    fn flag_mut(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Left => &mut self.left_held,
            Direction::Right => &mut self.right_held,
            Direction::Down => &mut self.down_held,
        }
    }

    /// Register a key press. Returns the move to apply right away, if any.
    ///
    /// Keys that are not movement keys return `None` and leave the held state
    /// (and its auto-release timer) untouched.
    pub fn handle_key_press(&mut self, code: KeyCode) -> Option<GameAction> {
        let direction = held_direction(code)?;
        self.since_key_ms = 0;

        let held = self.flag_mut(direction);
        if *held {
            return None;
        }
        *held = true;
        self.since_move_ms = 0;
        Some(GameAction::Move(direction))
    }

    pub fn handle_key_release(&mut self, code: KeyCode) {
        if let Some(direction) = held_direction(code) {
            *self.flag_mut(direction) = false;
        }
    }

    /// Advance timers and return the repeats that are due.
    pub fn update(&mut self, elapsed_ms: u32) -> Repeats {
        let mut actions = Repeats::new();

        // Auto-release when terminal does not emit release events.
        self.since_key_ms = self.since_key_ms.saturating_add(elapsed_ms);
        if self.since_key_ms > self.key_release_timeout_ms {
            self.release_all();
        }

        self.since_move_ms = self.since_move_ms.saturating_add(elapsed_ms);
        if self.since_move_ms <= self.move_delay_ms {
            return actions;
        }

        for direction in [Direction::Left, Direction::Right, Direction::Down] {
            if self.is_held(direction) {
                actions.push(GameAction::Move(direction));
            }
        }
        if !actions.is_empty() {
            self.since_move_ms = 0;
        }
        actions
    }

    fn release_all(&mut self) {
        self.left_held = false;
        self.right_held = false;
        self.down_held = false;
    }

    pub fn reset(&mut self) {
        self.release_all();
        self.since_move_ms = 0;
        self.since_key_ms = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
