//! Session module - the drive layer around one [`GameEngine`]
//!
//! The engine is turn-based and has no clock. A session adds the timing
//! policy of a playable game on top of it, purely in elapsed milliseconds so
//! that it stays deterministic under test:
//!
//! - **Gravity**: one `move(Down)` whenever the gravity timer passes the
//!   engine's drop interval for the current level.
//! - **Pause**: gravity and input are suspended.
//! - **Restart**: the engine is replaced by a fresh instance.

use log::{info, trace};

use crate::game_state::{GameEngine, Landing, MoveOutcome};
use crate::snapshot::GameSnapshot;
use crate::types::{Direction, GameAction};

/// Anything that can show a [`GameSnapshot`].
///
/// Presentation adapters implement this; the session never depends on a
/// concrete renderer.
pub trait Presenter {
    type Error;

    fn present(&mut self, snapshot: &GameSnapshot) -> Result<(), Self::Error>;
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    type Error = P::Error;

    fn present(&mut self, snapshot: &GameSnapshot) -> Result<(), Self::Error> {
        (**self).present(snapshot)
    }
}

/// A running game: engine plus gravity timer and pause state
#[derive(Debug, Clone)]
pub struct Session {
    engine: GameEngine,
    paused: bool,
    drop_timer_ms: u32,
    /// Number of restarts so far
    games: u32,
}

impl Session {
    /// Start a game: build the engine and spawn the first piece
    pub fn new(seed: u32) -> Self {
        let mut engine = GameEngine::new(seed);
        engine.spawn_piece();
        Self::from_engine(engine)
    }

    /// Drive an engine that has already spawned its first piece
    pub fn from_engine(engine: GameEngine) -> Self {
        Self {
            engine,
            paused: false,
            drop_timer_ms: 0,
            games: 0,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn games(&self) -> u32 {
        self.games
    }

    pub fn drop_timer_ms(&self) -> u32 {
        self.drop_timer_ms
    }

    /// Apply one command. Returns whether anything changed.
    pub fn apply(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Pause => {
                if self.engine.game_over() {
                    return false;
                }
                self.paused = !self.paused;
                true
            }
            GameAction::Restart => {
                self.restart();
                true
            }
            _ if self.paused => false,
            GameAction::Move(direction) => !matches!(
                self.engine.move_piece(direction),
                MoveOutcome::Ignored | MoveOutcome::Blocked
            ),
            GameAction::Rotate => self.engine.rotate(),
            GameAction::HardDrop => self.engine.hard_drop().is_some(),
        }
    }

    /// Advance the gravity timer; drops the piece one row when it expires.
    ///
    /// Returns the landing if that drop brought the piece to rest.
    pub fn tick(&mut self, elapsed_ms: u32) -> Option<Landing> {
        if self.paused || self.engine.game_over() {
            return None;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        if self.drop_timer_ms <= self.engine.drop_interval_ms() {
            return None;
        }
        self.drop_timer_ms = 0;

        trace!("gravity step at level {}", self.engine.level());
        match self.engine.move_piece(Direction::Down) {
            MoveOutcome::Landed(landing) => Some(landing),
            _ => None,
        }
    }

    /// Throw the current game away and start a new one.
    ///
    /// The new game is seeded from the old game's RNG state so consecutive
    /// games differ but stay reproducible from the first seed.
    pub fn restart(&mut self) {
        let seed = self.engine.rng_state();
        info!(
            "restart: previous game scored {} with {} lines",
            self.engine.score(),
            self.engine.lines()
        );
        let mut engine = GameEngine::new(seed);
        engine.spawn_piece();
        self.engine = engine;
        self.paused = false;
        self.drop_timer_ms = 0;
        self.games = self.games.wrapping_add(1);
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.engine.snapshot_into(out);
        out.paused = self.paused;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Hand the current state to a presenter
    pub fn present<P: Presenter>(&self, presenter: &mut P) -> Result<(), P::Error> {
        presenter.present(&self.snapshot())
    }
}
