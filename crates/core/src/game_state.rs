//! Game engine module - owns the complete game state
//!
//! This module ties together the board, pieces, RNG and scoring. It handles
//! spawning, movement, rotation, landing, line clears and the game-over flag.
//! It knows nothing about time: gravity and key repeat belong to the driver
//! (see [`crate::session`]).
//!
//! Piece lifecycle:
//!
//! ```text
//! Spawned -> Moving* -> Landing -> Merged -> LinesChecked -> Spawned'
//!    \
//!     -> GameOver (fresh piece already collides)
//! ```

use log::{debug, info};

use crate::board::Board;
use crate::pieces::{ActivePiece, Piece, Position};
use crate::rng::SimpleRng;
use crate::scoring::{drop_interval_ms, level_for_lines, line_clear_points};
use crate::snapshot::GameSnapshot;
use crate::types::{Direction, PieceKind};

/// Result of [`GameEngine::move_piece`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece moved one step
    Moved,
    /// Sideways move collided and was discarded
    Blocked,
    /// Downward move collided: the piece was merged and the next one spawned
    Landed(Landing),
    /// No active piece, or the game is over
    Ignored,
}

/// What happened when a piece came to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub kind: PieceKind,
    pub position: Position,
    pub lines_cleared: u32,
    pub points: u32,
    /// Level in effect during the drop, used for scoring
    pub level_before: u32,
    /// The piece spawned after this landing collided immediately
    pub game_over: bool,
}

/// The game engine: board, active piece, preview and counters
#[derive(Debug, Clone)]
pub struct GameEngine {
    board: Board,
    active: Option<ActivePiece>,
    next: Option<PieceKind>,
    rng: SimpleRng,
    score: u32,
    level: u32,
    lines: u32,
    /// Pieces spawned so far, including the one that ended the game
    pieces_spawned: u32,
    game_over: bool,
}

impl GameEngine {
    /// Create a game on an empty board. The next piece is chosen right away;
    /// call [`GameEngine::spawn_piece`] once to put it into play.
    pub fn new(seed: u32) -> Self {
        Self::with_board(seed, Board::new())
    }

    /// Create a game on a prepared board
    pub fn with_board(seed: u32, board: Board) -> Self {
        let mut rng = SimpleRng::new(seed);
        let next = Some(rng.next_piece());
        Self {
            board,
            active: None,
            next,
            rng,
            score: 0,
            level: level_for_lines(0),
            lines: 0,
            pieces_spawned: 0,
            game_over: false,
        }
    }

    /// Current RNG state; seeding a new game with it continues the sequence
    pub fn rng_state(&self) -> u32 {
        self.rng.state()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.pieces_spawned
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Gravity interval for the current level
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level)
    }

    /// Override the pending next piece
    pub fn set_next_piece(&mut self, kind: PieceKind) {
        self.next = Some(kind);
    }

    /// Put the pending next piece into play and pick a new next piece.
    ///
    /// Sets the game-over flag when the new piece collides where it spawns.
    pub fn spawn_piece(&mut self) {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.rng.next_piece(),
        };
        let active = ActivePiece::spawn(kind);
        self.next = Some(self.rng.next_piece());
        self.pieces_spawned = self.pieces_spawned.wrapping_add(1);

        if self.check_collision(&active.piece, active.pos) {
            self.game_over = true;
            info!(
                "game over: {} blocked at spawn (score {}, lines {}, level {})",
                kind.as_str(),
                self.score,
                self.lines,
                self.level
            );
        }
        self.active = Some(active);
    }

    /// Whether `piece` at `at` leaves the board or overlaps locked cells.
    ///
    /// Every legality decision in the engine goes through here.
    pub fn check_collision(&self, piece: &Piece, at: Position) -> bool {
        self.board.collides(piece, at)
    }

    /// Move the active piece one step.
    ///
    /// A blocked downward move lands the piece; a blocked sideways move is
    /// discarded.
    pub fn move_piece(&mut self, direction: Direction) -> MoveOutcome {
        if self.game_over {
            return MoveOutcome::Ignored;
        }
        let Some(active) = self.active else {
            return MoveOutcome::Ignored;
        };

        let candidate = active.pos.offset(direction.offset());
        if !self.check_collision(&active.piece, candidate) {
            self.active = Some(ActivePiece {
                pos: candidate,
                ..active
            });
            return MoveOutcome::Moved;
        }

        match direction {
            Direction::Down => MoveOutcome::Landed(self.land(active)),
            Direction::Left | Direction::Right => MoveOutcome::Blocked,
        }
    }

    /// Rotate the active piece 90° clockwise in place.
    ///
    /// No kicks: if the rotated matrix collides at the current position the
    /// rotation is discarded. Returns whether the piece rotated.
    pub fn rotate(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let rotated = active.piece.rotated_cw();
        if self.check_collision(&rotated, active.pos) {
            return false;
        }
        self.active = Some(ActivePiece {
            piece: rotated,
            ..active
        });
        true
    }

    /// Drop the active piece straight down, merge it and spawn the next one
    pub fn hard_drop(&mut self) -> Option<Landing> {
        if self.game_over {
            return None;
        }
        let ghost = self.ghost_position()?;
        let mut active = self.active?;
        active.pos = ghost;
        self.active = Some(active);
        Some(self.land(active))
    }

    /// Write the active piece into the board at its current position.
    ///
    /// No legality check; callers go through the landing path.
    pub fn merge_piece(&mut self) {
        if let Some(active) = self.active {
            self.board.merge(&active.piece, active.pos);
        }
    }

    /// Remove every full row at once, then score and re-level.
    ///
    /// Points use the level in effect before the clear. Returns the number of
    /// rows removed.
    pub fn clear_lines(&mut self) -> usize {
        let cleared = self.board.clear_full_rows().len();
        if cleared == 0 {
            return 0;
        }

        let points = line_clear_points(cleared, self.level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(cleared as u32);

        let new_level = level_for_lines(self.lines);
        if new_level != self.level {
            debug!("level {} -> {}", self.level, new_level);
            self.level = new_level;
        }
        cleared
    }

    /// Where the active piece would land on a hard drop. Never mutates.
    pub fn ghost_position(&self) -> Option<Position> {
        let active = self.active.as_ref()?;
        let mut probe = active.pos;
        while !self.check_collision(&active.piece, probe) {
            probe.row += 1;
        }
        probe.row -= 1;
        Some(probe)
    }

    /// Merge, clear lines, spawn the next piece
    fn land(&mut self, active: ActivePiece) -> Landing {
        let level_before = self.level;
        let score_before = self.score;
        let kind = active.kind();
        let position = active.pos;

        self.merge_piece();
        let lines_cleared = self.clear_lines() as u32;
        self.spawn_piece();

        let landing = Landing {
            kind,
            position,
            lines_cleared,
            points: self.score - score_before,
            level_before,
            game_over: self.game_over,
        };
        debug!(
            "landed {} at ({}, {}): {} line(s), +{} points",
            kind.as_str(),
            position.row,
            position.col,
            lines_cleared,
            landing.points
        );
        landing
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.active;
        out.ghost = self.ghost_position();
        out.next = self.next;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.drop_interval_ms = self.drop_interval_ms();
        out.paused = false;
        out.game_over = self.game_over;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};

    fn engine_with(kind: PieceKind, board: Board) -> GameEngine {
        let mut engine = GameEngine::with_board(12345, board);
        engine.set_next_piece(kind);
        engine.spawn_piece();
        engine
    }

    #[test]
    fn test_new_engine() {
        let engine = GameEngine::new(12345);

        assert!(engine.active().is_none());
        assert!(engine.next_piece().is_some());
        assert!(!engine.game_over());
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.lines(), 0);
        assert_eq!(engine.drop_interval_ms(), 1000);
    }

    #[test]
    fn test_spawn_uses_pending_next_piece() {
        let mut engine = GameEngine::new(12345);
        let pending = engine.next_piece().unwrap();

        engine.spawn_piece();

        assert_eq!(engine.active().unwrap().kind(), pending);
        assert!(engine.next_piece().is_some());
        assert_eq!(engine.pieces_spawned(), 1);
    }

    #[test]
    fn test_spawn_without_pending_piece_picks_one() {
        let mut engine = GameEngine::new(12345);
        engine.next = None;
        engine.spawn_piece();
        assert!(engine.active().is_some());
        assert!(engine.next_piece().is_some());
    }

    #[test]
    fn test_i_piece_spawns_centered() {
        let engine = engine_with(PieceKind::I, Board::new());
        let active = engine.active().unwrap();
        assert_eq!(active.pos, Position::new(0, 3));
        let cols: Vec<i8> = active.board_cells().map(|(_, c)| c).collect();
        assert_eq!(cols, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_move_left_right_and_walls() {
        let mut engine = engine_with(PieceKind::O, Board::new());
        assert_eq!(engine.move_piece(Direction::Left), MoveOutcome::Moved);
        assert_eq!(engine.active().unwrap().pos, Position::new(0, 3));

        for _ in 0..3 {
            assert_eq!(engine.move_piece(Direction::Left), MoveOutcome::Moved);
        }
        assert_eq!(engine.move_piece(Direction::Left), MoveOutcome::Blocked);
        assert_eq!(engine.active().unwrap().pos, Position::new(0, 0));

        for _ in 0..8 {
            assert_eq!(engine.move_piece(Direction::Right), MoveOutcome::Moved);
        }
        assert_eq!(engine.move_piece(Direction::Right), MoveOutcome::Blocked);
        assert_eq!(engine.active().unwrap().pos, Position::new(0, 8));
    }

    #[test]
    fn test_move_down_lands_on_floor() {
        let mut engine = engine_with(PieceKind::O, Board::new());
        for _ in 0..18 {
            assert_eq!(engine.move_piece(Direction::Down), MoveOutcome::Moved);
        }

        match engine.move_piece(Direction::Down) {
            MoveOutcome::Landed(landing) => {
                assert_eq!(landing.kind, PieceKind::O);
                assert_eq!(landing.position, Position::new(18, 4));
                assert_eq!(landing.lines_cleared, 0);
                assert!(!landing.game_over);
            }
            other => panic!("expected landing, got {:?}", other),
        }

        assert_eq!(engine.board().get(19, 4), Some(PieceKind::O.cell()));
        assert_eq!(engine.board().get(18, 5), Some(PieceKind::O.cell()));
        assert_eq!(engine.active().unwrap().pos.row, 0);
        assert_eq!(engine.pieces_spawned(), 2);
    }

    #[test]
    fn test_move_down_onto_stack_lands() {
        // Stack occupies row 10 under the spawn columns.
        let mut board = Board::new();
        for col in 0..BOARD_WIDTH as i8 - 1 {
            board.set(10, col, PieceKind::Z.cell());
        }
        let mut engine = engine_with(PieceKind::O, board);
        for _ in 0..8 {
            engine.move_piece(Direction::Down);
        }
        assert_eq!(engine.active().unwrap().pos.row, 8);

        assert!(matches!(
            engine.move_piece(Direction::Down),
            MoveOutcome::Landed(_)
        ));
        assert_eq!(engine.board().get(9, 4), Some(PieceKind::O.cell()));
        assert!(!engine.game_over());
    }

    #[test]
    fn test_rotate_without_kicks() {
        let mut engine = engine_with(PieceKind::I, Board::new());
        // Horizontal I at row 0: rotated it needs rows 0..=3 in column 3.
        assert!(engine.rotate());
        let active = engine.active().unwrap();
        assert_eq!((active.piece.height(), active.piece.width()), (4, 1));
        assert_eq!(active.pos, Position::new(0, 3));

        // Against the right wall a vertical I cannot become horizontal.
        for _ in 0..6 {
            engine.move_piece(Direction::Right);
        }
        assert_eq!(engine.active().unwrap().pos.col, 9);
        let before = *engine.active().unwrap();
        assert!(!engine.rotate());
        assert_eq!(*engine.active().unwrap(), before);
    }

    #[test]
    fn test_rotate_blocked_near_floor() {
        let mut engine = engine_with(PieceKind::I, Board::new());
        for _ in 0..19 {
            engine.move_piece(Direction::Down);
        }
        assert_eq!(engine.active().unwrap().pos.row, 19);
        assert!(!engine.rotate());
    }

    #[test]
    fn test_four_rotations_restore_matrix() {
        for kind in PieceKind::ALL {
            let mut engine = engine_with(kind, Board::new());
            // Leave room below so every orientation fits.
            engine.move_piece(Direction::Down);
            engine.move_piece(Direction::Down);
            let before = *engine.active().unwrap();
            for _ in 0..4 {
                assert!(engine.rotate(), "{:?}", kind);
            }
            assert_eq!(*engine.active().unwrap(), before);
        }
    }

    #[test]
    fn test_hard_drop_i_piece_on_empty_board() {
        let mut engine = engine_with(PieceKind::I, Board::new());

        let landing = engine.hard_drop().unwrap();

        assert_eq!(landing.position, Position::new(19, 3));
        assert_eq!(engine.board().row(19), &[0, 0, 0, 1, 1, 1, 1, 0, 0, 0]);
        assert_eq!(engine.score(), 0);
        assert!(engine.active().is_some());
        assert_eq!(engine.active().unwrap().pos.row, 0);
        assert_eq!(engine.pieces_spawned(), 2);
    }

    #[test]
    fn test_hard_drop_o_clears_row() {
        let mut row: [Cell; 10] = [2; 10];
        row[8] = EMPTY;
        row[9] = EMPTY;
        let board = Board::from_rows(&[&row]);
        let mut engine = engine_with(PieceKind::O, board);
        for _ in 0..4 {
            assert_eq!(engine.move_piece(Direction::Right), MoveOutcome::Moved);
        }

        let landing = engine.hard_drop().unwrap();

        assert_eq!(landing.lines_cleared, 1);
        assert_eq!(landing.points, 100);
        assert_eq!(engine.score(), 100);
        assert_eq!(engine.lines(), 1);
        let mut expected = [EMPTY; 10];
        expected[8] = PieceKind::O.cell();
        expected[9] = PieceKind::O.cell();
        assert_eq!(engine.board().row(19), &expected);
        assert!(engine.board().row(18).iter().all(|&c| c == EMPTY));
    }

    #[test]
    fn test_clear_lines_scores_with_level_before_clear() {
        let mut engine = engine_with(PieceKind::T, Board::new());
        engine.lines = 8;
        for row in 16..20 {
            for col in 0..BOARD_WIDTH as i8 {
                engine.board_mut().set(row, col, PieceKind::L.cell());
            }
        }
        engine.board_mut().set(15, 0, PieceKind::J.cell());

        assert_eq!(engine.clear_lines(), 4);
        assert_eq!(engine.score(), 800);
        assert_eq!(engine.lines(), 12);
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.board().get(19, 0), Some(PieceKind::J.cell()));
        assert_eq!(engine.board().filled_count(), 1);
    }

    #[test]
    fn test_o_drop_clears_two_rows_at_level_two() {
        let row: &[Cell] = &[6, 6, 6, 6, 6, 6, 6, 6, 0, 0];
        let mut engine = engine_with(PieceKind::O, Board::from_rows(&[row, row]));
        engine.lines = 10;
        engine.level = 2;

        for _ in 0..4 {
            assert_eq!(engine.move_piece(Direction::Right), MoveOutcome::Moved);
        }
        let landing = engine.hard_drop().unwrap();

        assert_eq!(landing.lines_cleared, 2);
        assert_eq!(landing.level_before, 2);
        assert_eq!(landing.points, 600);
        assert_eq!(engine.score(), 600);
        assert_eq!(engine.lines(), 12);
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.board().filled_count(), 0);
    }

    #[test]
    fn test_vertical_i_clears_three_rows_at_level_two() {
        let row: &[Cell] = &[0, 4, 4, 4, 4, 4, 4, 4, 4, 4];
        let mut engine = engine_with(PieceKind::I, Board::from_rows(&[row, row, row]));
        engine.lines = 15;
        engine.level = 2;

        assert!(engine.rotate());
        for _ in 0..3 {
            assert_eq!(engine.move_piece(Direction::Left), MoveOutcome::Moved);
        }
        let landing = engine.hard_drop().unwrap();

        assert_eq!(landing.position, Position::new(16, 0));
        assert_eq!(landing.lines_cleared, 3);
        assert_eq!(landing.points, 1000);
        assert_eq!(engine.score(), 1000);
        assert_eq!(engine.lines(), 18);
        assert_eq!(engine.level(), 2);

        // The top cell of the I survives and drops to the floor.
        let mut expected = [EMPTY; BOARD_WIDTH as usize];
        expected[0] = PieceKind::I.cell();
        assert_eq!(engine.board().row(19), &expected);
        assert_eq!(engine.board().filled_count(), 1);
    }

    #[test]
    fn test_level_is_recomputed_from_cumulative_lines() {
        // Counters out of step on purpose: the new level comes from the line
        // total alone, so it can move by more than one.
        let mut engine = engine_with(PieceKind::T, Board::new());
        engine.lines = 17;
        engine.level = 1;
        for row in 16..20 {
            for col in 0..BOARD_WIDTH as i8 {
                engine.board_mut().set(row, col, PieceKind::L.cell());
            }
        }
        assert_eq!(engine.clear_lines(), 4);
        assert_eq!(engine.score(), 800);
        assert_eq!(engine.level(), 3);
    }

    #[test]
    fn test_ghost_position_is_pure() {
        let mut engine = engine_with(PieceKind::T, Board::new());
        let before = engine.snapshot();

        let ghost = engine.ghost_position().unwrap();
        assert_eq!(ghost, Position::new(18, 4));
        assert_eq!(engine.ghost_position(), Some(ghost));
        assert_eq!(engine.snapshot(), before);

        // Reachable by literal down moves.
        for _ in 0..ghost.row {
            assert_eq!(engine.move_piece(Direction::Down), MoveOutcome::Moved);
        }
        assert_eq!(engine.active().unwrap().pos, ghost);
    }

    #[test]
    fn test_game_over_when_spawn_blocked() {
        let mut board = Board::new();
        board.set(0, 4, PieceKind::S.cell());
        let mut engine = GameEngine::with_board(1, board);
        engine.set_next_piece(PieceKind::O);
        engine.spawn_piece();

        assert!(engine.game_over());
        let snapshot = engine.snapshot();

        assert_eq!(engine.move_piece(Direction::Down), MoveOutcome::Ignored);
        assert_eq!(engine.move_piece(Direction::Left), MoveOutcome::Ignored);
        assert!(!engine.rotate());
        assert!(engine.hard_drop().is_none());
        assert_eq!(engine.snapshot(), snapshot);
    }

    #[test]
    fn test_stacking_to_the_top_ends_the_game() {
        let mut engine = GameEngine::new(99);
        engine.spawn_piece();
        let mut drops = 0;
        while !engine.game_over() {
            engine.hard_drop();
            drops += 1;
            assert!(drops < 200, "game never ended");
        }
        assert!(engine.hard_drop().is_none());
        assert!(engine.board().filled_count() > 0);
    }

    #[test]
    fn test_commands_before_spawn_are_ignored() {
        let mut engine = GameEngine::new(3);
        assert_eq!(engine.move_piece(Direction::Down), MoveOutcome::Ignored);
        assert!(!engine.rotate());
        assert!(engine.hard_drop().is_none());
        assert!(engine.ghost_position().is_none());
    }

    #[test]
    fn test_snapshot_mirrors_engine() {
        let engine = engine_with(PieceKind::L, Board::new());
        let snap = engine.snapshot();
        assert_eq!(snap.active.map(|a| a.kind()), Some(PieceKind::L));
        assert_eq!(snap.ghost, engine.ghost_position());
        assert_eq!(snap.next, engine.next_piece());
        assert_eq!(snap.level, 1);
        assert_eq!(snap.board.len(), BOARD_HEIGHT as usize);
        assert!(!snap.paused && !snap.game_over);
    }
}
