//! Engine and session behavior through the public facade

use blockfall::core::{Board, GameEngine, MoveOutcome, Position, Session};
use blockfall::types::{Direction, GameAction, PieceKind, EMPTY};

fn engine_with(board: Board, first: PieceKind) -> GameEngine {
    let mut engine = GameEngine::with_board(7, board);
    engine.set_next_piece(first);
    engine.spawn_piece();
    engine
}

#[test]
fn test_hard_drop_i_on_empty_board() {
    let mut engine = engine_with(Board::new(), PieceKind::I);
    assert_eq!(engine.active().unwrap().pos, Position::new(0, 3));

    let landing = engine.hard_drop().unwrap();

    assert_eq!(engine.board().row(19), &[0, 0, 0, 1, 1, 1, 1, 0, 0, 0]);
    assert_eq!(landing.lines_cleared, 0);
    assert_eq!(engine.score(), 0);
    assert_eq!(engine.pieces_spawned(), 2);
    assert!(engine.active().is_some());
    assert!(!engine.game_over());
}

#[test]
fn test_o_completes_bottom_row() {
    let board = Board::from_rows(&[&[2, 2, 2, 2, 2, 2, 2, 2, 0, 0]]);
    let mut engine = engine_with(board, PieceKind::O);

    for _ in 0..4 {
        assert_eq!(engine.move_piece(Direction::Right), MoveOutcome::Moved);
    }
    assert_eq!(engine.move_piece(Direction::Right), MoveOutcome::Blocked);

    let landing = engine.hard_drop().unwrap();
    assert_eq!(landing.lines_cleared, 1);
    assert_eq!(landing.points, 100);
    assert_eq!(engine.score(), 100);
    assert_eq!(engine.lines(), 1);

    // The O's upper half drops into the cleared row.
    assert_eq!(engine.board().row(19), &[0, 0, 0, 0, 0, 0, 0, 0, 2, 2]);
    assert!(engine.board().row(18).iter().all(|&c| c == EMPTY));
}

#[test]
fn test_vertical_i_clears_four_rows() {
    let row: &[u8] = &[0, 3, 3, 3, 3, 3, 3, 3, 3, 3];
    let mut engine = engine_with(Board::from_rows(&[row, row, row, row]), PieceKind::I);

    assert!(engine.rotate());
    for _ in 0..3 {
        engine.move_piece(Direction::Left);
    }
    assert_eq!(engine.active().unwrap().pos, Position::new(0, 0));

    let landing = engine.hard_drop().unwrap();
    assert_eq!(landing.lines_cleared, 4);
    assert_eq!(engine.score(), 800);
    assert_eq!(engine.level(), 1);
    assert_eq!(engine.board().filled_count(), 0);
}

#[test]
fn test_soft_drop_lands_after_reaching_floor() {
    let mut engine = engine_with(Board::new(), PieceKind::O);
    for _ in 0..18 {
        assert_eq!(engine.move_piece(Direction::Down), MoveOutcome::Moved);
    }
    match engine.move_piece(Direction::Down) {
        MoveOutcome::Landed(landing) => {
            assert_eq!(landing.kind, PieceKind::O);
            assert_eq!(landing.position, Position::new(18, 4));
        }
        other => panic!("expected landing, got {other:?}"),
    }
    assert_eq!(engine.board().filled_count(), 4);
}

#[test]
fn test_ghost_matches_hard_drop_target() {
    let board = Board::from_rows(&[&[0, 0, 0, 0, 5, 0, 0, 0, 0, 0], &[0; 10]]);
    let mut engine = engine_with(board, PieceKind::T);

    let ghost = engine.ghost_position().unwrap();
    assert_eq!(engine.ghost_position(), Some(ghost));
    let landing = engine.hard_drop().unwrap();
    assert_eq!(landing.position, ghost);
}

#[test]
fn test_same_seed_same_pieces() {
    let mut a = GameEngine::new(2024);
    let mut b = GameEngine::new(2024);
    for _ in 0..20 {
        a.spawn_piece();
        b.spawn_piece();
        assert_eq!(a.active().map(|p| p.kind()), b.active().map(|p| p.kind()));
        assert_eq!(a.next_piece(), b.next_piece());
    }
}

#[test]
fn test_game_over_stops_commands() {
    let mut engine = GameEngine::new(3);
    engine.spawn_piece();
    while !engine.game_over() {
        engine.hard_drop();
    }

    let snapshot = engine.snapshot();
    assert!(snapshot.game_over);
    assert_eq!(engine.move_piece(Direction::Left), MoveOutcome::Ignored);
    assert!(!engine.rotate());
    assert!(engine.hard_drop().is_none());
    assert_eq!(engine.snapshot(), snapshot);
}

#[test]
fn test_session_plays_with_gravity_and_commands() {
    let mut session = Session::new(11);
    let start_row = session.engine().active().unwrap().pos.row;

    session.tick(600);
    session.tick(401);
    assert_eq!(session.engine().active().unwrap().pos.row, start_row + 1);

    assert!(session.apply(GameAction::HardDrop));
    assert_eq!(session.engine().pieces_spawned(), 2);

    assert!(session.apply(GameAction::Pause));
    assert!(!session.apply(GameAction::Rotate));
    assert!(session.apply(GameAction::Pause));

    assert!(session.apply(GameAction::Restart));
    assert_eq!(session.engine().board().filled_count(), 0);
    assert_eq!(session.games(), 1);
}

#[test]
fn test_pause_is_refused_after_game_over() {
    let mut session = Session::new(5);
    while !session.engine().game_over() {
        session.apply(GameAction::HardDrop);
    }
    assert!(!session.apply(GameAction::Pause));
    assert!(!session.paused());
    assert!(session.tick(10_000).is_none());
}
