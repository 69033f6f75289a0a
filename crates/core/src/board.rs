//! Board module - manages the game grid
//!
//! The board is a 10x20 grid where each cell is either empty (0) or holds the
//! cell value of the piece kind that was merged there.
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates are (row, col): row 0 is the top, col 0 is the left edge.

use arrayvec::ArrayVec;

use crate::pieces::{Piece, Position};
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH, EMPTY};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Row indices removed by one [`Board::clear_full_rows`] call
pub type ClearedRows = ArrayVec<usize, HEIGHT>;

/// The game board - 20 rows x 10 columns using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * WIDTH + col)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [EMPTY; BOARD_SIZE],
        }
    }

    /// Build a board from rows listed top to bottom.
    ///
    /// Rows are bottom-aligned: passing three rows fills rows 17..=19 and leaves
    /// everything above empty. Extra rows beyond the board height are ignored
    /// from the top, and each row is truncated or zero-padded to the width.
    pub fn from_rows(rows: &[&[Cell]]) -> Self {
        let mut board = Self::new();
        let skip = rows.len().saturating_sub(HEIGHT);
        let first_row = HEIGHT - (rows.len() - skip);
        for (i, row) in rows.iter().skip(skip).enumerate() {
            let start = (first_row + i) * WIDTH;
            for (col, &cell) in row.iter().take(WIDTH).enumerate() {
                board.cells[start + col] = cell;
            }
        }
        board
    }

    /// Calculate flat index from (row, col)
    #[inline(always)]
    fn index(row: i8, col: i8) -> Option<usize> {
        if row < 0 || row >= BOARD_HEIGHT as i8 || col < 0 || col >= BOARD_WIDTH as i8 {
            return None;
        }
        Some((row as usize) * WIDTH + (col as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get the cell at (row, col); `None` if out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set the cell at (row, col); returns false if out of bounds
    pub fn set(&mut self, row: i8, col: i8, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and filled
    pub fn is_occupied(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(c) if c != EMPTY)
    }

    /// Piece kind stored at (row, col), if any
    pub fn kind_at(&self, row: i8, col: i8) -> Option<PieceKind> {
        self.get(row, col).and_then(PieceKind::from_cell)
    }

    /// Whether `piece` placed with its top-left corner at `at` is illegal.
    ///
    /// A cell collides when it lies outside the columns, at or below the
    /// bottom edge, or on an occupied cell. Cells above the top edge are
    /// legal and never tested against board content.
    pub fn collides(&self, piece: &Piece, at: Position) -> bool {
        piece.cells().any(|(dr, dc)| {
            let row = at.row + dr;
            let col = at.col + dc;
            col < 0
                || col >= BOARD_WIDTH as i8
                || row >= BOARD_HEIGHT as i8
                || (row >= 0 && self.is_occupied(row, col))
        })
    }

    /// Write the piece's cell value into every occupied cell at `at`.
    ///
    /// No legality check; cells falling outside the board are skipped.
    pub fn merge(&mut self, piece: &Piece, at: Position) {
        let value = piece.kind().cell();
        for (dr, dc) in piece.cells() {
            self.set(at.row + dr, at.col + dc, value);
        }
    }

    /// Borrow one row, top row first.
    ///
    /// # Panics
    ///
    /// Panics if `row >= BOARD_HEIGHT`. Use [`Board::get`] for checked access.
    pub fn row(&self, row: usize) -> &[Cell] {
        assert!(row < HEIGHT, "row {row} out of range 0..{HEIGHT}");
        let start = row * WIDTH;
        &self.cells[start..start + WIDTH]
    }

    /// Iterate rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(WIDTH)
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= HEIGHT {
            return false;
        }
        self.row(row).iter().all(|&cell| cell != EMPTY)
    }

    /// Remove all full rows at once and drop the survivors into their place.
    ///
    /// Survivors keep their relative order and the vacated rows at the top are
    /// emptied. Returns the removed row indices, bottom to top.
    /// Uses a two-pointer pass with zero allocation.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared_rows = ClearedRows::new();
        let mut write_row = HEIGHT;

        for read_row in (0..HEIGHT).rev() {
            if self.is_row_full(read_row) {
                cleared_rows.push(read_row);
            } else {
                write_row -= 1;
                if write_row != read_row {
                    let src = read_row * WIDTH;
                    self.cells.copy_within(src..src + WIDTH, write_row * WIDTH);
                }
            }
        }

        self.cells[..write_row * WIDTH].fill(EMPTY);

        cleared_rows
    }

    /// Copy the board into a row-major grid
    pub fn write_grid(&self, out: &mut [[Cell; WIDTH]; HEIGHT]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(0, 9), Some(9));
        assert_eq!(Board::index(1, 0), Some(10));
        assert_eq!(Board::index(19, 9), Some(199));
        assert_eq!(Board::index(0, -1), None);
        assert_eq!(Board::index(0, 10), None);
        assert_eq!(Board::index(20, 0), None);
        assert_eq!(Board::index(-1, 0), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new();

        board.set(0, 0, PieceKind::I.cell());
        board.set(10, 5, PieceKind::T.cell());

        assert_eq!(board.get(0, 0), Some(1));
        assert_eq!(board.get(10, 5), Some(3));

        assert_eq!(board.cells[0], 1);
        assert_eq!(board.cells[10 * 10 + 5], 3);
    }

    #[test]
    fn from_rows_is_bottom_aligned() {
        let board = Board::from_rows(&[&[1, 0, 0], &[2, 2, 2, 2, 2, 2, 2, 2, 2, 2]]);
        assert_eq!(board.get(18, 0), Some(1));
        assert_eq!(board.get(18, 1), Some(0));
        assert!(board.is_row_full(19));
        assert_eq!(board.filled_count(), 11);
    }

    #[test]
    fn collides_allows_cells_above_the_top() {
        let board = Board::new();
        let piece = Piece::new(PieceKind::I).rotated_cw();
        // Vertical I with two cells above row 0.
        assert!(!board.collides(&piece, Position::new(-2, 0)));
        // Left/right walls still apply above the top.
        assert!(board.collides(&piece, Position::new(-2, -1)));
        assert!(board.collides(&piece, Position::new(-2, 10)));
    }

    #[test]
    fn collides_at_floor_and_with_stack() {
        let mut board = Board::new();
        let piece = Piece::new(PieceKind::O);
        assert!(!board.collides(&piece, Position::new(18, 0)));
        assert!(board.collides(&piece, Position::new(19, 0)));

        board.set(17, 1, PieceKind::Z.cell());
        assert!(board.collides(&piece, Position::new(16, 0)));
        assert!(!board.collides(&piece, Position::new(16, 2)));
    }

    #[test]
    fn merge_skips_cells_outside_the_board() {
        let mut board = Board::new();
        let piece = Piece::new(PieceKind::I).rotated_cw();
        board.merge(&piece, Position::new(-2, 4));
        assert_eq!(board.filled_count(), 2);
        assert_eq!(board.get(0, 4), Some(PieceKind::I.cell()));
        assert_eq!(board.get(1, 4), Some(PieceKind::I.cell()));
    }

    #[test]
    fn clear_full_rows_keeps_survivor_order() {
        let full: &[Cell] = &[1; 10];
        let mut board = Board::from_rows(&[
            &[3, 0, 0, 0, 0, 0, 0, 0, 0, 0],
            full,
            &[0, 4, 0, 0, 0, 0, 0, 0, 0, 0],
            full,
        ]);

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[19, 17]);
        assert_eq!(board.get(18, 0), Some(3));
        assert_eq!(board.get(19, 1), Some(4));
        assert_eq!(board.filled_count(), 2);
        for row in 0..18 {
            assert!(board.row(row).iter().all(|&c| c == EMPTY));
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn row_past_the_floor_panics() {
        let board = Board::new();
        assert_eq!(board.row(BOARD_HEIGHT as usize - 1).len(), WIDTH);
        assert_eq!(board.get(BOARD_HEIGHT as i8, 0), None);
        board.row(BOARD_HEIGHT as usize);
    }
}
