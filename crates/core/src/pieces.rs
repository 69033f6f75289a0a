//! Pieces module - shape catalog and matrix rotation
//!
//! Every piece is a small binary matrix. Rotation is the plain 90° clockwise
//! matrix transform `new[i][j] = old[rows-1-j][i]`, the same for every kind,
//! with no rotation center and no wall kicks.

use crate::types::{PieceKind, BOARD_WIDTH};

/// Largest side length of any catalog matrix
pub const MAX_SHAPE_SIZE: usize = 4;

/// Board position of a piece's top-left matrix corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Position shifted by a (row, col) delta
    pub fn offset(self, (dr, dc): (i8, i8)) -> Self {
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }
}

/// Binary occupancy matrix of up to 4x4 cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeMatrix {
    rows: u8,
    cols: u8,
    bits: [[bool; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl ShapeMatrix {
    /// Build from 0/1 rows. Rows must be non-empty, equally long, and at
    /// most 4x4.
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        assert!(
            !rows.is_empty() && rows.len() <= MAX_SHAPE_SIZE,
            "shape must have 1..=4 rows"
        );
        let cols = rows[0].len();
        assert!(
            cols > 0 && cols <= MAX_SHAPE_SIZE,
            "shape must have 1..=4 columns"
        );

        let mut bits = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), cols, "shape rows must have equal length");
            for (j, &v) in row.iter().enumerate() {
                bits[i][j] = v != 0;
            }
        }

        Self {
            rows: rows.len() as u8,
            cols: cols as u8,
            bits,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && self.bits[row][col]
    }

    /// Occupied cells as (row, col) offsets, row-major
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.rows()).flat_map(move |i| {
            (0..self.cols())
                .filter(move |&j| self.bits[i][j])
                .map(move |j| (i as i8, j as i8))
        })
    }

    /// 90° clockwise rotation: `new[i][j] = old[rows-1-j][i]`
    pub fn rotated_cw(&self) -> Self {
        let rows = self.rows();
        let cols = self.cols();
        let mut bits = [[false; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (i, out_row) in bits.iter_mut().enumerate().take(cols) {
            for (j, out) in out_row.iter_mut().enumerate().take(rows) {
                *out = self.bits[rows - 1 - j][i];
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            bits,
        }
    }

    /// Matrix as 0/1 rows, for assertions and debugging
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows())
            .map(|i| (0..self.cols()).map(|j| self.bits[i][j] as u8).collect())
            .collect()
    }
}

/// Spawn-orientation matrix of a catalog shape
pub fn catalog_shape(kind: PieceKind) -> ShapeMatrix {
    match kind {
        PieceKind::I => ShapeMatrix::from_rows(&[&[1, 1, 1, 1]]),
        PieceKind::O => ShapeMatrix::from_rows(&[&[1, 1], &[1, 1]]),
        PieceKind::T => ShapeMatrix::from_rows(&[&[1, 1, 1], &[0, 1, 0]]),
        PieceKind::L => ShapeMatrix::from_rows(&[&[1, 1, 1], &[1, 0, 0]]),
        PieceKind::J => ShapeMatrix::from_rows(&[&[1, 1, 1], &[0, 0, 1]]),
        PieceKind::S => ShapeMatrix::from_rows(&[&[1, 1, 0], &[0, 1, 1]]),
        PieceKind::Z => ShapeMatrix::from_rows(&[&[0, 1, 1], &[1, 1, 0]]),
    }
}

/// A shape identity together with its current rotation matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    matrix: ShapeMatrix,
}

impl Piece {
    /// Piece in spawn orientation
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            matrix: catalog_shape(kind),
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn matrix(&self) -> &ShapeMatrix {
        &self.matrix
    }

    pub fn width(&self) -> usize {
        self.matrix.cols()
    }

    pub fn height(&self) -> usize {
        self.matrix.rows()
    }

    /// Occupied (row, col) offsets from the top-left corner
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.matrix.cells()
    }

    /// The same piece rotated 90° clockwise
    pub fn rotated_cw(&self) -> Self {
        Self {
            kind: self.kind,
            matrix: self.matrix.rotated_cw(),
        }
    }
}

/// Where a freshly spawned piece goes: row 0, horizontally centered
pub fn spawn_position(piece: &Piece) -> Position {
    let col = (BOARD_WIDTH as usize / 2) as i8 - (piece.width() / 2) as i8;
    Position::new(0, col)
}

/// A piece placed on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub piece: Piece,
    pub pos: Position,
}

impl ActivePiece {
    pub fn new(piece: Piece, pos: Position) -> Self {
        Self { piece, pos }
    }

    /// Spawn a catalog piece at its spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        let piece = Piece::new(kind);
        let pos = spawn_position(&piece);
        Self { piece, pos }
    }

    pub fn kind(&self) -> PieceKind {
        self.piece.kind()
    }

    /// Absolute (row, col) of every occupied cell
    pub fn board_cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.board_cells_at(self.pos)
    }

    /// Absolute (row, col) of every occupied cell if the piece stood at `at`
    pub fn board_cells_at(&self, at: Position) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.piece
            .cells()
            .map(move |(dr, dc)| (at.row + dr, at.col + dc))
    }
}
