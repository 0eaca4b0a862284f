//! Active falling piece

use crate::tetromino::TetrominoType;
use ratatui::style::Color;

/// Column of the spawn origin
pub const SPAWN_COL: i32 = 4;
/// Row of the spawn origin
pub const SPAWN_ROW: i32 = 0;

/// An active falling piece
///
/// Movement and rotation never check legality; the caller validates the
/// result against the field and undoes the change when it is blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Origin column
    pub col: i32,
    /// Origin row (row 0 is the top of the field)
    pub row: i32,
    /// Offsets from the origin, (col, row)
    cells: [(i32, i32); 4],
}

impl Piece {
    /// Create a new piece at the spawn position
    pub fn new(piece_type: TetrominoType) -> Self {
        Self::at(piece_type, SPAWN_COL, SPAWN_ROW)
    }

    /// Create a piece with its origin at (col, row)
    pub fn at(piece_type: TetrominoType, col: i32, row: i32) -> Self {
        Self {
            piece_type,
            col,
            row,
            cells: piece_type.offsets(),
        }
    }

    pub fn color(&self) -> Color {
        self.piece_type.color()
    }

    /// Current offsets relative to the origin
    #[cfg(test)]
    pub fn offsets(&self) -> &[(i32, i32); 4] {
        &self.cells
    }

    /// Translate the origin
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.col += dx;
        self.row += dy;
    }

    /// Rotate 90° about the origin: (x, y) -> (-y, x)
    pub fn rotate(&mut self) {
        for cell in &mut self.cells {
            *cell = (-cell.1, cell.0);
        }
    }

    /// Undo a `rotate`
    pub fn rotate_back(&mut self) {
        for _ in 0..3 {
            self.rotate();
        }
    }

    /// Get the absolute positions of all 4 blocks as (col, row)
    pub fn world_cells(&self) -> [(i32, i32); 4] {
        self.cells.map(|(dx, dy)| (self.col + dx, self.row + dy))
    }
}
