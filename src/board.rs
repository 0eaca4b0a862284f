//! Playing field representation and collision detection

use crate::piece::Piece;
use ratatui::style::Color;

/// Field dimensions
pub const COLS: usize = 10;
pub const ROWS: usize = 20;

/// A cell on the field - either empty or filled with a color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(Color),
}

impl Cell {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }
}

/// The playing field
#[derive(Debug, Clone)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: [[Cell; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty field
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLS]; ROWS],
        }
    }

    fn index(col: i32, row: i32) -> Option<(usize, usize)> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= COLS || row >= ROWS {
            return None;
        }
        Some((col, row))
    }

    /// Get the cell at (col, row)
    /// Returns None if out of bounds
    pub fn get(&self, col: i32, row: i32) -> Option<Cell> {
        Self::index(col, row).map(|(c, r)| self.cells[r][c])
    }

    /// Set a cell at (col, row)
    /// Returns false if out of bounds
    pub fn set(&mut self, col: i32, row: i32, cell: Cell) -> bool {
        match Self::index(col, row) {
            Some((c, r)) => {
                self.cells[r][c] = cell;
                true
            }
            None => false,
        }
    }

    /// True if any position is outside the field or already occupied
    pub fn is_blocked(&self, positions: &[(i32, i32)]) -> bool {
        positions
            .iter()
            .any(|&(col, row)| self.get(col, row).is_none_or(|cell| cell.is_filled()))
    }

    /// Write a piece into the field. Out-of-bounds cells are skipped.
    pub fn lock(&mut self, piece: &Piece) {
        let color = piece.color();
        for (col, row) in piece.world_cells() {
            self.set(col, row, Cell::Filled(color));
        }
    }

    /// Remove every full row and return how many were removed
    ///
    /// Rows are scanned bottom to top. When a row is removed everything above
    /// it drops by one and an empty row appears at the top, so the same index
    /// is checked again before moving up.
    pub fn clear_full_lines(&mut self) -> u32 {
        let mut cleared = 0;
        let mut row = ROWS;

        while row > 0 {
            if self.is_line_full(row - 1) {
                cleared += 1;
                self.cells.copy_within(0..row - 1, 1);
                self.cells[0] = [Cell::Empty; COLS];
            } else {
                row -= 1;
            }
        }

        cleared
    }

    /// Check if a line is completely filled
    fn is_line_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_filled())
    }

    /// Empty every cell
    pub fn reset(&mut self) {
        self.cells = [[Cell::Empty; COLS]; ROWS];
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Iterate over occupied cells as ((col, row), color)
    pub fn occupied_cells(&self) -> impl Iterator<Item = ((i32, i32), Color)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, line)| {
            line.iter().enumerate().filter_map(move |(col, cell)| match cell {
                Cell::Filled(color) => Some(((col as i32, row as i32), *color)),
                Cell::Empty => None,
            })
        })
    }
}
