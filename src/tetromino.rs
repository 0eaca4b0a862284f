//! Tetromino definitions and shapes
//!
//! Offsets are (col, row) pairs relative to the piece origin, with rows
//! growing downward. Every shape includes (0, 0), which is the rotation pivot.

use ratatui::style::Color;

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan - long bar
    O, // Yellow - square
    T, // Purple - T-shape
    S, // Green - S-shape
    Z, // Red - Z-shape
    J, // Blue - J-shape
    L, // Orange - L-shape
}

impl TetrominoType {
    /// Get the color for this tetromino
    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Cyan,
            TetrominoType::O => Color::Yellow,
            TetrominoType::T => Color::Magenta,
            TetrominoType::S => Color::Green,
            TetrominoType::Z => Color::Red,
            TetrominoType::J => Color::Blue,
            TetrominoType::L => Color::Rgb(255, 165, 0), // Orange
        }
    }

    /// All tetromino types, in spawn-table order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    /// Spawn offsets for this shape
    ///
    /// ```text
    /// I: ####   O: ##   T: ###   S: .##   Z: ##.   J: ###   L: ###
    ///               ##      .#.      ##.      .##      ..#      #..
    /// ```
    pub fn offsets(&self) -> [(i32, i32); 4] {
        match self {
            TetrominoType::I => [(0, 0), (1, 0), (-1, 0), (-2, 0)],
            TetrominoType::O => [(0, 0), (1, 0), (0, 1), (1, 1)],
            TetrominoType::T => [(0, 0), (-1, 0), (1, 0), (0, 1)],
            TetrominoType::S => [(0, 0), (1, 0), (-1, 1), (0, 1)],
            TetrominoType::Z => [(0, 0), (-1, 0), (0, 1), (1, 1)],
            TetrominoType::J => [(0, 0), (-1, 0), (1, 0), (1, 1)],
            TetrominoType::L => [(0, 0), (-1, 0), (1, 0), (-1, 1)],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TetrominoType::I => "I",
            TetrominoType::O => "O",
            TetrominoType::T => "T",
            TetrominoType::S => "S",
            TetrominoType::Z => "Z",
            TetrominoType::J => "J",
            TetrominoType::L => "L",
        }
    }
}
