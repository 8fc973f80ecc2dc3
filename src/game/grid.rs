use serde::{Deserialize, Serialize};

use super::state::Position;

/// Fixed-size board whose edges wrap onto the opposite side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    /// Sides too large for a coordinate saturate at `i32::MAX`
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols: i32::try_from(cols).unwrap_or(i32::MAX),
            rows: i32::try_from(rows).unwrap_or(i32::MAX),
        }
    }

    /// Bring a position that stepped one cell off the board back onto it.
    ///
    /// Each axis is handled independently: a coordinate below zero lands on
    /// the last column/row, a coordinate at or past the edge lands on zero.
    pub fn wrap(&self, pos: Position) -> Position {
        let x = if pos.x < 0 {
            self.cols - 1
        } else if pos.x >= self.cols {
            0
        } else {
            pos.x
        };

        let y = if pos.y < 0 {
            self.rows - 1
        } else if pos.y >= self.rows {
            0
        } else {
            pos.y
        };

        Position::new(x, y)
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.cols && pos.y >= 0 && pos.y < self.rows
    }

    pub fn center(&self) -> Position {
        Position::new(self.cols / 2, self.rows / 2)
    }
}
