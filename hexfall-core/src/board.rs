//! Board occupancy grid

use std::fmt;

use crate::cell::{Cell, Direction};
use crate::error::ProblemError;
use crate::unit::Unit;

/// A width x height grid of filled/unfilled cells (clone to fork)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    /// Row-major: index = y * width + x
    filled: Vec<bool>,
}

impl Board {
    /// Create a board with the given cells already filled
    pub fn new(width: i32, height: i32, filled: &[Cell]) -> Result<Self, ProblemError> {
        if width <= 0 || height <= 0 {
            return Err(ProblemError::BadDimensions { width, height });
        }
        let area = width
            .checked_mul(height)
            .ok_or(ProblemError::BadDimensions { width, height })?;

        let mut board = Self {
            width,
            height,
            filled: vec![false; area as usize],
        };

        for &cell in filled {
            if !board.in_bounds(cell) {
                return Err(ProblemError::FilledOutOfBounds { cell, width, height });
            }
            board.fill(cell);
        }

        Ok(board)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Independent copy for exploring hypothetical futures
    pub fn fork(&self) -> Board {
        self.clone()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    /// Out-of-bounds cells read as unfilled
    pub fn is_filled(&self, cell: Cell) -> bool {
        self.index(cell).map(|i| self.filled[i]).unwrap_or(false)
    }

    /// Mark a cell filled; out-of-bounds cells are ignored
    pub fn fill(&mut self, cell: Cell) {
        if let Some(i) = self.index(cell) {
            self.filled[i] = true;
        }
    }

    fn unfill(&mut self, cell: Cell) {
        if let Some(i) = self.index(cell) {
            self.filled[i] = false;
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if self.in_bounds(cell) {
            Some((cell.y * self.width + cell.x) as usize)
        } else {
            None
        }
    }

    /// Every member in bounds and unfilled
    pub fn is_valid(&self, unit: &Unit) -> bool {
        unit.members()
            .iter()
            .all(|&c| self.in_bounds(c) && !self.is_filled(c))
    }

    /// Write a unit's members into the grid
    pub fn lock(&mut self, unit: &Unit) {
        for &cell in unit.members() {
            self.fill(cell);
        }
    }

    pub fn row_is_full(&self, row: i32) -> bool {
        (0..self.width).all(|x| self.is_filled(Cell::new(x, row)))
    }

    pub fn filled_count(&self) -> usize {
        self.filled.iter().filter(|&&f| f).count()
    }

    /// Iterate filled cells, row by row
    pub fn filled_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.filled.iter().enumerate().filter(|(_, &f)| f).map(move |(i, _)| {
            let i = i as i32;
            Cell::new(i % self.width, i / self.width)
        })
    }

    // ========================================================================
    // ROW CLEARING
    // ========================================================================

    /// Clear full rows until none remain, returning how many were cleared
    pub fn clear_rows(&mut self) -> u32 {
        let mut cleared = 0;
        while let Some(row) = self.lowest_full_row() {
            self.clear_row(row);
            cleared += 1;
        }
        cleared
    }

    fn lowest_full_row(&self) -> Option<i32> {
        (0..self.height).rev().find(|&row| self.row_is_full(row))
    }

    /// Empty `row` and drop every row above it by one
    fn clear_row(&mut self, row: i32) {
        for x in 0..self.width {
            self.unfill(Cell::new(x, row));
        }
        for above in (0..row).rev() {
            self.shift_row_down(above);
        }
    }

    fn shift_row_down(&mut self, row: i32) {
        // Even rows fall SE, odd rows fall SW: both keep the column
        let direction = if row & 1 == 0 { Direction::SE } else { Direction::SW };
        for x in 0..self.width {
            let cell = Cell::new(x, row);
            if self.is_filled(cell) {
                self.fill(cell.translate(direction));
                self.unfill(cell);
            }
        }
    }

    // ========================================================================
    // SUPPORT HEURISTICS
    // ========================================================================

    /// True if an empty in-bounds cell lies within `depth` diagonal steps below
    pub fn gap_below(&self, cell: Cell, depth: u32) -> bool {
        if depth == 0 {
            return false;
        }

        let sw = cell.translate(Direction::SW);
        let se = cell.translate(Direction::SE);
        let open = |c: Cell| self.in_bounds(c) && !self.is_filled(c);

        open(sw) || open(se) || self.gap_below(sw, depth - 1) || self.gap_below(se, depth - 1)
    }

    pub fn gap_below_any(&self, unit: &Unit, depth: u32) -> bool {
        unit.members().iter().any(|&c| self.gap_below(c, depth))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y & 1 == 1 {
                f.write_str(" ")?;
            }
            for x in 0..self.width {
                let glyph = if self.is_filled(Cell::new(x, y)) { "# " } else { ". " };
                f.write_str(glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
