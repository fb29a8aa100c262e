//! Hex geometry with offset coordinates
//!
//! Cells use "odd-r" offset coordinates: odd rows sit half a cell to the
//! right of even rows. Rotation goes through cube coordinates.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Offset hex coordinates (column, row)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True if this cell sits on an odd (right-shifted) row
    pub fn is_odd_row(&self) -> bool {
        self.y & 1 == 1
    }

    /// Move one step in a movement direction.
    ///
    /// # Panics
    ///
    /// Panics if `direction` is a rotation. Rotations are not translations,
    /// and callers dispatch on [`Direction::is_rotation`] first.
    pub fn translate(self, direction: Direction) -> Cell {
        let (dx, dy) = match direction.offset(self.is_odd_row()) {
            Some(offset) => offset,
            None => panic!("cannot translate a cell by rotation {direction:?}"),
        };
        Cell::new(self.x + dx, self.y + dy)
    }

    /// Rotate this cell one sixth of a turn about `pivot`
    pub fn rotate_about(self, pivot: Cell, counter_clockwise: bool) -> Cell {
        let centre = CubeCell::from(pivot);
        let relative = CubeCell::from(self) - centre;
        let turned = if counter_clockwise {
            relative.rotate_ccw()
        } else {
            relative.rotate_cw()
        };
        Cell::from(turned + centre)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ============================================================================
// DIRECTIONS
// ============================================================================

/// The six commands a unit can receive: four moves and two rotations
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    E,
    W,
    SE,
    SW,
    Cw,
    Ccw,
}

/// Per-parity offsets (dx, dy) for the movement directions.
/// Index: 0=even row, 1=odd row
const E_OFFSETS: [(i32, i32); 2] = [(1, 0), (1, 0)];
const W_OFFSETS: [(i32, i32); 2] = [(-1, 0), (-1, 0)];
const SE_OFFSETS: [(i32, i32); 2] = [(0, 1), (1, 1)];
const SW_OFFSETS: [(i32, i32); 2] = [(-1, 1), (0, 1)];

impl Direction {
    /// Every direction in enumeration order (ties resolve to the earliest)
    pub const ALL: [Direction; 6] = [
        Direction::E,
        Direction::W,
        Direction::SE,
        Direction::SW,
        Direction::Cw,
        Direction::Ccw,
    ];

    /// Movement directions only
    pub const MOVES: [Direction; 4] = [Direction::E, Direction::W, Direction::SE, Direction::SW];

    pub fn is_rotation(self) -> bool {
        matches!(self, Direction::Cw | Direction::Ccw)
    }

    /// Moves that take a unit one row lower
    pub fn is_descent(self) -> bool {
        matches!(self, Direction::SE | Direction::SW)
    }

    /// Offset for a cell on an even or odd row; `None` for rotations
    pub fn offset(self, odd_row: bool) -> Option<(i32, i32)> {
        let table = match self {
            Direction::E => &E_OFFSETS,
            Direction::W => &W_OFFSETS,
            Direction::SE => &SE_OFFSETS,
            Direction::SW => &SW_OFFSETS,
            Direction::Cw | Direction::Ccw => return None,
        };
        Some(table[odd_row as usize])
    }

    /// Position in [`Direction::ALL`], handy for per-direction arrays
    pub fn index(self) -> usize {
        match self {
            Direction::E => 0,
            Direction::W => 1,
            Direction::SE => 2,
            Direction::SW => 3,
            Direction::Cw => 4,
            Direction::Ccw => 5,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::E => "E",
            Direction::W => "W",
            Direction::SE => "SE",
            Direction::SW => "SW",
            Direction::Cw => "CW",
            Direction::Ccw => "CCW",
        };
        f.write_str(name)
    }
}

// ============================================================================
// CUBE COORDINATES
// ============================================================================

/// Cube hex coordinates, q + r + s == 0
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubeCell {
    pub q: i32,
    pub r: i32,
    pub s: i32,
}

impl CubeCell {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r, s: -q - r }
    }

    /// One sixth turn clockwise about the origin
    pub fn rotate_cw(self) -> Self {
        Self {
            q: -self.r,
            r: -self.s,
            s: -self.q,
        }
    }

    /// One sixth turn counter-clockwise about the origin
    pub fn rotate_ccw(self) -> Self {
        Self {
            q: -self.s,
            r: -self.q,
            s: -self.r,
        }
    }
}

impl From<Cell> for CubeCell {
    fn from(cell: Cell) -> Self {
        // (y - (y & 1)) is always even, so the division is exact for negatives too
        let q = cell.x - (cell.y - (cell.y & 1)) / 2;
        CubeCell::new(q, cell.y)
    }
}

impl From<CubeCell> for Cell {
    fn from(cube: CubeCell) -> Self {
        let x = cube.q + (cube.r - (cube.r & 1)) / 2;
        Cell::new(x, cube.r)
    }
}

impl Add for CubeCell {
    type Output = CubeCell;

    fn add(self, other: CubeCell) -> CubeCell {
        CubeCell::new(self.q + other.q, self.r + other.r)
    }
}

impl Sub for CubeCell {
    type Output = CubeCell;

    fn sub(self, other: CubeCell) -> CubeCell {
        CubeCell::new(self.q - other.q, self.r - other.r)
    }
}
