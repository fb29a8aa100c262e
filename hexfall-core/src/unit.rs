//! Falling units: a set of member cells plus a pivot

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, Direction};
use crate::error::UnitError;

/// A falling piece. Every transform returns a fresh unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    members: Vec<Cell>,
    pivot: Cell,
}

impl Unit {
    pub fn new(members: Vec<Cell>, pivot: Cell) -> Self {
        Self { members, pivot }
    }

    /// Check the template invariants: non-empty, distinct members
    pub fn validate(&self) -> Result<(), UnitError> {
        if self.members.is_empty() {
            return Err(UnitError::Empty);
        }
        let mut seen = FxHashSet::default();
        for &cell in &self.members {
            if !seen.insert(cell) {
                return Err(UnitError::DuplicateMember(cell));
            }
        }
        Ok(())
    }

    pub fn members(&self) -> &[Cell] {
        &self.members
    }

    pub fn pivot(&self) -> Cell {
        self.pivot
    }

    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Move the pivot and every member one step
    pub fn translate(&self, direction: Direction) -> Unit {
        Unit {
            members: self.members.iter().map(|c| c.translate(direction)).collect(),
            pivot: self.pivot.translate(direction),
        }
    }

    /// Rotate the members about the pivot; the pivot stays put
    pub fn rotate(&self, counter_clockwise: bool) -> Unit {
        Unit {
            members: self
                .members
                .iter()
                .map(|c| c.rotate_about(self.pivot, counter_clockwise))
                .collect(),
            pivot: self.pivot,
        }
    }

    /// Apply any of the six commands
    pub fn step(&self, direction: Direction) -> Unit {
        match direction {
            Direction::Cw => self.rotate(false),
            Direction::Ccw => self.rotate(true),
            _ => self.translate(direction),
        }
    }

    /// True if every member of `self` is also a member of `other`.
    ///
    /// Not symmetric: this asks "is `self` covered by `other`".
    pub fn overlaps(&self, other: &Unit) -> bool {
        let others: FxHashSet<Cell> = other.members.iter().copied().collect();
        self.members.iter().all(|c| others.contains(c))
    }

    pub fn overlaps_any(&self, others: &[Unit]) -> bool {
        others.iter().any(|other| self.overlaps(other))
    }

    /// Leftmost and rightmost member columns
    pub fn width_bounds(&self) -> (i32, i32) {
        let left = self.members.iter().map(|c| c.x).min().unwrap_or(0);
        let right = self.members.iter().map(|c| c.x).max().unwrap_or(0);
        (left, right)
    }

    /// Average member row
    pub fn mean_row(&self) -> f64 {
        if self.members.is_empty() {
            return 0.0;
        }
        let total: i64 = self.members.iter().map(|c| c.y as i64).sum();
        total as f64 / self.members.len() as f64
    }

    /// Shift horizontally so the bounding box sits in the middle of a board
    /// `board_width` wide, leaning left when it cannot be exact
    pub fn centered_on(&self, board_width: i32) -> Unit {
        let (left, right) = self.width_bounds();
        let unit_width = right - left + 1;
        let shift = (board_width - unit_width) / 2 - left;
        self.shifted(shift)
    }

    fn shifted(&self, dx: i32) -> Unit {
        // Same row, same parity, so a plain column shift keeps the shape
        Unit {
            members: self.members.iter().map(|c| Cell::new(c.x + dx, c.y)).collect(),
            pivot: Cell::new(self.pivot.x + dx, self.pivot.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_set(unit: &Unit) -> FxHashSet<Cell> {
        unit.members().iter().copied().collect()
    }

    fn hook() -> Unit {
        Unit::new(
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1), Cell::new(1, 2)],
            Cell::new(1, 1),
        )
    }

    #[test]
    fn test_translate_moves_pivot_too() {
        let unit = hook();
        let moved = unit.translate(Direction::SW);
        assert_eq!(moved.pivot(), Cell::new(1, 2));
        assert_eq!(moved.members()[0], Cell::new(-1, 1));
        // Original untouched
        assert_eq!(unit.members()[0], Cell::new(0, 0));
    }

    #[test]
    fn test_rotate_keeps_pivot() {
        let unit = hook();
        let turned = unit.rotate(false);
        assert_eq!(turned.pivot(), unit.pivot());
        assert_ne!(member_set(&turned), member_set(&unit));
    }

    #[test]
    fn test_six_clockwise_rotations_restore_members() {
        let start = hook();
        let mut unit = start.clone();
        for _ in 0..6 {
            unit = unit.rotate(false);
        }
        assert_eq!(member_set(&unit), member_set(&start));

        let mut unit = start.clone();
        for _ in 0..6 {
            unit = unit.rotate(true);
        }
        assert_eq!(member_set(&unit), member_set(&start));
    }

    #[test]
    fn test_pivot_outside_members() {
        let unit = Unit::new(vec![Cell::new(0, 0), Cell::new(2, 0)], Cell::new(1, 0));
        let mut turned = unit.clone();
        for _ in 0..3 {
            turned = turned.rotate(true);
        }
        // Half a turn swaps the two members
        assert_eq!(member_set(&turned), member_set(&unit));
    }

    #[test]
    fn test_overlaps_is_asymmetric() {
        let small = Unit::new(vec![Cell::new(0, 0)], Cell::new(0, 0));
        let large = Unit::new(vec![Cell::new(0, 0), Cell::new(1, 0)], Cell::new(0, 0));
        assert!(small.overlaps(&large));
        assert!(!large.overlaps(&small));
        assert!(small.overlaps_any(&[hook(), large.clone()]));
        assert!(!large.overlaps_any(&[small]));
    }

    #[test]
    fn test_centering_leans_left() {
        let single = Unit::new(vec![Cell::new(0, 0)], Cell::new(0, 0));
        assert_eq!(single.centered_on(5).members()[0], Cell::new(2, 0));
        assert_eq!(single.centered_on(4).members()[0], Cell::new(1, 0));

        let pair = Unit::new(vec![Cell::new(3, 0), Cell::new(4, 0)], Cell::new(3, 0));
        let centered = pair.centered_on(5);
        assert_eq!(centered.width_bounds(), (1, 2));
        assert_eq!(centered.pivot(), Cell::new(1, 0));
    }

    #[test]
    fn test_validate() {
        assert!(hook().validate().is_ok());
        assert_eq!(
            Unit::new(vec![], Cell::new(0, 0)).validate(),
            Err(UnitError::Empty)
        );
        let dup = Unit::new(vec![Cell::new(1, 1), Cell::new(1, 1)], Cell::new(0, 0));
        assert_eq!(dup.validate(), Err(UnitError::DuplicateMember(Cell::new(1, 1))));
    }

    #[test]
    fn test_mean_row() {
        assert!((hook().mean_row() - 0.75).abs() < 1e-9);
    }
}
