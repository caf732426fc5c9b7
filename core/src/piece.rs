use serde::{Deserialize, Serialize};

use crate::*;

/// Snap tolerance for jigsaw pieces, per axis.
pub const SNAP_TOLERANCE: Px = 15.0;

/// One cell of a subdivided image or video grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    grid: Cell2,
    correct: Point,
    current: Point,
    rotation: Rotation,
    locked: bool,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PlacementOutcome {
    /// Predicate not satisfied, the piece stays where it is.
    Unchanged,
    /// The piece snapped to its target and is now locked.
    Locked,
}

impl PlacementOutcome {
    pub const fn is_locked(self) -> bool {
        matches!(self, Self::Locked)
    }
}

impl Piece {
    pub fn new(grid: Cell2, correct: Point, current: Point) -> Self {
        Self {
            grid,
            correct,
            current,
            rotation: Rotation::Deg0,
            locked: false,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn grid(&self) -> Cell2 {
        self.grid
    }

    pub fn correct(&self) -> Point {
        self.correct
    }

    pub fn current(&self) -> Point {
        self.current
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn move_to(&mut self, position: Point) -> Result<()> {
        self.check_unlocked()?;
        self.current = position;
        Ok(())
    }

    pub(crate) fn rotate(&mut self) -> Result<Rotation> {
        self.check_unlocked()?;
        self.rotation = self.rotation.cycled();
        Ok(self.rotation)
    }

    /// Locks the piece if it sits within `tolerance` of its target with the target rotation.
    ///
    /// On success the position snaps exactly onto the target. A locked piece never unlocks.
    pub(crate) fn try_lock(&mut self, tolerance: Px) -> PlacementOutcome {
        if self.locked {
            return PlacementOutcome::Unchanged;
        }
        if self.current.is_near(self.correct, tolerance) && self.rotation == Rotation::Deg0 {
            self.current = self.correct;
            self.locked = true;
            log::debug!("piece {:?} locked at {:?}", self.grid, self.correct);
            PlacementOutcome::Locked
        } else {
            PlacementOutcome::Unchanged
        }
    }

    fn check_unlocked(&self) -> Result<()> {
        if self.locked {
            Err(GameError::PieceLocked)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piece_at(current: Point) -> Piece {
        Piece::new((1, 1), Point::new(100.0, 100.0), current)
    }

    #[test]
    fn near_drop_snaps_exactly_to_target() {
        let mut piece = piece_at(Point::new(108.0, 112.0));

        assert_eq!(piece.try_lock(SNAP_TOLERANCE), PlacementOutcome::Locked);
        assert!(piece.is_locked());
        assert_eq!(piece.current(), Point::new(100.0, 100.0));
    }

    #[test]
    fn far_drop_stays_where_dropped() {
        let mut piece = piece_at(Point::new(120.0, 100.0));

        assert_eq!(piece.try_lock(SNAP_TOLERANCE), PlacementOutcome::Unchanged);
        assert!(!piece.is_locked());
        assert_eq!(piece.current(), Point::new(120.0, 100.0));
    }

    #[test]
    fn locked_piece_rejects_movement_and_rotation() {
        let mut piece = piece_at(Point::new(100.0, 100.0));
        piece.try_lock(SNAP_TOLERANCE);

        assert_eq!(piece.move_to(Point::new(0.0, 0.0)), Err(GameError::PieceLocked));
        assert_eq!(piece.rotate(), Err(GameError::PieceLocked));
        assert_eq!(piece.current(), Point::new(100.0, 100.0));
        assert_eq!(piece.rotation(), Rotation::Deg0);
        assert_eq!(piece.try_lock(SNAP_TOLERANCE), PlacementOutcome::Unchanged);
    }

    #[test]
    fn rotated_piece_needs_upright_orientation() {
        let mut piece = piece_at(Point::new(100.0, 100.0)).with_rotation(Rotation::Deg270);

        assert_eq!(piece.try_lock(SNAP_TOLERANCE), PlacementOutcome::Unchanged);
        assert_eq!(piece.rotate(), Ok(Rotation::Deg0));
        assert_eq!(piece.try_lock(SNAP_TOLERANCE), PlacementOutcome::Locked);
    }
}
