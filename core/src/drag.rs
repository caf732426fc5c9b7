use serde::{Deserialize, Serialize};

use crate::*;

/// Drag capture shared by every engine: at most one piece follows the pointer at a time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        piece: usize,
        /// Pointer position relative to the piece origin when the drag began.
        grab_offset: Point,
    },
}

impl DragState {
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub const fn dragged_piece(&self) -> Option<usize> {
        match *self {
            Self::Dragging { piece, .. } => Some(piece),
            Self::Idle => None,
        }
    }

    pub fn begin(&mut self, piece: usize, pointer: Point, piece_origin: Point) -> Result<()> {
        if let Self::Dragging { piece: active, .. } = *self {
            log::warn!("drag on piece {} ignored, piece {} is still held", piece, active);
            return Err(GameError::DragInProgress);
        }
        *self = Self::Dragging {
            piece,
            grab_offset: pointer - piece_origin,
        };
        Ok(())
    }

    /// Position the held piece must take so it follows the pointer 1:1.
    pub fn follow(&self, pointer: Point) -> Result<(usize, Point)> {
        match *self {
            Self::Dragging { piece, grab_offset } => Ok((piece, pointer - grab_offset)),
            Self::Idle => Err(GameError::NoActiveDrag),
        }
    }

    /// Ends the capture, returning the piece that was held.
    pub fn release(&mut self) -> Result<usize> {
        match core::mem::take(self) {
            Self::Dragging { piece, .. } => Ok(piece),
            Self::Idle => Err(GameError::NoActiveDrag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_piece_follows_pointer_with_grab_offset() {
        let mut drag = DragState::default();
        drag.begin(3, Point::new(110.0, 120.0), Point::new(100.0, 100.0))
            .unwrap();

        assert_eq!(drag.dragged_piece(), Some(3));
        assert_eq!(
            drag.follow(Point::new(210.0, 20.0)),
            Ok((3, Point::new(200.0, 0.0)))
        );
    }

    #[test]
    fn second_capture_is_refused_until_release() {
        let mut drag = DragState::default();
        drag.begin(0, Point::ORIGIN, Point::ORIGIN).unwrap();

        assert_eq!(
            drag.begin(1, Point::ORIGIN, Point::ORIGIN),
            Err(GameError::DragInProgress)
        );
        assert_eq!(drag.release(), Ok(0));
        assert!(!drag.is_dragging());
        assert_eq!(drag.release(), Err(GameError::NoActiveDrag));
        assert!(drag.begin(1, Point::ORIGIN, Point::ORIGIN).is_ok());
    }
}
