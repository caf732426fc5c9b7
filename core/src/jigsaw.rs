use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Result of releasing or rotating a jigsaw piece.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JigsawMove {
    pub piece: usize,
    pub placement: PlacementOutcome,
    pub victory: Option<Victory>,
}

/// Board of pieces with drag capture, snap check and move counting.
///
/// Pieces are addressed by row-major index `row * cols + col`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JigsawBoard {
    pieces: Array2<Piece>,
    drag: DragState,
    tally: RoundTally,
}

impl JigsawBoard {
    /// Builds a `rows × cols` board; `place` returns the target and starting state of each cell.
    pub fn new(rows: usize, cols: usize, mut place: impl FnMut(Cell2) -> Piece) -> Self {
        Self {
            pieces: Array2::from_shape_fn((rows, cols), |(row, col)| place((row, col))),
            drag: DragState::Idle,
            tally: RoundTally::new(CountUnit::Moves),
        }
    }

    pub fn dim(&self) -> Cell2 {
        self.pieces.dim()
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn piece(&self, index: usize) -> Result<&Piece> {
        let cell = self.cell_of(index)?;
        Ok(&self.pieces[[cell.0, cell.1]])
    }

    /// Pieces in row-major order, paired with their index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Piece)> {
        self.pieces.iter().enumerate()
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn tally(&self) -> &RoundTally {
        &self.tally
    }

    pub fn moves(&self) -> Count {
        self.tally.count()
    }

    pub fn locked_count(&self) -> usize {
        self.pieces.iter().filter(|piece| piece.is_locked()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.locked_count() == self.piece_count()
    }

    pub fn pointer_down(&mut self, index: usize, pointer: Point) -> Result<()> {
        self.tally.check_open()?;
        let origin = {
            let piece = self.piece(index)?;
            if piece.is_locked() {
                return Err(GameError::PieceLocked);
            }
            piece.current()
        };
        self.drag.begin(index, pointer, origin)
    }

    /// Moves the held piece under the pointer and returns its new position.
    pub fn pointer_move(&mut self, pointer: Point) -> Result<(usize, Point)> {
        let (index, position) = self.drag.follow(pointer)?;
        self.piece_mut(index)?.move_to(position)?;
        Ok((index, position))
    }

    /// Drops the held piece: one move is counted whether or not it snaps.
    pub fn pointer_up(&mut self) -> Result<JigsawMove> {
        let index = self.drag.release()?;
        self.tally.bump();
        Ok(self.evaluate(index))
    }

    /// Turns a piece a quarter clockwise, counting one move, then re-checks it.
    pub fn rotate(&mut self, index: usize) -> Result<JigsawMove> {
        self.tally.check_open()?;
        if self.drag.dragged_piece() == Some(index) {
            return Err(GameError::DragInProgress);
        }
        self.piece_mut(index)?.rotate()?;
        self.tally.bump();
        Ok(self.evaluate(index))
    }

    fn evaluate(&mut self, index: usize) -> JigsawMove {
        let placement = match self.piece_mut(index) {
            Ok(piece) => piece.try_lock(SNAP_TOLERANCE),
            Err(_) => PlacementOutcome::Unchanged,
        };
        let complete = placement.is_locked() && self.is_complete();
        JigsawMove {
            piece: index,
            placement,
            victory: self.tally.settle(complete),
        }
    }

    fn piece_mut(&mut self, index: usize) -> Result<&mut Piece> {
        let cell = self.cell_of(index)?;
        Ok(&mut self.pieces[[cell.0, cell.1]])
    }

    fn cell_of(&self, index: usize) -> Result<Cell2> {
        let (rows, cols) = self.pieces.dim();
        if index < rows * cols {
            Ok((index / cols, index % cols))
        } else {
            Err(GameError::InvalidPiece)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_2x2() -> JigsawBoard {
        JigsawBoard::new(2, 2, |(row, col)| {
            let target = Point::new(col as Px * 50.0, row as Px * 50.0);
            Piece::new((row, col), target, Point::new(300.0, 300.0))
        })
    }

    fn drop_on_target(board: &mut JigsawBoard, index: usize) -> JigsawMove {
        let start = board.piece(index).unwrap().current();
        let target = board.piece(index).unwrap().correct();
        board.pointer_down(index, start).unwrap();
        board.pointer_move(target + Point::new(4.0, -4.0)).unwrap();
        board.pointer_up().unwrap()
    }

    #[test]
    fn every_release_counts_a_move() {
        let mut board = board_2x2();

        board.pointer_down(0, Point::new(305.0, 305.0)).unwrap();
        board.pointer_move(Point::new(250.0, 250.0)).unwrap();
        let outcome = board.pointer_up().unwrap();

        assert_eq!(outcome.placement, PlacementOutcome::Unchanged);
        assert_eq!(board.piece(0).unwrap().current(), Point::new(245.0, 245.0));
        assert_eq!(board.moves(), 1);

        assert!(drop_on_target(&mut board, 0).placement.is_locked());
        assert_eq!(board.moves(), 2);
    }

    #[test]
    fn win_fires_exactly_on_last_lock() {
        let mut board = board_2x2();

        for index in 0..3 {
            let outcome = drop_on_target(&mut board, index);
            assert!(outcome.placement.is_locked());
            assert_eq!(outcome.victory, None);
        }
        let outcome = drop_on_target(&mut board, 3);
        assert_eq!(
            outcome.victory,
            Some(Victory {
                count: 4,
                unit: CountUnit::Moves
            })
        );
        assert!(board.is_complete());
        assert_eq!(
            board.pointer_down(3, Point::ORIGIN),
            Err(GameError::AlreadyFinished)
        );
    }

    #[test]
    fn locked_pieces_cannot_be_grabbed() {
        let mut board = board_2x2();
        drop_on_target(&mut board, 1);

        assert_eq!(
            board.pointer_down(1, Point::ORIGIN),
            Err(GameError::PieceLocked)
        );
        assert_eq!(board.piece(1).unwrap().current(), Point::new(50.0, 0.0));
    }

    #[test]
    fn only_one_piece_is_held_at_a_time() {
        let mut board = board_2x2();
        board.pointer_down(0, Point::ORIGIN).unwrap();

        assert_eq!(
            board.pointer_down(1, Point::ORIGIN),
            Err(GameError::DragInProgress)
        );
        assert_eq!(board.drag().dragged_piece(), Some(0));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut board = board_2x2();
        assert_eq!(board.piece(4).err(), Some(GameError::InvalidPiece));
        assert_eq!(board.rotate(9).err(), Some(GameError::InvalidPiece));
    }
}
