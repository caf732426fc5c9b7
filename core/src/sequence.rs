use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

pub const SEGMENT_COUNT: usize = 8;
/// Per-axis distance within which a dropped piece is offered to a slot.
pub const SLOT_TOLERANCE: Px = 30.0;
/// Period of the manual loop correction for segment previews.
pub const CONFINEMENT_PERIOD_MS: u32 = 250;
pub const SEQUENCE_PIECE_SIZE: Px = 120.0;
pub const SEQUENCE_GAP: Px = 10.0;
pub const SEQUENCE_COLUMNS: usize = 4;

/// One eighth of a clip's `[start, end)` window.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: usize,
    pub start: f64,
    pub duration: f64,
}

impl Segment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.start && seconds < self.end()
    }

    /// Where playback must jump to when it drifted out of this segment.
    pub fn correction(&self, seconds: f64) -> Option<f64> {
        if self.contains(seconds) {
            None
        } else {
            Some(self.start)
        }
    }
}

/// Splits the clip's declared window into [`SEGMENT_COUNT`] equal segments.
pub fn plan_segments(video: &VideoDescriptor) -> Result<[Segment; SEGMENT_COUNT]> {
    let (start, end) = video.time_window()?;
    let duration = f64::from(end - start) / SEGMENT_COUNT as f64;
    Ok(core::array::from_fn(|index| Segment {
        index,
        start: f64::from(start) + index as f64 * duration,
        duration,
    }))
}

/// One correction tick: seeks the adapter back if it left the segment. Returns true on seek.
pub fn confine<P: PlaybackAdapter + ?Sized>(adapter: &P, segment: &Segment) -> bool {
    match segment.correction(adapter.current_time()) {
        Some(target) => {
            log::trace!("segment {} drifted, seeking to {}", segment.index, target);
            adapter.seek_to(target);
            true
        }
        None => false,
    }
}

/// Top-left corner of the `position`-th cell of the 4-column layout starting at `origin`.
pub fn layout_cell(origin: Point, position: usize) -> Point {
    let row = (position / SEQUENCE_COLUMNS) as Px;
    let col = (position % SEQUENCE_COLUMNS) as Px;
    let pitch = SEQUENCE_PIECE_SIZE + SEQUENCE_GAP;
    origin + Point::new(col * pitch, row * pitch)
}

/// Where the two layers sit inside the play area.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceLayout {
    pub pieces_at: Point,
    pub slots_at: Point,
}

impl Default for SequenceLayout {
    fn default() -> Self {
        let pitch = SEQUENCE_PIECE_SIZE + SEQUENCE_GAP;
        Self {
            pieces_at: Point::ORIGIN,
            slots_at: Point::new(0.0, 2.0 * pitch + 2.0 * SEQUENCE_GAP),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequencePiece {
    segment: Segment,
    display_position: usize,
    position: Point,
    slot: Option<usize>,
}

impl SequencePiece {
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Shuffled position the piece was dealt to.
    pub fn display_position(&self) -> usize {
        self.display_position
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Slot holding the piece, once it was placed correctly.
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    pub fn is_correct(&self) -> bool {
        self.slot.is_some()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SequenceDrop {
    pub piece: usize,
    pub slot: Option<usize>,
    pub victory: Option<Victory>,
}

/// Eight shuffled segment pieces and the eight slots they belong in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceBoard {
    layout: SequenceLayout,
    pieces: Vec<SequencePiece>,
    slots: [Option<usize>; SEGMENT_COUNT],
    drag: DragState,
    tally: RoundTally,
}

impl SequenceBoard {
    pub fn build(video: &VideoDescriptor, layout: SequenceLayout, rng: &mut GameRng) -> Result<Self> {
        let segments = plan_segments(video)?;
        let mut order: [usize; SEGMENT_COUNT] = core::array::from_fn(|i| i);
        fisher_yates(&mut order, rng);

        let pieces = order
            .iter()
            .enumerate()
            .map(|(display_position, &segment)| SequencePiece {
                segment: segments[segment],
                display_position,
                position: layout_cell(layout.pieces_at, display_position),
                slot: None,
            })
            .collect();

        Ok(Self {
            layout,
            pieces,
            slots: [None; SEGMENT_COUNT],
            drag: DragState::Idle,
            tally: RoundTally::new(CountUnit::Clicks),
        })
    }

    pub fn layout(&self) -> SequenceLayout {
        self.layout
    }

    /// Pieces in dealt order; the index is the piece id used by the pointer calls.
    pub fn pieces(&self) -> &[SequencePiece] {
        &self.pieces
    }

    pub fn slot_origin(&self, slot: usize) -> Point {
        layout_cell(self.layout.slots_at, slot)
    }

    pub fn slot_occupant(&self, slot: usize) -> Option<usize> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn tally(&self) -> &RoundTally {
        &self.tally
    }

    pub fn clicks(&self) -> Count {
        self.tally.count()
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn correct_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.correct_count() == SEGMENT_COUNT
    }

    /// Starts dragging a piece; every grab counts as a click.
    pub fn pointer_down(&mut self, piece: usize, pointer: Point) -> Result<()> {
        self.tally.check_open()?;
        let held = self.pieces.get(piece).ok_or(GameError::InvalidPiece)?;
        if held.is_correct() {
            return Err(GameError::PieceLocked);
        }
        self.drag.begin(piece, pointer, held.position)?;
        self.tally.bump();
        Ok(())
    }

    pub fn pointer_move(&mut self, pointer: Point) -> Result<(usize, Point)> {
        let (piece, position) = self.drag.follow(pointer)?;
        let held = self.pieces.get_mut(piece).ok_or(GameError::InvalidPiece)?;
        held.position = position;
        Ok((piece, position))
    }

    /// Drops the held piece and scans every slot near it for its own.
    pub fn pointer_up(&mut self) -> Result<SequenceDrop> {
        let piece = self.drag.release()?;
        let slot = self.place(piece);
        let victory = self.tally.settle(slot.is_some() && self.is_complete());
        Ok(SequenceDrop {
            piece,
            slot,
            victory,
        })
    }

    fn place(&mut self, piece: usize) -> Option<usize> {
        let (position, segment) = {
            let held = self.pieces.get(piece)?;
            (held.position, held.segment.index)
        };
        let slot = (0..SEGMENT_COUNT).find(|&slot| {
            self.slots[slot].is_none()
                && slot == segment
                && position.is_near(self.slot_origin(slot), SLOT_TOLERANCE)
        })?;

        let origin = self.slot_origin(slot);
        let held = &mut self.pieces[piece];
        held.position = origin;
        held.slot = Some(slot);
        self.slots[slot] = Some(piece);
        log::debug!("segment {} placed in slot {}", segment, slot);
        Some(slot)
    }
}

/// Video sequence reassembly over a cycling playlist.
#[derive(Clone, Debug)]
pub struct SequencePuzzle {
    cursor: PlaylistCursor,
    rng: GameRng,
    layout: SequenceLayout,
    board: Result<SequenceBoard>,
    generation: BoardGeneration,
}

impl SequencePuzzle {
    pub fn start(mut playlist: Playlist, mut rng: GameRng, layout: SequenceLayout) -> Result<Self> {
        fisher_yates(&mut playlist, &mut rng);
        let cursor = PlaylistCursor::new(playlist)?;
        let board = SequenceBoard::build(cursor.current(), layout, &mut rng);
        if let Err(err) = &board {
            log::warn!("cannot build sequence for {:?}: {}", cursor.current().video_id, err);
        }
        Ok(Self {
            cursor,
            rng,
            layout,
            board,
            generation: BoardGeneration::default(),
        })
    }

    pub fn video(&self) -> &VideoDescriptor {
        self.cursor.current()
    }

    /// The board, or the content error that stopped it from being built.
    pub fn board(&self) -> core::result::Result<&SequenceBoard, &GameError> {
        self.board.as_ref()
    }

    pub fn generation(&self) -> BoardGeneration {
        self.generation
    }

    /// Adapter parameters for the full-length background layer.
    pub fn background_options(&self) -> PlayerOptions {
        PlayerOptions::ambient_window(self.video())
    }

    /// Adapter parameters for a segment preview; confinement is applied by [`confine`].
    pub fn segment_options(&self) -> PlayerOptions {
        PlayerOptions::unconfined(self.video().video_id.clone())
    }

    /// Where "replay" seeks the background layer.
    pub fn replay_position(&self) -> f64 {
        f64::from(self.video().start())
    }

    /// Deals the current clip again with fresh shuffling.
    pub fn rebuild(&mut self) -> BoardGeneration {
        self.board = SequenceBoard::build(self.cursor.current(), self.layout, &mut self.rng);
        self.generation = self.generation.next();
        self.generation
    }

    /// Moves to the next clip, wrapping around, and deals it.
    pub fn new_video(&mut self) -> BoardGeneration {
        self.cursor.advance();
        self.rebuild()
    }

    pub fn pointer_down(&mut self, piece: usize, pointer: Point) -> Result<()> {
        self.board_mut()?.pointer_down(piece, pointer)
    }

    pub fn pointer_move(&mut self, pointer: Point) -> Result<(usize, Point)> {
        self.board_mut()?.pointer_move(pointer)
    }

    pub fn pointer_up(&mut self) -> Result<SequenceDrop> {
        self.board_mut()?.pointer_up()
    }

    fn board_mut(&mut self) -> Result<&mut SequenceBoard> {
        self.board.as_mut().map_err(|err| err.clone())
    }
}
