use crate::*;

pub const TILE_GRID_SIZE: usize = 4;
pub const TILE_PIECE_COUNT: usize = TILE_GRID_SIZE * TILE_GRID_SIZE;
pub const TILE_CELL_SIZE: Px = 100.0;
/// Pieces start scattered over `[0, TILE_SCATTER)` on both axes.
pub const TILE_SCATTER: Px = 300.0;

/// Live-video jigsaw: one shared source clip cropped into a fixed 4×4 grid.
#[derive(Clone, Debug)]
pub struct TileJigsaw {
    cursor: PlaylistCursor,
    rng: GameRng,
    board: JigsawBoard,
    adapters: CreationQueue,
    generation: BoardGeneration,
}

impl TileJigsaw {
    pub fn start(mut playlist: Playlist, mut rng: GameRng) -> Result<Self> {
        fisher_yates(&mut playlist, &mut rng);
        let cursor = PlaylistCursor::new(playlist)?;
        let board = Self::build_board(&mut rng);
        log::debug!("tile jigsaw started with {:?}", cursor.current().video_id);
        Ok(Self {
            cursor,
            rng,
            board,
            adapters: CreationQueue::new(TILE_PIECE_COUNT),
            generation: BoardGeneration::default(),
        })
    }

    fn build_board(rng: &mut GameRng) -> JigsawBoard {
        JigsawBoard::new(TILE_GRID_SIZE, TILE_GRID_SIZE, |(row, col)| {
            let correct = Point::new(col as Px * TILE_CELL_SIZE, row as Px * TILE_CELL_SIZE);
            let scattered = Point::new(rng.offset_below(TILE_SCATTER), rng.offset_below(TILE_SCATTER));
            Piece::new((row, col), correct, scattered)
        })
    }

    pub fn video(&self) -> &VideoDescriptor {
        self.cursor.current()
    }

    pub fn cursor(&self) -> &PlaylistCursor {
        &self.cursor
    }

    pub fn board(&self) -> &JigsawBoard {
        &self.board
    }

    pub fn generation(&self) -> BoardGeneration {
        self.generation
    }

    /// Rebuilds the board for the same clip.
    pub fn replay(&mut self) -> BoardGeneration {
        self.board = Self::build_board(&mut self.rng);
        self.adapters = CreationQueue::new(TILE_PIECE_COUNT);
        self.generation = self.generation.next();
        self.generation
    }

    /// Moves to the next clip, wrapping to the first, and rebuilds.
    pub fn next(&mut self) -> BoardGeneration {
        let video_id = &self.cursor.advance().video_id;
        log::debug!("tile jigsaw advancing to {:?}", video_id);
        self.replay()
    }

    /// Translation that crops the shared source video down to `piece`'s cell.
    pub fn crop_offset(&self, piece: usize) -> Result<Point> {
        let (row, col) = self.board.piece(piece)?.grid();
        Ok(Point::new(
            -(col as Px) * TILE_CELL_SIZE,
            -(row as Px) * TILE_CELL_SIZE,
        ))
    }

    /// Piece whose video adapter should be created now, if none is pending.
    pub fn request_adapter(&mut self) -> Option<usize> {
        self.adapters.request()
    }

    /// Records a ready adapter and returns the next one to create; stale builds are ignored.
    pub fn on_adapter_ready(&mut self, generation: BoardGeneration, piece: usize) -> Option<usize> {
        if generation != self.generation {
            log::debug!("ignoring ready signal from an old board for piece {}", piece);
            return None;
        }
        self.adapters.on_ready(piece)
    }

    pub fn adapters_created(&self) -> usize {
        self.adapters.created()
    }

    pub fn pointer_down(&mut self, piece: usize, pointer: Point) -> Result<()> {
        self.board.pointer_down(piece, pointer)
    }

    pub fn pointer_move(&mut self, pointer: Point) -> Result<(usize, Point)> {
        self.board.pointer_move(pointer)
    }

    pub fn pointer_up(&mut self) -> Result<JigsawMove> {
        self.board.pointer_up()
    }
}
