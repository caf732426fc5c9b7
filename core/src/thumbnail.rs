use alloc::string::String;
use serde::{Deserialize, Serialize};

use crate::*;

/// Difficulty presets for the image jigsaw.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GridPreset {
    #[default]
    Easy,
    Medium,
    Hard,
    Expert,
}

impl GridPreset {
    pub const ALL: [GridPreset; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Expert];

    pub const fn side(self) -> usize {
        use GridPreset::*;
        match self {
            Easy => 2,
            Medium => 3,
            Hard => 4,
            Expert => 5,
        }
    }

    pub const fn piece_count(self) -> usize {
        self.side() * self.side()
    }

    pub const fn label(self) -> &'static str {
        use GridPreset::*;
        match self {
            Easy => "Easy (4 pieces)",
            Medium => "Medium (9 pieces)",
            Hard => "Hard (16 pieces)",
            Expert => "Expert (25 pieces)",
        }
    }

    pub fn from_piece_count(count: usize) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.piece_count() == count)
    }
}

/// Width over height of a video still.
pub const THUMBNAIL_ASPECT: Px = 16.0 / 9.0;

/// Static-image jigsaw with a rotation degree of freedom.
///
/// Pieces are square so a quarter turn keeps their outline. The board is the largest square
/// that fits the space the host offers, and the image is centred over it, cropping the sides.
#[derive(Clone, Debug)]
pub struct ThumbnailJigsaw {
    cursor: PlaylistCursor,
    rng: GameRng,
    preset: GridPreset,
    board_size: Size,
    board: JigsawBoard,
}

impl ThumbnailJigsaw {
    pub fn start(
        mut playlist: Playlist,
        mut rng: GameRng,
        preset: GridPreset,
        board_size: Size,
    ) -> Result<Self> {
        fisher_yates(&mut playlist, &mut rng);
        let cursor = PlaylistCursor::new(playlist)?;
        let edge = board_size.width.min(board_size.height);
        let board_size = Size::new(edge, edge);
        let board = Self::build_board(&mut rng, preset, board_size);
        Ok(Self {
            cursor,
            rng,
            preset,
            board_size,
            board,
        })
    }

    fn build_board(rng: &mut GameRng, preset: GridPreset, board_size: Size) -> JigsawBoard {
        let side = preset.side();
        let piece = Self::piece_size_for(preset, board_size);
        JigsawBoard::new(side, side, |(row, col)| {
            let correct = Point::new(col as Px * piece.width, row as Px * piece.height);
            let scattered = Point::new(
                rng.offset_below(board_size.width - piece.width),
                rng.offset_below(board_size.height - piece.height),
            );
            let rotation = rng.pick(&Rotation::ALL).unwrap_or_default();
            Piece::new((row, col), correct, scattered).with_rotation(rotation)
        })
    }

    fn piece_size_for(preset: GridPreset, board_size: Size) -> Size {
        let edge = board_size.width / preset.side() as Px;
        Size::new(edge, edge)
    }

    pub fn video(&self) -> &VideoDescriptor {
        self.cursor.current()
    }

    pub fn thumbnail_url(&self) -> String {
        self.video().thumbnail_url(ThumbnailQuality::MaxRes)
    }

    pub fn preset(&self) -> GridPreset {
        self.preset
    }

    pub fn board_size(&self) -> Size {
        self.board_size
    }

    /// Size the still is drawn at behind the pieces.
    pub fn image_size(&self) -> Size {
        let height = self.board_size.height;
        Size::new(height * THUMBNAIL_ASPECT, height)
    }

    pub fn piece_size(&self) -> Size {
        Self::piece_size_for(self.preset, self.board_size)
    }

    pub fn board(&self) -> &JigsawBoard {
        &self.board
    }

    /// Background offset that shows `piece`'s slice of the image.
    pub fn background_offset(&self, piece: usize) -> Result<Point> {
        let (row, col) = self.board.piece(piece)?.grid();
        let size = self.piece_size();
        let crop = (self.image_size().width - self.board_size.width) / 2.0;
        Ok(Point::new(
            -crop - col as Px * size.width,
            -(row as Px) * size.height,
        ))
    }

    /// Scatters a fresh puzzle from the current image.
    pub fn regenerate(&mut self) {
        self.board = Self::build_board(&mut self.rng, self.preset, self.board_size);
    }

    pub fn set_preset(&mut self, preset: GridPreset) {
        self.preset = preset;
        self.regenerate();
    }

    /// Next image, reshuffling the cycle once every image was shown.
    pub fn next(&mut self) {
        self.cursor.advance_reshuffling(&mut self.rng);
        self.regenerate();
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

    pub fn rotate(&mut self, piece: usize) -> Result<JigsawMove> {
        self.board.rotate(piece)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    const BOARD: Size = Size::new(400.0, 400.0);

    fn playlist(len: usize) -> Playlist {
        (0..len)
            .map(|i| VideoDescriptor::new(format!("v{}", i), format!("Video {}", i)))
            .collect()
    }

    fn start(preset: GridPreset, seed: u64) -> ThumbnailJigsaw {
        ThumbnailJigsaw::start(playlist(3), GameRng::from_seed(seed), preset, BOARD).unwrap()
    }

    const FAR_AWAY: Point = Point::new(1000.0, 1000.0);

    fn drag_to(game: &mut ThumbnailJigsaw, piece: usize, target: Point) -> JigsawMove {
        let current = game.board().piece(piece).unwrap().current();
        game.pointer_down(piece, current).unwrap();
        game.pointer_move(target).unwrap();
        game.pointer_up().unwrap()
    }

    /// Parks the piece off-board, then turns it to `rotation` without any chance of locking.
    fn turn_to(game: &mut ThumbnailJigsaw, piece: usize, rotation: Rotation) {
        drag_to(game, piece, FAR_AWAY);
        while game.board().piece(piece).unwrap().rotation() != rotation {
            game.rotate(piece).unwrap();
        }
    }

    #[test]
    fn presets_map_to_square_grids() {
        assert_eq!(GridPreset::from_piece_count(9), Some(GridPreset::Medium));
        assert_eq!(GridPreset::from_piece_count(10), None);

        for preset in GridPreset::ALL {
            let game = start(preset, 1);
            assert_eq!(game.board().piece_count(), preset.piece_count());
            let size = game.piece_size();
            assert_eq!(size.width, 400.0 / preset.side() as Px);
            for (_, piece) in game.board().iter() {
                assert!(piece.current().x < 400.0 - size.width);
                assert!(piece.current().y < 400.0 - size.height);
            }
        }
    }

    #[test]
    fn correct_spot_but_rotated_does_not_lock_until_turned_upright() {
        let mut game = start(GridPreset::Easy, 2);
        turn_to(&mut game, 0, Rotation::Deg90);
        let target = game.board().piece(0).unwrap().correct();

        let dropped = drag_to(&mut game, 0, target);
        assert!(!dropped.placement.is_locked());

        let mut turns = 0;
        loop {
            let outcome = game.rotate(0).unwrap();
            turns += 1;
            if outcome.placement.is_locked() {
                break;
            }
        }
        assert_eq!(turns, 3);
        assert_eq!(game.board().piece(0).unwrap().rotation(), Rotation::Deg0);
        assert!(game.board().piece(0).unwrap().is_locked());
    }

    #[test]
    fn rotation_counts_as_a_move() {
        let mut game = start(GridPreset::Medium, 3);
        let before = game.board().moves();
        game.rotate(4).unwrap();
        assert_eq!(game.board().moves(), before + 1);
    }

    #[test]
    fn all_pieces_locked_wins_once() {
        let mut game = start(GridPreset::Easy, 4);
        let count = game.board().piece_count();

        for piece in 0..count {
            turn_to(&mut game, piece, Rotation::Deg270);
            let target = game.board().piece(piece).unwrap().correct();
            let placed = drag_to(&mut game, piece, target + Point::new(10.0, -10.0));
            assert!(!placed.placement.is_locked());
            assert_eq!(game.board().locked_count(), piece);

            let turned = game.rotate(piece).unwrap();
            assert!(turned.placement.is_locked());
            if piece + 1 < count {
                assert_eq!(turned.victory, None);
            } else {
                assert_eq!(turned.victory.map(|v| v.unit), Some(CountUnit::Moves));
            }
        }
        assert!(game.board().is_complete());
        assert_eq!(game.rotate(0).err(), Some(GameError::AlreadyFinished));
    }

    #[test]
    fn background_offsets_slice_the_centred_image() {
        let game = ThumbnailJigsaw::start(
            playlist(3),
            GameRng::from_seed(5),
            GridPreset::Hard,
            Size::new(640.0, 360.0),
        )
        .unwrap();
        assert_eq!(game.image_size(), Size::new(640.0, 360.0));
        assert_eq!(game.background_offset(0), Ok(Point::new(-140.0, 0.0)));
        assert_eq!(game.background_offset(5), Ok(Point::new(-230.0, -90.0)));
        assert_eq!(game.background_offset(3), Ok(Point::new(-410.0, 0.0)));
    }

    #[test]
    fn wide_board_still_gets_square_pieces() {
        for preset in GridPreset::ALL {
            let game = ThumbnailJigsaw::start(
                playlist(1),
                GameRng::from_seed(8),
                preset,
                Size::new(640.0, 360.0),
            )
            .unwrap();
            let size = game.piece_size();
            assert_eq!(size.width, size.height);
            assert_eq!(game.board_size(), Size::new(360.0, 360.0));
            for (_, piece) in game.board().iter() {
                assert!(piece.correct().x + size.width <= 360.0 + 0.001);
                assert!(piece.correct().y + size.height <= 360.0 + 0.001);
            }
        }
    }

    #[test]
    fn next_cycles_through_every_image_before_reshuffling() {
        let mut game = start(GridPreset::Easy, 6);
        let mut seen = alloc::collections::BTreeSet::new();
        seen.insert(game.video().video_id.clone());
        game.next();
        seen.insert(game.video().video_id.clone());
        game.next();
        seen.insert(game.video().video_id.clone());
        assert_eq!(seen.len(), 3);

        game.next();
        assert_eq!(game.board().moves(), 0);
        assert!(game.thumbnail_url().ends_with("maxresdefault.jpg"));
    }

    #[test]
    fn changing_preset_regenerates_the_board() {
        let mut game = start(GridPreset::Easy, 7);
        game.rotate(0).unwrap();
        game.set_preset(GridPreset::Expert);
        assert_eq!(game.board().piece_count(), 25);
        assert_eq!(game.board().moves(), 0);
    }
}
