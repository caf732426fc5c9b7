use alloc::string::String;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("This game requires at least {required} videos in its playlist, found {found}")]
    NotEnoughVideos { required: usize, found: usize },
    #[error("Invalid start/end times: end {end} must be after start {start}")]
    InvalidTimeRange { start: u32, end: u32 },
    #[error("Video has no end time, segments cannot be built")]
    MissingEndTime,
    #[error("No cartridge registered as {0:?}")]
    UnknownCartridge(String),
    #[error("Invalid piece index")]
    InvalidPiece,
    #[error("Piece is already locked in place")]
    PieceLocked,
    #[error("Another piece is already being dragged")]
    DragInProgress,
    #[error("No piece is being dragged")]
    NoActiveDrag,
    #[error("Round already finished, no new moves are accepted")]
    AlreadyFinished,
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
