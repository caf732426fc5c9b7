use alloc::format;
use alloc::string::String;
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

/// What a session counts, which also decides how the victory line reads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountUnit {
    Moves,
    Clicks,
}

impl CountUnit {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Moves => "Moves",
            Self::Clicks => "Clicks",
        }
    }

    const fn noun(self) -> &'static str {
        match self {
            Self::Moves => "moves",
            Self::Clicks => "clicks",
        }
    }
}

/// Signal a cartridge sends back to the host when a round is complete.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victory {
    pub count: Count,
    pub unit: CountUnit,
}

impl Victory {
    pub fn message(&self) -> String {
        format!(
            "You solved the puzzle in {} {}!",
            self.count,
            self.unit.noun()
        )
    }
}

/// The only two actions the victory overlay offers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VictoryAction {
    Replay,
    ReturnToMenu,
}

/// Per-round bookkeeping: a monotonic counter and a one-shot victory latch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundTally {
    unit: CountUnit,
    count: Saturating<Count>,
    won: bool,
}

impl RoundTally {
    pub const fn new(unit: CountUnit) -> Self {
        Self {
            unit,
            count: Saturating(0),
            won: false,
        }
    }

    pub fn count(&self) -> Count {
        self.count.0
    }

    pub fn unit(&self) -> CountUnit {
        self.unit
    }

    pub fn label(&self) -> String {
        format!("{}: {}", self.unit.label(), self.count.0)
    }

    pub(crate) fn bump(&mut self) {
        self.count += 1;
    }

    /// Latches the win; returns the victory only the first time `complete` holds.
    pub(crate) fn settle(&mut self, complete: bool) -> Option<Victory> {
        if !complete || self.won {
            return None;
        }
        self.won = true;
        log::debug!("round won after {} {}", self.count.0, self.unit.noun());
        Some(Victory {
            count: self.count.0,
            unit: self.unit,
        })
    }

    pub(crate) fn check_open(&self) -> Result<()> {
        if self.won {
            Err(GameError::AlreadyFinished)
        } else {
            Ok(())
        }
    }
}

/// Cursor over a playlist that cycles through it one entry at a time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaylistCursor {
    playlist: Playlist,
    index: usize,
}

impl PlaylistCursor {
    pub fn new(playlist: Playlist) -> Result<Self> {
        if playlist.is_empty() {
            return Err(GameError::NotEnoughVideos {
                required: 1,
                found: 0,
            });
        }
        Ok(Self { playlist, index: 0 })
    }

    pub fn current(&self) -> &VideoDescriptor {
        &self.playlist[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn playlist(&self) -> &[VideoDescriptor] {
        &self.playlist
    }

    /// Moves to the next entry, wrapping back to the first one.
    pub fn advance(&mut self) -> &VideoDescriptor {
        self.index = (self.index + 1) % self.playlist.len();
        self.current()
    }

    /// Like [`Self::advance`], but reshuffles the whole cycle when it wraps.
    pub fn advance_reshuffling(&mut self, rng: &mut GameRng) -> &VideoDescriptor {
        self.index += 1;
        if self.index >= self.playlist.len() {
            fisher_yates(&mut self.playlist, rng);
            self.index = 0;
        }
        self.current()
    }
}
