use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CartridgeKind {
    TileJigsaw,
    ThumbnailJigsaw,
    SequencePuzzle,
    MemoryMatch,
}

impl CartridgeKind {
    pub const ALL: [CartridgeKind; 4] = [
        Self::TileJigsaw,
        Self::ThumbnailJigsaw,
        Self::SequencePuzzle,
        Self::MemoryMatch,
    ];

    /// Name the catalog uses in `scriptFile`.
    pub const fn script_name(self) -> &'static str {
        use CartridgeKind::*;
        match self {
            TileJigsaw => "jigsaw",
            ThumbnailJigsaw => "thumbnail-jigsaw",
            SequencePuzzle => "sequence-puzzle",
            MemoryMatch => "memory-match",
        }
    }

    pub const fn min_playlist_len(self) -> usize {
        match self {
            Self::MemoryMatch => MEMORY_PAIRS,
            _ => 1,
        }
    }

    pub fn validate_playlist(self, playlist: &[VideoDescriptor]) -> Result<()> {
        let required = self.min_playlist_len();
        if playlist.len() < required {
            return Err(GameError::NotEnoughVideos {
                required,
                found: playlist.len(),
            });
        }
        Ok(())
    }
}

/// Host-provided parameters a cartridge may need at start.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StartOptions {
    pub grid: GridPreset,
    pub board_size: Size,
    pub sequence_layout: SequenceLayout,
}

impl Default for StartOptions {
    fn default() -> Self {
        Self {
            grid: GridPreset::default(),
            board_size: Size::new(640.0, 360.0),
            sequence_layout: SequenceLayout::default(),
        }
    }
}

/// The contract every mini-game satisfies towards the host.
pub trait Cartridge: Sized {
    const KIND: CartridgeKind;

    /// Entry point, invoked once per load with the catalog playlist.
    fn start(playlist: Playlist, rng: GameRng, options: &StartOptions) -> Result<Self>;

    /// Counter of the current round, if a round could be built.
    fn tally(&self) -> Option<&RoundTally>;
}

impl Cartridge for TileJigsaw {
    const KIND: CartridgeKind = CartridgeKind::TileJigsaw;

    fn start(playlist: Playlist, rng: GameRng, _options: &StartOptions) -> Result<Self> {
        TileJigsaw::start(playlist, rng)
    }

    fn tally(&self) -> Option<&RoundTally> {
        Some(self.board().tally())
    }
}

impl Cartridge for ThumbnailJigsaw {
    const KIND: CartridgeKind = CartridgeKind::ThumbnailJigsaw;

    fn start(playlist: Playlist, rng: GameRng, options: &StartOptions) -> Result<Self> {
        ThumbnailJigsaw::start(playlist, rng, options.grid, options.board_size)
    }

    fn tally(&self) -> Option<&RoundTally> {
        Some(self.board().tally())
    }
}

impl Cartridge for SequencePuzzle {
    const KIND: CartridgeKind = CartridgeKind::SequencePuzzle;

    fn start(playlist: Playlist, rng: GameRng, options: &StartOptions) -> Result<Self> {
        SequencePuzzle::start(playlist, rng, options.sequence_layout)
    }

    fn tally(&self) -> Option<&RoundTally> {
        self.board().ok().map(SequenceBoard::tally)
    }
}

impl Cartridge for MemoryMatch {
    const KIND: CartridgeKind = CartridgeKind::MemoryMatch;

    fn start(playlist: Playlist, rng: GameRng, _options: &StartOptions) -> Result<Self> {
        MemoryMatch::start(playlist, rng)
    }

    fn tally(&self) -> Option<&RoundTally> {
        Some(MemoryMatch::tally(self))
    }
}

/// A started cartridge, owned by the host while it is mounted.
#[derive(Clone, Debug)]
pub enum MountedCartridge {
    TileJigsaw(TileJigsaw),
    ThumbnailJigsaw(ThumbnailJigsaw),
    SequencePuzzle(SequencePuzzle),
    MemoryMatch(MemoryMatch),
}

impl MountedCartridge {
    pub fn kind(&self) -> CartridgeKind {
        match self {
            Self::TileJigsaw(_) => TileJigsaw::KIND,
            Self::ThumbnailJigsaw(_) => ThumbnailJigsaw::KIND,
            Self::SequencePuzzle(_) => SequencePuzzle::KIND,
            Self::MemoryMatch(_) => MemoryMatch::KIND,
        }
    }

    pub fn tally(&self) -> Option<&RoundTally> {
        match self {
            Self::TileJigsaw(game) => Cartridge::tally(game),
            Self::ThumbnailJigsaw(game) => Cartridge::tally(game),
            Self::SequencePuzzle(game) => Cartridge::tally(game),
            Self::MemoryMatch(game) => Cartridge::tally(game),
        }
    }
}

fn start_as<C: Cartridge>(
    playlist: Playlist,
    rng: GameRng,
    options: &StartOptions,
    wrap: fn(C) -> MountedCartridge,
) -> Result<MountedCartridge> {
    C::KIND.validate_playlist(&playlist)?;
    C::start(playlist, rng, options).map(wrap)
}

impl CartridgeKind {
    /// Validates the playlist against this cartridge's minimum and starts it.
    pub fn start(
        self,
        playlist: Playlist,
        rng: GameRng,
        options: &StartOptions,
    ) -> Result<MountedCartridge> {
        use MountedCartridge as M;
        match self {
            Self::TileJigsaw => start_as(playlist, rng, options, M::TileJigsaw),
            Self::ThumbnailJigsaw => start_as(playlist, rng, options, M::ThumbnailJigsaw),
            Self::SequencePuzzle => start_as(playlist, rng, options, M::SequencePuzzle),
            Self::MemoryMatch => start_as(playlist, rng, options, M::MemoryMatch),
        }
    }
}

/// Maps catalog script names to cartridges; loading is a lookup followed by `start`.
#[derive(Clone, Debug, Default)]
pub struct CartridgeRegistry {
    entries: BTreeMap<String, CartridgeKind>,
}

impl CartridgeRegistry {
    pub fn with_builtin() -> Self {
        let mut registry = Self::default();
        for kind in CartridgeKind::ALL {
            registry.register(kind.script_name(), kind);
        }
        registry
    }

    pub fn register(&mut self, name: &str, kind: CartridgeKind) {
        self.entries.insert(normalize_name(name), kind);
    }

    pub fn resolve(&self, name: &str) -> Result<CartridgeKind> {
        self.entries
            .get(&normalize_name(name))
            .copied()
            .ok_or_else(|| GameError::UnknownCartridge(name.to_string()))
    }

    pub fn load(
        &self,
        name: &str,
        playlist: Playlist,
        rng: GameRng,
        options: &StartOptions,
    ) -> Result<MountedCartridge> {
        let kind = self.resolve(name)?;
        log::debug!("loading cartridge {:?} for {:?}", kind, name);
        kind.start(playlist, rng, options)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// `games/Jigsaw.js`, `jigsaw.js` and `jigsaw` all name the same cartridge.
fn normalize_name(name: &str) -> String {
    let file = name.trim().rsplit('/').next().unwrap_or_default();
    let stem = file.strip_suffix(".js").unwrap_or(file);
    stem.to_ascii_lowercase()
}
