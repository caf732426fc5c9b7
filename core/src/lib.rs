#![no_std]

extern crate alloc;

pub use adapter::*;
pub use cartridge::*;
pub use catalog::*;
pub use drag::*;
pub use error::*;
pub use jigsaw::*;
pub use memory::*;
pub use piece::*;
pub use schedule::*;
pub use sequence::*;
pub use session::*;
pub use shuffle::*;
pub use thumbnail::*;
pub use tile::*;
pub use types::*;
pub use video::*;

mod adapter;
mod cartridge;
mod catalog;
mod drag;
mod error;
mod jigsaw;
mod memory;
mod piece;
mod schedule;
mod sequence;
mod session;
mod shuffle;
mod thumbnail;
mod tile;
mod types;
mod video;
