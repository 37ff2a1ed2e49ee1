//! Tile encoding and the canonical tile library.

mod encode;
mod library;

pub use encode::{encode_tile, EncodedTile};
pub use library::{Resolved, TileLibrary, MAX_TILES};
