//! Assembled outputs: background maps and metasprites.
//!
//! Both refer to the tile library only by integer index, so the library can
//! keep growing after a map or an earlier sprite has been finished.

use serde::{Deserialize, Serialize};

/// One hardware sprite inside a metasprite.
///
/// Offsets are relative to the previous placement; the first one is relative
/// to the sprite's pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub dx: i8,
    pub dy: i8,
    pub tile: u8,
    pub props: u8,
}

/// A group of sprite placements drawn together as one object.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetaSprite {
    pub placements: Vec<Placement>,
}

impl MetaSprite {
    /// Number of hardware sprites used.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// True when the cell had no visible tiles.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

/// A background map in raster order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Tile index per cell.
    pub tiles: Vec<u8>,
    /// Per-cell attributes (palette + flip bits), when requested.
    pub attributes: Option<Vec<u8>>,
    /// Palette per canonical tile, when attributes are not requested.
    pub tile_palettes: Option<Vec<u8>>,
}

impl TileMap {
    /// Tile index at a cell.
    pub fn get(&self, col: u32, row: u32) -> Option<u8> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.tiles.get((row * self.width + col) as usize).copied()
    }
}

/// What the tiles were assembled into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Layout {
    Map(TileMap),
    Sprites(Vec<MetaSprite>),
}
