//! Core domain types for gbasset.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Colour` - RGBA colour values and palette ordering
//! - `PaletteTable` - the 4-colour palette groups
//! - `PixelIndexBuffer` - the indexed image the encoder reads
//! - `Tile` - packed 2bpp tiles and their mirror variants
//! - `TileMap` / `MetaSprite` - assembled outputs

mod asset;
mod colour;
mod palette;
mod pixels;
mod tile;

pub use asset::{Layout, MetaSprite, Placement, TileMap};
pub use colour::Colour;
pub use palette::{PaletteTable, COLOURS_PER_PALETTE, MAX_PALETTES};
pub use pixels::PixelIndexBuffer;
pub use tile::{Mirror, Tile, TileHeight, FLIP_X, FLIP_Y, TILE_WIDTH};
