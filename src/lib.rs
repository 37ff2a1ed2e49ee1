//! gbasset - Game Boy tile, map and metasprite converter
//!
//! A library for turning images into 2bpp tiles, 4-colour palettes and
//! either a background map or metasprites, ready to be emitted as GBDK C
//! data.

pub mod assemble;
pub mod cli;
pub mod config;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod manifest;
pub mod output;
pub mod quantize;
pub mod source;
pub mod tiles;
pub mod types;

pub use assemble::{MapAssembler, SpriteAssembler, SpriteCells};
pub use config::{ConvertConfig, Mode, SourceMode, SpriteGeometry, SpriteOptions};
pub use convert::{convert, Conversion};
pub use diagnostics::{Diagnostic, Severity, ValidationResult};
pub use error::{AssetError, Result};
pub use export::{write_c, write_json, write_preview, ExportOptions};
pub use manifest::Manifest;
pub use quantize::{cluster, PaletteClusterer};
pub use source::{load, read_indexed, SourceImage};
pub use tiles::{encode_tile, TileLibrary};
pub use types::{
    Colour, Layout, MetaSprite, Mirror, PaletteTable, PixelIndexBuffer, Placement, Tile,
    TileHeight, TileMap,
};
