//! Assemblers turning encoded tiles into a background map or metasprites.
//!
//! Both share the run's `TileLibrary` and only store tile indices.

mod map;
mod sprite;

pub use map::MapAssembler;
pub use sprite::{SpriteAssembler, SpriteCells};
