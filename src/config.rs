//! Conversion settings consumed by the pipeline.

use serde::{Deserialize, Serialize};

use crate::assemble::SpriteCells;
use crate::types::TileHeight;

/// How the source image is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceMode {
    /// Any image; colours are clustered into palettes.
    #[default]
    TrueColour,
    /// An indexed PNG whose palette is already laid out in groups of 4.
    Indexed,
}

/// Sprite cell settings. Unset values default from the image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpriteOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub pivot_x: Option<i32>,
    pub pivot_y: Option<i32>,
    pub collision_width: Option<u32>,
    pub collision_height: Option<u32>,
}

/// Fully resolved sprite geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteGeometry {
    pub cells: SpriteCells,
    pub collision_width: u32,
    pub collision_height: u32,
}

impl SpriteOptions {
    /// Fill unset values: cell = whole image, pivot = cell centre,
    /// collision box = cell size.
    pub fn resolve(&self, image_width: u32, image_height: u32) -> SpriteGeometry {
        let width = self.width.filter(|&w| w > 0).unwrap_or(image_width);
        let height = self.height.filter(|&h| h > 0).unwrap_or(image_height);

        SpriteGeometry {
            cells: SpriteCells {
                width,
                height,
                pivot_x: self.pivot_x.unwrap_or((width / 2) as i32),
                pivot_y: self.pivot_y.unwrap_or((height / 2) as i32),
            },
            collision_width: self.collision_width.unwrap_or(width),
            collision_height: self.collision_height.unwrap_or(height),
        }
    }
}

/// What the tiles are assembled into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Background map; `attributes` selects a per-cell attribute grid over a
    /// per-tile palette list.
    Map { attributes: bool },
    /// Metasprites cut from sprite cells.
    Sprites(SpriteOptions),
}

/// Settings for one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Sprite tile height. Maps always use 8.
    pub tile_height: TileHeight,
    /// Match tiles against mirrored copies of stored tiles.
    pub mirror_tiles: bool,
    /// Property bits OR-ed into every resolved tile.
    pub default_props: u8,
    pub source: SourceMode,
    pub mode: Mode,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            tile_height: TileHeight::Sixteen,
            mirror_tiles: true,
            default_props: 0,
            source: SourceMode::TrueColour,
            mode: Mode::Sprites(SpriteOptions::default()),
        }
    }
}

impl ConvertConfig {
    /// Tile height actually used for banding and encoding.
    pub fn effective_tile_height(&self) -> TileHeight {
        match self.mode {
            Mode::Map { .. } => TileHeight::Eight,
            Mode::Sprites(_) => self.tile_height,
        }
    }

    /// True when exporting a background map.
    pub fn is_map(&self) -> bool {
        matches!(self.mode, Mode::Map { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::default();
        assert_eq!(config.tile_height, TileHeight::Sixteen);
        assert!(config.mirror_tiles);
        assert_eq!(config.default_props, 0);
        assert!(!config.is_map());
    }

    #[test]
    fn test_map_forces_eight_pixel_tiles() {
        let config = ConvertConfig {
            mode: Mode::Map { attributes: false },
            ..Default::default()
        };
        assert_eq!(config.effective_tile_height(), TileHeight::Eight);
    }

    #[test]
    fn test_resolve_defaults_to_whole_image() {
        let geometry = SpriteOptions::default().resolve(32, 16);

        assert_eq!(geometry.cells, SpriteCells::whole_image(32, 16));
        assert_eq!(geometry.cells.pivot_x, 16);
        assert_eq!(geometry.cells.pivot_y, 8);
        assert_eq!((geometry.collision_width, geometry.collision_height), (32, 16));
    }

    #[test]
    fn test_resolve_pivot_follows_cell_size() {
        let options = SpriteOptions {
            width: Some(16),
            height: Some(32),
            collision_height: Some(24),
            ..Default::default()
        };
        let geometry = options.resolve(64, 64);

        assert_eq!((geometry.cells.pivot_x, geometry.cells.pivot_y), (8, 16));
        assert_eq!((geometry.collision_width, geometry.collision_height), (16, 24));
    }

    #[test]
    fn test_resolve_zero_size_means_image() {
        let options = SpriteOptions {
            width: Some(0),
            ..Default::default()
        };
        assert_eq!(options.resolve(24, 8).cells.width, 24);
    }
}
