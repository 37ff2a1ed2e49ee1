//! Background map assembly.

use crate::error::{AssetError, Result};
use crate::quantize::check_dimensions;
use crate::tiles::{encode_tile, TileLibrary};
use crate::types::{PixelIndexBuffer, TileHeight, TileMap, TILE_WIDTH};

/// Builds a background map from 8x8 blocks in raster order.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapAssembler {
    /// Emit a per-cell attribute grid instead of a per-tile palette list.
    pub attributes: bool,
    /// Property bits applied to every resolved tile.
    pub default_props: u8,
}

impl MapAssembler {
    pub fn new(attributes: bool, default_props: u8) -> Self {
        Self {
            attributes,
            default_props,
        }
    }

    /// Scan the whole image, resolving every block through the library.
    ///
    /// Blank blocks are kept: every cell of the map needs a tile.
    pub fn assemble(&self, pixels: &PixelIndexBuffer, library: &mut TileLibrary) -> Result<TileMap> {
        check_dimensions(pixels.width(), pixels.height(), TileHeight::Eight)?;
        let width = pixels.width() / TILE_WIDTH;
        let height = pixels.height() / TileHeight::Eight.pixels();
        let cells = (width * height) as usize;

        let mut tiles = Vec::with_capacity(cells);
        let mut attributes = self.attributes.then(|| Vec::with_capacity(cells));

        for row in 0..height {
            for col in 0..width {
                let (x, y) = (col * TILE_WIDTH, row * 8);
                let palette = pixels.palette_id(x, y);

                let mut tile = encode_tile(pixels, x, y, TileHeight::Eight).tile;
                // Palettes only split tiles when they are stored per tile
                if !self.attributes {
                    tile.palette = palette;
                }

                let resolved = library.resolve(tile, self.default_props)?;
                tiles.push(tile_index(resolved.index)?);

                if let Some(attributes) = attributes.as_mut() {
                    attributes.push(resolved.props | palette);
                }
            }
        }

        let tile_palettes = if self.attributes {
            None
        } else {
            Some(library.tiles().iter().map(|t| t.palette).collect())
        };

        Ok(TileMap {
            width,
            height,
            tiles,
            attributes,
            tile_palettes,
        })
    }
}

fn tile_index(index: usize) -> Result<u8> {
    u8::try_from(index).map_err(|_| AssetError::TooManyTiles {
        max: u8::MAX as usize + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, PaletteTable, FLIP_X};
    use pretty_assertions::assert_eq;

    fn buffer(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> PixelIndexBuffer {
        let mut indices = Vec::new();
        for y in 0..height {
            for x in 0..width {
                indices.push(f(x, y));
            }
        }
        let mut palettes = PaletteTable::new();
        palettes.push(&[Colour::WHITE, Colour::BLACK]);
        palettes.push(&[Colour::WHITE, Colour::rgb(255, 0, 0)]);
        PixelIndexBuffer::new(width, height, indices, palettes)
    }

    #[test]
    fn test_map_dimensions_and_blank_cells() {
        let pixels = buffer(32, 16, |_, _| 0);
        let mut library = TileLibrary::new(true);

        let map = MapAssembler::new(false, 0).assemble(&pixels, &mut library).unwrap();

        assert_eq!((map.width, map.height), (4, 2));
        assert_eq!(map.tiles, vec![0; 8]);
        assert_eq!(library.len(), 1);
        assert_eq!(map.tile_palettes, Some(vec![0]));
        assert!(map.attributes.is_none());
    }

    #[test]
    fn test_map_raster_order() {
        // Left column of the first cell set, second cell mirrored, third plain
        let pixels = buffer(24, 16, |x, y| {
            let cell = (y / 8) * 3 + x / 8;
            match cell {
                0 => (x % 8 == 0) as u8,
                1 => (x % 8 == 7) as u8,
                3 => 1,
                _ => 0,
            }
        });
        let mut library = TileLibrary::new(true);

        let map = MapAssembler::new(true, 0).assemble(&pixels, &mut library).unwrap();

        assert_eq!(map.tiles, vec![0, 0, 1, 2, 1, 1]);
        assert_eq!(map.attributes, Some(vec![0, FLIP_X, 0, 0, 0, 0]));
        assert_eq!(library.len(), 3);
        assert!(map.tile_palettes.is_none());
        for &index in &map.tiles {
            assert!((index as usize) < library.len());
        }
    }

    #[test]
    fn test_map_attributes_carry_palette() {
        // Same pattern, different palettes
        let pixels = buffer(16, 8, |x, _| if x < 8 { 1 } else { (1 << 2) | 1 });
        let mut library = TileLibrary::new(true);

        let map = MapAssembler::new(true, 0).assemble(&pixels, &mut library).unwrap();

        assert_eq!(map.tiles, vec![0, 0]);
        assert_eq!(map.attributes, Some(vec![0, 1]));
    }

    #[test]
    fn test_map_tile_palettes_split_tiles() {
        let pixels = buffer(16, 8, |x, _| if x < 8 { 1 } else { (1 << 2) | 1 });
        let mut library = TileLibrary::new(true);

        let map = MapAssembler::new(false, 0).assemble(&pixels, &mut library).unwrap();

        assert_eq!(map.tiles, vec![0, 1]);
        assert_eq!(map.tile_palettes, Some(vec![0, 1]));
    }

    #[test]
    fn test_map_default_props_in_attributes() {
        let pixels = buffer(8, 8, |_, _| 0);
        let mut library = TileLibrary::new(true);

        let map = MapAssembler::new(true, 0x80).assemble(&pixels, &mut library).unwrap();
        assert_eq!(map.attributes, Some(vec![0x80]));
    }

    #[test]
    fn test_map_rejects_partial_tiles() {
        let pixels = buffer(12, 8, |_, _| 1);
        let mut library = TileLibrary::new(true);

        let result = MapAssembler::default().assemble(&pixels, &mut library);
        assert!(matches!(result, Err(AssetError::InvalidDimensions { width: 12, .. })));
    }
}
