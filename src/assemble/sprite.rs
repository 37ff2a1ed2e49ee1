//! Metasprite assembly.
//!
//! The image is cut into sprite cells. Each cell becomes one metasprite: a
//! chain of placements where every offset is measured from the previous
//! placement and the first one from the cell's pivot.

use crate::error::{AssetError, Result};
use crate::quantize::check_dimensions;
use crate::tiles::{encode_tile, TileLibrary};
use crate::types::{MetaSprite, PixelIndexBuffer, Placement, TileHeight, TILE_WIDTH};

/// Sprite cell geometry, already resolved against the image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteCells {
    pub width: u32,
    pub height: u32,
    /// Pivot relative to the cell's top-left corner.
    pub pivot_x: i32,
    pub pivot_y: i32,
}

impl SpriteCells {
    /// One cell covering the whole image, pivot at its centre.
    pub fn whole_image(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pivot_x: (width / 2) as i32,
            pivot_y: (height / 2) as i32,
        }
    }
}

/// Builds metasprites from sprite cells.
#[derive(Debug, Clone, Copy)]
pub struct SpriteAssembler {
    pub cells: SpriteCells,
    pub tile_height: TileHeight,
    /// Property bits applied to every placement.
    pub default_props: u8,
}

impl SpriteAssembler {
    pub fn new(cells: SpriteCells, tile_height: TileHeight, default_props: u8) -> Self {
        Self {
            cells,
            tile_height,
            default_props,
        }
    }

    /// Check that cells split into whole 8xH blocks.
    pub fn validate(&self) -> Result<()> {
        let h = self.tile_height.pixels();
        if self.cells.width == 0
            || self.cells.height == 0
            || self.cells.width % TILE_WIDTH != 0
            || self.cells.height % h != 0
        {
            return Err(AssetError::Build {
                message: format!(
                    "Sprite size {}x{} is not a multiple of the {} tile size",
                    self.cells.width, self.cells.height, self.tile_height
                ),
                help: Some(format!("Use a sprite width that is a multiple of 8 and a height that is a multiple of {}", h)),
            });
        }
        Ok(())
    }

    /// Assemble every cell of the image in raster order.
    pub fn assemble(
        &self,
        pixels: &PixelIndexBuffer,
        library: &mut TileLibrary,
    ) -> Result<Vec<MetaSprite>> {
        self.validate()?;
        check_dimensions(pixels.width(), pixels.height(), self.tile_height)?;

        let mut sprites = Vec::new();
        for y in (0..pixels.height()).step_by(self.cells.height as usize) {
            for x in (0..pixels.width()).step_by(self.cells.width as usize) {
                sprites.push(self.assemble_cell(pixels, library, x, y)?);
            }
        }
        Ok(sprites)
    }

    /// Assemble the cell whose top-left corner is `(cell_x, cell_y)`.
    ///
    /// Blank blocks are skipped; a cell with no visible block yields an
    /// empty metasprite.
    pub fn assemble_cell(
        &self,
        pixels: &PixelIndexBuffer,
        library: &mut TileLibrary,
        cell_x: u32,
        cell_y: u32,
    ) -> Result<MetaSprite> {
        let mut last_x = cell_x as i32 + self.cells.pivot_x;
        let mut last_y = cell_y as i32 + self.cells.pivot_y;

        let right = (cell_x + self.cells.width).min(pixels.width());
        let bottom = (cell_y + self.cells.height).min(pixels.height());

        let mut sprite = MetaSprite::default();
        for y in (cell_y..bottom).step_by(self.tile_height.pixels() as usize) {
            for x in (cell_x..right).step_by(TILE_WIDTH as usize) {
                let encoded = encode_tile(pixels, x, y, self.tile_height);
                if encoded.blank {
                    continue;
                }

                let resolved = library.resolve(encoded.tile, self.default_props)?;
                // 8x16 sprites take two hardware slots; point at the first
                let tile = u8::try_from(resolved.index * self.tile_height.slots()).map_err(|_| {
                    AssetError::TooManyTiles {
                        max: (u8::MAX as usize + 1) / self.tile_height.slots(),
                    }
                })?;

                let (dx, dy) = (x as i32 - last_x, y as i32 - last_y);
                let offset = |v: i32| i8::try_from(v).map_err(|_| AssetError::OffsetOutOfRange { x, y, dx, dy });

                sprite.placements.push(Placement {
                    dx: offset(dx)?,
                    dy: offset(dy)?,
                    tile,
                    props: resolved.props | pixels.palette_id(x, y),
                });

                last_x = x as i32;
                last_y = y as i32;
            }
        }

        Ok(sprite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, PaletteTable, FLIP_Y};
    use pretty_assertions::assert_eq;

    fn buffer(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> PixelIndexBuffer {
        let mut indices = Vec::new();
        for y in 0..height {
            for x in 0..width {
                indices.push(f(x, y));
            }
        }
        let mut palettes = PaletteTable::new();
        palettes.push(&[Colour::TRANSPARENT, Colour::WHITE, Colour::BLACK]);
        palettes.push(&[Colour::TRANSPARENT, Colour::rgb(255, 0, 0)]);
        PixelIndexBuffer::new(width, height, indices, palettes)
    }

    fn placement(dx: i8, dy: i8, tile: u8, props: u8) -> Placement {
        Placement { dx, dy, tile, props }
    }

    #[test]
    fn test_two_tiles_delta_chain() {
        // Non-blank tiles at (0, 0) and (8, 8), distinct patterns
        let pixels = buffer(16, 16, |x, y| match (x / 8, y / 8) {
            (0, 0) => 1,
            (1, 1) => 2,
            _ => 0,
        });
        let cells = SpriteCells {
            width: 16,
            height: 16,
            pivot_x: 8,
            pivot_y: 8,
        };
        let mut library = TileLibrary::new(true);

        let sprites = SpriteAssembler::new(cells, TileHeight::Eight, 0)
            .assemble(&pixels, &mut library)
            .unwrap();

        assert_eq!(sprites.len(), 1);
        assert_eq!(
            sprites[0].placements,
            vec![placement(-8, -8, 0, 0), placement(8, 8, 1, 0)]
        );
    }

    #[test]
    fn test_blank_cell_is_empty() {
        let pixels = buffer(16, 16, |_, _| 0);
        let mut library = TileLibrary::new(true);

        let sprites = SpriteAssembler::new(SpriteCells::whole_image(16, 16), TileHeight::Sixteen, 0)
            .assemble(&pixels, &mut library)
            .unwrap();

        assert_eq!(sprites.len(), 1);
        assert!(sprites[0].is_empty());
        assert!(library.is_empty());
    }

    #[test]
    fn test_tall_tiles_double_index() {
        // Two different 8x16 tiles side by side
        let pixels = buffer(16, 16, |x, _| if x < 8 { 1 } else { 2 });
        let mut library = TileLibrary::new(true);

        let sprites = SpriteAssembler::new(SpriteCells::whole_image(16, 16), TileHeight::Sixteen, 0)
            .assemble(&pixels, &mut library)
            .unwrap();

        let tiles: Vec<u8> = sprites[0].placements.iter().map(|p| p.tile).collect();
        assert_eq!(tiles, vec![0, 2]);
        assert_eq!(library.tiles()[0].bytes().len(), 32);
    }

    #[test]
    fn test_palette_and_flip_in_props() {
        // Top block: pixel (0, 0) set. Bottom block: pixel (0, 7) set. Palette 1.
        let pixels = buffer(8, 16, |x, y| match (x, y) {
            (0, 0) | (0, 15) => (1 << 2) | 1,
            _ => 1 << 2,
        });
        let mut library = TileLibrary::new(true);

        let sprites = SpriteAssembler::new(SpriteCells::whole_image(8, 16), TileHeight::Eight, 0x80)
            .assemble(&pixels, &mut library)
            .unwrap();

        assert_eq!(
            sprites[0].placements,
            vec![placement(-4, -8, 0, 0x80 | 1), placement(0, 8, 0, 0x80 | FLIP_Y | 1)]
        );
    }

    #[test]
    fn test_grid_of_cells_shares_library() {
        // Four 8x8 cells with the same visible tile
        let pixels = buffer(16, 16, |x, y| ((x % 8 == 0) && (y % 8 == 0)) as u8);
        let cells = SpriteCells {
            width: 8,
            height: 8,
            pivot_x: 0,
            pivot_y: 0,
        };
        let mut library = TileLibrary::new(true);

        let sprites = SpriteAssembler::new(cells, TileHeight::Eight, 0)
            .assemble(&pixels, &mut library)
            .unwrap();

        assert_eq!(sprites.len(), 4);
        for sprite in &sprites {
            // Pivot is relative to each cell, so every chain starts at (0, 0)
            assert_eq!(sprite.placements, vec![placement(0, 0, 0, 0)]);
        }
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_offset_out_of_range() {
        let pixels = buffer(8, 8, |_, _| 1);
        let cells = SpriteCells {
            width: 8,
            height: 8,
            pivot_x: 200,
            pivot_y: 0,
        };
        let mut library = TileLibrary::new(true);

        let err = SpriteAssembler::new(cells, TileHeight::Eight, 0)
            .assemble(&pixels, &mut library)
            .unwrap_err();
        assert!(matches!(err, AssetError::OffsetOutOfRange { dx: -200, dy: 0, .. }));
    }

    #[test]
    fn test_misaligned_cells_rejected() {
        let pixels = buffer(16, 16, |_, _| 1);
        let cells = SpriteCells {
            width: 16,
            height: 8,
            pivot_x: 0,
            pivot_y: 0,
        };
        let mut library = TileLibrary::new(true);

        let result = SpriteAssembler::new(cells, TileHeight::Sixteen, 0).assemble(&pixels, &mut library);
        assert!(matches!(result, Err(AssetError::Build { .. })));
    }

    #[test]
    fn test_image_shorter_than_tile_rejected() {
        let pixels = buffer(8, 8, |_, _| 1);
        let cells = SpriteCells::whole_image(8, 16);
        let mut library = TileLibrary::new(true);

        let result = SpriteAssembler::new(cells, TileHeight::Sixteen, 0).assemble(&pixels, &mut library);
        assert!(matches!(
            result,
            Err(AssetError::InvalidDimensions { width: 8, height: 8, tile_height: 16 })
        ));
        assert!(library.is_empty());
    }
}
