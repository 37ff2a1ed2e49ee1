//! Conversion driver: source image in, tiles + map or metasprites out.

use crate::assemble::{MapAssembler, SpriteAssembler};
use crate::config::{ConvertConfig, Mode, SpriteGeometry, SpriteOptions};
use crate::diagnostics::{Diagnostic, ValidationResult};
use crate::error::Result;
use crate::quantize::{check_dimensions, cluster};
use crate::source::SourceImage;
use crate::tiles::{TileLibrary, MAX_TILES};
use crate::types::{Layout, PaletteTable, PixelIndexBuffer, Tile, TileHeight, TILE_WIDTH};

/// Code for an indexed band whose pixels use more than one palette.
pub const MIXED_PALETTES: &str = "gbasset::source::mixed-palettes";

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The indexed image the tiles were cut from.
    pub pixels: PixelIndexBuffer,
    /// Canonical tiles in index order.
    pub tiles: Vec<Tile>,
    /// Height of each tile in `tiles`.
    pub tile_height: TileHeight,
    pub layout: Layout,
    /// Sprite cell size, pivot and collision box (whole image for maps).
    pub geometry: SpriteGeometry,
    /// Non-fatal findings.
    pub diagnostics: ValidationResult,
}

impl Conversion {
    /// The palette table.
    pub fn palettes(&self) -> &PaletteTable {
        self.pixels.palettes()
    }
}

/// Run the whole pipeline on a decoded image.
///
/// Deterministic: the same image and settings always give the same output.
pub fn convert(source: SourceImage, config: &ConvertConfig) -> Result<Conversion> {
    let tile_height = config.effective_tile_height();
    let mut diagnostics = ValidationResult::new();

    let pixels = match source {
        SourceImage::TrueColour(image) => cluster(&image, tile_height, &mut diagnostics)?,
        SourceImage::Indexed(pixels) => {
            check_dimensions(pixels.width(), pixels.height(), tile_height)?;
            check_band_palettes(&pixels, tile_height, &mut diagnostics);
            pixels
        }
    };

    let mut library =
        TileLibrary::new(config.mirror_tiles).with_max_tiles(MAX_TILES / tile_height.slots());

    let (layout, geometry) = match config.mode {
        Mode::Map { attributes } => {
            let map = MapAssembler::new(attributes, config.default_props)
                .assemble(&pixels, &mut library)?;
            let geometry = SpriteOptions::default().resolve(pixels.width(), pixels.height());
            (Layout::Map(map), geometry)
        }
        Mode::Sprites(options) => {
            let geometry = options.resolve(pixels.width(), pixels.height());
            let sprites = SpriteAssembler::new(geometry.cells, tile_height, config.default_props)
                .assemble(&pixels, &mut library)?;
            (Layout::Sprites(sprites), geometry)
        }
    };

    Ok(Conversion {
        pixels,
        tiles: library.into_tiles(),
        tile_height,
        layout,
        geometry,
        diagnostics,
    })
}

/// Warn about 8xH bands of an indexed image that mix palettes. Only the
/// band's top-left pixel decides the palette its tile is drawn with.
fn check_band_palettes(pixels: &PixelIndexBuffer, tile_height: TileHeight, diagnostics: &mut ValidationResult) {
    let band_h = tile_height.pixels();
    for y in (0..pixels.height()).step_by(band_h as usize) {
        for x in (0..pixels.width()).step_by(TILE_WIDTH as usize) {
            let palette = pixels.palette_id(x, y);
            let mixed = (y..y + band_h)
                .flat_map(|j| (x..x + TILE_WIDTH).map(move |i| (i, j)))
                .any(|(i, j)| pixels.palette_id(i, j) != palette);
            if mixed {
                diagnostics.push(
                    Diagnostic::warning(
                        MIXED_PALETTES,
                        format!(
                            "Band ({}, {}, {}, {}) uses more than one palette; palette {} is used",
                            x, y, TILE_WIDTH, band_h, palette
                        ),
                    )
                    .with_help("Draw each 8xH band with colours from a single group of 4"),
                );
            }
        }
    }
}
