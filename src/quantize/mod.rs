//! Palette clustering for true-colour images.
//!
//! The image is scanned in 8xH bands (H = tile height). Each band may use at
//! most 4 colours, and every band must fit one of at most 8 accumulated
//! palettes. The result is an indexed `PixelIndexBuffer`.

mod colour_set;

pub use colour_set::ColourSet;

use image::RgbaImage;

use crate::diagnostics::{Diagnostic, ValidationResult, MULTIPLE_TRANSPARENT};
use crate::error::{AssetError, Result};
use crate::types::{
    Colour, PaletteTable, PixelIndexBuffer, TileHeight, COLOURS_PER_PALETTE, MAX_PALETTES,
    TILE_WIDTH,
};

/// Check that an image splits into whole 8xH bands.
pub fn check_dimensions(width: u32, height: u32, tile_height: TileHeight) -> Result<()> {
    let h = tile_height.pixels();
    if width == 0 || height == 0 || width % TILE_WIDTH != 0 || height % h != 0 {
        return Err(AssetError::InvalidDimensions {
            width,
            height,
            tile_height: h,
        });
    }
    Ok(())
}

/// Distinct colours inside a rectangle of the image.
pub fn band_colours(image: &RgbaImage, x: u32, y: u32, width: u32, height: u32) -> ColourSet {
    let mut set = ColourSet::new();
    for j in y..y + height {
        for i in x..x + width {
            set.insert(Colour::from_rgba(image.get_pixel(i, j).0));
        }
    }
    set
}

/// Run-scoped palette accumulator.
///
/// Holds the palettes built so far and which palette each band was given.
#[derive(Debug, Default)]
pub struct PaletteClusterer {
    palettes: Vec<ColourSet>,
    band_palettes: Vec<usize>,
}

impl PaletteClusterer {
    /// Create an empty clusterer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Palettes accumulated so far, in creation order.
    pub fn palettes(&self) -> &[ColourSet] {
        &self.palettes
    }

    /// Palette assigned to each band so far, in raster order.
    pub fn band_palettes(&self) -> &[usize] {
        &self.band_palettes
    }

    /// Assign a band's colours to a palette and record the choice.
    ///
    /// The first palette whose union with the band stays within 4 colours
    /// wins. A palette that is already full is only matched, never grown.
    /// `(x, y)` locate the band for error reporting.
    pub fn assign(&mut self, band: &ColourSet, x: u32, y: u32) -> Result<usize> {
        let mut found = None;
        for (i, palette) in self.palettes.iter_mut().enumerate() {
            let merged = palette.union(band);
            if merged.len() <= COLOURS_PER_PALETTE {
                if palette.len() < COLOURS_PER_PALETTE {
                    *palette = merged;
                }
                found = Some(i);
                break;
            }
        }

        let index = match found {
            Some(i) => i,
            None => {
                if self.palettes.len() == MAX_PALETTES {
                    return Err(AssetError::TooManyPalettes { x, y });
                }
                self.palettes.push(band.clone());
                self.palettes.len() - 1
            }
        };

        self.band_palettes.push(index);
        Ok(index)
    }

    /// Build the final palette table.
    pub fn palette_table(&self) -> PaletteTable {
        let mut table = PaletteTable::new();
        for palette in &self.palettes {
            let colours: Vec<Colour> = palette.iter().collect();
            table.push(&colours);
        }
        table
    }
}

/// Quantize a true-colour image into an indexed buffer.
///
/// Fails with a capacity error if a band needs more than 4 colours or the
/// image needs more than 8 palettes. A band with more than one non-opaque
/// colour only adds a warning to `diagnostics`.
pub fn cluster(
    image: &RgbaImage,
    tile_height: TileHeight,
    diagnostics: &mut ValidationResult,
) -> Result<PixelIndexBuffer> {
    let (width, height) = image.dimensions();
    check_dimensions(width, height, tile_height)?;

    let band_h = tile_height.pixels();
    let bands_per_row = width / TILE_WIDTH;
    let mut clusterer = PaletteClusterer::new();

    for y in (0..height).step_by(band_h as usize) {
        for x in (0..width).step_by(TILE_WIDTH as usize) {
            let band = band_colours(image, x, y, TILE_WIDTH, band_h);
            if band.len() > COLOURS_PER_PALETTE {
                return Err(AssetError::TooManyColours {
                    x,
                    y,
                    width: TILE_WIDTH,
                    height: band_h,
                    found: band.len(),
                });
            }

            // Only the first (lowest alpha) colour may be transparent
            if band.iter().skip(1).any(|c| !c.is_opaque()) {
                diagnostics.push(
                    Diagnostic::warning(
                        MULTIPLE_TRANSPARENT,
                        format!(
                            "More than one transparent colour on ({}, {}, {}, {})",
                            x, y, TILE_WIDTH, band_h
                        ),
                    )
                    .with_help("Only the first colour of each palette is drawn transparent"),
                );
            }

            clusterer.assign(&band, x, y)?;
        }
    }

    let mut indices = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let band = ((y / band_h) * bands_per_row + x / TILE_WIDTH) as usize;
            let palette = clusterer.band_palettes[band];
            let colour = Colour::from_rgba(image.get_pixel(x, y).0);
            let position = clusterer.palettes[palette]
                .position(colour)
                .ok_or_else(|| AssetError::Build {
                    message: format!("Colour {} at ({}, {}) missing from palette {}", colour, x, y, palette),
                    help: None,
                })?;
            indices.push(((palette as u8) << 2) | position as u8);
        }
    }

    Ok(PixelIndexBuffer::new(
        width,
        height,
        indices,
        clusterer.palette_table(),
    ))
}
