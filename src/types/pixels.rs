//! Indexed pixel buffer shared by the encoder and both assemblers.

use super::{Colour, PaletteTable};

/// An indexed image: one combined `(palette << 2) | colour` byte per pixel
/// plus the palette table those bytes refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelIndexBuffer {
    width: u32,
    height: u32,
    indices: Vec<u8>,
    palettes: PaletteTable,
}

impl PixelIndexBuffer {
    /// Create a buffer from row-major indices.
    pub fn new(width: u32, height: u32, indices: Vec<u8>, palettes: PaletteTable) -> Self {
        debug_assert_eq!(indices.len(), width as usize * height as usize);
        Self {
            width,
            height,
            indices,
            palettes,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The palette table.
    pub fn palettes(&self) -> &PaletteTable {
        &self.palettes
    }

    /// Raw combined index at a position.
    pub fn index(&self, x: u32, y: u32) -> u8 {
        self.indices[(y * self.width + x) as usize]
    }

    /// 2-bit colour index (0-3) within the pixel's palette.
    pub fn colour_index(&self, x: u32, y: u32) -> u8 {
        self.index(x, y) & 3
    }

    /// Palette id of the pixel.
    pub fn palette_id(&self, x: u32, y: u32) -> u8 {
        self.index(x, y) >> 2
    }

    /// Reconstructed colour of the pixel.
    pub fn colour(&self, x: u32, y: u32) -> Option<Colour> {
        self.palettes.colour(self.index(x, y))
    }

    /// Row-major index bytes.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }
}
