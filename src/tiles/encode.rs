//! Block to bit-plane tile encoding.

use crate::types::{PixelIndexBuffer, Tile, TileHeight, TILE_WIDTH};

/// A tile read out of the image, plus whether it is fully blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTile {
    pub tile: Tile,
    /// Every packed byte is zero (all pixels use colour 0).
    pub blank: bool,
}

/// Encode the 8xH block whose top-left corner is `(x, y)`.
///
/// The tile's palette is left at 0; callers that store palettes per tile
/// set it afterwards.
pub fn encode_tile(pixels: &PixelIndexBuffer, x: u32, y: u32, height: TileHeight) -> EncodedTile {
    let mut data = Vec::with_capacity(height.byte_len());
    let mut blank = true;

    for j in 0..height.pixels() {
        let mut low = 0u8;
        let mut high = 0u8;
        for i in 0..TILE_WIDTH {
            let colour = pixels.colour_index(x + i, y + j);
            low |= (colour & 1) << (7 - i);
            high |= ((colour >> 1) & 1) << (7 - i);
        }
        blank = blank && low == 0 && high == 0;
        data.push(low);
        data.push(high);
    }

    EncodedTile {
        tile: Tile::from_bytes(data, 0),
        blank,
    }
}
