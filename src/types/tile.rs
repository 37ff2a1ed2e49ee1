//! 2bpp tiles and their mirror transforms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute bit set when a tile is drawn mirrored left-to-right.
pub const FLIP_X: u8 = 0x20;

/// Attribute bit set when a tile is drawn mirrored top-to-bottom.
pub const FLIP_Y: u8 = 0x40;

/// Tile width in pixels. Fixed by the hardware.
pub const TILE_WIDTH: u32 = 8;

/// Height of a hardware tile (or of a sprite in 8x16 mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TileHeight {
    Eight,
    Sixteen,
}

impl TileHeight {
    /// Height in pixels.
    pub fn pixels(self) -> u32 {
        match self {
            TileHeight::Eight => 8,
            TileHeight::Sixteen => 16,
        }
    }

    /// Number of bytes in a packed tile of this height.
    pub fn byte_len(self) -> usize {
        self.pixels() as usize * 2
    }

    /// How many 8x8 hardware slots one tile of this height occupies.
    pub fn slots(self) -> usize {
        self.pixels() as usize / 8
    }
}

impl TryFrom<u32> for TileHeight {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(TileHeight::Eight),
            16 => Ok(TileHeight::Sixteen),
            other => Err(format!("tile height must be 8 or 16, got {}", other)),
        }
    }
}

impl From<TileHeight> for u32 {
    fn from(height: TileHeight) -> Self {
        height.pixels()
    }
}

impl fmt::Display for TileHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "8x{}", self.pixels())
    }
}

/// A packed 8xH tile: one low and one high bit-plane byte per row.
///
/// Bit `7 - i` of a row's low/high byte holds bit 0/1 of the colour index of
/// column `i`. Two tiles are equal only if their bytes and palette match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    data: Vec<u8>,
    /// Palette id carried with the tile, or 0 when palettes live elsewhere.
    pub palette: u8,
}

impl Tile {
    /// Wrap already packed bit-plane bytes.
    pub fn from_bytes(data: Vec<u8>, palette: u8) -> Self {
        debug_assert!(data.len() % 2 == 0, "tile rows come in byte pairs");
        Self { data, palette }
    }

    /// Pack rows of 2-bit colour indices (one entry per pixel, 8 per row).
    pub fn from_indices(rows: &[[u8; 8]], palette: u8) -> Self {
        let mut data = Vec::with_capacity(rows.len() * 2);
        for row in rows {
            let (low, high) = pack_row(row);
            data.push(low);
            data.push(high);
        }
        Self { data, palette }
    }

    /// The packed bytes, two per row.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of pixel rows.
    pub fn height(&self) -> usize {
        self.data.len() / 2
    }

    /// True if every pixel uses colour index 0.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Unpack back into 2-bit colour indices, one row of 8 per pixel row.
    pub fn indices(&self) -> Vec<[u8; 8]> {
        self.data
            .chunks_exact(2)
            .map(|pair| {
                let mut row = [0u8; 8];
                for (i, px) in row.iter_mut().enumerate() {
                    let shift = 7 - i;
                    *px = ((pair[0] >> shift) & 1) | (((pair[1] >> shift) & 1) << 1);
                }
                row
            })
            .collect()
    }

    /// Mirror left-to-right: every byte has its bit order reversed.
    pub fn flipped_x(&self) -> Self {
        Self {
            data: self.data.iter().map(|b| b.reverse_bits()).collect(),
            palette: self.palette,
        }
    }

    /// Mirror top-to-bottom: rows swap places, each byte pair moving as a unit.
    pub fn flipped_y(&self) -> Self {
        Self {
            data: self
                .data
                .chunks_exact(2)
                .rev()
                .flat_map(|pair| [pair[0], pair[1]])
                .collect(),
            palette: self.palette,
        }
    }

    /// Apply one of the four mirror variants.
    pub fn mirrored(&self, mirror: Mirror) -> Self {
        match mirror {
            Mirror::None => self.clone(),
            Mirror::X => self.flipped_x(),
            Mirror::XY => self.flipped_x().flipped_y(),
            Mirror::Y => self.flipped_y(),
        }
    }
}

/// Pack one row of 8 colour indices into its (low, high) bit-plane bytes.
fn pack_row(row: &[u8; 8]) -> (u8, u8) {
    let mut low = 0u8;
    let mut high = 0u8;
    for (i, &colour) in row.iter().enumerate() {
        low |= (colour & 1) << (7 - i);
        high |= ((colour >> 1) & 1) << (7 - i);
    }
    (low, high)
}

/// One of the four symmetric variants of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mirror {
    None,
    X,
    XY,
    Y,
}

impl Mirror {
    /// Lookup order used when matching a candidate against stored tiles.
    pub const SEARCH_ORDER: [Mirror; 4] = [Mirror::None, Mirror::X, Mirror::XY, Mirror::Y];

    /// Attribute bits telling the hardware to undo this mirror.
    pub fn flags(self) -> u8 {
        match self {
            Mirror::None => 0,
            Mirror::X => FLIP_X,
            Mirror::XY => FLIP_X | FLIP_Y,
            Mirror::Y => FLIP_Y,
        }
    }
}
