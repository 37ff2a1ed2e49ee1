//! Colour type and ordering rules for quantized palettes.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An RGBA colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Fully transparent colour. Also used to pad short palettes.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Build from an `[r, g, b, a]` array.
    pub const fn from_rgba(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0], rgba[1], rgba[2], rgba[3])
    }

    /// Convert to RGBA tuple.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// The colour packed as `0xRRGGBBAA`.
    pub fn packed(self) -> u32 {
        u32::from_be_bytes(self.to_rgba())
    }

    /// Integer grey level used to order opaque colours light to dark.
    pub fn luminance(self) -> u32 {
        (self.r as f32 * 0.299 + self.g as f32 * 0.587 + self.b as f32 * 0.114) as u32
    }

    /// Check if the colour is fully opaque.
    pub fn is_opaque(self) -> bool {
        self.a == 255
    }

    /// The 5-bit-per-channel components written to CGB palette tables.
    pub fn to_rgb555(self) -> (u8, u8, u8) {
        (self.r >> 3, self.g >> 3, self.b >> 3)
    }

    /// Ordering used inside a palette group.
    ///
    /// Lowest alpha first so the transparent colour lands on index 0, then
    /// brightest first so a DMG shade ramp 00 01 10 11 reads light to dark.
    /// The packed value breaks the remaining ties.
    pub fn palette_order(&self, other: &Self) -> Ordering {
        self.a
            .cmp(&other.a)
            .then_with(|| other.luminance().cmp(&self.luminance()))
            .then_with(|| self.packed().cmp(&other.packed()))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}
