//! Palette table: up to 8 groups of 4 colours.

use serde::{Deserialize, Serialize};

use super::Colour;

/// Colours per hardware palette.
pub const COLOURS_PER_PALETTE: usize = 4;

/// Palettes available to backgrounds (and to CGB sprites).
pub const MAX_PALETTES: usize = 8;

/// Ordered sequence of 4-colour palettes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaletteTable {
    groups: Vec<[Colour; COLOURS_PER_PALETTE]>,
}

impl PaletteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a palette, padding it with transparent entries up to 4 colours.
    pub fn push(&mut self, colours: &[Colour]) {
        debug_assert!(colours.len() <= COLOURS_PER_PALETTE);
        let mut group = [Colour::TRANSPARENT; COLOURS_PER_PALETTE];
        for (slot, &colour) in group.iter_mut().zip(colours) {
            *slot = colour;
        }
        self.groups.push(group);
    }

    /// Build a table from a flat colour list, 4 entries per palette.
    pub fn from_flat(colours: &[Colour]) -> Self {
        let mut table = Self::new();
        for chunk in colours.chunks(COLOURS_PER_PALETTE) {
            table.push(chunk);
        }
        table
    }

    /// Get a palette group.
    pub fn get(&self, palette: usize) -> Option<&[Colour; COLOURS_PER_PALETTE]> {
        self.groups.get(palette)
    }

    /// Look up the colour for a combined `(palette << 2) | colour` index.
    pub fn colour(&self, index: u8) -> Option<Colour> {
        self.groups
            .get((index >> 2) as usize)
            .map(|group| group[(index & 3) as usize])
    }

    /// Number of palettes.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if there are no palettes.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of colour entries (always a multiple of 4).
    pub fn colour_count(&self) -> usize {
        self.groups.len() * COLOURS_PER_PALETTE
    }

    /// Iterate over the palette groups.
    pub fn iter(&self) -> impl Iterator<Item = &[Colour; COLOURS_PER_PALETTE]> {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pads_short_palette() {
        let mut table = PaletteTable::new();
        table.push(&[Colour::WHITE, Colour::BLACK]);

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get(0).unwrap(),
            &[Colour::WHITE, Colour::BLACK, Colour::TRANSPARENT, Colour::TRANSPARENT]
        );
        assert_eq!(table.colour_count(), 4);
    }

    #[test]
    fn test_from_flat_groups_by_four() {
        let colours: Vec<Colour> = (0..6).map(|i| Colour::rgb(i, i, i)).collect();
        let table = PaletteTable::from_flat(&colours);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1).unwrap()[1], Colour::rgb(5, 5, 5));
        assert_eq!(table.get(1).unwrap()[2], Colour::TRANSPARENT);
    }

    #[test]
    fn test_colour_lookup() {
        let mut table = PaletteTable::new();
        table.push(&[Colour::BLACK]);
        table.push(&[Colour::TRANSPARENT, Colour::WHITE]);

        assert_eq!(table.colour(0), Some(Colour::BLACK));
        assert_eq!(table.colour((1 << 2) | 1), Some(Colour::WHITE));
        assert_eq!(table.colour(2 << 2), None);
    }
}
