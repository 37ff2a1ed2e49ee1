//! Sorted colour set used for palette bands.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::types::Colour;

/// Wrapper giving `Colour` the palette ordering as its `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PaletteKey(Colour);

impl Ord for PaletteKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.palette_order(&other.0)
    }
}

impl PartialOrd for PaletteKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A set of distinct colours kept in palette order: most transparent first,
/// then brightest to darkest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColourSet {
    colours: BTreeSet<PaletteKey>,
}

impl ColourSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a colour. Returns false if it was already present.
    pub fn insert(&mut self, colour: Colour) -> bool {
        self.colours.insert(PaletteKey(colour))
    }

    /// Number of distinct colours.
    pub fn len(&self) -> usize {
        self.colours.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Union of two sets.
    pub fn union(&self, other: &ColourSet) -> ColourSet {
        ColourSet {
            colours: self.colours.union(&other.colours).copied().collect(),
        }
    }

    /// Position of a colour in palette order.
    pub fn position(&self, colour: Colour) -> Option<usize> {
        let key = PaletteKey(colour);
        if !self.colours.contains(&key) {
            return None;
        }
        Some(self.colours.range(..key).count())
    }

    /// Iterate colours in palette order.
    pub fn iter(&self) -> impl Iterator<Item = Colour> + '_ {
        self.colours.iter().map(|key| key.0)
    }
}

impl FromIterator<Colour> for ColourSet {
    fn from_iter<I: IntoIterator<Item = Colour>>(iter: I) -> Self {
        let mut set = ColourSet::new();
        for colour in iter {
            set.insert(colour);
        }
        set
    }
}
