//! Deduplicating tile store with mirror detection.

use std::collections::HashMap;

use crate::error::{AssetError, Result};
use crate::types::{Mirror, Tile};

/// Largest library an 8-bit tile index can address.
pub const MAX_TILES: usize = 256;

/// Where a candidate tile ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// Index of the canonical tile.
    pub index: usize,
    /// Default properties plus any flip bits needed to draw the candidate.
    pub props: u8,
    /// The candidate was appended as a new canonical tile.
    pub inserted: bool,
}

/// Insertion-ordered set of canonical tiles.
///
/// A tile's index is the position of its first occurrence; the library only
/// ever grows during a run.
#[derive(Debug, Clone)]
pub struct TileLibrary {
    tiles: Vec<Tile>,
    lookup: HashMap<Tile, usize>,
    mirror: bool,
    max_tiles: usize,
}

impl TileLibrary {
    /// Create an empty library. With `mirror` set, candidates also match
    /// stored tiles through their X, XY and Y mirrors.
    pub fn new(mirror: bool) -> Self {
        Self {
            tiles: Vec::new(),
            lookup: HashMap::new(),
            mirror,
            max_tiles: MAX_TILES,
        }
    }

    /// Lower the number of canonical tiles allowed.
    pub fn with_max_tiles(mut self, max_tiles: usize) -> Self {
        self.max_tiles = max_tiles;
        self
    }

    /// Mirror variants tried for each lookup, in priority order.
    fn search_order(&self) -> &'static [Mirror] {
        if self.mirror {
            &Mirror::SEARCH_ORDER
        } else {
            &Mirror::SEARCH_ORDER[..1]
        }
    }

    /// Find a stored tile equal to the candidate or one of its mirrors.
    pub fn find(&self, tile: &Tile, default_props: u8) -> Option<(usize, u8)> {
        self.search_order().iter().find_map(|&mirror| {
            let variant = tile.mirrored(mirror);
            self.lookup
                .get(&variant)
                .map(|&index| (index, default_props | mirror.flags()))
        })
    }

    /// Resolve a candidate to a canonical index, appending it if new.
    pub fn resolve(&mut self, tile: Tile, default_props: u8) -> Result<Resolved> {
        if let Some((index, props)) = self.find(&tile, default_props) {
            return Ok(Resolved {
                index,
                props,
                inserted: false,
            });
        }

        if self.tiles.len() >= self.max_tiles {
            return Err(AssetError::TooManyTiles {
                max: self.max_tiles,
            });
        }

        let index = self.tiles.len();
        self.lookup.insert(tile.clone(), index);
        self.tiles.push(tile);

        Ok(Resolved {
            index,
            props: default_props,
            inserted: true,
        })
    }

    /// Canonical tiles in index order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Number of canonical tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Check if the library is empty.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Take the canonical tiles out of the library.
    pub fn into_tiles(self) -> Vec<Tile> {
        self.tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FLIP_X, FLIP_Y};

    fn asymmetric(palette: u8) -> Tile {
        let mut rows = [[0u8; 8]; 8];
        rows[0] = [3, 2, 1, 0, 0, 0, 0, 0];
        rows[7] = [0, 0, 0, 0, 0, 0, 0, 1];
        Tile::from_indices(&rows, palette)
    }

    #[test]
    fn test_resolve_same_tile_twice() {
        let mut library = TileLibrary::new(true);

        let first = library.resolve(asymmetric(0), 0).unwrap();
        let second = library.resolve(asymmetric(0), 0).unwrap();

        assert_eq!(first.index, 0);
        assert!(first.inserted);
        assert_eq!(second.index, 0);
        assert!(!second.inserted);
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_resolve_mirrors() {
        let mut library = TileLibrary::new(true);
        let tile = asymmetric(0);
        library.resolve(tile.clone(), 0).unwrap();

        let x = library.resolve(tile.flipped_x(), 0).unwrap();
        let y = library.resolve(tile.flipped_y(), 0).unwrap();
        let xy = library.resolve(tile.flipped_x().flipped_y(), 0).unwrap();

        assert_eq!((x.index, x.props), (0, FLIP_X));
        assert_eq!((y.index, y.props), (0, FLIP_Y));
        assert_eq!((xy.index, xy.props), (0, FLIP_X | FLIP_Y));
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_resolve_without_mirroring() {
        let mut library = TileLibrary::new(false);
        let tile = asymmetric(0);

        library.resolve(tile.clone(), 0).unwrap();
        let x = library.resolve(tile.flipped_x(), 0).unwrap();
        let y = library.resolve(tile.flipped_y(), 0).unwrap();
        let xy = library.resolve(tile.flipped_x().flipped_y(), 0).unwrap();

        assert_eq!((x.index, y.index, xy.index), (1, 2, 3));
        assert!(x.inserted && y.inserted && xy.inserted);
        assert_eq!(x.props, 0);
        assert_eq!(library.len(), 4);
    }

    #[test]
    fn test_exact_match_wins_over_mirror() {
        // Horizontally symmetric tile: identity and X mirror both match
        let tile = Tile::from_indices(&[[1, 0, 0, 0, 0, 0, 0, 1]; 8], 0);
        let mut library = TileLibrary::new(true);
        library.resolve(tile.clone(), 0).unwrap();

        let again = library.resolve(tile, 0).unwrap();
        assert_eq!(again.props, 0);
    }

    #[test]
    fn test_default_props_are_kept() {
        let mut library = TileLibrary::new(true);
        let tile = asymmetric(0);

        let new = library.resolve(tile.clone(), 0x80).unwrap();
        let flipped = library.resolve(tile.flipped_y(), 0x80).unwrap();

        assert_eq!(new.props, 0x80);
        assert_eq!(flipped.props, 0x80 | FLIP_Y);
    }

    #[test]
    fn test_palette_makes_tiles_distinct() {
        let mut library = TileLibrary::new(true);

        let a = library.resolve(asymmetric(0), 0).unwrap();
        let b = library.resolve(asymmetric(1), 0).unwrap();

        assert_ne!(a.index, b.index);
        assert_eq!(library.tiles()[1].palette, 1);
    }

    #[test]
    fn test_library_full() {
        let mut library = TileLibrary::new(false).with_max_tiles(2);
        library.resolve(Tile::from_indices(&[[0; 8]; 8], 0), 0).unwrap();
        library.resolve(Tile::from_indices(&[[1; 8]; 8], 0), 0).unwrap();

        // Existing tiles still resolve
        assert!(library.resolve(Tile::from_indices(&[[1; 8]; 8], 0), 0).is_ok());

        let err = library
            .resolve(Tile::from_indices(&[[2; 8]; 8], 0), 0)
            .unwrap_err();
        assert!(err.is_capacity_exceeded());
    }
}
