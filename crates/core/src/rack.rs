//! Tile rack render model - the remaining tiles, replaced wholesale

use arrayvec::ArrayVec;
use tracing::warn;
use wordboard_types::{Tile, TOTAL_TILES};

/// Ordered remaining tiles. At most a full bag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileRack {
    tiles: ArrayVec<Tile, TOTAL_TILES>,
}

impl TileRack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rack contents, keeping order. Tiles beyond a full bag are dropped.
    pub fn replace_all<I>(&mut self, tiles: I)
    where
        I: IntoIterator<Item = Tile>,
    {
        self.tiles.clear();
        let mut dropped = 0usize;
        for tile in tiles {
            if self.tiles.try_push(tile).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            warn!(dropped, "rack overflow; extra tiles dropped");
        }
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn total_points(&self) -> u32 {
        self.tiles.iter().map(|t| t.point_value).sum()
    }

    /// Space-separated tile labels, blanks spelled out.
    pub fn listing(&self) -> String {
        self.tiles
            .iter()
            .map(Tile::label)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_keeps_order() {
        let mut rack = TileRack::new();
        rack.replace_all([Tile::new('B', 3), Tile::blank(), Tile::new('A', 1)]);
        let letters: Vec<char> = rack.tiles().iter().map(|t| t.letter).collect();
        assert_eq!(letters, vec!['B', ' ', 'A']);
        assert_eq!(rack.total_points(), 4);
        assert_eq!(rack.listing(), "B BLANK A");

        rack.replace_all([Tile::new('Z', 10)]);
        assert_eq!(rack.len(), 1);
        rack.clear();
        assert!(rack.is_empty());
    }

    #[test]
    fn overflow_is_capped() {
        let mut rack = TileRack::new();
        rack.replace_all(std::iter::repeat(Tile::new('E', 1)).take(TOTAL_TILES + 5));
        assert_eq!(rack.len(), TOTAL_TILES);
    }
}
