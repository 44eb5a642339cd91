//! Board module - render model of the 15x15 grid
//!
//! Each cell has an immutable premium category (from [`crate::geometry`]) and
//! an optional placed tile. Uses flat arrays, row-major (`row * 15 + col`).
//! Coordinates: (row, col), both 0..=14, (0, 0) at the top-left.
//!
//! Occupancy only grows while a puzzle is being played back; [`BoardModel::reset`]
//! is the only way to empty cells.

use std::hash::{Hash, Hasher};

use tracing::warn;
use wordboard_types::{CellCategory, BOARD_CELLS, BOARD_SIZE};

use crate::geometry;
use crate::snapshot::{PuzzleSnapshot, SnapshotCell};

/// A tile sitting on the board together with the multipliers it was scored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlacedTile {
    pub letter: char,
    pub points: u32,
    pub letter_multiplier: u8,
    pub word_multiplier: u8,
}

impl PlacedTile {
    pub const fn new(letter: char, points: u32, letter_multiplier: u8, word_multiplier: u8) -> Self {
        Self {
            letter,
            points,
            letter_multiplier,
            word_multiplier,
        }
    }

    /// Both multipliers are within 1..=3
    pub fn has_valid_multipliers(&self) -> bool {
        (1..=3).contains(&self.letter_multiplier) && (1..=3).contains(&self.word_multiplier)
    }
}

/// Read-only view of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardCell {
    pub row: u8,
    pub col: u8,
    pub category: CellCategory,
    pub tile: Option<PlacedTile>,
}

impl BoardCell {
    pub fn is_occupied(&self) -> bool {
        self.tile.is_some()
    }

    /// Letter multiplier shown for the cell; neutral when empty.
    pub fn letter_multiplier(&self) -> u8 {
        self.tile.map(|t| t.letter_multiplier).unwrap_or(1)
    }

    /// Word multiplier shown for the cell; neutral when empty.
    pub fn word_multiplier(&self) -> u8 {
        self.tile.map(|t| t.word_multiplier).unwrap_or(1)
    }
}

/// Stable 64-bit FNV-1a hasher.
///
/// `DefaultHasher` output is not stable across Rust versions, so fingerprints
/// would not be comparable between builds.
#[derive(Debug, Clone)]
pub(crate) struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub(crate) fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// The board render model - 15 x 15 cells in flat arrays
#[derive(Debug, Clone, PartialEq)]
pub struct BoardModel {
    categories: [CellCategory; BOARD_CELLS],
    tiles: [Option<PlacedTile>; BOARD_CELLS],
}

impl Default for BoardModel {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardModel {
    /// Create an empty board with categories from the geometry table
    pub fn new() -> Self {
        let mut categories = [CellCategory::Ordinary; BOARD_CELLS];
        for (idx, category) in categories.iter_mut().enumerate() {
            let row = (idx / BOARD_SIZE as usize) as u8;
            let col = (idx % BOARD_SIZE as usize) as u8;
            *category = geometry::classify(row, col).unwrap_or(CellCategory::Ordinary);
        }
        Self {
            categories,
            tiles: [None; BOARD_CELLS],
        }
    }

    #[inline(always)]
    fn index(row: u8, col: u8) -> Option<usize> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        Some(row as usize * BOARD_SIZE as usize + col as usize)
    }

    /// Clear every tile. Categories are untouched.
    pub fn reset(&mut self) {
        self.tiles = [None; BOARD_CELLS];
    }

    /// Place a tile, overwriting whatever the cell held.
    ///
    /// Returns false (and changes nothing) if the coordinates are off the
    /// board or a multiplier is outside 1..=3.
    pub fn apply_placement(
        &mut self,
        row: u8,
        col: u8,
        letter: char,
        points: u32,
        letter_multiplier: u8,
        word_multiplier: u8,
    ) -> bool {
        let tile = PlacedTile::new(letter, points, letter_multiplier, word_multiplier);
        self.place(row, col, tile)
    }

    /// Same as [`BoardModel::apply_placement`] with a prebuilt tile.
    pub fn place(&mut self, row: u8, col: u8, tile: PlacedTile) -> bool {
        let Some(idx) = Self::index(row, col) else {
            warn!(row, col, "ignoring placement outside the board");
            return false;
        };
        if !tile.has_valid_multipliers() {
            warn!(
                row,
                col,
                letter_multiplier = tile.letter_multiplier,
                word_multiplier = tile.word_multiplier,
                "ignoring placement with invalid multipliers"
            );
            return false;
        }
        self.tiles[idx] = Some(tile);
        true
    }

    /// Replace one row with the authoritative snapshot state.
    ///
    /// Returns false if `row_index` is off the board or `row_cells` is not
    /// exactly one row wide; the board is left untouched in that case.
    pub fn apply_snapshot_row(&mut self, row_index: u8, row_cells: &[SnapshotCell]) -> bool {
        if row_index >= BOARD_SIZE || row_cells.len() != BOARD_SIZE as usize {
            warn!(
                row_index,
                width = row_cells.len(),
                "ignoring snapshot row with bad shape"
            );
            return false;
        }
        let start = row_index as usize * BOARD_SIZE as usize;
        self.tiles[start..start + BOARD_SIZE as usize].copy_from_slice(row_cells);
        true
    }

    /// Replace the whole board with the snapshot, row by row
    pub fn apply_snapshot(&mut self, snapshot: &PuzzleSnapshot) {
        for (r, row) in snapshot.cells.iter().enumerate() {
            self.apply_snapshot_row(r as u8, row);
        }
    }

    /// Get cell at (row, col). Returns None if out of bounds
    pub fn get(&self, row: u8, col: u8) -> Option<BoardCell> {
        Self::index(row, col).map(|idx| BoardCell {
            row,
            col,
            category: self.categories[idx],
            tile: self.tiles[idx],
        })
    }

    pub fn tile(&self, row: u8, col: u8) -> Option<PlacedTile> {
        Self::index(row, col).and_then(|idx| self.tiles[idx])
    }

    pub fn category(&self, row: u8, col: u8) -> Option<CellCategory> {
        Self::index(row, col).map(|idx| self.categories[idx])
    }

    pub fn is_occupied(&self, row: u8, col: u8) -> bool {
        self.tile(row, col).is_some()
    }

    pub fn occupied_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }

    /// Tiles of each row, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Option<PlacedTile>]> {
        self.tiles.chunks_exact(BOARD_SIZE as usize)
    }

    /// All cells, row-major
    pub fn cells(&self) -> impl Iterator<Item = BoardCell> + '_ {
        (0..BOARD_CELLS).map(move |idx| BoardCell {
            row: (idx / BOARD_SIZE as usize) as u8,
            col: (idx % BOARD_SIZE as usize) as u8,
            category: self.categories[idx],
            tile: self.tiles[idx],
        })
    }

    /// Stable fingerprint of the occupancy. Equal boards hash equal across runs.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Fnv1aHasher::new();
        self.tiles.hash(&mut hasher);
        hasher.finish()
    }
}
