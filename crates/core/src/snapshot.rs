//! Authoritative end state of a generated puzzle.

use arrayvec::ArrayVec;
use wordboard_types::{letter_count, letter_points, Tile, BLANK_LETTER, BOARD_SIZE, TOTAL_TILES};

use crate::board::PlacedTile;

/// One cell of a snapshot grid
pub type SnapshotCell = Option<PlacedTile>;

pub type SnapshotGrid = [[SnapshotCell; BOARD_SIZE as usize]; BOARD_SIZE as usize];

/// Placed and remaining counts as reported by the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PuzzleStats {
    pub placed_tile_count: u32,
    pub remaining_tile_count: u32,
}

/// Ways a snapshot's counts can disagree with its own contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// placed + remaining is not the size of a full bag
    BagSize { total: u64 },
    /// Occupied cells differ from `placed_tile_count`
    PlacedCount { reported: u32, occupied: u32 },
    /// Remaining tile list length differs from `remaining_tile_count`
    RemainingCount { reported: u32, listed: u32 },
    /// Board and rack together hold more of a letter than a full bag has
    LetterCount { letter: char, seen: u32, allowed: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleSnapshot {
    pub cells: SnapshotGrid,
    pub remaining_tiles: Vec<Tile>,
    pub placed_tile_count: u32,
    pub remaining_tile_count: u32,
}

impl Default for PuzzleSnapshot {
    fn default() -> Self {
        Self {
            cells: [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize],
            remaining_tiles: Vec::new(),
            placed_tile_count: 0,
            remaining_tile_count: 0,
        }
    }
}

impl PuzzleSnapshot {
    pub fn cell(&self, row: u8, col: u8) -> Option<SnapshotCell> {
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    pub fn stats(&self) -> PuzzleStats {
        PuzzleStats {
            placed_tile_count: self.placed_tile_count,
            remaining_tile_count: self.remaining_tile_count,
        }
    }

    /// Count mismatches. The snapshot is still applied as-is; callers only log these.
    ///
    /// Only the first letter over its bag count is reported.
    pub fn consistency_issues(&self) -> ArrayVec<ConsistencyIssue, 4> {
        let mut issues = ArrayVec::new();
        // counts come straight off the wire and may be anything
        let total = u64::from(self.placed_tile_count) + u64::from(self.remaining_tile_count);
        if total != TOTAL_TILES as u64 {
            issues.push(ConsistencyIssue::BagSize { total });
        }
        let occupied = self.occupied_count() as u32;
        if occupied != self.placed_tile_count {
            issues.push(ConsistencyIssue::PlacedCount {
                reported: self.placed_tile_count,
                occupied,
            });
        }
        let listed = self.remaining_tiles.len() as u32;
        if listed != self.remaining_tile_count {
            issues.push(ConsistencyIssue::RemainingCount {
                reported: self.remaining_tile_count,
                listed,
            });
        }
        if let Some(issue) = self.letter_overflow() {
            issues.push(issue);
        }
        issues
    }

    fn letter_overflow(&self) -> Option<ConsistencyIssue> {
        // index 0..26 for A..Z, 26 for blanks
        let mut seen = [0u32; 27];
        let board = self
            .cells
            .iter()
            .flatten()
            .flatten()
            .map(|t| (t.letter, t.points));
        let rack = self.remaining_tiles.iter().map(|t| (t.letter, t.point_value));
        for (letter, points) in board.chain(rack) {
            // a blank laid on the board carries a letter but scores nothing
            let slot = if letter == BLANK_LETTER || (points == 0 && letter_points(letter) > 0) {
                26
            } else if letter.is_ascii_alphabetic() {
                (letter.to_ascii_uppercase() as u8 - b'A') as usize
            } else {
                continue;
            };
            seen[slot] = seen[slot].saturating_add(1);
        }
        seen.iter().enumerate().find_map(|(slot, &count)| {
            let letter = if slot == 26 {
                BLANK_LETTER
            } else {
                (b'A' + slot as u8) as char
            };
            let allowed = letter_count(letter);
            (count > allowed).then_some(ConsistencyIssue::LetterCount {
                letter,
                seen: count,
                allowed,
            })
        })
    }
}
