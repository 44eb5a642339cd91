//! Board geometry - premium cell classification
//!
//! Classification is an ordered rule table evaluated top to bottom, first
//! match wins:
//!
//! | Order | Category | Cells |
//! |-------|----------|-------|
//! | 1 | Center | (7, 7) |
//! | 2 | TripleWord | corners and edge midpoints (8) |
//! | 3 | DoubleWord | both diagonals, rows 1-13 (25, includes center) |
//! | 4 | TripleLetter | 12 cells (4 of them also on the diagonals) |
//! | 5 | DoubleLetter | 24 cells (4 of them also on the diagonals) |
//! | 6 | Ordinary | everything else |
//!
//! The coordinate lists overlap: the diagonals cross four triple-letter and
//! four double-letter cells, and the center appears in the double-word list.
//! Precedence resolves each cell to exactly one category.

use wordboard_types::{CellCategory, BOARD_SIZE, CENTER_COL, CENTER_ROW};

/// One row of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct GeometryRule {
    pub category: CellCategory,
    pub cells: &'static [(u8, u8)],
}

const CENTER_CELLS: [(u8, u8); 1] = [(CENTER_ROW, CENTER_COL)];

const TRIPLE_WORD_CELLS: [(u8, u8); 8] = [
    (0, 0),
    (0, 7),
    (0, 14),
    (7, 0),
    (7, 14),
    (14, 0),
    (14, 7),
    (14, 14),
];

const DOUBLE_WORD_CELLS: [(u8, u8); 25] = [
    (1, 1),
    (2, 2),
    (3, 3),
    (4, 4),
    (5, 5),
    (6, 6),
    (7, 7),
    (8, 8),
    (9, 9),
    (10, 10),
    (11, 11),
    (12, 12),
    (13, 13),
    (1, 13),
    (2, 12),
    (3, 11),
    (4, 10),
    (5, 9),
    (6, 8),
    (8, 6),
    (9, 5),
    (10, 4),
    (11, 3),
    (12, 2),
    (13, 1),
];

const TRIPLE_LETTER_CELLS: [(u8, u8); 12] = [
    (1, 5),
    (1, 9),
    (5, 1),
    (5, 5),
    (5, 9),
    (5, 13),
    (9, 1),
    (9, 5),
    (9, 9),
    (9, 13),
    (13, 5),
    (13, 9),
];

const DOUBLE_LETTER_CELLS: [(u8, u8); 24] = [
    (0, 3),
    (0, 11),
    (2, 6),
    (2, 8),
    (3, 0),
    (3, 7),
    (3, 14),
    (6, 2),
    (6, 6),
    (6, 8),
    (6, 12),
    (7, 3),
    (7, 11),
    (8, 2),
    (8, 6),
    (8, 8),
    (8, 12),
    (11, 0),
    (11, 7),
    (11, 14),
    (12, 6),
    (12, 8),
    (14, 3),
    (14, 11),
];

/// Precedence-ordered classification rules. Cells matching none are ordinary.
pub const RULES: [GeometryRule; 5] = [
    GeometryRule {
        category: CellCategory::Center,
        cells: &CENTER_CELLS,
    },
    GeometryRule {
        category: CellCategory::TripleWord,
        cells: &TRIPLE_WORD_CELLS,
    },
    GeometryRule {
        category: CellCategory::DoubleWord,
        cells: &DOUBLE_WORD_CELLS,
    },
    GeometryRule {
        category: CellCategory::TripleLetter,
        cells: &TRIPLE_LETTER_CELLS,
    },
    GeometryRule {
        category: CellCategory::DoubleLetter,
        cells: &DOUBLE_LETTER_CELLS,
    },
];

/// Check if (row, col) lies on the board
#[inline]
pub fn in_bounds(row: i64, col: i64) -> bool {
    (0..BOARD_SIZE as i64).contains(&row) && (0..BOARD_SIZE as i64).contains(&col)
}

/// Classify a cell. Returns `None` only for out-of-range coordinates.
///
/// # Examples
///
/// ```
/// use wordboard_core::geometry::classify;
/// use wordboard_types::CellCategory;
///
/// assert_eq!(classify(7, 7), Some(CellCategory::Center));
/// assert_eq!(classify(0, 0), Some(CellCategory::TripleWord));
/// assert_eq!(classify(6, 6), Some(CellCategory::DoubleWord));
/// assert_eq!(classify(0, 1), Some(CellCategory::Ordinary));
/// assert_eq!(classify(15, 0), None);
/// ```
pub fn classify(row: u8, col: u8) -> Option<CellCategory> {
    if row >= BOARD_SIZE || col >= BOARD_SIZE {
        return None;
    }
    let category = RULES
        .iter()
        .find(|rule| rule.cells.contains(&(row, col)))
        .map(|rule| rule.category)
        .unwrap_or(CellCategory::Ordinary);
    Some(category)
}

/// Default (letter, word) multipliers a tile earns on an empty cell of this
/// category. The center star doubles the word.
pub fn premium_multipliers(category: CellCategory) -> (u8, u8) {
    match category {
        CellCategory::Ordinary => (1, 1),
        CellCategory::DoubleLetter => (2, 1),
        CellCategory::TripleLetter => (3, 1),
        CellCategory::DoubleWord | CellCategory::Center => (1, 2),
        CellCategory::TripleWord => (1, 3),
    }
}

/// Classification of the whole board, row-major.
pub fn category_grid() -> [[CellCategory; BOARD_SIZE as usize]; BOARD_SIZE as usize] {
    let mut grid = [[CellCategory::Ordinary; BOARD_SIZE as usize]; BOARD_SIZE as usize];
    for (r, row) in grid.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = classify(r as u8, c as u8).unwrap_or(CellCategory::Ordinary);
        }
    }
    grid
}
