//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (playback engine, terminal rendering, wire protocol).
//!
//! # Board Dimensions
//!
//! Standard word-game board:
//!
//! - **Size**: 15 x 15 cells (rows and columns indexed 0-14)
//! - **Center**: (7, 7), the star cell every first word crosses
//!
//! # Playback Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | UI loop interval (~60 FPS) |
//! | `DEFAULT_INTER_TILE_DELAY_MS` | 150 | Stagger between tiles of one word |
//! | `DEFAULT_SETTLE_DELAY_MS` | 300 | Entering phase before a tile commits |
//! | `DEFAULT_STREAM_IDLE_TIMEOUT_MS` | 30000 | Silence after which a stream is failed |
//! | `RENDER_STATIC_INTERVAL_MS` | 250 | Redraw interval for an unchanged frame |
//!
//! # Tile Distribution
//!
//! The standard 100-tile bag: 98 lettered tiles and 2 blanks. See
//! [`letter_points`] and [`letter_count`].
//!
//! # Examples
//!
//! ```
//! use wordboard_types::{CellCategory, Direction, Tile, BOARD_SIZE, letter_points};
//!
//! assert_eq!(BOARD_SIZE, 15);
//! assert_eq!(CellCategory::TripleWord.badge(), "TW");
//! assert_eq!(Direction::from_str("VERTICAL"), Some(Direction::Vertical));
//!
//! let q = Tile::new('Q', letter_points('q'));
//! assert_eq!(q.point_value, 10);
//! assert!(Tile::blank().is_blank());
//! ```

/// Board width and height in cells (15)
pub const BOARD_SIZE: u8 = 15;

/// Total number of cells on the board (225)
pub const BOARD_CELLS: usize = (BOARD_SIZE as usize) * (BOARD_SIZE as usize);

/// Row of the center star cell
pub const CENTER_ROW: u8 = 7;

/// Column of the center star cell
pub const CENTER_COL: u8 = 7;

/// UI loop interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Delay between the entering phase of consecutive tiles of one word.
pub const DEFAULT_INTER_TILE_DELAY_MS: u32 = 150;

/// Time a tile spends entering before it is committed to the board.
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 300;

/// A stream that stays silent this long is failed.
pub const DEFAULT_STREAM_IDLE_TIMEOUT_MS: u32 = 30_000;

/// Minimum interval between redraws of an unchanged frame.
pub const RENDER_STATIC_INTERVAL_MS: u64 = 250;

/// Number of tiles in a full bag.
pub const TOTAL_TILES: usize = 100;

/// Glyph used on the wire for a blank tile.
pub const BLANK_LETTER: char = ' ';

/// Premium class of a board cell.
///
/// Order of variants is not precedence; see the geometry rule table in the
/// core crate for how overlapping coordinate sets are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellCategory {
    Ordinary,
    DoubleLetter,
    TripleLetter,
    DoubleWord,
    TripleWord,
    Center,
}

impl CellCategory {
    /// Short badge drawn on an empty cell.
    ///
    /// # Examples
    ///
    /// ```
    /// use wordboard_types::CellCategory;
    ///
    /// assert_eq!(CellCategory::DoubleLetter.badge(), "DL");
    /// assert_eq!(CellCategory::Center.badge(), "★");
    /// assert_eq!(CellCategory::Ordinary.badge(), "");
    /// ```
    pub fn badge(&self) -> &'static str {
        match self {
            CellCategory::Ordinary => "",
            CellCategory::DoubleLetter => "DL",
            CellCategory::TripleLetter => "TL",
            CellCategory::DoubleWord => "DW",
            CellCategory::TripleWord => "TW",
            CellCategory::Center => "★",
        }
    }

    pub fn is_premium(&self) -> bool {
        !matches!(self, CellCategory::Ordinary)
    }
}

/// Direction a word is laid down in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Parse direction from string (case-insensitive)
    ///
    /// Accepts full names or single letters: "horizontal" | "h" | "across",
    /// "vertical" | "v" | "down".
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "horizontal" | "h" | "across" => Some(Direction::Horizontal),
            "vertical" | "v" | "down" => Some(Direction::Vertical),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
        }
    }
}

/// A letter tile. A blank carries [`BLANK_LETTER`] and is worth nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub letter: char,
    pub point_value: u32,
}

impl Tile {
    pub const fn new(letter: char, point_value: u32) -> Self {
        Self {
            letter,
            point_value,
        }
    }

    pub const fn blank() -> Self {
        Self::new(BLANK_LETTER, 0)
    }

    pub fn is_blank(&self) -> bool {
        self.letter == BLANK_LETTER
    }

    /// Human-readable name: the letter itself, or `BLANK`.
    pub fn label(&self) -> String {
        if self.is_blank() {
            "BLANK".to_string()
        } else {
            self.letter.to_string()
        }
    }

    /// Single glyph for compact displays; blanks show as `_`.
    pub fn glyph(&self) -> char {
        if self.is_blank() {
            '_'
        } else {
            self.letter
        }
    }
}

/// User-triggered actions of the playback UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiAction {
    /// Generate a puzzle and replay its construction
    GenerateAnimated,
    /// Generate a puzzle and show only the result
    GeneratePlain,
    /// Reload the generator's most recent puzzle
    LoadCurrent,
    /// Abandon the in-flight generation
    Cancel,
}

impl UiAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiAction::GenerateAnimated => "generateAnimated",
            UiAction::GeneratePlain => "generatePlain",
            UiAction::LoadCurrent => "loadCurrent",
            UiAction::Cancel => "cancel",
        }
    }

    /// Actions that start a request and are gated while one is in flight
    pub fn starts_request(&self) -> bool {
        !matches!(self, UiAction::Cancel)
    }
}

/// Standard distribution: (letter, points, count). Sums to [`TOTAL_TILES`].
pub const TILE_DISTRIBUTION: [(char, u32, u32); 27] = [
    ('A', 1, 9),
    ('B', 3, 2),
    ('C', 3, 2),
    ('D', 2, 4),
    ('E', 1, 12),
    ('F', 4, 2),
    ('G', 2, 3),
    ('H', 4, 2),
    ('I', 1, 9),
    ('J', 8, 1),
    ('K', 5, 1),
    ('L', 1, 4),
    ('M', 3, 2),
    ('N', 1, 6),
    ('O', 1, 8),
    ('P', 3, 2),
    ('Q', 10, 1),
    ('R', 1, 6),
    ('S', 1, 4),
    ('T', 1, 6),
    ('U', 1, 4),
    ('V', 4, 2),
    ('W', 4, 2),
    ('X', 8, 1),
    ('Y', 4, 2),
    ('Z', 10, 1),
    (BLANK_LETTER, 0, 2),
];

fn distribution_entry(letter: char) -> Option<&'static (char, u32, u32)> {
    let upper = letter.to_ascii_uppercase();
    TILE_DISTRIBUTION.iter().find(|(l, _, _)| *l == upper)
}

/// Point value of a letter (case-insensitive). Unknown letters score 0.
///
/// # Examples
///
/// ```
/// use wordboard_types::letter_points;
///
/// assert_eq!(letter_points('A'), 1);
/// assert_eq!(letter_points('z'), 10);
/// assert_eq!(letter_points(' '), 0);
/// assert_eq!(letter_points('7'), 0);
/// ```
pub fn letter_points(letter: char) -> u32 {
    distribution_entry(letter).map(|e| e.1).unwrap_or(0)
}

/// Number of tiles of a letter in a full bag (case-insensitive).
pub fn letter_count(letter: char) -> u32 {
    distribution_entry(letter).map(|e| e.2).unwrap_or(0)
}
