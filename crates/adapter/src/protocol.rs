//! Protocol module - JSON payloads of the puzzle generator
//!
//! Field names follow the generator's camelCase JSON. DTOs convert into core
//! types with range checks; nothing here touches the render models.

use serde::{Deserialize, Serialize};
use wordboard_core::{
    PlacedTile, PlacementEvent, ProtocolError, PuzzleSnapshot, SnapshotGrid, StreamEvent,
};
use wordboard_types::{Direction, Tile, BLANK_LETTER, BOARD_SIZE};

// ============== Puzzle (plain response and generation_complete) ==============

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDto {
    #[serde(default)]
    pub has_tile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(default = "one")]
    pub letter_multiplier: u32,
    #[serde(default = "one")]
    pub word_multiplier: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDto {
    pub letter: String,
    pub point_value: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    pub cells: Vec<Vec<CellDto>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleDto {
    pub board: BoardDto,
    #[serde(default)]
    pub remaining_tiles: Vec<TileDto>,
    #[serde(default)]
    pub placed_tile_count: u32,
    #[serde(default)]
    pub remaining_tile_count: u32,
}

// ============== Animated stream payloads ==============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementDto {
    pub row: i64,
    pub col: i64,
    pub letter: String,
    #[serde(default)]
    pub point_value: u32,
    #[serde(default)]
    pub word: String,
    pub direction: String,
    pub position_in_word: u32,
    pub total_tiles_in_word: u32,
    #[serde(default = "one")]
    pub letter_multiplier: u32,
    #[serde(default = "one")]
    pub word_multiplier: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressDto {
    #[serde(alias = "percentage", alias = "percent")]
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCompleteDto {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelayDto {
    #[serde(alias = "durationMs", alias = "ms")]
    pub duration: u64,
}

// ============== Conversions ==============

/// Decode a one-character letter. An empty or whitespace string is a blank.
pub fn parse_letter(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Some(BLANK_LETTER),
        (Some(c), None) if c.is_whitespace() => Some(BLANK_LETTER),
        (Some(c), None) => Some(c),
        _ if s.trim().is_empty() => Some(BLANK_LETTER),
        _ => None,
    }
}

impl TileDto {
    pub fn to_tile(&self) -> Result<Tile, ProtocolError> {
        let letter = parse_letter(&self.letter).ok_or_else(|| {
            ProtocolError::malformed("tile", format!("letter {:?} is not one character", self.letter))
        })?;
        Ok(Tile::new(letter, self.point_value))
    }
}

impl From<&Tile> for TileDto {
    fn from(tile: &Tile) -> Self {
        Self {
            letter: tile.letter.to_string(),
            point_value: tile.point_value,
            count: None,
        }
    }
}

impl CellDto {
    pub fn to_cell(&self) -> Result<Option<PlacedTile>, ProtocolError> {
        if !self.has_tile {
            return Ok(None);
        }
        let raw = self.letter.as_deref().unwrap_or("");
        let letter = parse_letter(raw).ok_or_else(|| {
            ProtocolError::malformed("cell", format!("letter {raw:?} is not one character"))
        })?;
        for value in [self.letter_multiplier, self.word_multiplier] {
            if !(1..=3).contains(&value) {
                return Err(ProtocolError::InvalidMultiplier { value });
            }
        }
        Ok(Some(PlacedTile::new(
            letter,
            self.points.unwrap_or(0),
            self.letter_multiplier as u8,
            self.word_multiplier as u8,
        )))
    }
}

impl From<Option<PlacedTile>> for CellDto {
    fn from(cell: Option<PlacedTile>) -> Self {
        match cell {
            Some(t) => Self {
                has_tile: true,
                letter: Some(t.letter.to_string()),
                points: Some(t.points),
                letter_multiplier: u32::from(t.letter_multiplier),
                word_multiplier: u32::from(t.word_multiplier),
            },
            None => Self {
                has_tile: false,
                letter: None,
                points: None,
                letter_multiplier: 1,
                word_multiplier: 1,
            },
        }
    }
}

impl PuzzleDto {
    pub fn into_snapshot(self) -> Result<PuzzleSnapshot, ProtocolError> {
        let size = BOARD_SIZE as usize;
        let cols = self.board.cells.first().map(|r| r.len()).unwrap_or(0);
        if self.board.cells.len() != size || self.board.cells.iter().any(|r| r.len() != size) {
            return Err(ProtocolError::BoardShape {
                rows: self.board.cells.len(),
                cols,
            });
        }

        let mut cells: SnapshotGrid = [[None; BOARD_SIZE as usize]; BOARD_SIZE as usize];
        for (dst, src) in cells.iter_mut().zip(&self.board.cells) {
            for (d, s) in dst.iter_mut().zip(src) {
                *d = s.to_cell()?;
            }
        }
        let remaining_tiles = self
            .remaining_tiles
            .iter()
            .map(TileDto::to_tile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PuzzleSnapshot {
            cells,
            remaining_tiles,
            placed_tile_count: self.placed_tile_count,
            remaining_tile_count: self.remaining_tile_count,
        })
    }
}

impl From<&PuzzleSnapshot> for PuzzleDto {
    fn from(snapshot: &PuzzleSnapshot) -> Self {
        Self {
            board: BoardDto {
                size: Some(u32::from(BOARD_SIZE)),
                cells: snapshot
                    .cells
                    .iter()
                    .map(|row| row.iter().map(|c| CellDto::from(*c)).collect())
                    .collect(),
            },
            remaining_tiles: snapshot.remaining_tiles.iter().map(TileDto::from).collect(),
            placed_tile_count: snapshot.placed_tile_count,
            remaining_tile_count: snapshot.remaining_tile_count,
        }
    }
}

impl PlacementDto {
    pub fn into_event(self) -> Result<PlacementEvent, ProtocolError> {
        let letter = parse_letter(&self.letter).ok_or_else(|| {
            ProtocolError::malformed(
                "tile_placed",
                format!("letter {:?} is not one character", self.letter),
            )
        })?;
        let direction = Direction::from_str(&self.direction)
            .ok_or_else(|| ProtocolError::InvalidDirection(self.direction.clone()))?;
        Ok(PlacementEvent {
            row: self.row,
            col: self.col,
            letter,
            point_value: self.point_value,
            word: self.word,
            direction,
            position_in_word: self.position_in_word,
            total_tiles_in_word: self.total_tiles_in_word,
            letter_multiplier: self.letter_multiplier,
            word_multiplier: self.word_multiplier,
        })
    }
}

impl From<&PlacementEvent> for PlacementDto {
    fn from(event: &PlacementEvent) -> Self {
        Self {
            row: event.row,
            col: event.col,
            letter: event.letter.to_string(),
            point_value: event.point_value,
            word: event.word.clone(),
            direction: event.direction.as_str().to_string(),
            position_in_word: event.position_in_word,
            total_tiles_in_word: event.total_tiles_in_word,
            letter_multiplier: event.letter_multiplier,
            word_multiplier: event.word_multiplier,
        }
    }
}

// ============== Event Parsing ==============

/// Parsed stream event
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedEvent {
    Event(StreamEvent),
    /// Event name the client does not handle; not an error
    Unknown(String),
}

fn from_json<'a, T: Deserialize<'a>>(event: &str, data: &'a str) -> Result<T, ProtocolError> {
    serde_json::from_str(data).map_err(|e| ProtocolError::malformed(event, e.to_string()))
}

/// Parse the data of one named stream event
pub fn parse_event(name: &str, data: &str) -> Result<ParsedEvent, ProtocolError> {
    let event = match name {
        "generation_started" => {
            // plain text; tolerate a JSON string too
            let message = serde_json::from_str::<String>(data).unwrap_or_else(|_| data.to_string());
            StreamEvent::GenerationStarted { message }
        }
        "progress_update" => {
            let dto: ProgressDto = from_json(name, data)?;
            StreamEvent::ProgressUpdate {
                progress: dto.progress,
                message: dto.message,
            }
        }
        "tile_placed" => StreamEvent::TilePlaced(from_json::<PlacementDto>(name, data)?.into_event()?),
        "word_complete" => {
            let dto: WordCompleteDto = from_json(name, data)?;
            StreamEvent::WordComplete {
                word: dto.word,
                direction: dto.direction.as_deref().and_then(Direction::from_str),
            }
        }
        "delay" => StreamEvent::Delay {
            duration_ms: from_json::<DelayDto>(name, data)?.duration,
        },
        "generation_complete" => {
            let dto: PuzzleDto = from_json(name, data)?;
            let snapshot = dto.into_snapshot().map_err(|e| match e {
                shape @ ProtocolError::BoardShape { .. } => shape,
                other => ProtocolError::malformed(name, other.to_string()),
            })?;
            StreamEvent::GenerationComplete(Box::new(snapshot))
        }
        other => return Ok(ParsedEvent::Unknown(other.to_string())),
    };
    Ok(ParsedEvent::Event(event))
}

/// Serialize an event back into its (name, data) pair
pub fn event_payload(event: &StreamEvent) -> Result<(&'static str, String), serde_json::Error> {
    let data = match event {
        StreamEvent::GenerationStarted { message } => message.clone(),
        StreamEvent::ProgressUpdate { progress, message } => serde_json::to_string(&ProgressDto {
            progress: *progress,
            message: message.clone(),
        })?,
        StreamEvent::TilePlaced(p) => serde_json::to_string(&PlacementDto::from(p))?,
        StreamEvent::WordComplete { word, direction } => serde_json::to_string(&WordCompleteDto {
            word: word.clone(),
            direction: direction.map(|d| d.as_str().to_string()),
        })?,
        StreamEvent::Delay { duration_ms } => serde_json::to_string(&DelayDto {
            duration: *duration_ms,
        })?,
        StreamEvent::GenerationComplete(snapshot) => {
            serde_json::to_string(&PuzzleDto::from(&**snapshot))?
        }
    };
    Ok((event.name(), data))
}
