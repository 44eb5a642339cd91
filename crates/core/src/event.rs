//! Generation stream events and the stream abstraction the controller polls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use wordboard_types::Direction;

use crate::board::PlacedTile;
use crate::error::{ProtocolError, TransportError};
use crate::geometry;
use crate::snapshot::PuzzleSnapshot;

/// One `tile_placed` event as received. Coordinates are signed so that
/// out-of-range values survive decoding and are rejected by [`PlacementEvent::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementEvent {
    pub row: i64,
    pub col: i64,
    pub letter: char,
    pub point_value: u32,
    pub word: String,
    pub direction: Direction,
    pub position_in_word: u32,
    pub total_tiles_in_word: u32,
    pub letter_multiplier: u32,
    pub word_multiplier: u32,
}

/// A validated placement, ready to be scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub row: u8,
    pub col: u8,
    pub tile: PlacedTile,
}

impl PlacementEvent {
    pub fn validate(&self) -> Result<TilePlacement, ProtocolError> {
        if !geometry::in_bounds(self.row, self.col) {
            return Err(ProtocolError::CoordinateOutOfRange {
                row: self.row,
                col: self.col,
            });
        }
        for value in [self.letter_multiplier, self.word_multiplier] {
            if !(1..=3).contains(&value) {
                return Err(ProtocolError::InvalidMultiplier { value });
            }
        }
        if self.position_in_word >= self.total_tiles_in_word {
            return Err(ProtocolError::InvalidPosition {
                position: self.position_in_word,
                total: self.total_tiles_in_word,
            });
        }
        Ok(TilePlacement {
            row: self.row as u8,
            col: self.col as u8,
            tile: PlacedTile::new(
                self.letter,
                self.point_value,
                self.letter_multiplier as u8,
                self.word_multiplier as u8,
            ),
        })
    }
}

/// Typed generation events, in the order the generator emits them.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    GenerationStarted { message: String },
    ProgressUpdate { progress: f64, message: Option<String> },
    TilePlaced(PlacementEvent),
    WordComplete { word: String, direction: Option<Direction> },
    Delay { duration_ms: u64 },
    GenerationComplete(Box<PuzzleSnapshot>),
}

impl StreamEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            StreamEvent::GenerationStarted { .. } => "generation_started",
            StreamEvent::ProgressUpdate { .. } => "progress_update",
            StreamEvent::TilePlaced(_) => "tile_placed",
            StreamEvent::WordComplete { .. } => "word_complete",
            StreamEvent::Delay { .. } => "delay",
            StreamEvent::GenerationComplete(_) => "generation_complete",
        }
    }
}

/// What a stream yields on each poll.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamItem {
    Event(StreamEvent),
    Malformed(ProtocolError),
    Failed(TransportError),
}

/// A non-blocking source of stream items owned by the playback controller.
pub trait EventStream {
    /// Next ready item, or `None` if nothing is ready yet.
    fn try_next(&mut self) -> Option<StreamItem>;

    /// Release the underlying connection. Idempotent.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

/// In-memory stream fed by hand.
///
/// Clones share the queue and the closed flag, so a caller can keep one clone
/// to push items after handing the other to a controller.
#[derive(Debug, Clone, Default)]
pub struct ScriptedStream {
    queue: Arc<Mutex<VecDeque<StreamItem>>>,
    closed: Arc<AtomicBool>,
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_events<I>(events: I) -> Self
    where
        I: IntoIterator<Item = StreamEvent>,
    {
        let stream = Self::new();
        for event in events {
            stream.push(StreamItem::Event(event));
        }
        stream
    }

    pub fn push(&self, item: StreamItem) {
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(item);
        }
    }

    pub fn push_event(&self, event: StreamEvent) {
        self.push(StreamItem::Event(event));
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl EventStream for ScriptedStream {
    fn try_next(&mut self) -> Option<StreamItem> {
        if self.is_closed() {
            return None;
        }
        self.queue.lock().ok().and_then(|mut q| q.pop_front())
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::Release);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
