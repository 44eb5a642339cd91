//! Error taxonomy for a generation session.
//!
//! Two categories reach the playback controller:
//!
//! - [`TransportError`]: the stream could not be opened, was interrupted, or
//!   went silent. Always fatal for the session.
//! - [`ProtocolError`]: a payload was malformed or out of range. Errors confined
//!   to a single placement or informational event are skippable; a bad
//!   snapshot is not.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to open event stream: {0}")]
    Open(String),

    #[error("event stream interrupted: {0}")]
    Interrupted(String),

    #[error("generator responded with HTTP {0}")]
    Status(u16),

    #[error("event stream ended before generation completed")]
    ClosedEarly,

    #[error("no stream activity for {idle_ms}ms")]
    Timeout { idle_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed {event} payload: {reason}")]
    MalformedPayload { event: String, reason: String },

    #[error("coordinate ({row}, {col}) is outside the board")]
    CoordinateOutOfRange { row: i64, col: i64 },

    #[error("multiplier {value} is outside 1..=3")]
    InvalidMultiplier { value: u32 },

    #[error("position {position} is not within a word of {total} tiles")]
    InvalidPosition { position: u32, total: u32 },

    #[error("unknown direction {0:?}")]
    InvalidDirection(String),

    #[error("snapshot board is {rows}x{cols}, expected 15x15")]
    BoardShape { rows: usize, cols: usize },
}

impl ProtocolError {
    pub fn malformed(event: &str, reason: impl Into<String>) -> Self {
        ProtocolError::MalformedPayload {
            event: event.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the session can continue after dropping the offending event.
    ///
    /// Only a broken `generation_complete` payload or a misshapen board is
    /// fatal; everything else is confined to one event.
    pub fn is_skippable(&self) -> bool {
        match self {
            ProtocolError::MalformedPayload { event, .. } => event != "generation_complete",
            ProtocolError::BoardShape { .. } => false,
            ProtocolError::CoordinateOutOfRange { .. }
            | ProtocolError::InvalidMultiplier { .. }
            | ProtocolError::InvalidPosition { .. }
            | ProtocolError::InvalidDirection(_) => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
