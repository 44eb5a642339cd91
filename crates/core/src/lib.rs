//! Core playback logic - pure, deterministic, and testable
//!
//! This crate holds the render models and the playback state machine. It has
//! **no dependencies** on terminals, networking, or async runtimes:
//!
//! - **Deterministic**: time is passed in as milliseconds; timers are data
//! - **Testable**: every state transition can be driven from a unit test
//! - **Portable**: the same controller drives the terminal UI and headless mode
//!
//! # Module Structure
//!
//! - [`geometry`]: premium cell classification (ordered rule table)
//! - [`board`]: 15x15 board render model
//! - [`rack`]: remaining tile rack render model
//! - [`snapshot`]: authoritative end state of a puzzle
//! - [`event`]: typed stream events and the [`EventStream`] trait
//! - [`schedule`]: timer queue and clocks
//! - [`playback`]: single-flight session state machine
//! - [`error`]: transport and protocol errors
//!
//! # Example
//!
//! ```
//! use wordboard_core::{
//!     PlaybackConfig, PlaybackController, PuzzleSnapshot, ScriptedStream, StreamEvent,
//!     SessionStatus,
//! };
//!
//! let stream = ScriptedStream::from_events([
//!     StreamEvent::GenerationStarted { message: "Puzzle generation started".into() },
//!     StreamEvent::GenerationComplete(Box::new(PuzzleSnapshot::default())),
//! ]);
//!
//! let mut playback = PlaybackController::new(PlaybackConfig::default());
//! playback.start_animated(0, || Ok(stream));
//! playback.pump(16);
//!
//! assert_eq!(playback.status(), SessionStatus::Idle);
//! assert_eq!(playback.last_outcome(), Some(SessionStatus::Completed));
//! ```

pub mod board;
pub mod error;
pub mod event;
pub mod geometry;
pub mod playback;
pub mod rack;
pub mod schedule;
pub mod snapshot;

pub use board::{BoardCell, BoardModel, PlacedTile};
pub use error::{PlaybackError, ProtocolError, TransportError};
pub use event::{EventStream, PlacementEvent, ScriptedStream, StreamEvent, StreamItem, TilePlacement};
pub use playback::{
    EnteringTile, Notice, PlaybackConfig, PlaybackController, PumpReport, SessionStatus,
    StartOutcome,
};
pub use rack::TileRack;
pub use schedule::{Clock, ManualClock, MonotonicClock, Timer, TimerPhase, TimerQueue};
pub use snapshot::{ConsistencyIssue, PuzzleSnapshot, PuzzleStats, SnapshotCell, SnapshotGrid};
