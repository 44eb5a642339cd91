//! Adapter module - request gateway to the puzzle generator
//!
//! Talks HTTP to the generator service and turns its server-sent event
//! stream into core [`StreamItem`](wordboard_core::StreamItem)s.
//!
//! # Endpoints
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | POST | `/api/puzzle/generate` | puzzle JSON |
//! | GET | `/api/puzzle/generate-animated` | `text/event-stream` |
//! | GET | `/api/puzzle/current` | puzzle JSON |
//! | GET | `/health` | text |
//!
//! # Stream Events
//!
//! `generation_started` (plain text), `progress_update`, `tile_placed`,
//! `word_complete`, `delay`, `generation_complete` (JSON). Unknown names are
//! dropped.
//!
//! # Environment Variables
//!
//! - `WORDBOARD_SERVER_URL`: generator base URL (default: "http://127.0.0.1:8080")
//! - `WORDBOARD_REQUEST_TIMEOUT_MS`: plain request and connect timeout (default: 10000)
//! - `WORDBOARD_STREAM_BUFFER`: stream channel capacity (default: 256)
//!
//! # Example Stream
//!
//! ```text
//! event: generation_started
//! data: Puzzle generation started
//!
//! event: tile_placed
//! data: {"row":7,"col":7,"letter":"C","pointValue":3,"word":"CAT","direction":"horizontal",...}
//!
//! event: generation_complete
//! data: {"board":{"size":15,"cells":[...]},"remainingTiles":[...],"placedTileCount":3,...}
//! ```

pub mod gateway;
pub mod protocol;
pub mod runtime;
pub mod sse;

pub use gateway::{GatewayConfig, GatewayError, HttpGateway, SseEventStream};
pub use protocol::{event_payload, parse_event, ParsedEvent, PuzzleDto};
pub use runtime::{ChannelStream, GatewayRuntime};
pub use sse::{encode_frame, LineTooLong, SseDecoder, SseFrame};
