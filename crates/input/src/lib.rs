//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::UiAction`]. Gating of
//! actions while a generation is in flight belongs to the playback
//! controller, not here.

pub mod map;

pub use wordboard_types as types;

pub use map::{handle_key_event, should_quit};
