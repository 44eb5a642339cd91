//! Word board playback (workspace facade crate).
//!
//! Re-exports the workspace crates as `wordboard::{core,adapter,term,input,types}` and
//! holds the application pieces shared by the binary and the integration tests.

pub mod cli;
pub mod config;

pub use wordboard_adapter as adapter;
pub use wordboard_core as core;
pub use wordboard_input as input;
pub use wordboard_term as term;
pub use wordboard_types as types;
