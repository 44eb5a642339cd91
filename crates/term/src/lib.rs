//! Terminal rendering of the word board.
//!
//! A small rendering layer that draws the playback render models into a
//! framebuffer and flushes it to the terminal with crossterm, diffing
//! against the previous frame. No widget toolkit is involved.
//!
//! - [`board_view`]: pure projection of board, rack and status into a framebuffer
//! - [`renderer`]: diffing terminal flush
//! - [`render_throttle`]: skips redraws of unchanged frames

pub mod board_view;
pub mod fb;
pub mod render_throttle;
pub mod renderer;

pub use wordboard_core as core;
pub use wordboard_types as types;

pub use board_view::{BoardView, PanelInfo, Viewport};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use render_throttle::RenderThrottle;
pub use renderer::{encode_diff_into, encode_full_into, FrameStats, TerminalRenderer};
