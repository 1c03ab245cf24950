//! Terminal presentation for scrollmap frames.
//!
//! This is a small frontend that shows an RGBA [`Surface`] in a terminal.
//! It renders into a framebuffer of half-block cells (two pixels per cell)
//! that is flushed to the terminal with crossterm, diffing against the
//! previous frame.
//!
//! [`Surface`]: scrollmap_core::Surface

pub mod fb;
pub mod presenter;
pub mod throttle;

pub use scrollmap_core as core;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb, HALF_BLOCK};
pub use presenter::{encode_diff_into, encode_full_into, TerminalPresenter};
pub use throttle::{scene_fingerprint, RedrawThrottle};
