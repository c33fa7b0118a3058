//! Buffer module: The frame grid the compositor draws into.
//!
//! This module contains:
//! - [`Cell`]: One character plus the [`Layer`] tags that produced it
//! - [`FrameBuffer`]: A fixed grid of cells, fully redrawn every tick

mod cell;
mod frame;

pub use cell::{Cell, Layer};
pub use frame::FrameBuffer;
