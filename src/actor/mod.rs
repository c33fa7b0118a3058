//! Actor Model: the render thread and the command loop that drives it.
//!
//! Two long-lived threads share a small set of fields and one display lock:
//! - **Render Actor**: ticks the scene, draws every frame, sleeps
//! - **Engine**: runs on the caller's thread, edits the input line,
//!   dispatches commands, owns the render thread's handle
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ControlBlock (run, active, speed, text)  ┌──────────────┐
//! │    Engine    │ ────────────────────────────────────────▶ │Render Thread │
//! │ (input loop) │  InputLine (prompt mirror)                │              │
//! │              │ ────────────────────────────────────────▶ │              │
//! │              │  wake ───────────────────────────────────▶│  (sleeping)  │
//! │              │ ◀──────────────────────────────────────── │              │
//! └──────┬───────┘  Telemetry (ticks, latest frame)          └──────┬───────┘
//!        │                                                          │
//!        └──────────────▶  Mutex<Screen> (display lock)  ◀──────────┘
//! ```

mod control;
mod engine;
mod input;
mod messages;
mod renderer;

pub use control::ControlBlock;
pub use engine::{Engine, InputMode, GREETING};
pub use input::{Edit, InputLine, LineEditor};
pub use messages::{FrameReport, Telemetry};
pub use renderer::{RenderActor, RenderContext};
