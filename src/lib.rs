//! # Marquee
//!
//! A terminal animation engine: a looping ASCII scene redrawn at a steady
//! rate while a command line changes its speed, text and run state live.
//!
//! ## Core Concepts
//!
//! - **Full-frame redraw**: every tick rewrites every cell, no diffing
//! - **Phase machine**: approach, collision, decay, reset, forever
//! - **Two threads**: a render loop and a command loop sharing one display lock
//! - **Narrow driver**: all terminal I/O goes through [`Screen`] and [`Keyboard`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use marquee::{Art, Engine, EngineConfig, InputMode, MemoryScreen, ScriptedKeyboard};
//!
//! let mut engine = Engine::new(EngineConfig::default(), Art::boat(), MemoryScreen::new(30, 100))?;
//! let mut keys = ScriptedKeyboard::new().typed("start").idle(20).typed("exit");
//! engine.run(&mut keys, InputMode::Keys)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod buffer;
pub mod command;
pub mod config;
pub mod error;
pub mod scene;
pub mod terminal;

// Re-exports for convenience
pub use actor::{ControlBlock, Engine, InputMode, Telemetry};
pub use buffer::{Cell, FrameBuffer, Layer};
pub use command::{Command, Outcome, OutcomeKind};
pub use config::{EngineConfig, StopMode};
pub use error::{CommandError, Error, Result};
pub use scene::{Art, Geometry, Phase, Scene, SceneSettings};
pub use terminal::{
    CrosstermKeyboard, CrosstermScreen, Key, Keyboard, MemoryScreen, Screen, ScriptedKeyboard,
    TerminalGuard,
};
