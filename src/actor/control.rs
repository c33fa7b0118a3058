//! Shared control block: the parameters both threads see.
//!
//! The command side writes, the render thread reads once per tick. Every
//! field is individually atomic (or behind its own lock for the text), so a
//! reader always sees the latest value rather than a stale snapshot.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Flags and parameters shared between the command and render threads.
#[derive(Debug)]
pub struct ControlBlock {
    /// Render thread should keep running.
    running: AtomicBool,
    /// Animation is advancing (false = paused).
    active: AtomicBool,
    /// Milliseconds per tick, always positive.
    speed_ms: AtomicU64,
    /// Banner text.
    text: Mutex<String>,
    /// Bumped on every text change so readers can skip unchanged text.
    text_revision: AtomicU64,
}

impl ControlBlock {
    /// A stopped control block with the given initial speed and text.
    pub fn new(speed_ms: u64, text: impl Into<String>) -> Self {
        Self {
            running: AtomicBool::new(false),
            active: AtomicBool::new(false),
            speed_ms: AtomicU64::new(speed_ms.max(1)),
            text: Mutex::new(text.into()),
            text_revision: AtomicU64::new(0),
        }
    }

    /// Whether the render thread should keep running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Set the run flag.
    #[inline]
    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    /// Whether the animation is advancing.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Set the active flag.
    #[inline]
    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }

    /// Milliseconds per tick.
    #[inline]
    pub fn speed_ms(&self) -> u64 {
        self.speed_ms.load(Ordering::Relaxed)
    }

    /// Tick interval.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.speed_ms())
    }

    /// Set milliseconds per tick. Zero is ignored.
    pub fn set_speed(&self, speed_ms: u64) -> bool {
        if speed_ms == 0 {
            return false;
        }
        self.speed_ms.store(speed_ms, Ordering::Relaxed);
        true
    }

    /// Copy of the banner text.
    pub fn text(&self) -> String {
        self.text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the banner text.
    pub fn set_text(&self, text: &str) {
        let mut guard = self.text.lock().unwrap_or_else(PoisonError::into_inner);
        text.clone_into(&mut guard);
        self.text_revision.fetch_add(1, Ordering::AcqRel);
    }

    /// Revision counter for the banner text.
    #[inline]
    pub fn text_revision(&self) -> u64 {
        self.text_revision.load(Ordering::Acquire)
    }
}

impl Default for ControlBlock {
    fn default() -> Self {
        Self::new(50, String::new())
    }
}
