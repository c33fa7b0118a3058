//! Reports the render thread publishes about its work.
//!
//! The render thread never sends anything back over a channel; it records
//! each tick into a shared [`Telemetry`] that `show_status` and tests read.

use crate::scene::Phase;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// What one render tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Tick number within the current render run, starting at 1.
    pub tick: u64,
    /// Phase that was active during the tick.
    pub phase: Phase,
    /// Approach frame counter.
    pub frame: u32,
    /// Completed cycles.
    pub cycles: u64,
    /// Left and right entity positions.
    pub positions: [f32; 2],
    /// Vertical sink of the entities.
    pub sink: i32,
    /// Whether the animation was advancing.
    pub active: bool,
    /// Whether a frame was written to the screen.
    pub drawn: bool,
    /// Bytes handed to the screen.
    pub bytes: usize,
    /// Time spent composing and writing.
    pub render_time: Duration,
}

/// Counters shared between the render thread and its observers.
#[derive(Debug, Default)]
pub struct Telemetry {
    /// Ticks across all render runs.
    ticks: AtomicU64,
    /// Frames actually written.
    frames: AtomicU64,
    /// Total bytes written.
    bytes: AtomicU64,
    /// Failed screen writes.
    write_errors: AtomicU64,
    /// Most recent tick.
    latest: Mutex<Option<FrameReport>>,
}

impl Telemetry {
    /// Empty telemetry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished tick.
    pub fn record(&self, report: FrameReport) {
        self.ticks.fetch_add(1, Ordering::AcqRel);
        if report.drawn {
            self.frames.fetch_add(1, Ordering::Relaxed);
            self.bytes.fetch_add(report.bytes as u64, Ordering::Relaxed);
        }
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(report);
    }

    /// Record a failed screen write.
    pub fn record_write_error(&self) {
        self.write_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Ticks so far. Keeps growing while paused, so it doubles as a heartbeat.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Bytes written so far.
    pub fn bytes(&self) -> u64 {
        self.bytes.load(Ordering::Relaxed)
    }

    /// Failed screen writes so far.
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }

    /// The most recent tick, if any.
    pub fn latest(&self) -> Option<FrameReport> {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(tick: u64, drawn: bool) -> FrameReport {
        FrameReport {
            tick,
            phase: Phase::Approach,
            frame: 0,
            cycles: 0,
            positions: [0.0, 76.0],
            sink: 0,
            active: true,
            drawn,
            bytes: 100,
            render_time: Duration::ZERO,
        }
    }

    #[test]
    fn test_record_counts() {
        let telemetry = Telemetry::new();
        assert!(telemetry.latest().is_none());

        telemetry.record(report(1, true));
        telemetry.record(report(2, false));
        assert_eq!(telemetry.ticks(), 2);
        assert_eq!(telemetry.frames(), 1);
        assert_eq!(telemetry.bytes(), 100);
        assert_eq!(telemetry.latest().map(|r| r.tick), Some(2));
    }
}
