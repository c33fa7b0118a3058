//! Animation State Machine: approach, collision, decay, reset, repeat.
//!
//! ```text
//!  ┌──────────┐ overlap  ┌───────────┐ > T1 ticks ┌───────┐ sunk below ┌───────┐
//!  │ Approach │────────▶ │ Collision │──────────▶ │ Decay │──────────▶ │ Reset │
//!  └──────────┘          └───────────┘            └───────┘   floor    └───┬───┘
//!       ▲                                                                  │
//!       └──────────────────────── counters zeroed ─────────────────────────┘
//! ```
//!
//! The machine owns every counter but none of the geometry: the caller tells
//! it each tick whether the entities overlap, which is what lets tests drive
//! it with synthetic positions.

use tracing::debug;

/// Animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Entities move toward each other.
    #[default]
    Approach,
    /// Entities have met; motion is frozen and rows skew.
    Collision,
    /// Entities sink and burn.
    Decay,
    /// Single pass-through tick back to the start.
    Reset,
}

impl Phase {
    /// The only phase this one may hand over to.
    pub const fn next(self) -> Self {
        match self {
            Self::Approach => Self::Collision,
            Self::Collision => Self::Decay,
            Self::Decay => Self::Reset,
            Self::Reset => Self::Approach,
        }
    }

    /// Lower-case display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Approach => "approach",
            Self::Collision => "collision",
            Self::Decay => "decay",
            Self::Reset => "reset",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Timing limits and vertical bounds the machine checks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Collision lasts until its counter exceeds this (T1).
    pub collision_ticks: u32,
    /// Scorching applies while the decay counter is below this.
    pub scorch_ticks: u32,
    /// Row the entities' art starts on before sinking.
    pub base_row: i32,
    /// Decay ends once `base_row + sink` passes this row.
    pub floor_row: i32,
}

/// What one tick of the machine decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
    /// Phase that was active during this tick.
    pub phase: Phase,
    /// Approach frame counter used for positions and waves this tick.
    pub frame: u32,
    /// Collision counter after this tick (0 outside collision).
    pub collision_tick: u32,
    /// Vertical offset of the entities this tick.
    pub sink: i32,
    /// Whether decay scorching applies this tick.
    pub scorch: bool,
    /// Phase entered at the end of this tick, if it changed.
    pub entered: Option<Phase>,
}

impl Step {
    /// Whether this tick produces a frame. Reset ticks draw nothing.
    pub const fn draws(&self) -> bool {
        !matches!(self.phase, Phase::Reset)
    }
}

/// Scene state: current phase plus all counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    limits: Limits,
    phase: Phase,
    /// Approach frames elapsed this cycle.
    frame: u32,
    /// Collision ticks elapsed.
    collision_ticks: u32,
    /// Decay ticks elapsed.
    decay_ticks: u32,
    /// Completed cycles.
    cycles: u64,
}

impl Machine {
    /// A machine at the start of its first approach.
    pub const fn new(limits: Limits) -> Self {
        Self {
            limits,
            phase: Phase::Approach,
            frame: 0,
            collision_ticks: 0,
            decay_ticks: 0,
            cycles: 0,
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Approach frame counter.
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Completed approach-to-reset cycles.
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Advance one tick.
    ///
    /// `overlap` is whether the entities touch at the current frame; it is
    /// only consulted during approach. `active` gates the approach frame
    /// counter, so a paused machine keeps ticking without moving.
    pub fn step(&mut self, overlap: bool, active: bool) -> Step {
        let mut step = Step {
            phase: self.phase,
            frame: self.frame,
            ..Step::default()
        };

        match self.phase {
            Phase::Approach => {
                if overlap {
                    step.entered = Some(self.enter(Phase::Collision));
                }
            }
            Phase::Collision => {
                self.collision_ticks += 1;
                step.collision_tick = self.collision_ticks;
                if self.collision_ticks > self.limits.collision_ticks {
                    step.entered = Some(self.enter(Phase::Decay));
                }
            }
            Phase::Decay => {
                step.sink = i32::try_from(self.decay_ticks / 2).unwrap_or(i32::MAX);
                self.decay_ticks += 1;
                step.scorch = self.decay_ticks < self.limits.scorch_ticks;
                if self.limits.base_row.saturating_add(step.sink) > self.limits.floor_row {
                    step.entered = Some(self.enter(Phase::Reset));
                }
            }
            Phase::Reset => {
                self.frame = 0;
                self.cycles += 1;
                step.entered = Some(self.enter(Phase::Approach));
                return step;
            }
        }

        if active && self.phase == Phase::Approach {
            self.frame += 1;
        }
        step
    }

    /// Move to `phase`, zeroing its phase-local counter.
    fn enter(&mut self, phase: Phase) -> Phase {
        debug_assert_eq!(phase, self.phase.next(), "phase skipped");
        match phase {
            Phase::Collision => self.collision_ticks = 0,
            Phase::Decay => self.decay_ticks = 0,
            Phase::Reset => {}
            Phase::Approach => {
                self.collision_ticks = 0;
                self.decay_ticks = 0;
            }
        }
        debug!(
            from = %self.phase,
            to = %phase,
            frame = self.frame,
            cycle = self.cycles,
            "phase transition"
        );
        self.phase = phase;
        phase
    }
}
