//! Scene: the looping animation drawn into each frame.
//!
//! A [`Scene`] ties the pieces together for one render run:
//!
//! - [`Machine`] decides the phase and counters for the tick
//! - [`Entity`] positions follow from the machine's step
//! - [`Compositor`] draws everything into a [`FrameBuffer`]
//! - [`Marquee`] supplies the banner text
//!
//! The scene is owned by the render thread; nothing in here is shared.

mod art;
mod compositor;
mod entity;
mod machine;
mod marquee;

pub use art::Art;
pub use compositor::{
    Compositor, IMPACT_MARKER, SCORCH_GLYPHS, SPLASH_GLYPH, TURBULENCE_GLYPHS, WAVE_GLYPH,
};
pub use entity::{approach_position, overlapping, Distortion, Entity, Side, APPROACH_RATE};
pub use machine::{Limits, Machine, Phase, Step};
pub use marquee::Marquee;

use crate::buffer::FrameBuffer;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use rand::Rng;

/// Rows at the bottom of the screen holding the wave band.
pub const WAVE_ROWS: u16 = 3;

/// Rows added to the art height to get the screen height.
const EXTRA_ROWS: u16 = 8;

/// Screen and art dimensions, fixed for the life of a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Screen width in columns.
    pub width: u16,
    /// Screen height in rows.
    pub height: u16,
    /// Art width in columns.
    pub art_width: u16,
    /// Art height in rows.
    pub art_height: u16,
}

impl Geometry {
    /// Lay out a screen `width` columns wide around `art`.
    ///
    /// The screen is eight rows taller than the art. Fails if the art is
    /// wider than the screen.
    pub fn new(width: u16, art: &Art) -> Result<Self> {
        let art_width = u16::try_from(art.width())
            .map_err(|_| Error::InvalidConfig("art template is too wide".into()))?;
        let art_height = u16::try_from(art.height())
            .ok()
            .filter(|h| h.checked_add(EXTRA_ROWS).is_some())
            .ok_or_else(|| Error::InvalidConfig("art template is too tall".into()))?;

        if art_width > width {
            return Err(Error::InvalidConfig(format!(
                "screen width {width} is narrower than the art ({art_width} columns)"
            )));
        }

        Ok(Self {
            width,
            height: art_height + EXTRA_ROWS,
            art_width,
            art_height,
        })
    }

    /// Row the entities' art starts on before sinking.
    pub const fn base_row(&self) -> i32 {
        self.height as i32 - 4 - self.art_height as i32
    }

    /// First row of the wave band.
    pub const fn wave_top(&self) -> i32 {
        (self.height - WAVE_ROWS) as i32
    }

    /// Row of the collision impact marker.
    pub const fn impact_row(&self) -> i32 {
        self.base_row() - 2
    }

    /// A blank frame of the screen's size.
    pub fn frame(&self) -> FrameBuffer {
        FrameBuffer::new(self.width, self.height)
    }
}

/// Scene tunables taken from the engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneSettings {
    /// Screen width in columns.
    pub screen_width: u16,
    /// Collision ticks before decay starts.
    pub collision_ticks: u32,
    /// Decay ticks during which scorching applies.
    pub scorch_ticks: u32,
    /// One in N entity cells scorched.
    pub scorch_chance: u32,
    /// One in N wave cells splashed.
    pub splash_chance: u32,
}

impl From<&EngineConfig> for SceneSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            screen_width: config.screen_width,
            collision_ticks: config.collision_ticks,
            scorch_ticks: config.scorch_ticks,
            scorch_chance: config.scorch_chance,
            splash_chance: config.splash_chance,
        }
    }
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

/// One animated scene: two entities, the sea, and a banner.
#[derive(Debug)]
pub struct Scene<R> {
    art: Art,
    geometry: Geometry,
    machine: Machine,
    entities: [Entity; 2],
    compositor: Compositor,
    marquee: Marquee,
    rng: R,
}

impl<R: Rng> Scene<R> {
    /// Build a scene at the start of its first approach.
    pub fn new(art: Art, settings: &SceneSettings, rng: R) -> Result<Self> {
        let geometry = Geometry::new(settings.screen_width, &art)?;
        let limits = Limits {
            collision_ticks: settings.collision_ticks,
            scorch_ticks: settings.scorch_ticks,
            base_row: geometry.base_row(),
            floor_row: i32::from(geometry.height),
        };

        Ok(Self {
            art,
            geometry,
            machine: Machine::new(limits),
            entities: [
                Entity::new(Side::Left, &geometry),
                Entity::new(Side::Right, &geometry),
            ],
            compositor: Compositor::new(geometry, settings.scorch_chance, settings.splash_chance),
            marquee: Marquee::default(),
            rng,
        })
    }

    /// Run one tick and, unless it is the reset tick, draw it into `frame`.
    ///
    /// `active` gates the approach and the banner scroll. The returned step
    /// tells the caller whether anything was drawn.
    pub fn tick(&mut self, active: bool, frame: &mut FrameBuffer) -> Step {
        let overlap = overlapping(&self.geometry, self.machine.frame());
        let step = self.machine.step(overlap, active);

        if !step.draws() {
            self.entities = [
                Entity::new(Side::Left, &self.geometry),
                Entity::new(Side::Right, &self.geometry),
            ];
            return step;
        }

        for entity in &mut self.entities {
            entity.advance(&self.geometry, &step);
        }

        let banner = (!self.marquee.is_empty()).then(|| self.marquee.visible());
        self.compositor.compose(
            frame,
            &step,
            &self.entities,
            &self.art,
            banner.as_deref(),
            &mut self.rng,
        );

        if active {
            self.marquee.advance();
        }
        step
    }

    /// Replace the banner text, keeping its scroll position.
    pub fn set_text(&mut self, text: &str) {
        self.marquee.set_text(text);
    }

    /// Screen layout.
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// State machine.
    pub const fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Both entities, left then right.
    pub const fn entities(&self) -> &[Entity; 2] {
        &self.entities
    }

    /// Banner.
    pub const fn marquee(&self) -> &Marquee {
        &self.marquee
    }
}
