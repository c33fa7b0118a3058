//! Engine configuration.
//!
//! Values are supplied once at startup. Speed and banner text are only the
//! initial values: both can be changed at runtime through commands.

use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// What `stop` does to a running animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopMode {
    /// Freeze the approach; the render thread keeps drawing and `start`
    /// resumes where it left off.
    #[default]
    Pause,
    /// Shut the render thread down; `start` spawns a fresh one.
    Halt,
}

impl std::str::FromStr for StopMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pause" => Ok(Self::Pause),
            "halt" => Ok(Self::Halt),
            other => Err(Error::InvalidConfig(format!(
                "stop mode must be 'pause' or 'halt', got '{other}'"
            ))),
        }
    }
}

/// Configuration for the [`Engine`](crate::Engine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Milliseconds per tick.
    pub speed_ms: u64,
    /// Initial banner text (empty hides the banner).
    pub text: String,
    /// Path of the art template.
    pub art_path: PathBuf,
    /// Seed for glyph substitution. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    /// Scene width in columns.
    pub screen_width: u16,
    /// Behaviour of the `stop` command.
    pub stop_mode: StopMode,
    /// Collision ticks before decay starts.
    pub collision_ticks: u32,
    /// One in `scorch_chance` entity cells is scorched per decay tick.
    pub scorch_chance: u32,
    /// Decay ticks during which scorching applies.
    pub scorch_ticks: u32,
    /// One in `splash_chance` wave cells splashes per decay tick.
    pub splash_chance: u32,
    /// Interval between keyboard polls.
    pub input_poll: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            speed_ms: 50,
            text: String::new(),
            art_path: PathBuf::from("assets/boat.txt"),
            seed: None,
            screen_width: 100,
            stop_mode: StopMode::Pause,
            collision_ticks: 15,
            scorch_chance: 15,
            scorch_ticks: 40,
            splash_chance: 6,
            input_poll: Duration::from_millis(50),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `MARQUEE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    ///
    /// Recognized keys: `MARQUEE_SPEED`, `MARQUEE_TEXT`, `MARQUEE_ART`,
    /// `MARQUEE_SEED`, `MARQUEE_WIDTH`, `MARQUEE_STOP_MODE`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(speed) = lookup("MARQUEE_SPEED") {
            config.speed_ms = parse_number("MARQUEE_SPEED", &speed)?;
        }
        if let Some(text) = lookup("MARQUEE_TEXT") {
            config.text = text;
        }
        if let Some(path) = lookup("MARQUEE_ART") {
            config.art_path = PathBuf::from(path);
        }
        if let Some(seed) = lookup("MARQUEE_SEED") {
            config.seed = Some(parse_number("MARQUEE_SEED", &seed)?);
        }
        if let Some(width) = lookup("MARQUEE_WIDTH") {
            config.screen_width = parse_number("MARQUEE_WIDTH", &width)?;
        }
        if let Some(mode) = lookup("MARQUEE_STOP_MODE") {
            config.stop_mode = mode.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.speed_ms == 0 {
            return Err(Error::InvalidConfig("speed must be positive".into()));
        }
        if self.screen_width == 0 {
            return Err(Error::InvalidConfig("screen width must be positive".into()));
        }
        if self.scorch_chance == 0 || self.splash_chance == 0 {
            return Err(Error::InvalidConfig(
                "substitution chances must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Tick interval as a `Duration`.
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.speed_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("{key} must be a number, got '{value}'")))
}
