//! Headless demo: run the engine against an emulated screen.
//!
//! A scripted keyboard types a few commands, the render thread animates for
//! a moment, and the final screen is printed as plain text.
//!
//! Run with `cargo run --example headless`. Set `RUST_LOG=debug` to watch
//! the phase transitions on stderr.

use marquee::{Art, Engine, EngineConfig, Geometry, InputMode, MemoryScreen, ScriptedKeyboard};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> marquee::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = EngineConfig {
        speed_ms: 5,
        seed: Some(2024),
        input_poll: Duration::from_millis(10),
        ..EngineConfig::default()
    };
    let art = Art::boat();
    let geometry = Geometry::new(config.screen_width, &art)?;
    let screen = MemoryScreen::new(geometry.height + 12, geometry.width);

    let mut engine = Engine::new(config, art, screen)?;
    // Each idle poll is 10ms: roughly 60 frames pass before the status
    let mut keyboard = ScriptedKeyboard::new()
        .typed("set_text Ahoy from the headless demo!")
        .typed("start")
        .idle(30)
        .typed("show_status")
        .idle(20)
        .typed("exit");
    engine.run(&mut keyboard, InputMode::Keys)?;

    let telemetry = engine.telemetry();
    println!("{}", marquee_screen(&engine));
    println!();
    println!(
        "ticks: {}  frames: {}  bytes: {}",
        telemetry.ticks(),
        telemetry.frames(),
        telemetry.bytes()
    );
    Ok(())
}

fn marquee_screen(engine: &Engine<MemoryScreen>) -> String {
    engine
        .screen()
        .lock()
        .map_or_else(|poisoned| poisoned.into_inner().contents(), |screen| screen.contents())
}
