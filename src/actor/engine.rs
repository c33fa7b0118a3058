//! Engine: owns the render thread and runs the command loop.
//!
//! The engine is the command side of the program. It holds the only handle
//! to the render thread, so starting twice can never spawn a second loop,
//! and it serializes its own screen output with the render thread through
//! the shared screen lock.

use super::control::ControlBlock;
use super::input::{Edit, InputLine, LineEditor};
use super::messages::Telemetry;
use super::renderer::{RenderActor, RenderContext};
use crate::command::{Command, Outcome, HELP};
use crate::config::{EngineConfig, StopMode};
use crate::error::Result;
use crate::scene::{Art, Geometry, Scene, SceneSettings};
use crate::terminal::{encode_message, encode_prompt, Keyboard, OutputBuffer, Screen, ScreenLayout};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use tracing::{debug, info, warn};

/// How the command loop reads input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Poll single keys and edit the line in place (raw terminal).
    #[default]
    Keys,
    /// Block on whole lines (piped or cooked input).
    Lines,
}

/// Greeting shown when the command loop starts.
pub const GREETING: &str = "Type 'help' to see available commands.";

/// The animation engine.
pub struct Engine<S: Screen + 'static> {
    /// Configuration.
    config: EngineConfig,
    /// Art template for new scenes.
    art: Art,
    /// State shared with the render thread.
    context: RenderContext<S>,
    /// The render thread, if one has been started.
    renderer: Option<RenderActor>,
    /// Render threads spawned so far.
    runs: u64,
    /// Scratch buffer for command output.
    output: OutputBuffer,
}

impl<S: Screen + 'static> Engine<S> {
    /// Create an engine drawing `art` on `screen`. No thread is started.
    pub fn new(config: EngineConfig, art: Art, screen: S) -> Result<Self> {
        config.validate()?;
        let geometry = Geometry::new(config.screen_width, &art)?;

        let context = RenderContext {
            screen: Arc::new(Mutex::new(screen)),
            control: Arc::new(ControlBlock::new(config.speed_ms, config.text.clone())),
            input: Arc::new(InputLine::new()),
            telemetry: Arc::new(Telemetry::new()),
            layout: ScreenLayout::new(geometry.height),
        };

        Ok(Self {
            config,
            art,
            context,
            renderer: None,
            runs: 0,
            output: OutputBuffer::new(),
        })
    }

    /// Shared control block.
    pub const fn control(&self) -> &Arc<ControlBlock> {
        &self.context.control
    }

    /// Render telemetry.
    pub const fn telemetry(&self) -> &Arc<Telemetry> {
        &self.context.telemetry
    }

    /// The screen, behind the display lock.
    pub const fn screen(&self) -> &Arc<Mutex<S>> {
        &self.context.screen
    }

    /// Screen layout.
    pub const fn layout(&self) -> ScreenLayout {
        self.context.layout
    }

    /// Render threads spawned so far.
    pub const fn runs(&self) -> u64 {
        self.runs
    }

    /// Whether a render thread is alive.
    pub fn is_rendering(&self) -> bool {
        self.renderer.as_ref().is_some_and(|r| !r.is_finished())
    }

    /// Start the animation, or resume it if paused.
    pub fn start(&mut self) -> Outcome {
        let control = &self.context.control;
        if self.is_rendering() {
            if control.is_active() {
                return Outcome::notice("Animation already running.");
            }
            control.set_active(true);
            info!("animation resumed");
            return Outcome::applied("Animation resumed.");
        }

        // A thread that ended on its own is reaped before starting over
        if let Some(stale) = self.renderer.take() {
            warn!("render thread exited unexpectedly");
            stale.stop();
        }

        match self.spawn_renderer() {
            Ok(actor) => {
                self.renderer = Some(actor);
                self.runs += 1;
                info!(run = self.runs, speed_ms = control.speed_ms(), "animation started");
                Outcome::applied("Animation started.")
            }
            Err(err) => {
                control.set_running(false);
                control.set_active(false);
                warn!(error = %err, "could not start animation");
                Outcome::rejected(format!("Could not start animation: {err}"))
            }
        }
    }

    fn spawn_renderer(&self) -> Result<RenderActor> {
        let seed = match self.config.seed {
            Some(seed) => seed.wrapping_add(self.runs),
            None => rand::random(),
        };
        let scene = Scene::new(
            self.art.clone(),
            &SceneSettings::from(&self.config),
            Pcg32::seed_from_u64(seed),
        )?;

        self.context.control.set_running(true);
        self.context.control.set_active(true);
        RenderActor::spawn(scene, self.context.clone())
    }

    /// Stop the animation: pause it or halt the thread, per the stop mode.
    pub fn stop(&mut self) -> Outcome {
        match self.config.stop_mode {
            StopMode::Pause => {
                if !self.is_rendering() {
                    return Outcome::notice("Animation not started yet.");
                }
                if !self.context.control.is_active() {
                    return Outcome::notice("Animation already paused.");
                }
                self.context.control.set_active(false);
                info!("animation paused");
                Outcome::applied("Animation paused.")
            }
            StopMode::Halt => {
                if !self.is_rendering() {
                    return Outcome::notice("Animation not running.");
                }
                self.halt();
                info!("animation stopped");
                Outcome::applied("Animation stopped.")
            }
        }
    }

    /// Set milliseconds per tick.
    pub fn set_speed(&self, speed_ms: u64) -> Outcome {
        if !self.context.control.set_speed(speed_ms) {
            return Outcome::rejected("Speed must be a positive number.");
        }
        // A thread asleep on the old interval picks up the new one now
        if let Some(renderer) = &self.renderer {
            renderer.wake();
        }
        info!(speed_ms, "speed changed");
        Outcome::applied(format!("Speed set to {speed_ms} ms."))
    }

    /// Replace the banner text.
    pub fn set_text(&self, text: &str) -> Outcome {
        self.context.control.set_text(text);
        info!(len = text.len(), "text changed");
        Outcome::applied("Text updated (position preserved).")
    }

    /// Multi-line status report.
    pub fn status(&self) -> String {
        let control = &self.context.control;
        let running = if self.is_rendering() { "YES" } else { "NO" };
        let state = match (self.is_rendering(), control.is_active()) {
            (false, _) => "stopped",
            (true, true) => "advancing",
            (true, false) => "paused",
        };
        let phase = self.context.telemetry.latest().map_or_else(
            || "-".to_string(),
            |r| format!("{} (cycle {}, frame {})", r.phase, r.cycles, r.frame),
        );

        format!(
            "Status:\n \
             animation running : {running}\n \
             animation state   : {state}\n \
             animation speed   : {} ms/frame\n \
             phase             : {phase}\n \
             write errors      : {}\n \
             text              : \"{}\"",
            control.speed_ms(),
            self.context.telemetry.write_errors(),
            control.text(),
        )
    }

    /// Stop everything and report that the program is leaving.
    pub fn exit(&mut self) -> Outcome {
        self.shutdown();
        info!("exit requested");
        Outcome::exit("Goodbye!")
    }

    /// Parse and run one input line.
    pub fn dispatch(&mut self, line: &str) -> Outcome {
        match Command::parse(line) {
            Ok(Some(command)) => self.execute(command),
            Ok(None) => Outcome::silent(),
            Err(err) => {
                debug!(line, error = %err, "command rejected");
                err.into()
            }
        }
    }

    /// Run a parsed command.
    pub fn execute(&mut self, command: Command) -> Outcome {
        match command {
            Command::Help => Outcome::notice(HELP),
            Command::Start => self.start(),
            Command::Stop => self.stop(),
            Command::SetSpeed(ms) => self.set_speed(ms),
            Command::SetText(text) => self.set_text(&text),
            Command::Status => Outcome::notice(self.status()),
            Command::Exit => self.exit(),
        }
    }

    /// Run the command loop until `exit`, an interrupt, or end of input.
    ///
    /// The render thread is stopped before this returns, whatever the reason.
    pub fn run<K: Keyboard>(&mut self, keyboard: &mut K, mode: InputMode) -> Result<()> {
        let result = self.greet().and_then(|()| match mode {
            InputMode::Keys => self.run_keys(keyboard),
            InputMode::Lines => self.run_lines(keyboard),
        });
        self.shutdown();
        result
    }

    fn run_keys<K: Keyboard>(&mut self, keyboard: &mut K) -> Result<()> {
        let mut editor = LineEditor::new(Arc::clone(&self.context.input));
        loop {
            let Some(key) = keyboard.read_key_nonblocking()? else {
                thread::sleep(self.config.input_poll);
                continue;
            };

            let line = match editor.apply(key) {
                Edit::Changed => {
                    self.redraw_prompt()?;
                    continue;
                }
                Edit::Unchanged => continue,
                Edit::Submitted(line) => line,
                Edit::Interrupt => "exit".to_string(),
            };
            if self.handle_line(&line)? {
                return Ok(());
            }
        }
    }

    fn run_lines<K: Keyboard>(&mut self, keyboard: &mut K) -> Result<()> {
        loop {
            let Some(line) = keyboard.read_line_blocking()? else {
                // End of input counts as exit
                self.handle_line("exit")?;
                return Ok(());
            };
            if self.handle_line(&line)? {
                return Ok(());
            }
        }
    }

    /// Dispatch a line and show its message. Returns whether to exit.
    fn handle_line(&mut self, line: &str) -> Result<bool> {
        let outcome = self.dispatch(line);
        if outcome.message.is_empty() {
            self.redraw_prompt()?;
        } else {
            self.show(&outcome.message)?;
        }
        Ok(outcome.exit)
    }

    fn greet(&mut self) -> Result<()> {
        lock(&self.context.screen).clear_screen()?;
        self.show(GREETING)
    }

    /// Replace the message area with `message`, then put the cursor back on
    /// the prompt.
    fn show(&mut self, message: &str) -> Result<()> {
        let prompt = self.context.input.snapshot();
        let layout = self.context.layout;
        let mut screen = lock(&self.context.screen);

        encode_message(&layout, message, &mut self.output);
        screen.write_raw(self.output.as_bytes())?;
        encode_prompt(&layout, &prompt, &mut self.output);
        screen.write_raw(self.output.as_bytes())?;
        screen.flush()?;
        Ok(())
    }

    fn redraw_prompt(&mut self) -> Result<()> {
        let prompt = self.context.input.snapshot();
        encode_prompt(&self.context.layout, &prompt, &mut self.output);
        let mut screen = lock(&self.context.screen);
        screen.write_raw(self.output.as_bytes())?;
        screen.flush()?;
        Ok(())
    }

    fn halt(&mut self) {
        if let Some(actor) = self.renderer.take() {
            actor.stop();
        }
        self.context.control.set_active(false);
    }

    /// Stop the render thread if one is running.
    pub fn shutdown(&mut self) {
        self.halt();
        self.context.control.set_running(false);
    }
}

impl<S: Screen + 'static> Drop for Engine<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S: Screen + 'static> std::fmt::Debug for Engine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("renderer", &self.renderer)
            .field("runs", &self.runs)
            .finish_non_exhaustive()
    }
}

fn lock<S>(screen: &Mutex<S>) -> MutexGuard<'_, S> {
    screen.lock().unwrap_or_else(PoisonError::into_inner)
}
