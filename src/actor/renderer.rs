//! Render Actor: dedicated thread that ticks the scene and draws it.
//!
//! Each tick: step the scene, encode the whole frame (no diffing), take the
//! display lock, move to the anchor, write once, release, sleep. The sleep
//! is a `recv_timeout` on a wake channel so a stop request is seen at the
//! next sleep boundary instead of after a full interval.

use super::control::ControlBlock;
use super::input::InputLine;
use super::messages::{FrameReport, Telemetry};
use crate::buffer::FrameBuffer;
use crate::error::{Error, Result};
use crate::scene::{Scene, Step};
use crate::terminal::{encode_frame, OutputBuffer, Screen, ScreenLayout};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use rand::Rng;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Everything the render thread shares with the rest of the engine.
pub struct RenderContext<S> {
    /// Display, locked for every write.
    pub screen: Arc<Mutex<S>>,
    /// Run/active flags, speed, text.
    pub control: Arc<ControlBlock>,
    /// Line being typed, drawn on the prompt row.
    pub input: Arc<InputLine>,
    /// Per-tick reports.
    pub telemetry: Arc<Telemetry>,
    /// Where the frame and prompt go.
    pub layout: ScreenLayout,
}

impl<S> Clone for RenderContext<S> {
    fn clone(&self) -> Self {
        Self {
            screen: Arc::clone(&self.screen),
            control: Arc::clone(&self.control),
            input: Arc::clone(&self.input),
            telemetry: Arc::clone(&self.telemetry),
            layout: self.layout,
        }
    }
}

/// Handle to a running render thread.
///
/// Dropping the handle clears the run flag and joins the thread.
pub struct RenderActor {
    /// Handle to the render thread.
    handle: Option<JoinHandle<()>>,
    /// Interrupts the thread's sleep.
    wake: Sender<()>,
    /// Flags shared with the thread.
    control: Arc<ControlBlock>,
}

impl RenderActor {
    /// Spawn a render thread drawing `scene`.
    ///
    /// The caller sets the run flag before spawning; the thread exits as soon
    /// as it sees the flag cleared.
    pub fn spawn<S, R>(scene: Scene<R>, context: RenderContext<S>) -> Result<Self>
    where
        S: Screen + 'static,
        R: Rng + Send + 'static,
    {
        // One slot: a second wake before the thread wakes up is redundant
        let (wake_tx, wake_rx) = bounded(1);
        let control = Arc::clone(&context.control);

        let render_loop = RenderLoop::new(scene, context);
        let handle = thread::Builder::new()
            .name("marquee-render".to_string())
            .spawn(move || render_loop.run(&wake_rx))
            .map_err(Error::ThreadSpawn)?;

        Ok(Self {
            handle: Some(handle),
            wake: wake_tx,
            control,
        })
    }

    /// Interrupt the current sleep so the thread re-reads its flags.
    pub fn wake(&self) {
        let _ = self.wake.try_send(());
    }

    /// Whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        match &self.handle {
            Some(handle) => handle.is_finished(),
            None => true,
        }
    }

    /// Clear the run flag, wake the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        self.control.set_running(false);
        self.wake();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("render thread panicked");
            }
        }
    }
}

impl Drop for RenderActor {
    fn drop(&mut self) {
        self.halt();
    }
}

impl std::fmt::Debug for RenderActor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderActor")
            .field("finished", &self.is_finished())
            .finish_non_exhaustive()
    }
}

/// State owned by the render thread.
struct RenderLoop<S, R> {
    scene: Scene<R>,
    frame: FrameBuffer,
    output: OutputBuffer,
    context: RenderContext<S>,
    /// Text revision last copied into the scene.
    text_revision: Option<u64>,
    ticks: u64,
}

impl<S: Screen, R: Rng> RenderLoop<S, R> {
    fn new(scene: Scene<R>, context: RenderContext<S>) -> Self {
        let frame = scene.geometry().frame();
        let capacity = frame.len() * 2 + 256;
        Self {
            scene,
            frame,
            output: OutputBuffer::with_capacity(capacity),
            context,
            text_revision: None,
            ticks: 0,
        }
    }

    fn run(mut self, wake: &Receiver<()>) {
        debug!("render loop started");
        while self.context.control.is_running() {
            self.tick();

            match wake.recv_timeout(self.context.control.tick_interval()) {
                Ok(()) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!(ticks = self.ticks, "render loop finished");
    }

    fn tick(&mut self) {
        let started = Instant::now();
        self.sync_text();

        let active = self.context.control.is_active();
        let step = self.scene.tick(active, &mut self.frame);
        self.ticks += 1;

        let bytes = if step.draws() { self.present() } else { None };
        let report = self.report(&step, active, bytes, started);
        trace!(
            tick = report.tick,
            phase = %step.phase,
            frame = step.frame,
            active,
            "tick"
        );
        self.context.telemetry.record(report);
    }

    /// Copy the banner text into the scene if it changed.
    fn sync_text(&mut self) {
        let revision = self.context.control.text_revision();
        if self.text_revision != Some(revision) {
            self.scene.set_text(&self.context.control.text());
            self.text_revision = Some(revision);
        }
    }

    /// Write the frame to the screen. Returns the bytes written, or `None`
    /// if the write failed.
    fn present(&mut self) -> Option<usize> {
        let prompt = self.context.input.snapshot();
        encode_frame(&self.frame, &self.context.layout, &prompt, &mut self.output);

        let result = {
            let mut screen = self
                .context
                .screen
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            write_frame(&mut *screen, self.context.layout.anchor, self.output.as_bytes())
        };

        match result {
            Ok(()) => Some(self.output.len()),
            Err(err) => {
                warn!(error = %err, "screen write failed");
                self.context.telemetry.record_write_error();
                None
            }
        }
    }

    fn report(&self, step: &Step, active: bool, bytes: Option<usize>, started: Instant) -> FrameReport {
        let [left, right] = self.scene.entities();
        FrameReport {
            tick: self.ticks,
            phase: step.phase,
            frame: step.frame,
            cycles: self.scene.machine().cycles(),
            positions: [left.x(), right.x()],
            sink: step.sink,
            active,
            drawn: bytes.is_some(),
            bytes: bytes.unwrap_or(0),
            render_time: started.elapsed(),
        }
    }
}

fn write_frame<S: Screen + ?Sized>(screen: &mut S, anchor: u16, bytes: &[u8]) -> io::Result<()> {
    screen.set_cursor(0, anchor)?;
    screen.write_raw(bytes)?;
    screen.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Art, Phase, SceneSettings};
    use crate::terminal::MemoryScreen;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::time::Duration;

    fn context(speed_ms: u64) -> RenderContext<MemoryScreen> {
        let settings = SceneSettings::default();
        let geometry = crate::scene::Geometry::new(settings.screen_width, &Art::boat()).unwrap();
        let layout = ScreenLayout::new(geometry.height);
        RenderContext {
            screen: Arc::new(Mutex::new(MemoryScreen::new(layout.message_row() + 4, geometry.width))),
            control: Arc::new(ControlBlock::new(speed_ms, "")),
            input: Arc::new(InputLine::new()),
            telemetry: Arc::new(Telemetry::new()),
            layout,
        }
    }

    fn scene() -> Scene<Pcg32> {
        Scene::new(Art::boat(), &SceneSettings::default(), Pcg32::seed_from_u64(7)).unwrap()
    }

    fn wait_for_ticks(telemetry: &Telemetry, ticks: u64) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while telemetry.ticks() < ticks {
            assert!(Instant::now() < deadline, "render thread stalled");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_loop_draws_frames_directly() {
        let context = context(1);
        let mut render_loop = RenderLoop::new(scene(), context.clone());
        context.control.set_active(true);
        render_loop.tick();
        render_loop.tick();

        assert_eq!(context.telemetry.ticks(), 2);
        assert_eq!(context.telemetry.frames(), 2);
        let latest = context.telemetry.latest().unwrap();
        assert_eq!(latest.phase, Phase::Approach);
        assert_eq!(latest.frame, 1);

        let screen = context.screen.lock().unwrap();
        assert!(screen.row(4).starts_with("    __|__"));
        assert!(screen.row(context.layout.prompt_row()).starts_with("> "));
    }

    #[test]
    fn test_text_change_reaches_banner() {
        let context = context(1);
        let mut render_loop = RenderLoop::new(scene(), context.clone());
        render_loop.tick();
        context.control.set_text("Ahoy");
        render_loop.tick();
        let screen = context.screen.lock().unwrap();
        assert!(screen.row(0).starts_with("Ahoy"));
    }

    #[test]
    fn test_prompt_mirror_is_drawn() {
        let context = context(1);
        let mut editor = crate::actor::LineEditor::new(Arc::clone(&context.input));
        editor.apply(crate::terminal::Key::Char('h'));
        editor.apply(crate::terminal::Key::Char('e'));
        let mut render_loop = RenderLoop::new(scene(), context.clone());
        render_loop.tick();
        let screen = context.screen.lock().unwrap();
        assert!(screen.row(context.layout.prompt_row()).starts_with("> he"));
    }

    #[test]
    fn test_thread_stops_within_a_sleep() {
        // A long interval: only the wake channel can end the sleep quickly
        let context = context(60_000);
        context.control.set_running(true);
        context.control.set_active(true);
        let actor = RenderActor::spawn(scene(), context.clone()).unwrap();
        wait_for_ticks(&context.telemetry, 1);

        let started = Instant::now();
        actor.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!context.control.is_running());
        assert_eq!(context.telemetry.ticks(), 1);
    }

    #[test]
    fn test_paused_thread_keeps_ticking() {
        let context = context(1);
        context.control.set_running(true);
        let actor = RenderActor::spawn(scene(), context.clone()).unwrap();

        wait_for_ticks(&context.telemetry, 5);
        let frozen = context.telemetry.latest().unwrap();
        wait_for_ticks(&context.telemetry, frozen.tick + 20);
        let later = context.telemetry.latest().unwrap();

        assert!(!actor.is_finished());
        assert_eq!(later.frame, 0);
        assert_eq!(later.positions, frozen.positions);
        assert!(!later.active);
        drop(actor);
        assert!(!context.control.is_running());
    }
}
