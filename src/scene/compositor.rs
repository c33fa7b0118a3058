//! Scene Compositor: turns one machine step into a full frame.
//!
//! Every call starts from a blank frame, so nothing from the previous tick
//! survives. Drawing order, later layers on top:
//!
//! 1. impact marker (collision only)
//! 2. left entity, then right entity (opaque, spaces included)
//! 3. wave band
//! 4. text banner
//!
//! All randomness comes from the caller's RNG; with a fixed seed the output
//! is exact.

use super::entity::Entity;
use super::machine::{Phase, Step};
use super::{Art, Geometry};
use crate::buffer::{Cell, FrameBuffer, Layer};
use rand::Rng;

/// Glyphs a scorched entity cell can turn into.
pub const SCORCH_GLYPHS: [char; 5] = ['^', '*', '!', '#', '\''];
/// Wave glyphs during collision.
pub const TURBULENCE_GLYPHS: [char; 4] = ['~', '^', '#', '*'];
/// Calm wave glyph.
pub const WAVE_GLYPH: char = '~';
/// Occasional decay wave glyph.
pub const SPLASH_GLYPH: char = '^';
/// Marker drawn above the point of impact.
pub const IMPACT_MARKER: &str = "\\  ^  ^  ^  /";

/// Draws scene content into frames.
#[derive(Debug, Clone)]
pub struct Compositor {
    geometry: Geometry,
    scorch_chance: u32,
    splash_chance: u32,
}

impl Compositor {
    /// Create a compositor for `geometry`. Chances are 1-in-N and clamped
    /// to at least 1.
    pub fn new(geometry: Geometry, scorch_chance: u32, splash_chance: u32) -> Self {
        Self {
            geometry,
            scorch_chance: scorch_chance.max(1),
            splash_chance: splash_chance.max(1),
        }
    }

    /// Overwrite `frame` with the scene for `step`.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        frame: &mut FrameBuffer,
        step: &Step,
        entities: &[Entity; 2],
        art: &Art,
        banner: Option<&str>,
        rng: &mut R,
    ) {
        frame.clear();

        if step.phase == Phase::Collision {
            self.draw_impact(frame, entities);
        }
        for entity in entities {
            self.draw_entity(frame, entity, art, step.scorch, rng);
        }
        self.draw_waves(frame, step, rng);
        if let Some(text) = banner {
            draw_banner(frame, text);
        }
    }

    fn draw_impact(&self, frame: &mut FrameBuffer, entities: &[Entity; 2]) {
        let [left, right] = entities;
        let width = i32::from(self.geometry.art_width);
        let mid = (left.column() + right.column() + width) / 2;
        let y = left.top_row(&self.geometry) - 2;

        let half = i32::try_from(IMPACT_MARKER.len() / 2).unwrap_or(0);
        for (x, ch) in (mid - half..).zip(IMPACT_MARKER.chars()) {
            frame.put(x, y, Cell::new(ch, Layer::EFFECT));
        }
    }

    fn draw_entity<R: Rng + ?Sized>(
        &self,
        frame: &mut FrameBuffer,
        entity: &Entity,
        art: &Art,
        scorch: bool,
        rng: &mut R,
    ) {
        let top = entity.top_row(&self.geometry);
        let left = entity.column();

        for (y, (i, row)) in (top..).zip(art.rows().iter().enumerate()) {
            let pad = entity.row_padding(i, art.height());
            let mut x = left;
            for _ in 0..pad {
                frame.put(x, y, Cell::new(' ', Layer::ENTITY));
                x += 1;
            }

            for &ch in row {
                let cell = if scorch && ch != ' ' && rng.random_ratio(1, self.scorch_chance) {
                    let glyph = SCORCH_GLYPHS[rng.random_range(0..SCORCH_GLYPHS.len())];
                    (glyph, Layer::ENTITY | Layer::EFFECT)
                } else {
                    (ch, Layer::ENTITY)
                };
                let advance = frame.put_char(x, y, cell.0, cell.1);
                x += i32::try_from(advance).unwrap_or(1);
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn draw_waves<R: Rng + ?Sized>(&self, frame: &mut FrameBuffer, step: &Step, rng: &mut R) {
        let top = self.geometry.wave_top();
        let drift = f64::from(step.frame) * 0.5;

        for y in top..i32::from(self.geometry.height) {
            for x in 0..i32::from(self.geometry.width) {
                let crest = (2.0 * ((f64::from(x) + drift) * 0.5).sin()).floor() as i32;
                if crest != y - top {
                    continue;
                }
                let cell = match step.phase {
                    Phase::Collision => Cell::new(
                        TURBULENCE_GLYPHS[rng.random_range(0..TURBULENCE_GLYPHS.len())],
                        Layer::WAVE | Layer::EFFECT,
                    ),
                    Phase::Decay if rng.random_ratio(1, self.splash_chance) => {
                        Cell::new(SPLASH_GLYPH, Layer::WAVE | Layer::EFFECT)
                    }
                    _ => Cell::new(WAVE_GLYPH, Layer::WAVE),
                };
                frame.put(x, y, cell);
            }
        }
    }
}

/// Draw `text` along row 0, clipped to the frame width.
fn draw_banner(frame: &mut FrameBuffer, text: &str) {
    let width = i32::from(frame.width());
    let mut x = 0;
    for ch in text.chars() {
        if x >= width {
            break;
        }
        x += i32::try_from(frame.put_char(x, 0, ch, Layer::BANNER)).unwrap_or(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::entity::Side;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (Geometry, Art, Compositor) {
        let art = Art::boat();
        let geometry = Geometry::new(100, &art).unwrap();
        let compositor = Compositor::new(geometry, 15, 6);
        (geometry, art, compositor)
    }

    fn entities_at(geometry: &Geometry, step: &Step) -> [Entity; 2] {
        let mut pair = [Entity::new(Side::Left, geometry), Entity::new(Side::Right, geometry)];
        for entity in &mut pair {
            entity.advance(geometry, step);
        }
        pair
    }

    fn approach(frame: u32) -> Step {
        Step {
            phase: Phase::Approach,
            frame,
            ..Step::default()
        }
    }

    #[test]
    fn test_every_cell_overwritten() {
        let (geometry, art, compositor) = setup();
        let mut frame = FrameBuffer::new(geometry.width, geometry.height);
        frame.fill(Cell::new('\u{2588}', Layer::all()));

        let step = approach(10);
        let entities = entities_at(&geometry, &step);
        let mut rng = Pcg32::seed_from_u64(1);
        compositor.compose(&mut frame, &step, &entities, &art, None, &mut rng);

        assert!(frame.cells().iter().all(|cell| cell.ch() != '\u{2588}'));
    }

    #[test]
    fn test_entities_drawn_at_positions() {
        let (geometry, art, compositor) = setup();
        let mut frame = FrameBuffer::new(geometry.width, geometry.height);
        let step = approach(0);
        let entities = entities_at(&geometry, &step);
        compositor.compose(&mut frame, &step, &entities, &art, None, &mut Pcg32::seed_from_u64(0));

        let base = u16::try_from(geometry.base_row()).unwrap();
        let row = frame.row_text(base).unwrap();
        assert!(row.starts_with("    __|__ |___| |\\"));
        assert_eq!(&row[76..76 + 18], "    __|__ |___| |\\");
        assert_eq!(frame.get(4, base).unwrap().layer(), Layer::ENTITY);
    }

    #[test]
    fn test_off_screen_cells_dropped() {
        let (geometry, art, compositor) = setup();
        let mut frame = FrameBuffer::new(geometry.width, geometry.height);
        let step = Step {
            phase: Phase::Decay,
            frame: 52,
            sink: 9,
            ..Step::default()
        };
        let entities = entities_at(&geometry, &step);
        compositor.compose(&mut frame, &step, &entities, &art, None, &mut Pcg32::seed_from_u64(3));
        // base 4 + sink 9 = row 13: only the first art row is still on screen
        assert!(frame.row_text(13).unwrap().contains("__|__"));
        assert!(!frame.row_text(12).unwrap().contains('|'));
    }

    #[test]
    fn test_wave_band_matches_formula() {
        let (geometry, art, compositor) = setup();
        let mut frame = FrameBuffer::new(geometry.width, geometry.height);
        let step = approach(7);
        let entities = entities_at(&geometry, &step);
        compositor.compose(&mut frame, &step, &entities, &art, None, &mut Pcg32::seed_from_u64(0));

        let top = geometry.wave_top();
        for y in top..i32::from(geometry.height) {
            for x in 0..i32::from(geometry.width) {
                #[allow(clippy::cast_possible_truncation)]
                let crest = (2.0 * ((f64::from(x) + 3.5) * 0.5).sin()).floor() as i32;
                let cell = frame.get(u16::try_from(x).unwrap(), u16::try_from(y).unwrap()).unwrap();
                assert_eq!(cell.layer().contains(Layer::WAVE), crest == y - top, "({x},{y})");
                if crest == y - top {
                    assert_eq!(cell.ch(), WAVE_GLYPH);
                }
            }
        }
        assert_eq!(frame.count_layer(Layer::EFFECT), 0);
    }

    #[test]
    fn test_collision_turbulence_and_impact() {
        let (geometry, art, compositor) = setup();
        let mut frame = FrameBuffer::new(geometry.width, geometry.height);
        let step = Step {
            phase: Phase::Collision,
            frame: 52,
            collision_tick: 1,
            ..Step::default()
        };
        let entities = entities_at(&geometry, &step);
        compositor.compose(&mut frame, &step, &entities, &art, None, &mut Pcg32::seed_from_u64(9));

        let impact_row = u16::try_from(geometry.base_row() - 2).unwrap();
        assert!(frame.row_text(impact_row).unwrap().contains(IMPACT_MARKER));
        let waves: Vec<&Cell> = frame
            .cells()
            .iter()
            .filter(|c| c.layer().contains(Layer::WAVE))
            .collect();
        assert!(!waves.is_empty());
        assert!(waves.iter().all(|c| c.layer().contains(Layer::EFFECT)));
        assert!(waves.iter().all(|c| TURBULENCE_GLYPHS.contains(&c.ch())));
    }

    #[test]
    fn test_skewed_rows_lean() {
        let (geometry, art, compositor) = setup();
        let mut frame = FrameBuffer::new(geometry.width, geometry.height);
        let step = Step {
            phase: Phase::Collision,
            frame: 0,
            ..Step::default()
        };
        let entities = entities_at(&geometry, &step);
        compositor.compose(&mut frame, &step, &entities, &art, None, &mut Pcg32::seed_from_u64(0));

        let base = u16::try_from(geometry.base_row()).unwrap();
        // Left entity: last row padded by 5 / 2 = 2
        let last = frame.row_text(base + 5).unwrap();
        assert!(last.starts_with("    \\   o"));
    }

    #[test]
    fn test_scorch_is_seeded() {
        let (geometry, art, compositor) = setup();
        let step = Step {
            phase: Phase::Decay,
            frame: 52,
            scorch: true,
            ..Step::default()
        };
        let entities = entities_at(&geometry, &step);

        let render = |seed| {
            let mut frame = FrameBuffer::new(geometry.width, geometry.height);
            compositor.compose(&mut frame, &step, &entities, &art, None, &mut Pcg32::seed_from_u64(seed));
            frame
        };
        let a = render(42);
        let b = render(42);
        assert_eq!(a, b);

        let scorched: Vec<char> = a
            .cells()
            .iter()
            .filter(|c| c.layer().contains(Layer::ENTITY | Layer::EFFECT))
            .map(Cell::ch)
            .collect();
        assert!(scorched.iter().all(|c| SCORCH_GLYPHS.contains(c)));
    }

    #[test]
    fn test_scorch_rate_is_roughly_one_in_n() {
        let (geometry, art, compositor) = setup();
        let step = Step {
            phase: Phase::Decay,
            frame: 0,
            scorch: true,
            ..Step::default()
        };
        let entities = entities_at(&geometry, &step);
        let visible: usize = art.rows().iter().flatten().filter(|c| **c != ' ').count() * 2;

        let mut rng = Pcg32::seed_from_u64(5);
        let mut scorched = 0;
        let rounds = 200;
        for _ in 0..rounds {
            let mut frame = FrameBuffer::new(geometry.width, geometry.height);
            compositor.compose(&mut frame, &step, &entities, &art, None, &mut rng);
            scorched += frame
                .cells()
                .iter()
                .filter(|c| c.layer() == (Layer::ENTITY | Layer::EFFECT))
                .count();
        }
        #[allow(clippy::cast_precision_loss)]
        let rate = scorched as f64 / (visible * rounds) as f64;
        assert!((0.03..0.11).contains(&rate), "scorch rate {rate}");
    }

    #[test]
    fn test_decay_splash_rate_is_roughly_one_in_n() {
        let (geometry, art, compositor) = setup();
        let step = Step {
            phase: Phase::Decay,
            frame: 52,
            ..Step::default()
        };
        let entities = entities_at(&geometry, &step);

        let mut rng = Pcg32::seed_from_u64(11);
        let (mut waves, mut splashes) = (0usize, 0usize);
        let rounds = 300;
        for _ in 0..rounds {
            let mut frame = FrameBuffer::new(geometry.width, geometry.height);
            compositor.compose(&mut frame, &step, &entities, &art, None, &mut rng);
            for cell in frame.cells().iter().filter(|c| c.layer().contains(Layer::WAVE)) {
                waves += 1;
                if cell.ch() == SPLASH_GLYPH {
                    assert_eq!(cell.layer(), Layer::WAVE | Layer::EFFECT);
                    splashes += 1;
                } else {
                    assert_eq!(cell.ch(), WAVE_GLYPH);
                    assert_eq!(cell.layer(), Layer::WAVE);
                }
            }
        }
        assert!(waves > 0);
        #[allow(clippy::cast_precision_loss)]
        let rate = splashes as f64 / waves as f64;
        assert!((0.12..0.22).contains(&rate), "splash rate {rate}");
    }

    #[test]
    fn test_banner_on_top_row() {
        let (geometry, art, compositor) = setup();
        let mut frame = FrameBuffer::new(geometry.width, geometry.height);
        let step = approach(0);
        let entities = entities_at(&geometry, &step);
        compositor.compose(&mut frame, &step, &entities, &art, Some("Ahoy!"), &mut Pcg32::seed_from_u64(0));
        assert!(frame.row_text(0).unwrap().starts_with("Ahoy! "));
        assert_eq!(frame.count_layer(Layer::BANNER), 5);
    }

    #[test]
    fn test_banner_clipped() {
        let mut frame = FrameBuffer::new(4, 1);
        draw_banner(&mut frame, "abcdefgh");
        assert_eq!(frame.row_text(0).as_deref(), Some("abcd"));
    }
}
