//! Scene benchmark: Measure per-tick compose cost.
//!
//! Target: one tick well under 1ms at the default 100-column scene.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use marquee::scene::{Art, Phase, Scene, SceneSettings};
use rand::SeedableRng;
use rand_pcg::Pcg32;

fn scene(width: u16) -> Scene<Pcg32> {
    let settings = SceneSettings {
        screen_width: width,
        ..SceneSettings::default()
    };
    Scene::new(Art::boat(), &settings, Pcg32::seed_from_u64(0)).unwrap()
}

/// Advance a scene until the machine is in `phase`.
fn scene_in(phase: Phase) -> Scene<Pcg32> {
    let mut scene = scene(100);
    let mut frame = scene.geometry().frame();
    while scene.machine().phase() != phase {
        scene.tick(true, &mut frame);
    }
    scene
}

fn tick_approach(c: &mut Criterion) {
    c.bench_function("tick_approach_100", |b| {
        let mut scene = scene(100);
        let mut frame = scene.geometry().frame();
        // Paused so the scene stays in approach for the whole run
        b.iter(|| scene.tick(black_box(false), &mut frame));
    });
}

fn tick_collision(c: &mut Criterion) {
    c.bench_function("tick_collision_100", |b| {
        b.iter_batched(
            || {
                let scene = scene_in(Phase::Collision);
                let frame = scene.geometry().frame();
                (scene, frame)
            },
            |(mut scene, mut frame)| scene.tick(true, &mut frame),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn tick_decay(c: &mut Criterion) {
    c.bench_function("tick_decay_100", |b| {
        b.iter_batched(
            || {
                let scene = scene_in(Phase::Decay);
                let frame = scene.geometry().frame();
                (scene, frame)
            },
            |(mut scene, mut frame)| scene.tick(true, &mut frame),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn full_cycle(c: &mut Criterion) {
    c.bench_function("full_cycle_100", |b| {
        b.iter(|| {
            let mut scene = scene(100);
            let mut frame = scene.geometry().frame();
            while scene.machine().cycles() == 0 {
                scene.tick(true, &mut frame);
            }
            black_box(frame.len())
        });
    });
}

fn tick_various_widths(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_by_width");

    for width in [40u16, 100, 200, 400] {
        group.bench_with_input(BenchmarkId::new("approach", width), &width, |b, &width| {
            let mut scene = scene(width);
            let mut frame = scene.geometry().frame();
            b.iter(|| scene.tick(false, &mut frame));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    tick_approach,
    tick_collision,
    tick_decay,
    full_cycle,
    tick_various_widths,
);
criterion_main!(benches);
