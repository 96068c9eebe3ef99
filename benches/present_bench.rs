// Presentation Benchmarks
// Performance benchmarks for the per-frame path: canvas upscale, RGBA conversion, palette effects

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use retro_video::palette::{FadeDirection, FadeEffect, FlashEffect, RotateEffect};
use retro_video::{Color, HeadlessBackend, Palette, PaletteEffects, Surface, Video, VideoConfig};
use std::hint::black_box;

/// Helper function to create a canvas filled with the test pattern
fn create_canvas(width: usize, height: usize) -> Surface {
    let mut canvas = Surface::new(width, height);
    canvas.test_pattern();
    canvas
}

/// Benchmark nearest-neighbour upscaling of the 320x200 canvas
fn bench_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("canvas_scale");
    let canvas = create_canvas(320, 200);

    for factor in [2usize, 3, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(factor), &factor, |b, &factor| {
            let mut screen = Surface::new(320 * factor, 200 * factor);
            b.iter(|| {
                canvas.scale_into(&mut screen, black_box(factor));
                black_box(screen.as_slice());
            });
        });
    }

    group.finish();
}

/// Benchmark index to RGBA conversion for a full 640x400 screen
fn bench_to_rgba(c: &mut Criterion) {
    let screen = create_canvas(640, 400);
    let palette = Palette::grayscale();
    let mut rgba = vec![0u8; 640 * 400 * 4];

    c.bench_function("to_rgba_640x400", |b| {
        b.iter(|| {
            screen.to_rgba(black_box(&palette), &mut rgba);
            black_box(&rgba);
        });
    });
}

/// Benchmark compositing a chain of palette effects
fn bench_effects(c: &mut Criterion) {
    c.bench_function("effects_chain", |b| {
        let mut effects = PaletteEffects::new();
        effects.push(FadeEffect::new(FadeDirection::In, 1000));
        effects.push(FlashEffect::new(Color::WHITE, 1000));
        effects.push(RotateEffect::new(16, 224, 30.0));
        let base = Palette::grayscale();

        b.iter(|| {
            let mut palette = base.clone();
            effects.apply(&mut palette, black_box(16), true);
            black_box(palette);
        });
    });
}

/// Benchmark a full flip on the headless backend at 2x scale
fn bench_flip(c: &mut Criterion) {
    let mut group = c.benchmark_group("flip");
    group.sample_size(50);

    group.bench_function("headless_640x400_2x", |b| {
        let config = VideoConfig::new()
            .with_scale(2)
            .with_settings_path("target/bench-video.cfg");
        let mut video = Video::new(HeadlessBackend::new(), config);
        video.init(640, 400, false).expect("init");
        if let Some(canvas) = video.canvas_mut() {
            canvas.test_pattern();
        }

        let mut effects = PaletteEffects::new();
        effects.push(RotateEffect::new(16, 224, 30.0));

        b.iter(|| {
            video.flip(16, Some(&mut effects), false);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_scale, bench_to_rgba, bench_effects, bench_flip);
criterion_main!(benches);
