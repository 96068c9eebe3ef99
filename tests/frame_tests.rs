// Frame presentation integration tests
//
// Canvas upscaling, palette effect commits and the tint schedule as seen
// in presented frames.

mod common;

use common::{init_video, platform_config, test_config};
use retro_video::display::{tint_intensity, Platform, VideoEvent};
use retro_video::palette::{FadeDirection, FadeEffect, FlashEffect, RotateEffect};
use retro_video::{Color, HeadlessBackend, Palette, PaletteEffects, Video};

#[test]
fn test_canvas_upscaled_into_screen() {
    let mut video = init_video(test_config().with_scale(2), 640, 400);
    video.draw_rect(10, 10, 1, 1, 255);

    video.flip(16, None, false);

    let screen = video.screen().unwrap();
    for (x, y) in [(20, 20), (21, 20), (20, 21), (21, 21)] {
        assert_eq!(screen.get_pixel(x, y), 255);
    }
    assert_eq!(screen.get_pixel(22, 20), 0);
    assert_eq!(video.backend().frame_size(), (640, 400));
    assert_eq!(video.backend().frame_pixel(21, 21), [255, 255, 255, 0xFF]);
}

#[test]
fn test_emulated_palette_commits_once_per_frame() {
    let mut video = init_video(test_config(), 320, 200);
    let mut effects = PaletteEffects::new();
    effects.push(FadeEffect::new(FadeDirection::Out, 100));
    effects.push(RotateEffect::new(16, 32, 10.0));
    let commits = video.backend().palette_commits().len();

    video.flip(50, Some(&mut effects), false);

    let new_commits = &video.backend().palette_commits()[commits..];
    assert_eq!(new_commits, &[(0, 256)]);
    // Half way through the fade
    assert_eq!(video.backend().physical_palette()[200], Color::new(100, 100, 100));
    // The current palette is not touched by effects
    assert_eq!(video.palette(), &Palette::grayscale());
}

#[test]
fn test_indexed_hardware_commits_each_effect_range() {
    let mut config = test_config();
    config.indexed_hardware = true;
    let mut video = init_video(config, 320, 200);
    let mut effects = PaletteEffects::new();
    effects.push(FlashEffect::new(Color::WHITE, 100));
    effects.push(RotateEffect::new(16, 32, 10.0));
    let commits = video.backend().palette_commits().len();

    video.flip(16, Some(&mut effects), false);

    let new_commits = &video.backend().palette_commits()[commits..];
    assert_eq!(new_commits, &[(0, 256), (16, 32)]);
}

#[test]
fn test_tint_schedule() {
    assert_eq!(tint_intensity(8), 0.1);
    assert_eq!(tint_intensity(20), 0.2);
    assert_eq!(tint_intensity(5), 0.25);
}

#[test]
fn test_tint_blended_into_frame() {
    let config = platform_config(Platform::Handheld, 1);
    let mut video = Video::new(HeadlessBackend::new(), config).with_clock(|| 20);
    video.settings_mut().tint_enabled = true;
    video.settings_mut().tint_color = [1.0, 0.0, 0.0];
    video.init(320, 240, false).unwrap();

    video.clear_screen(0);
    video.flip(16, None, false);

    // 20% red over black
    assert_eq!(video.backend().frame_pixel(0, 0), [51, 0, 0, 0xFF]);
}

#[test]
fn test_set_palette_then_expose() {
    let mut video = init_video(test_config(), 4, 4);
    let palette = Palette::from_rgb_values(&[0x00FF00; 256]);

    video.set_palette(&palette);
    video.change_palette(&Palette::grayscale(), 0, 256);
    assert_eq!(video.backend().physical_palette(), &Palette::grayscale());

    video.update(&VideoEvent::Expose);

    assert_eq!(video.backend().physical_palette(), &palette);
}
