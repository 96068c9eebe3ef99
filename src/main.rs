// Retro Video - Main Entry Point
//
// Opens a window showing a palette-rotating test pattern, or renders a
// number of frames offscreen with --headless.

use clap::Parser;
use retro_video::config::CONFIG_FILE;
use retro_video::palette::{FadeDirection, FadeEffect, RotateEffect};
use retro_video::{HeadlessBackend, PaletteEffects, Video, VideoConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Palette, display mode and shader test bench.")]
struct Args {
    #[arg(short, long, help = "Path to the TOML config file")]
    #[arg(default_value = CONFIG_FILE)]
    config: PathBuf,

    #[arg(short, long, help = "Start in fullscreen mode")]
    fullscreen: bool,

    #[arg(short, long, help = "Integer scale factor (1-8)")]
    scale: Option<u32>,

    #[arg(long, value_name = "FRAMES", help = "Render frames offscreen and exit")]
    headless: Option<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    pretty_env_logger::init();

    let mut config = VideoConfig::load_or_default(&args.config);
    if let Some(scale) = args.scale {
        config = config.with_scale(scale);
    }
    let fullscreen = args.fullscreen || config.fullscreen;

    match args.headless {
        Some(frames) => run_headless(config, fullscreen, frames),
        None => run_windowed(config, fullscreen),
    }
}

#[cfg(feature = "window")]
fn run_windowed(config: VideoConfig, fullscreen: bool) -> Result<(), Box<dyn std::error::Error>> {
    retro_video::display::run_display(config, fullscreen)?;
    log::info!("Display window closed.");
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run_windowed(_config: VideoConfig, _fullscreen: bool) -> Result<(), Box<dyn std::error::Error>> {
    Err("built without the \"window\" feature, use --headless".into())
}

fn run_headless(config: VideoConfig, fullscreen: bool, frames: u32) -> Result<(), Box<dyn std::error::Error>> {
    let (width, height) = (config.width, config.height);
    let ms_per_frame = config.frame_duration().as_millis() as u32;

    let mut video = Video::new(HeadlessBackend::new(), config);
    video.init(width, height, fullscreen)?;

    let mut effects = PaletteEffects::new();
    effects.push(FadeEffect::new(FadeDirection::In, 500));
    effects.push(RotateEffect::new(16, 224, 30.0));

    for _ in 0..frames {
        if let Some(canvas) = video.canvas_mut() {
            canvas.test_pattern();
        }
        video.flip(ms_per_frame, Some(&mut effects), false);
    }

    let backend = video.backend();
    log::info!(
        "Rendered {} frames at {}x{} (scale {}x, {} palette commits)",
        backend.presents(),
        video.width(),
        video.height(),
        video.scale_factor(),
        backend.palette_commits().len()
    );

    Ok(())
}
