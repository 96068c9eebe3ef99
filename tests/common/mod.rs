// Common test utilities for video integration tests
//
// This module provides shared setup for running a Video against the
// in-memory backend and for per-test scratch files.

#![allow(dead_code)]

use retro_video::display::Platform;
use retro_video::{HeadlessBackend, Video, VideoConfig};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Base resolution used by every test config
pub const BASE: (u32, u32) = (320, 200);

static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A unique path under cargo's per-target scratch directory
///
/// The file is not created. Everything lives under `target/tmp`, so
/// `cargo clean` removes it.
pub fn scratch_path(name: &str) -> PathBuf {
    let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
    PathBuf::from(env!("CARGO_TARGET_TMPDIR"))
        .join(format!("settings-{}", std::process::id()))
        .join(format!("{}-{}", n, name))
}

/// Config that never reads the user's settings file
pub fn test_config() -> VideoConfig {
    VideoConfig::new().with_settings_path(scratch_path("unused.cfg"))
}

/// Config for a platform profile with a requested scale
pub fn platform_config(platform: Platform, scale: u32) -> VideoConfig {
    test_config().with_platform(platform).with_scale(scale)
}

/// Video on a headless backend, not yet initialised
pub fn headless_video(config: VideoConfig) -> Video<HeadlessBackend> {
    Video::new(HeadlessBackend::new(), config)
}

/// Video on a headless backend, initialised windowed at `width` x `height`
pub fn init_video(config: VideoConfig, width: u32, height: u32) -> Video<HeadlessBackend> {
    let mut video = headless_video(config);
    video
        .init(width, height, false)
        .expect("headless init should not fail");
    video
}
