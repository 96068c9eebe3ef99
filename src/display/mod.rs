// Display module - Video modes, surfaces and frame presentation
//
// This module provides:
// - Indexed 8-bit surfaces (screen and low-resolution canvas)
// - Platform profiles, scale fitting, letterboxing and max resolution
// - Time-of-day tint overlay
// - The GraphicsBackend seam with an in-memory implementation
// - Video: the single context that owns palettes, surfaces, settings and shader
// - Window rendering using winit + pixels (feature "window")

pub mod backend;
pub mod event;
pub mod mode;
pub mod surface;
pub mod tint;
pub mod video;
#[cfg(feature = "window")]
pub mod window;

pub use backend::{GraphicsBackend, HeadlessBackend, HeadlessProgram};
pub use event::{Key, VideoEvent};
pub use mode::{DisplayMode, Platform, ResolutionList, Viewport, HANDHELD_HEIGHT, HANDHELD_WIDTH};
pub use surface::Surface;
pub use tint::{local_hour, tint_intensity, TintOverlay};
pub use video::Video;
#[cfg(feature = "window")]
pub use window::{run_display, PixelsBackend, VideoApp};
