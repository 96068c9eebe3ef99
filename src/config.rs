// Configuration management
//
// Describes the platform profile and window geometry the video layer starts
// with. Stored as TOML; user display preferences live in the binary
// settings file instead (see settings module).

use crate::display::mode::Platform;
use crate::error::VideoError;
use crate::settings::SETTINGS_FILE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file path
pub const CONFIG_FILE: &str = "video_config.toml";

/// Width of the game's base resolution
pub const BASE_WIDTH: u32 = 320;

/// Height of the game's base resolution
pub const BASE_HEIGHT: u32 = 200;

/// Upper bound for either screen dimension
pub const MAX_SCREEN_SIZE: u32 = 32000;

/// Video configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Base window title
    pub title: String,

    /// Platform profile
    pub platform: Platform,

    /// Initial (and, on fixed platforms, only) screen width
    pub width: u32,

    /// Initial screen height
    pub height: u32,

    /// Start in fullscreen mode
    pub fullscreen: bool,

    /// Requested integer scale factor (1 disables the low-resolution canvas)
    pub scale: u32,

    /// Resolution the game draws at
    pub base_width: u32,
    pub base_height: u32,

    /// Upper bounds for the maximum resolution
    pub max_width: u32,
    pub max_height: u32,

    /// Target FPS
    pub target_fps: u32,

    /// Enable VSync
    pub vsync: bool,

    /// The display has a real palette register (palette effects are applied per effect)
    pub indexed_hardware: bool,

    /// Binary settings file written by the overlay
    pub settings_path: PathBuf,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            title: "Retro Video".to_string(),
            platform: Platform::Desktop,
            width: BASE_WIDTH,
            height: BASE_HEIGHT,
            fullscreen: false,
            scale: 1,
            base_width: BASE_WIDTH,
            base_height: BASE_HEIGHT,
            max_width: MAX_SCREEN_SIZE,
            max_height: MAX_SCREEN_SIZE,
            target_fps: 60,
            vsync: true,
            indexed_hardware: false,
            settings_path: PathBuf::from(SETTINGS_FILE),
        }
    }
}

impl VideoConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the platform profile
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Set the initial screen size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the scale factor
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = scale.clamp(1, 8);
        self
    }

    /// Set the target frame rate
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps.max(1);
        self
    }

    /// Set VSync enabled or disabled
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Set the settings file location
    pub fn with_settings_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.settings_path = path.into();
        self
    }

    /// Base resolution as (width, height)
    pub fn base_size(&self) -> (u32, u32) {
        (self.base_width, self.base_height)
    }

    /// Maximum resolution bounds as (width, height)
    pub fn max_size(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }

    /// Get the frame duration for the target FPS
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.target_fps.max(1) as u64)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, VideoError> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| VideoError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), VideoError> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| VideoError::Config(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Try to load configuration from file, or create default if it doesn't exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(&path).unwrap_or_else(|e| {
            log::warn!("Could not load config ({}), using defaults", e);
            let config = Self::default();
            // Try to save the default config, but don't fail if we can't
            if let Err(e) = config.save_to_file(&path) {
                log::warn!("Could not save default config: {}", e);
            }
            config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VideoConfig::default();
        assert_eq!(config.platform, Platform::Desktop);
        assert_eq!(config.base_size(), (320, 200));
        assert_eq!(config.scale, 1);
        assert!(!config.indexed_hardware);
    }

    #[test]
    fn test_builder() {
        let config = VideoConfig::new()
            .with_platform(Platform::Handheld)
            .with_size(640, 480)
            .with_scale(100)
            .with_fps(0)
            .with_vsync(false);

        assert_eq!(config.platform, Platform::Handheld);
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.scale, 8);
        assert_eq!(config.target_fps, 1);
        assert!(!config.vsync);
    }

    #[test]
    fn test_frame_duration() {
        let config = VideoConfig::new().with_fps(60);
        assert_eq!(config.frame_duration().as_micros(), 16666);
    }

    #[test]
    fn test_config_serialization() {
        let config = VideoConfig::new().with_platform(Platform::Fixed).with_scale(2);
        let toml_str = toml::to_string(&config).expect("Failed to serialize");
        assert!(toml_str.contains("platform = \"fixed\""));

        let deserialized: VideoConfig = toml::from_str(&toml_str).expect("Failed to deserialize");
        assert_eq!(deserialized.platform, Platform::Fixed);
        assert_eq!(deserialized.scale, 2);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: VideoConfig = toml::from_str("scale = 3\nplatform = \"handheld\"").unwrap();
        assert_eq!(config.scale, 3);
        assert_eq!(config.platform, Platform::Handheld);
        assert_eq!(config.title, "Retro Video");
    }
}
