// Retro Video Library
// Palette, display mode and shader plumbing for 2D games

// Public modules
pub mod config;
pub mod display;
pub mod error;
pub mod overlay;
pub mod palette;
pub mod settings;
pub mod shader;

// Re-export main types for convenience
pub use config::VideoConfig;
pub use display::{GraphicsBackend, HeadlessBackend, Platform, Surface, Video, VideoEvent};
pub use error::VideoError;
pub use overlay::{OverlayResponse, SettingsOverlay};
pub use palette::{Color, Palette, PaletteEffect, PaletteEffects};
pub use settings::Settings;
pub use shader::{ShaderDevice, ShaderError, ShaderKind, ShaderSelector};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_components() {
        // Test that all components can be instantiated
        let _config = VideoConfig::new();
        let _settings = Settings::default();
        let _palette = Palette::default();
        let _effects = PaletteEffects::new();
        let _overlay = SettingsOverlay::new();
        let _surface = Surface::new(8, 8);
        let _video = Video::new(HeadlessBackend::new(), VideoConfig::new());
    }
}
