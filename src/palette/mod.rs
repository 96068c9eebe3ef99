// Palette module - Logical and current palettes, plus palette effects
//
// This module provides:
// - Color and the fixed 256-entry Palette type
// - PaletteStore: the immutable logical palette and the swappable current palette
// - Palette effects (fade, flash, rotate) applied at presentation time

pub mod color;
pub mod effects;

pub use color::{Color, Palette, PALETTE_SIZE};
pub use effects::{FadeDirection, FadeEffect, FlashEffect, PaletteEffect, PaletteEffects, RotateEffect};

/// Holds the logical palette and the palette currently shown on screen
///
/// The logical palette is an identity grayscale ramp used to interpret the
/// raw indices of every surface. It is built once and never changes. The
/// current palette is what the hardware palette is restored to on expose.
#[derive(Debug, Clone)]
pub struct PaletteStore {
    logical: Palette,
    current: Palette,
}

impl PaletteStore {
    /// Create a store whose current palette is the logical palette
    pub fn new() -> Self {
        let logical = Palette::grayscale();
        Self {
            current: logical.clone(),
            logical,
        }
    }

    /// The immutable logical palette
    pub fn logical(&self) -> &Palette {
        &self.logical
    }

    /// The active palette
    pub fn current(&self) -> &Palette {
        &self.current
    }

    /// Replace the active palette
    pub fn set_current(&mut self, palette: &Palette) {
        self.current.clone_from(palette);
    }
}

impl Default for PaletteStore {
    fn default() -> Self {
        Self::new()
    }
}
