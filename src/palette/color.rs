// Color - RGB palette entries and the fixed 256-entry palette type
//
// Every surface in the video layer stores 8-bit indices. A Palette maps
// those indices to RGB colors. Palettes always hold exactly 256 entries.

use std::ops::{Index, IndexMut, Range};

/// Number of entries in every palette
pub const PALETTE_SIZE: usize = 256;

/// A single RGB palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    /// Create a color from its components
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed 0xRRGGBB value
    pub const fn from_rgb(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Pack the color as 0xRRGGBB
    pub const fn to_rgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Convert to the [R, G, B, A] layout expected by the pixels crate
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 0xFF]
    }

    /// Scale every component by `factor` (clamped to 0.0-1.0)
    pub fn scaled(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * factor).round() as u8,
            g: (self.g as f32 * factor).round() as u8,
            b: (self.b as f32 * factor).round() as u8,
        }
    }

    /// Linear blend towards `other`; `weight` 0.0 keeps self, 1.0 yields other
    pub fn blend(self, other: Color, weight: f32) -> Self {
        let weight = weight.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * weight).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }

    /// Squared euclidean distance in RGB space
    fn distance(self, other: Color) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// A complete 256-entry palette
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [Color; PALETTE_SIZE],
}

impl Palette {
    /// A palette with every entry black
    pub fn black() -> Self {
        Self {
            entries: [Color::BLACK; PALETTE_SIZE],
        }
    }

    /// The identity grayscale ramp: entry `i` is (i, i, i)
    pub fn grayscale() -> Self {
        let mut entries = [Color::BLACK; PALETTE_SIZE];
        for (i, entry) in entries.iter_mut().enumerate() {
            *entry = Color::new(i as u8, i as u8, i as u8);
        }
        Self { entries }
    }

    /// Build a palette from packed 0xRRGGBB values
    ///
    /// Missing entries are filled with black, extra values are ignored.
    pub fn from_rgb_values(values: &[u32]) -> Self {
        let mut palette = Self::black();
        for (entry, &rgb) in palette.entries.iter_mut().zip(values) {
            *entry = Color::from_rgb(rgb);
        }
        palette
    }

    /// All entries
    pub fn as_slice(&self) -> &[Color] {
        &self.entries
    }

    /// Mutable access to all entries
    pub fn as_mut_slice(&mut self) -> &mut [Color] {
        &mut self.entries
    }

    /// Entries in `range`, clamped to the palette bounds
    pub fn range(&self, range: Range<usize>) -> &[Color] {
        let range = clamp_range(range);
        &self.entries[range]
    }

    /// Overwrite entries starting at `first` with `colors`, clamped to the palette
    pub fn write(&mut self, first: usize, colors: &[Color]) {
        let range = clamp_range(first..first.saturating_add(colors.len()));
        let len = range.len();
        self.entries[range].copy_from_slice(&colors[..len]);
    }

    /// Index of the entry closest to `color`
    pub fn nearest_index(&self, color: Color) -> u8 {
        self.entries
            .iter()
            .enumerate()
            .min_by_key(|(_, entry)| entry.distance(color))
            .map(|(i, _)| i as u8)
            .unwrap_or(0)
    }
}

/// Clamp a range so it lies inside 0..PALETTE_SIZE
pub(crate) fn clamp_range(range: Range<usize>) -> Range<usize> {
    let start = range.start.min(PALETTE_SIZE);
    let end = range.end.clamp(start, PALETTE_SIZE);
    start..end
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("first", &self.entries[0])
            .field("last", &self.entries[PALETTE_SIZE - 1])
            .finish()
    }
}

impl Index<u8> for Palette {
    type Output = Color;

    fn index(&self, index: u8) -> &Color {
        &self.entries[index as usize]
    }
}

impl IndexMut<u8> for Palette {
    fn index_mut(&mut self, index: u8) -> &mut Color {
        &mut self.entries[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_ramp() {
        let palette = Palette::grayscale();
        assert_eq!(palette.as_slice().len(), PALETTE_SIZE);
        assert_eq!(palette[0], Color::BLACK);
        assert_eq!(palette[128], Color::new(128, 128, 128));
        assert_eq!(palette[255], Color::WHITE);
    }

    #[test]
    fn test_rgb_packing() {
        let color = Color::from_rgb(0x123456);
        assert_eq!(color, Color::new(0x12, 0x34, 0x56));
        assert_eq!(color.to_rgb(), 0x123456);
        assert_eq!(color.to_rgba(), [0x12, 0x34, 0x56, 0xFF]);
    }

    #[test]
    fn test_from_rgb_values_pads_with_black() {
        let palette = Palette::from_rgb_values(&[0xFF0000, 0x00FF00]);
        assert_eq!(palette[0], Color::new(255, 0, 0));
        assert_eq!(palette[1], Color::new(0, 255, 0));
        assert_eq!(palette[2], Color::BLACK);
    }

    #[test]
    fn test_write_clamps_to_palette() {
        let mut palette = Palette::black();
        palette.write(254, &[Color::WHITE; 4]);
        assert_eq!(palette[253], Color::BLACK);
        assert_eq!(palette[254], Color::WHITE);
        assert_eq!(palette[255], Color::WHITE);
    }

    #[test]
    fn test_range_clamping() {
        let palette = Palette::grayscale();
        assert_eq!(palette.range(250..300).len(), 6);
        assert!(palette.range(300..400).is_empty());
    }

    #[test]
    fn test_nearest_index() {
        let mut palette = Palette::from_rgb_values(&[0xFFFFFF; PALETTE_SIZE]);
        palette[42] = Color::new(10, 5, 0);
        assert_eq!(palette.nearest_index(Color::BLACK), 42);
    }

    #[test]
    fn test_blend_and_scale() {
        let black = Color::BLACK;
        assert_eq!(black.blend(Color::WHITE, 0.5), Color::new(128, 128, 128));
        assert_eq!(Color::WHITE.scaled(0.0), Color::BLACK);
        assert_eq!(Color::WHITE.scaled(2.0), Color::WHITE);
    }
}
