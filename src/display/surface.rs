// Surface - 8-bit indexed pixel buffer with its own logical palette
//
// The screen and the low-resolution canvas are both Surfaces. Each pixel is
// a palette index; the surface palette says how its indices are interpreted,
// the hardware palette says how they are shown.

use crate::palette::Palette;

/// Indexed pixel surface
#[derive(Clone)]
pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    palette: Palette,
}

impl Surface {
    /// Create a surface filled with index 0
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
            palette: Palette::grayscale(),
        }
    }

    /// Create a surface and copy `pixels` (row-major, `width` bytes per row) into it
    ///
    /// # Panics
    /// Panics if `pixels` holds fewer than `width * height` bytes
    pub fn from_pixels(pixels: &[u8], width: usize, height: usize) -> Self {
        assert!(
            pixels.len() >= width * height,
            "Pixel data too small for {}x{} surface",
            width,
            height
        );

        let mut surface = Self::new(width, height);
        surface.pixels.copy_from_slice(&pixels[..width * height]);
        surface
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row
    pub fn pitch(&self) -> usize {
        self.width
    }

    /// Set a pixel at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, index: u8) {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);

        self.pixels[y * self.width + x] = index;
    }

    /// Get a pixel at the given coordinates
    ///
    /// # Panics
    /// Panics if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width, "X coordinate {} out of bounds", x);
        assert!(y < self.height, "Y coordinate {} out of bounds", y);

        self.pixels[y * self.width + x]
    }

    /// Fill the whole surface with one index
    pub fn clear(&mut self, index: u8) {
        self.pixels.fill(index);
    }

    /// Fill a rectangle, clipped to the surface
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, index: u8) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x.saturating_add(width)).clamp(0, self.width as i32) as usize;
        let y1 = (y.saturating_add(height)).clamp(0, self.height as i32) as usize;

        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for row in y0..y1 {
            let start = row * self.width;
            self.pixels[start + x0..start + x1].fill(index);
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// The surface's local palette
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: &Palette) {
        self.palette.clone_from(palette);
    }

    /// Convert to RGBA through `palette`
    ///
    /// # Panics
    /// Panics if output buffer is too small
    pub fn to_rgba(&self, palette: &Palette, output: &mut [u8]) {
        assert!(
            output.len() >= self.pixels.len() * 4,
            "Output buffer too small for RGBA conversion"
        );

        for (&index, out) in self.pixels.iter().zip(output.chunks_exact_mut(4)) {
            out.copy_from_slice(&palette[index].to_rgba());
        }
    }

    /// Nearest-neighbour upscale into `dst`, replicating each pixel as a `factor` x `factor` block
    ///
    /// Blocks that would fall outside `dst` are clipped.
    pub fn scale_into(&self, dst: &mut Surface, factor: usize) {
        let factor = factor.max(1);
        let out_width = (self.width * factor).min(dst.width);
        let out_height = (self.height * factor).min(dst.height);

        let mut row = vec![0u8; out_width];
        for y in 0..out_height {
            if y % factor == 0 {
                let src = &self.pixels[(y / factor) * self.width..][..self.width];
                for (x, out) in row.iter_mut().enumerate() {
                    *out = src[x / factor];
                }
            }
            let start = y * dst.width;
            dst.pixels[start..start + out_width].copy_from_slice(&row);
        }
    }

    /// Fill with a pattern that cycles through all 256 indices
    pub fn test_pattern(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let index = ((x / 16) + (y / 16) * 16) as u8;
                self.set_pixel(x, y, index);
            }
        }
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Color;

    #[test]
    fn test_surface_creation() {
        let surface = Surface::new(320, 200);
        assert_eq!(surface.as_slice().len(), 320 * 200);
        assert_eq!(surface.pitch(), 320);
        assert_eq!(surface.palette(), &Palette::grayscale());
    }

    #[test]
    fn test_from_pixels() {
        let data: Vec<u8> = (0..12).collect();
        let surface = Surface::from_pixels(&data, 4, 3);
        assert_eq!(surface.get_pixel(0, 0), 0);
        assert_eq!(surface.get_pixel(3, 2), 11);
    }

    #[test]
    fn test_set_get_pixel() {
        let mut surface = Surface::new(16, 16);
        surface.set_pixel(5, 7, 0xAB);
        assert_eq!(surface.get_pixel(5, 7), 0xAB);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut surface = Surface::new(8, 8);
        surface.fill_rect(-2, 6, 4, 10, 9);
        assert_eq!(surface.get_pixel(0, 6), 9);
        assert_eq!(surface.get_pixel(1, 7), 9);
        assert_eq!(surface.get_pixel(2, 7), 0);
        assert_eq!(surface.get_pixel(0, 5), 0);

        surface.fill_rect(20, 20, 4, 4, 1);
        assert!(surface.as_slice().iter().all(|&p| p == 0 || p == 9));
    }

    #[test]
    fn test_to_rgba() {
        let mut surface = Surface::new(2, 1);
        surface.set_pixel(1, 0, 3);
        let mut palette = Palette::black();
        palette[3] = Color::new(0x12, 0x34, 0x56);

        let mut rgba = vec![0u8; 8];
        surface.to_rgba(&palette, &mut rgba);

        assert_eq!(&rgba[..4], &[0, 0, 0, 0xFF]);
        assert_eq!(&rgba[4..], &[0x12, 0x34, 0x56, 0xFF]);
    }

    #[test]
    fn test_scale_into_replicates_blocks() {
        let src = Surface::from_pixels(&[1, 2, 3, 4], 2, 2);
        let mut dst = Surface::new(4, 4);

        src.scale_into(&mut dst, 2);

        assert_eq!(
            dst.as_slice(),
            &[1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]
        );
    }

    #[test]
    fn test_scale_into_clips_to_destination() {
        let src = Surface::from_pixels(&[7; 9], 3, 3);
        let mut dst = Surface::new(5, 5);

        src.scale_into(&mut dst, 2);

        assert_eq!(dst.get_pixel(4, 4), 7);
        assert_eq!(dst.as_slice().iter().filter(|&&p| p == 7).count(), 25);
    }

    #[test]
    #[should_panic]
    fn test_set_pixel_out_of_bounds() {
        let mut surface = Surface::new(4, 4);
        surface.set_pixel(4, 0, 1);
    }
}
