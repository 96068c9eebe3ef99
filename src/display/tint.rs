// Tint - time-of-day screen tint for ambient light compensation
//
// The overlay intensity follows a fixed five-bucket schedule over the local
// hour. The schedule is a pure function; reading the clock is separate.

use chrono::Timelike;

/// Overlay intensity for a local hour (0-23)
pub fn tint_intensity(hour: u32) -> f32 {
    match hour {
        0..=5 => 0.25,   // night
        6..=9 => 0.1,    // morning
        10..=14 => 0.05, // midday
        15..=18 => 0.15, // late day
        _ => 0.2,        // evening
    }
}

/// Current local hour
pub fn local_hour() -> u32 {
    chrono::Local::now().hour()
}

/// A translucent full-screen color overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintOverlay {
    /// RGB, 0.0-1.0 per component
    pub color: [f32; 3],
    /// Opacity, 0.0-1.0
    pub alpha: f32,
}

impl TintOverlay {
    /// Overlay of `color` at the intensity scheduled for `hour`
    pub fn for_hour(color: [f32; 3], hour: u32) -> Self {
        Self {
            color,
            alpha: tint_intensity(hour),
        }
    }

    /// Blend the overlay over an RGBA buffer in place; alpha bytes are left alone
    pub fn blend_rgba(&self, rgba: &mut [u8]) {
        let alpha = self.alpha.clamp(0.0, 1.0);
        if alpha == 0.0 {
            return;
        }

        let tint = self.color.map(|c| c.clamp(0.0, 1.0) * 255.0 * alpha);
        let keep = 1.0 - alpha;

        for pixel in rgba.chunks_exact_mut(4) {
            for (channel, tint) in pixel[..3].iter_mut().zip(tint) {
                *channel = (*channel as f32 * keep + tint).round() as u8;
            }
        }
    }
}
