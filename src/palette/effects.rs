// Palette effects - time-based palette transformations
//
// Effects never touch the current palette directly. They are applied to a
// scratch copy during presentation, either all at once (emulated indexed
// color) or one effect range at a time (real palette hardware).

use super::color::{clamp_range, Color, Palette, PALETTE_SIZE};
use std::ops::Range;

/// A transformation applied to the shown palette once per frame
pub trait PaletteEffect {
    /// Apply the effect to `palette`
    ///
    /// `ms_per_frame` advances the effect clock unless `stopped` is set, in
    /// which case the effect is applied at its current position.
    fn apply(&mut self, palette: &mut Palette, ms_per_frame: u32, stopped: bool);

    /// Palette entries the effect may modify
    fn range(&self) -> Range<usize> {
        0..PALETTE_SIZE
    }
}

/// Direction of a fade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    /// From black to full color
    In,
    /// From full color to black
    Out,
}

/// Fade the whole palette in or out over a fixed duration
#[derive(Debug, Clone)]
pub struct FadeEffect {
    direction: FadeDirection,
    duration_ms: u32,
    elapsed_ms: u32,
}

impl FadeEffect {
    pub fn new(direction: FadeDirection, duration_ms: u32) -> Self {
        Self {
            direction,
            duration_ms: duration_ms.max(1),
            elapsed_ms: 0,
        }
    }

    /// Fraction of full brightness at the current position
    pub fn brightness(&self) -> f32 {
        let progress = self.elapsed_ms as f32 / self.duration_ms as f32;
        match self.direction {
            FadeDirection::In => progress.min(1.0),
            FadeDirection::Out => 1.0 - progress.min(1.0),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

impl PaletteEffect for FadeEffect {
    fn apply(&mut self, palette: &mut Palette, ms_per_frame: u32, stopped: bool) {
        if !stopped {
            self.elapsed_ms = self
                .elapsed_ms
                .saturating_add(ms_per_frame)
                .min(self.duration_ms);
        }

        let brightness = self.brightness();
        for entry in palette.as_mut_slice() {
            *entry = entry.scaled(brightness);
        }
    }
}

/// Blend the whole palette towards a color, decaying back over a duration
#[derive(Debug, Clone)]
pub struct FlashEffect {
    color: Color,
    duration_ms: u32,
    elapsed_ms: u32,
}

impl FlashEffect {
    pub fn new(color: Color, duration_ms: u32) -> Self {
        Self {
            color,
            duration_ms: duration_ms.max(1),
            elapsed_ms: 0,
        }
    }

    /// Blend weight towards the flash color at the current position
    pub fn strength(&self) -> f32 {
        1.0 - (self.elapsed_ms as f32 / self.duration_ms as f32).min(1.0)
    }
}

impl PaletteEffect for FlashEffect {
    fn apply(&mut self, palette: &mut Palette, ms_per_frame: u32, stopped: bool) {
        if !stopped {
            self.elapsed_ms = self
                .elapsed_ms
                .saturating_add(ms_per_frame)
                .min(self.duration_ms);
        }

        let strength = self.strength();
        for entry in palette.as_mut_slice() {
            *entry = entry.blend(self.color, strength);
        }
    }
}

/// Cycle a contiguous block of entries (water, lava, conveyor belts)
#[derive(Debug, Clone)]
pub struct RotateEffect {
    first: usize,
    count: usize,
    /// Entries per second
    speed: f32,
    position: f32,
}

impl RotateEffect {
    pub fn new(first: u8, count: usize, speed: f32) -> Self {
        let first = first as usize;
        let range = clamp_range(first..first.saturating_add(count));
        Self {
            first: range.start,
            count: range.len(),
            speed,
            position: 0.0,
        }
    }

    /// Current whole-entry offset of the rotation
    pub fn offset(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            self.position.floor() as usize % self.count
        }
    }
}

impl PaletteEffect for RotateEffect {
    fn apply(&mut self, palette: &mut Palette, ms_per_frame: u32, stopped: bool) {
        if self.count == 0 {
            return;
        }

        if !stopped {
            self.position += self.speed * ms_per_frame as f32 / 1000.0;
            self.position = self.position.rem_euclid(self.count as f32);
        }

        let offset = self.offset();
        palette.as_mut_slice()[self.range()].rotate_left(offset);
    }

    fn range(&self) -> Range<usize> {
        self.first..self.first + self.count
    }
}

/// An ordered chain of palette effects
#[derive(Default)]
pub struct PaletteEffects {
    effects: Vec<Box<dyn PaletteEffect>>,
}

impl PaletteEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect; effects run in insertion order
    pub fn push(&mut self, effect: impl PaletteEffect + 'static) {
        self.effects.push(Box::new(effect));
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Apply every effect to `palette` in order
    pub fn apply(&mut self, palette: &mut Palette, ms_per_frame: u32, stopped: bool) {
        for effect in &mut self.effects {
            effect.apply(palette, ms_per_frame, stopped);
        }
    }

    /// Apply effects to a scratch copy of `base`, committing each effect's range
    ///
    /// Used when the display has a real palette register: every effect costs
    /// one partial hardware update instead of one full-palette update per frame.
    pub fn apply_direct<F>(&mut self, base: &Palette, ms_per_frame: u32, stopped: bool, mut commit: F)
    where
        F: FnMut(usize, &[Color]),
    {
        let mut scratch = base.clone();
        for effect in &mut self.effects {
            effect.apply(&mut scratch, ms_per_frame, stopped);
            let range = clamp_range(effect.range());
            if !range.is_empty() {
                commit(range.start, scratch.range(range));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_count_clamped_to_palette() {
        let rotate = RotateEffect::new(10, usize::MAX, 1.0);
        assert_eq!(rotate.range(), 10..256);
    }

    #[test]
    fn test_fade_out_reaches_black() {
        let mut fade = FadeEffect::new(FadeDirection::Out, 100);
        let mut palette = Palette::grayscale();

        fade.apply(&mut palette, 50, false);
        assert_eq!(palette[200], Color::new(100, 100, 100));

        let mut palette = Palette::grayscale();
        fade.apply(&mut palette, 50, false);
        assert!(fade.is_finished());
        assert_eq!(palette[255], Color::BLACK);
    }

    #[test]
    fn test_fade_in_starts_black() {
        let mut fade = FadeEffect::new(FadeDirection::In, 1000);
        let mut palette = Palette::grayscale();
        fade.apply(&mut palette, 0, false);
        assert_eq!(palette[255], Color::BLACK);
    }

    #[test]
    fn test_stopped_effect_does_not_advance() {
        let mut fade = FadeEffect::new(FadeDirection::Out, 100);
        let mut palette = Palette::grayscale();
        fade.apply(&mut palette, 50, true);
        assert_eq!(palette, Palette::grayscale());
        assert_eq!(fade.brightness(), 1.0);
    }

    #[test]
    fn test_flash_decays() {
        let mut flash = FlashEffect::new(Color::WHITE, 200);
        let mut palette = Palette::black();
        flash.apply(&mut palette, 0, false);
        assert_eq!(palette[0], Color::WHITE);

        let mut palette = Palette::black();
        flash.apply(&mut palette, 200, false);
        assert_eq!(palette[0], Color::BLACK);
    }

    #[test]
    fn test_rotate_range() {
        let mut rotate = RotateEffect::new(10, 4, 1000.0);
        let mut palette = Palette::grayscale();

        // 1000 entries/s for 1 ms = one entry
        rotate.apply(&mut palette, 1, false);
        assert_eq!(rotate.offset(), 1);
        assert_eq!(palette[10], Color::new(11, 11, 11));
        assert_eq!(palette[13], Color::new(10, 10, 10));
        assert_eq!(palette[9], Color::new(9, 9, 9));
        assert_eq!(palette[14], Color::new(14, 14, 14));
        assert_eq!(rotate.range(), 10..14);
    }

    #[test]
    fn test_rotate_clamped_to_palette() {
        let rotate = RotateEffect::new(250, 20, 1.0);
        assert_eq!(rotate.range(), 250..256);
    }

    #[test]
    fn test_direct_commits_each_effect_range() {
        let mut effects = PaletteEffects::new();
        effects.push(RotateEffect::new(0, 8, 1000.0));
        effects.push(RotateEffect::new(32, 8, 2000.0));

        let mut commits = Vec::new();
        effects.apply_direct(&Palette::grayscale(), 1, false, |first, colors| {
            commits.push((first, colors.len(), colors[0]));
        });

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0], (0, 8, Color::new(1, 1, 1)));
        assert_eq!(commits[1], (32, 8, Color::new(34, 34, 34)));
    }
}
