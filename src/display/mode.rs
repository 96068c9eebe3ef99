// Display mode - screen/canvas geometry, scale fitting and viewport placement
//
// All functions here are pure so the geometry rules can be tested without a
// window: integer scale fitting, handheld letterboxing and max resolution.

use serde::{Deserialize, Serialize};

/// Native resolution of the handheld target display
pub const HANDHELD_WIDTH: u32 = 960;
pub const HANDHELD_HEIGHT: u32 = 544;

/// Platform profile the video layer runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Resizable window with an Alt+Enter fullscreen toggle
    #[default]
    Desktop,

    /// Fixed 960x544 panel: always fullscreen, letterboxed, with a real-time clock
    Handheld,

    /// Fixed-size fullscreen device: the configured size is always used
    Fixed,
}

impl Platform {
    /// Window resize events change the mode
    pub fn is_resizable(self) -> bool {
        matches!(self, Platform::Desktop)
    }

    /// The video mode is always requested fullscreen
    pub fn forces_fullscreen(self) -> bool {
        matches!(self, Platform::Handheld | Platform::Fixed)
    }

    /// Local time of day is available for the tint schedule
    pub fn has_clock(self) -> bool {
        matches!(self, Platform::Handheld)
    }

    /// Size of the physical panel the screen is scaled onto, if fixed
    pub fn native_size(self) -> Option<(u32, u32)> {
        match self {
            Platform::Handheld => Some((HANDHELD_WIDTH, HANDHELD_HEIGHT)),
            _ => None,
        }
    }
}

/// Resolutions reported by the graphics library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionList {
    /// Any size is accepted
    Any,

    /// Only these sizes are available
    Modes(Vec<(u32, u32)>),
}

/// Largest scale factor `f` with `1 <= f <= requested` whose scaled base fits the screen
///
/// The factor is decremented from `requested` and never drops below 1, even
/// when the base resolution itself is larger than the screen.
pub fn fit_scale_factor(requested: u32, screen: (u32, u32), base: (u32, u32)) -> u32 {
    let base_w = base.0.max(1);
    let base_h = base.1.max(1);
    let mut factor = requested.max(1);

    while (screen.0 / base_w < factor || screen.1 / base_h < factor) && factor > 1 {
        factor -= 1;
    }

    factor
}

/// Current screen and canvas geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayMode {
    pub screen_width: u32,
    pub screen_height: u32,
    pub fullscreen: bool,
    /// Factor asked for by the user or config
    pub requested_scale: u32,
    /// Factor in effect after fitting to the screen
    pub scale_factor: u32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl DisplayMode {
    /// Compute the mode for a screen size
    pub fn compute(
        screen_width: u32,
        screen_height: u32,
        fullscreen: bool,
        requested_scale: u32,
        base: (u32, u32),
    ) -> Self {
        let scale_factor = fit_scale_factor(requested_scale, (screen_width, screen_height), base);

        Self {
            screen_width,
            screen_height,
            fullscreen,
            requested_scale: requested_scale.max(1),
            scale_factor,
            canvas_width: screen_width / scale_factor,
            canvas_height: screen_height / scale_factor,
        }
    }

    /// A separate low-resolution canvas is drawn into and upscaled at flip time
    pub fn has_secondary_canvas(&self) -> bool {
        self.scale_factor > 1
    }
}

/// Area of the native panel the screen is stretched into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Aspect-preserving placement of a `screen` sized image on a `native` panel
    ///
    /// `stretch` fills the whole panel. Otherwise the image is scaled to the
    /// panel height and centred horizontally.
    pub fn letterbox(screen: (u32, u32), native: (u32, u32), stretch: bool) -> Self {
        let (native_w, native_h) = native;

        if stretch || screen.0 == 0 || screen.1 == 0 {
            return Self {
                x: 0,
                y: 0,
                width: native_w,
                height: native_h,
            };
        }

        let width = ((screen.0 as f32 * (native_h as f32 / screen.1 as f32)) as u32).min(native_w);

        Self {
            x: (native_w - width) / 2,
            y: 0,
            width,
            height: native_h,
        }
    }
}

/// Largest usable resolution
///
/// Starts from `base`, grows to the largest listed mode on each axis and is
/// clamped to `max`. `ResolutionList::Any` yields `max` directly.
pub fn max_resolution(modes: &ResolutionList, base: (u32, u32), max: (u32, u32)) -> (u32, u32) {
    match modes {
        ResolutionList::Any => max,
        ResolutionList::Modes(modes) => {
            let (mut width, mut height) = base;
            for &(w, h) in modes {
                width = width.max(w);
                height = height.max(h);
            }
            (width.min(max.0), height.min(max.1))
        }
    }
}
