// Video - the single owning context for palettes, surfaces and display mode
//
// One Video exists per display. It owns the screen surface, the optional
// low-resolution canvas, the palettes, the user settings and the active
// shader, and drives a GraphicsBackend to realise them.

use super::backend::GraphicsBackend;
use super::event::VideoEvent;
use super::mode::{max_resolution, DisplayMode, Platform, Viewport};
use super::surface::Surface;
use super::tint::{local_hour, TintOverlay};
use crate::config::VideoConfig;
use crate::error::VideoError;
use crate::overlay::OverlayResponse;
use crate::palette::{color::clamp_range, Color, Palette, PaletteEffects, PaletteStore};
use crate::settings::Settings;
use crate::shader::{ShaderKind, ShaderSelector};
use std::io;

/// Video output
pub struct Video<B: GraphicsBackend> {
    backend: B,
    config: VideoConfig,
    palettes: PaletteStore,
    settings: Settings,
    shaders: ShaderSelector<B::Program>,

    /// Primary surface, sized to the screen
    screen: Option<Surface>,

    /// Secondary low-resolution surface, only while the scale factor is above 1
    canvas: Option<Surface>,

    mode: DisplayMode,
    fullscreen: bool,
    requested_scale: u32,
    max_width: u32,
    max_height: u32,

    /// The hardware palette is emulated, so effects are composited before upload
    fake_palette: bool,

    viewport: Option<Viewport>,
    tint: Option<TintOverlay>,

    /// Local hour source for the tint schedule
    clock: fn() -> u32,
}

impl<B: GraphicsBackend> Video<B> {
    /// Create the video object; nothing is shown until `init`
    pub fn new(backend: B, config: VideoConfig) -> Self {
        let (max_width, max_height) = config.base_size();

        Self {
            backend,
            palettes: PaletteStore::new(),
            settings: Settings::default(),
            shaders: ShaderSelector::new(),
            screen: None,
            canvas: None,
            mode: DisplayMode::default(),
            fullscreen: config.fullscreen,
            requested_scale: config.scale.max(1),
            max_width,
            max_height,
            fake_palette: !config.indexed_hardware,
            viewport: None,
            tint: None,
            clock: local_hour,
            config,
        }
    }

    /// Replace the local hour source used by the tint schedule
    pub fn with_clock(mut self, clock: fn() -> u32) -> Self {
        self.clock = clock;
        self
    }

    /// Initialise video output
    ///
    /// Loads the user settings, sets the first video mode, the window title
    /// and the maximum resolution. A failed mode switch is logged and
    /// returned; nothing is retried.
    pub fn init(&mut self, width: u32, height: u32, start_fullscreen: bool) -> Result<(), VideoError> {
        self.fullscreen = start_fullscreen || self.config.platform.forces_fullscreen();

        self.settings.load_from(&self.config.settings_path);

        if self.fullscreen {
            self.backend.set_cursor_visible(false);
        }

        if let Err(e) = self.reset(width, height) {
            log::error!("Could not set video mode: {}", e);
            return Err(e);
        }

        self.set_title(None);
        self.find_max_resolution();

        Ok(())
    }

    /// Set the size of the window or the resolution of the screen
    ///
    /// Releases the previous canvas, requests the new mode, re-fits the scale
    /// factor and allocates a new canvas when it is above 1.
    pub fn reset(&mut self, width: u32, height: u32) -> Result<(), VideoError> {
        let platform = self.config.platform;
        let (width, height) = match platform {
            Platform::Fixed => (self.config.width, self.config.height),
            _ => (width, height),
        };
        let fullscreen = self.fullscreen || platform.forces_fullscreen();

        if let Some(canvas) = self.canvas.take() {
            self.backend.release_canvas(canvas);
        }
        self.screen = None;

        self.backend.set_video_mode(width, height, fullscreen)?;

        let mut screen = Surface::new(width as usize, height as usize);
        screen.set_palette(self.palettes.logical());
        self.screen = Some(screen);

        self.mode = DisplayMode::compute(
            width,
            height,
            fullscreen,
            self.requested_scale,
            self.config.base_size(),
        );

        if self.mode.has_secondary_canvas() {
            let mut canvas = self
                .backend
                .allocate_canvas(self.mode.canvas_width, self.mode.canvas_height);
            self.restore_surface_palette(&mut canvas);
            self.canvas = Some(canvas);
        }

        self.apply_settings();
        self.expose();

        log::info!(
            "Video mode {}x{}{} scale {}x (canvas {}x{})",
            width,
            height,
            if fullscreen { " fullscreen" } else { "" },
            self.mode.scale_factor,
            self.mode.canvas_width,
            self.mode.canvas_height
        );

        Ok(())
    }

    /// Push the user settings to the backend
    ///
    /// Filtering and shader apply everywhere. Viewport placement applies to
    /// platforms with a fixed native panel, the tint to platforms with a clock.
    pub fn apply_settings(&mut self) {
        let platform = self.config.platform;

        self.backend.set_bilinear(self.settings.bilinear);

        if let Some(native) = platform.native_size() {
            let viewport = Viewport::letterbox(
                (self.mode.screen_width, self.mode.screen_height),
                native,
                self.settings.fullscreen,
            );
            self.backend.set_viewport(viewport);
            self.viewport = Some(viewport);
        }

        self.tint = if platform.has_clock() && self.settings.tint_enabled {
            Some(TintOverlay::for_hour(self.settings.tint_color, (self.clock)()))
        } else {
            None
        };
        self.backend.set_tint(self.tint);

        if self.shaders.active_kind() != Some(self.settings.shader) {
            if let Err(e) = self.shaders.select(&mut self.backend, self.settings.shader) {
                log::warn!("Could not select shader {:?}: {}", self.settings.shader, e);
            }
        }
    }

    /// Select a shader and remember it in the settings
    pub fn select_shader(&mut self, kind: ShaderKind) {
        self.settings.shader = kind;
        self.apply_settings();
    }

    /// Current user settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable user settings; call `apply_settings` afterwards
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Re-read the settings file and apply it
    pub fn reload_settings(&mut self) {
        self.settings.load_from(&self.config.settings_path);
        self.apply_settings();
    }

    /// Write the current settings to the settings file
    pub fn save_settings(&self) -> io::Result<()> {
        self.settings
            .save_to(&self.config.settings_path)
            .inspect_err(|e| log::warn!("Could not save settings: {}", e))
    }

    /// Carry out what the settings overlay asked for
    ///
    /// A reload replaces any edits made in the same frame.
    pub fn apply_overlay(&mut self, response: OverlayResponse) {
        if response.reload {
            self.reload_settings();
        } else if response.changed {
            self.apply_settings();
        }

        if response.save {
            // Failure is already logged
            let _ = self.save_settings();
        }
    }

    /// Find the maximum horizontal and vertical resolutions
    pub fn find_max_resolution(&mut self) {
        let (width, height) = match self.config.platform {
            Platform::Fixed => (self.config.width, self.config.height),
            _ => {
                let modes = self.backend.list_modes(self.fullscreen);
                max_resolution(&modes, self.config.base_size(), self.config.max_size())
            }
        };

        self.max_width = width;
        self.max_height = height;
    }

    /// Set the scaling factor
    ///
    /// The factor is accepted only if the base resolution scaled by it fits
    /// the current screen. Returns the factor in effect afterwards.
    pub fn set_scale_factor(&mut self, factor: u32) -> u32 {
        let (base_w, base_h) = self.config.base_size();

        if factor >= 1
            && base_w.saturating_mul(factor) <= self.mode.screen_width
            && base_h.saturating_mul(factor) <= self.mode.screen_height
        {
            self.requested_scale = factor;

            if self.screen.is_some() {
                let (width, height) = (self.mode.screen_width, self.mode.screen_height);
                if let Err(e) = self.reset(width, height) {
                    log::error!("Could not set video mode: {}", e);
                }
            }
        }

        self.mode.scale_factor
    }

    /// Update video based on a system event
    pub fn update(&mut self, event: &VideoEvent) {
        let platform = self.config.platform;

        match *event {
            VideoEvent::KeyDown { .. } if event.is_fullscreen_toggle() => {
                if !platform.forces_fullscreen() {
                    self.toggle_fullscreen();
                }
            }
            VideoEvent::Resize { width, height } => {
                if platform.is_resizable() {
                    if let Err(e) = self.reset(width, height) {
                        log::error!("Could not set video mode: {}", e);
                    }
                }
            }
            VideoEvent::Expose => self.expose(),
            VideoEvent::KeyDown { .. } => {}
        }
    }

    fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;

        if self.fullscreen {
            self.backend.set_cursor_visible(false);
        }

        let (width, height) = (self.mode.screen_width, self.mode.screen_height);
        if let Err(e) = self.reset(width, height) {
            log::error!("Could not set video mode: {}", e);
        }

        if !self.fullscreen {
            self.backend.set_cursor_visible(true);
        }

        self.find_max_resolution();
    }

    /// Sets the display palette
    ///
    /// The screen is blanked and presented first so the change is not
    /// visible on the old frame.
    pub fn set_palette(&mut self, palette: &Palette) {
        let black = self.palettes.logical().nearest_index(Color::BLACK);
        self.clear_screen(black);
        self.flip(0, None, false);

        self.backend.set_physical_palette(0, palette.as_slice());
        self.palettes.set_current(palette);
    }

    /// The current display palette
    pub fn palette(&self) -> &Palette {
        self.palettes.current()
    }

    /// The logical palette
    pub fn logical_palette(&self) -> &Palette {
        self.palettes.logical()
    }

    /// Set `count` entries of the hardware palette from `palette`, starting at `first`
    ///
    /// The current palette is not modified.
    pub fn change_palette(&mut self, palette: &Palette, first: u8, count: usize) {
        let first = first as usize;
        let range = clamp_range(first..first.saturating_add(count));
        if range.is_empty() {
            return;
        }
        self.backend
            .set_physical_palette(range.start, palette.range(range));
    }

    /// Bind the logical palette to a surface
    pub fn restore_surface_palette(&self, surface: &mut Surface) {
        surface.set_palette(self.palettes.logical());
    }

    /// Refresh the display palette
    pub fn expose(&mut self) {
        if let Some(screen) = &mut self.screen {
            screen.set_palette(self.palettes.logical());
        }
        self.backend
            .set_physical_palette(0, self.palettes.current().as_slice());
    }

    /// Draw the frame to the screen
    ///
    /// Upscales the canvas when one is in use, applies palette effects and
    /// presents. With an emulated palette every effect is composited into a
    /// copy of the current palette and uploaded once; with a real palette
    /// each effect uploads its own range.
    pub fn flip(&mut self, ms_per_frame: u32, effects: Option<&mut PaletteEffects>, effects_stopped: bool) {
        if let (Some(canvas), Some(screen)) = (&self.canvas, &mut self.screen) {
            canvas.scale_into(screen, self.mode.scale_factor as usize);
        }

        if let Some(effects) = effects {
            if self.fake_palette {
                let mut shown = self.palettes.current().clone();
                effects.apply(&mut shown, ms_per_frame, effects_stopped);
                self.backend.set_physical_palette(0, shown.as_slice());
            } else {
                let backend = &mut self.backend;
                effects.apply_direct(
                    self.palettes.current(),
                    ms_per_frame,
                    effects_stopped,
                    |first, colors| backend.set_physical_palette(first, colors),
                );
            }
        }

        if let Some(screen) = &self.screen {
            self.backend.present(screen);
        }
    }

    /// Fill the canvas with a palette index
    pub fn clear_screen(&mut self, index: u8) {
        if let Some(canvas) = self.canvas_mut() {
            canvas.clear(index);
        }
    }

    /// Fill a rectangle of the canvas with a palette index
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, index: u8) {
        if let Some(canvas) = self.canvas_mut() {
            canvas.fill_rect(x, y, width, height, index);
        }
    }

    /// The surface game code draws into
    pub fn canvas(&self) -> Option<&Surface> {
        self.canvas.as_ref().or(self.screen.as_ref())
    }

    /// Mutable access to the surface game code draws into
    pub fn canvas_mut(&mut self) -> Option<&mut Surface> {
        if self.canvas.is_some() {
            self.canvas.as_mut()
        } else {
            self.screen.as_mut()
        }
    }

    /// The primary surface
    pub fn screen(&self) -> Option<&Surface> {
        self.screen.as_ref()
    }

    /// Sets the window title; `None` uses the base title
    pub fn set_title(&mut self, title: Option<&str>) {
        let full = match title {
            Some(title) => format!("{} - {}", self.config.title, title),
            None => self.config.title.clone(),
        };
        self.backend.set_title(&full);
    }

    /// Release the shader and canvas
    ///
    /// Safe to call more than once; also runs on drop.
    pub fn shutdown(&mut self) {
        self.shaders.clear(&mut self.backend);
        if let Some(canvas) = self.canvas.take() {
            self.backend.release_canvas(canvas);
        }
        self.screen = None;
    }

    /// Current width of the window or screen
    pub fn width(&self) -> u32 {
        self.mode.screen_width
    }

    /// Current height of the window or screen
    pub fn height(&self) -> u32 {
        self.mode.screen_height
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    /// Scale factor in effect
    pub fn scale_factor(&self) -> u32 {
        self.mode.scale_factor
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Snapshot of the current geometry
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn tint(&self) -> Option<TintOverlay> {
        self.tint
    }

    /// Kind of the active shader, if one is bound
    pub fn shader(&self) -> Option<ShaderKind> {
        self.shaders.active_kind()
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

impl<B: GraphicsBackend> Drop for Video<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
