// Window module - winit window and pixels renderer behind the video layer
//
// PixelsBackend realises GraphicsBackend on a winit window: the screen
// surface is converted to RGBA through the hardware palette into the pixels
// frame buffer. VideoApp drives a Video through the winit event loop.

use super::backend::GraphicsBackend;
use super::event::{Key, VideoEvent};
use super::mode::{ResolutionList, Viewport};
use super::surface::Surface;
use super::tint::TintOverlay;
use super::video::Video;
use crate::config::VideoConfig;
use crate::error::VideoError;
use crate::palette::{Color, Palette, PaletteEffects, RotateEffect};
use crate::shader::{ProgramPair, ShaderDevice, ShaderError, ShaderKind, ShaderSources};
use pixels::wgpu;
use pixels::{Pixels, SurfaceTexture};
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

/// Shader program compiled on the pixels device
pub struct GpuProgram {
    pair: ProgramPair,
    _vertex: wgpu::ShaderModule,
    _fragment: wgpu::ShaderModule,
}

impl GpuProgram {
    pub fn pair(&self) -> ProgramPair {
        self.pair
    }
}

/// Graphics backend on a winit window with a pixels frame buffer
///
/// The backend starts detached; `attach` hands it the window once the event
/// loop has created one.
pub struct PixelsBackend {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    buffer_size: (u32, u32),
    physical: Palette,
    sources: ShaderSources,
    bound: Option<ProgramPair>,
    bilinear: bool,
    viewport: Option<Viewport>,
    tint: Option<TintOverlay>,
}

impl PixelsBackend {
    pub fn new() -> Self {
        Self {
            window: None,
            pixels: None,
            buffer_size: (0, 0),
            physical: Palette::black(),
            sources: ShaderSources::builtin(),
            bound: None,
            bilinear: true,
            viewport: None,
            tint: None,
        }
    }

    /// Compile shader programs from `sources`
    pub fn with_sources(mut self, sources: ShaderSources) -> Self {
        self.sources = sources;
        self
    }

    /// Register more shader sources
    pub fn sources_mut(&mut self) -> &mut ShaderSources {
        &mut self.sources
    }

    /// Bind the backend to a window and create its frame buffer
    pub fn attach(&mut self, window: Arc<Window>) -> Result<(), VideoError> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        // Arc<Window> gives the surface texture its 'static lifetime
        let surface_texture = SurfaceTexture::new(width, height, window.clone());
        let pixels = Pixels::new(width, height, surface_texture)
            .map_err(|e| VideoError::ModeSet(e.to_string()))?;

        self.buffer_size = (width, height);
        self.window = Some(window);
        self.pixels = Some(pixels);
        Ok(())
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    pub fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Size of the frame buffer
    pub fn buffer_size(&self) -> (u32, u32) {
        self.buffer_size
    }

    pub fn bound_program(&self) -> Option<ProgramPair> {
        self.bound
    }

    pub fn bilinear(&self) -> bool {
        self.bilinear
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    fn render(&mut self) {
        if let Some(pixels) = &mut self.pixels {
            if let Err(err) = pixels.render() {
                log::error!("Render error: {}", err);
            }
        }
    }
}

impl Default for PixelsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for PixelsBackend {
    fn set_video_mode(&mut self, width: u32, height: u32, fullscreen: bool) -> Result<(), VideoError> {
        let (Some(window), Some(pixels)) = (&self.window, &mut self.pixels) else {
            return Err(VideoError::ModeSet("no window".to_string()));
        };
        if width == 0 || height == 0 {
            return Err(VideoError::ModeSet(format!("invalid size {}x{}", width, height)));
        }

        if fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        } else {
            window.set_fullscreen(None);
            let _ = window.request_inner_size(PhysicalSize::new(width, height));
        }

        pixels
            .resize_buffer(width, height)
            .map_err(|e| VideoError::ModeSet(e.to_string()))?;

        let size = window.inner_size();
        pixels
            .resize_surface(size.width.max(1), size.height.max(1))
            .map_err(|e| VideoError::ModeSet(e.to_string()))?;

        self.buffer_size = (width, height);
        Ok(())
    }

    fn list_modes(&self, fullscreen: bool) -> ResolutionList {
        if !fullscreen {
            return ResolutionList::Any;
        }

        match self.window.as_ref().and_then(|w| w.current_monitor()) {
            Some(monitor) => ResolutionList::Modes(
                monitor
                    .video_modes()
                    .map(|mode| {
                        let size = mode.size();
                        (size.width, size.height)
                    })
                    .collect(),
            ),
            None => ResolutionList::Any,
        }
    }

    fn set_physical_palette(&mut self, first: usize, colors: &[Color]) {
        self.physical.write(first, colors);
    }

    fn present(&mut self, screen: &Surface) {
        let Some(pixels) = &mut self.pixels else {
            return;
        };

        let frame = pixels.frame_mut();
        if frame.len() < screen.width() * screen.height() * 4 {
            log::debug!("Frame buffer not resized yet, skipping present");
            return;
        }

        screen.to_rgba(&self.physical, frame);
        if let Some(tint) = self.tint {
            tint.blend_rgba(frame);
        }

        self.render();
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if let Some(window) = &self.window {
            window.set_cursor_visible(visible);
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = &self.window {
            window.set_title(title);
        }
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        // The scaling renderer always fits the whole surface
        log::debug!(
            "Viewport {}x{} at ({}, {})",
            viewport.width,
            viewport.height,
            viewport.x,
            viewport.y
        );
        self.viewport = Some(viewport);
    }

    fn set_bilinear(&mut self, enabled: bool) {
        log::debug!("Bilinear filtering {}", if enabled { "on" } else { "off" });
        self.bilinear = enabled;
    }

    fn set_tint(&mut self, tint: Option<TintOverlay>) {
        self.tint = tint;
    }
}

fn compile_module(
    device: &wgpu::Device,
    sources: &ShaderSources,
    name: &str,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let source = sources
        .get(name)
        .ok_or_else(|| ShaderError::MissingSource(name.to_string()))?;

    // WGSL errors are reported through the error scope instead of the
    // device's uncaptured error handler, which panics
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(name),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    });
    let error = pollster::block_on(device.pop_error_scope());

    scope_result(name, error)?;
    Ok(module)
}

fn scope_result<E: std::fmt::Display>(name: &str, error: Option<E>) -> Result<(), ShaderError> {
    match error {
        Some(err) => {
            log::warn!("Shader '{}' rejected: {}", name, err);
            Err(ShaderError::Compile {
                program: name.to_string(),
                message: err.to_string(),
            })
        }
        None => Ok(()),
    }
}

impl ShaderDevice for PixelsBackend {
    type Program = GpuProgram;

    fn create_program(&mut self, pair: &ProgramPair) -> Result<GpuProgram, ShaderError> {
        for name in [pair.vertex, pair.fragment] {
            if !self.sources.contains(name) {
                return Err(ShaderError::MissingSource(name.to_string()));
            }
        }

        let pixels = self.pixels.as_ref().ok_or_else(|| ShaderError::Compile {
            program: pair.to_string(),
            message: "no GPU device".to_string(),
        })?;
        let device = pixels.device();

        Ok(GpuProgram {
            pair: *pair,
            _vertex: compile_module(device, &self.sources, pair.vertex)?,
            _fragment: compile_module(device, &self.sources, pair.fragment)?,
        })
    }

    fn bind_program(&mut self, program: &GpuProgram) {
        self.bound = Some(program.pair);
    }

    fn clear_and_swap(&mut self) {
        if let Some(pixels) = &mut self.pixels {
            pixels.frame_mut().fill(0);
        }
        self.render();
    }

    fn wait_rendering_done(&mut self) {
        if let Some(pixels) = &self.pixels {
            let _ = pixels.device().poll(wgpu::Maintain::Wait);
        }
    }

    fn free_program(&mut self, program: GpuProgram) {
        if self.bound == Some(program.pair) {
            self.bound = None;
        }
    }
}

/// Map a physical key to the keys the video layer knows
pub fn translate_key(key: PhysicalKey) -> Key {
    match key {
        PhysicalKey::Code(KeyCode::Enter | KeyCode::NumpadEnter) => Key::Return,
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        _ => Key::Other,
    }
}

/// Translate a winit window event into a video event
///
/// Resizes to `current` size and zero-sized (minimised) windows are dropped.
pub fn translate_event(
    event: &WindowEvent,
    modifiers: ModifiersState,
    current: (u32, u32),
) -> Option<VideoEvent> {
    match event {
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key,
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } => Some(VideoEvent::KeyDown {
            key: translate_key(*physical_key),
            alt: modifiers.alt_key(),
        }),
        WindowEvent::Resized(size) => {
            let size = (size.width, size.height);
            (size.0 > 0 && size.1 > 0 && size != current).then_some(VideoEvent::Resize {
                width: size.0,
                height: size.1,
            })
        }
        WindowEvent::Occluded(false) => Some(VideoEvent::Expose),
        _ => None,
    }
}

/// Shader following `current` in menu order
fn next_shader(current: ShaderKind) -> ShaderKind {
    let all = ShaderKind::ALL;
    let index = all.iter().position(|&kind| kind == current).unwrap_or(0);
    all[(index + 1) % all.len()]
}

/// Windowed demo driving a Video with a test pattern and palette rotation
///
/// Keys: Alt+Enter fullscreen, F2 next shader, F3 bilinear, F4 tint,
/// F5 save settings, F6 reload settings, Escape quit.
pub struct VideoApp {
    video: Video<PixelsBackend>,
    start_fullscreen: bool,
    modifiers: ModifiersState,
    effects: PaletteEffects,
    last_frame_time: Instant,
}

impl VideoApp {
    pub fn new(config: VideoConfig, start_fullscreen: bool) -> Self {
        let mut effects = PaletteEffects::new();
        effects.push(RotateEffect::new(16, 224, 30.0));

        Self {
            video: Video::new(PixelsBackend::new(), config),
            start_fullscreen,
            modifiers: ModifiersState::empty(),
            effects,
            last_frame_time: Instant::now(),
        }
    }

    pub fn video(&self) -> &Video<PixelsBackend> {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut Video<PixelsBackend> {
        &mut self.video
    }

    /// Settings shortcuts; returns whether the key was consumed
    fn handle_hotkey(&mut self, key: PhysicalKey) -> bool {
        let PhysicalKey::Code(code) = key else {
            return false;
        };

        match code {
            KeyCode::F2 => {
                let next = next_shader(self.video.settings().shader);
                self.video.select_shader(next);
            }
            KeyCode::F3 => {
                let settings = self.video.settings_mut();
                settings.bilinear = !settings.bilinear;
                self.video.apply_settings();
            }
            KeyCode::F4 => {
                let settings = self.video.settings_mut();
                settings.tint_enabled = !settings.tint_enabled;
                self.video.apply_settings();
            }
            KeyCode::F5 => {
                let _ = self.video.save_settings();
            }
            KeyCode::F6 => self.video.reload_settings(),
            _ => return false,
        }

        true
    }

    fn draw_frame(&mut self) {
        let now = Instant::now();
        let ms = now.duration_since(self.last_frame_time).as_millis().min(u32::MAX as u128) as u32;
        self.last_frame_time = now;

        if let Some(canvas) = self.video.canvas_mut() {
            canvas.test_pattern();
        }
        self.video.flip(ms, Some(&mut self.effects), false);
    }
}

impl ApplicationHandler for VideoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.video.backend().window().is_some() {
            return;
        }

        let config = self.video.config();
        let (width, height) = (config.width, config.height);
        let window_attributes = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(config.platform.is_resizable());

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        if let Err(e) = self.video.backend_mut().attach(window) {
            log::error!("Failed to create pixel buffer: {}", e);
            event_loop.exit();
            return;
        }

        if self.video.init(width, height, self.start_fullscreen).is_err() {
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                self.video.shutdown();
                event_loop.exit();
                return;
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
                return;
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if translate_key(*physical_key) == Key::Escape {
                    self.video.shutdown();
                    event_loop.exit();
                    return;
                }
                if self.handle_hotkey(*physical_key) {
                    return;
                }
            }
            WindowEvent::RedrawRequested => {
                self.draw_frame();
                self.video.backend().request_redraw();
                return;
            }
            _ => {}
        }

        let current = (self.video.width(), self.video.height());
        if let Some(video_event) = translate_event(&event, self.modifiers, current) {
            self.video.update(&video_event);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        self.video.backend().request_redraw();
    }
}

/// Create the window and run the demo until it is closed
pub fn run_display(config: VideoConfig, fullscreen: bool) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;

    if config.vsync {
        event_loop.set_control_flow(ControlFlow::Wait);
    } else {
        event_loop.set_control_flow(ControlFlow::Poll);
    }

    log::info!("Starting display window...");
    log::info!("  Platform: {:?}", config.platform);
    log::info!("  Size: {}x{}", config.width, config.height);
    log::info!("  Base resolution: {}x{}", config.base_width, config.base_height);
    log::info!("  Scale: {}x", config.scale);
    log::info!("  VSync: {}", config.vsync);

    let mut app = VideoApp::new(config, fullscreen);
    event_loop.run_app(&mut app)?;

    Ok(())
}
