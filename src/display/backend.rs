// Graphics backend - the seam between the video layer and the graphics library
//
// Video decides what to request; a GraphicsBackend carries it out. The
// windowed backend lives in window.rs. HeadlessBackend keeps everything in
// memory and records what was asked of it, for offscreen runs and tests.

use super::mode::{ResolutionList, Viewport};
use super::surface::Surface;
use super::tint::TintOverlay;
use crate::error::VideoError;
use crate::palette::{Color, Palette};
use crate::shader::{ProgramPair, ShaderDevice, ShaderError, ShaderSources};

/// Operations the video layer needs from the graphics library
pub trait GraphicsBackend: ShaderDevice {
    /// Switch to a `width` x `height` mode
    fn set_video_mode(&mut self, width: u32, height: u32, fullscreen: bool) -> Result<(), VideoError>;

    /// Resolutions available for the given mode kind
    fn list_modes(&self, fullscreen: bool) -> ResolutionList;

    /// Commit `colors` to the hardware palette starting at entry `first`
    fn set_physical_palette(&mut self, first: usize, colors: &[Color]);

    /// Show `screen`, interpreting its indices through the hardware palette
    fn present(&mut self, screen: &Surface);

    /// Allocate a secondary canvas surface
    fn allocate_canvas(&mut self, width: u32, height: u32) -> Surface {
        Surface::new(width as usize, height as usize)
    }

    /// Release a canvas obtained from `allocate_canvas`
    fn release_canvas(&mut self, canvas: Surface) {
        drop(canvas);
    }

    fn set_cursor_visible(&mut self, visible: bool);

    fn set_title(&mut self, title: &str);

    /// Placement of the screen on a fixed native panel
    fn set_viewport(&mut self, viewport: Viewport);

    /// Filtering used when scaling the screen to the output
    fn set_bilinear(&mut self, enabled: bool);

    /// Full-screen tint overlay, or `None` to disable it
    fn set_tint(&mut self, tint: Option<TintOverlay>);
}

/// Program handle issued by the headless backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessProgram {
    pub id: u32,
    pub pair: ProgramPair,
}

/// In-memory backend
///
/// Presented frames are converted to RGBA so their colors can be inspected.
#[derive(Debug)]
pub struct HeadlessBackend {
    modes: ResolutionList,
    fail_mode_set: bool,
    mode: Option<(u32, u32, bool)>,
    mode_requests: Vec<(u32, u32, bool)>,
    physical: Palette,
    palette_commits: Vec<(usize, usize)>,
    frame: Vec<u8>,
    frame_size: (usize, usize),
    presents: usize,
    canvases_allocated: usize,
    canvases_released: usize,
    cursor_visible: bool,
    title: String,
    viewport: Option<Viewport>,
    bilinear: bool,
    tint: Option<TintOverlay>,
    sources: ShaderSources,
    next_program_id: u32,
    live_programs: Vec<u32>,
    programs_freed: usize,
    bound: Option<ProgramPair>,
    clear_swaps: usize,
    render_waits: usize,
}

impl HeadlessBackend {
    /// A backend that accepts any resolution and knows only the built-in shaders
    pub fn new() -> Self {
        Self {
            modes: ResolutionList::Any,
            fail_mode_set: false,
            mode: None,
            mode_requests: Vec::new(),
            physical: Palette::black(),
            palette_commits: Vec::new(),
            frame: Vec::new(),
            frame_size: (0, 0),
            presents: 0,
            canvases_allocated: 0,
            canvases_released: 0,
            cursor_visible: true,
            title: String::new(),
            viewport: None,
            bilinear: false,
            tint: None,
            sources: ShaderSources::builtin(),
            next_program_id: 1,
            live_programs: Vec::new(),
            programs_freed: 0,
            bound: None,
            clear_swaps: 0,
            render_waits: 0,
        }
    }

    /// Report only these resolutions from `list_modes`
    pub fn with_modes(mut self, modes: Vec<(u32, u32)>) -> Self {
        self.modes = ResolutionList::Modes(modes);
        self
    }

    /// Use `sources` to decide which programs can be created
    pub fn with_sources(mut self, sources: ShaderSources) -> Self {
        self.sources = sources;
        self
    }

    /// Make every `set_video_mode` call fail
    pub fn failing(mut self) -> Self {
        self.fail_mode_set = true;
        self
    }

    /// Current mode as (width, height, fullscreen)
    pub fn mode(&self) -> Option<(u32, u32, bool)> {
        self.mode
    }

    /// Every mode ever requested, in order
    pub fn mode_requests(&self) -> &[(u32, u32, bool)] {
        &self.mode_requests
    }

    pub fn physical_palette(&self) -> &Palette {
        &self.physical
    }

    /// Hardware palette updates as (first, count)
    pub fn palette_commits(&self) -> &[(usize, usize)] {
        &self.palette_commits
    }

    /// RGBA pixels of the last presented frame
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn frame_size(&self) -> (usize, usize) {
        self.frame_size
    }

    /// RGBA of one pixel of the last presented frame
    pub fn frame_pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let offset = (y * self.frame_size.0 + x) * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.frame[offset..offset + 4]);
        rgba
    }

    pub fn presents(&self) -> usize {
        self.presents
    }

    pub fn canvases_allocated(&self) -> usize {
        self.canvases_allocated
    }

    pub fn canvases_released(&self) -> usize {
        self.canvases_released
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn bilinear(&self) -> bool {
        self.bilinear
    }

    pub fn tint(&self) -> Option<TintOverlay> {
        self.tint
    }

    /// Programs created and not yet freed
    pub fn live_programs(&self) -> usize {
        self.live_programs.len()
    }

    pub fn programs_freed(&self) -> usize {
        self.programs_freed
    }

    pub fn bound_program(&self) -> Option<ProgramPair> {
        self.bound
    }

    pub fn clear_swaps(&self) -> usize {
        self.clear_swaps
    }

    pub fn render_waits(&self) -> usize {
        self.render_waits
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn set_video_mode(&mut self, width: u32, height: u32, fullscreen: bool) -> Result<(), VideoError> {
        self.mode_requests.push((width, height, fullscreen));
        if self.fail_mode_set {
            return Err(VideoError::ModeSet(format!(
                "{}x{} not supported by headless backend",
                width, height
            )));
        }
        self.mode = Some((width, height, fullscreen));
        Ok(())
    }

    fn list_modes(&self, _fullscreen: bool) -> ResolutionList {
        self.modes.clone()
    }

    fn set_physical_palette(&mut self, first: usize, colors: &[Color]) {
        self.physical.write(first, colors);
        self.palette_commits.push((first, colors.len()));
    }

    fn present(&mut self, screen: &Surface) {
        self.frame_size = (screen.width(), screen.height());
        self.frame.resize(screen.width() * screen.height() * 4, 0);
        screen.to_rgba(&self.physical, &mut self.frame);
        if let Some(tint) = self.tint {
            tint.blend_rgba(&mut self.frame);
        }
        self.presents += 1;
    }

    fn allocate_canvas(&mut self, width: u32, height: u32) -> Surface {
        self.canvases_allocated += 1;
        Surface::new(width as usize, height as usize)
    }

    fn release_canvas(&mut self, canvas: Surface) {
        self.canvases_released += 1;
        drop(canvas);
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn set_bilinear(&mut self, enabled: bool) {
        self.bilinear = enabled;
    }

    fn set_tint(&mut self, tint: Option<TintOverlay>) {
        self.tint = tint;
    }
}

impl ShaderDevice for HeadlessBackend {
    type Program = HeadlessProgram;

    fn create_program(&mut self, pair: &ProgramPair) -> Result<HeadlessProgram, ShaderError> {
        for name in [pair.vertex, pair.fragment] {
            if !self.sources.contains(name) {
                return Err(ShaderError::MissingSource(name.to_string()));
            }
        }

        let id = self.next_program_id;
        self.next_program_id += 1;
        self.live_programs.push(id);
        Ok(HeadlessProgram { id, pair: *pair })
    }

    fn bind_program(&mut self, program: &HeadlessProgram) {
        self.bound = Some(program.pair);
    }

    fn clear_and_swap(&mut self) {
        self.frame.fill(0);
        self.clear_swaps += 1;
    }

    fn wait_rendering_done(&mut self) {
        self.render_waits += 1;
    }

    fn free_program(&mut self, program: HeadlessProgram) {
        self.live_programs.retain(|&id| id != program.id);
        self.programs_freed += 1;
        if self.bound == Some(program.pair) {
            self.bound = None;
        }
    }
}
