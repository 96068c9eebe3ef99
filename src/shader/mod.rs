// Shader module - Post-processing shader selection
//
// This module provides:
// - ShaderKind: the closed set of selectable shaders
// - The kind -> program pair table
// - ShaderDevice: the GPU seam that compiles, binds and frees programs
// - ShaderSelector: owns at most one active program and frees it exactly once

pub mod programs;
pub mod sources;

pub use programs::{program_pair, ProgramPair, PASSTHROUGH};
pub use sources::{ShaderSources, FRAGMENT_ENTRY, VERTEX_ENTRY};

/// Blank-and-present cycles run after binding a new program
pub const FLUSH_CYCLES: usize = 3;

/// Selectable post-processing shaders
///
/// The discriminants are the values stored in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderKind {
    #[default]
    None = 0,
    Lcd3x = 1,
    Scale2x = 2,
    AdvancedAa = 3,
    SharpBilinear = 4,
    SharpBilinearSimple = 5,
    Fxaa = 6,
    Xbr2x = 7,
    Xbr2xFast = 8,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 9] = [
        ShaderKind::None,
        ShaderKind::Lcd3x,
        ShaderKind::Scale2x,
        ShaderKind::AdvancedAa,
        ShaderKind::SharpBilinear,
        ShaderKind::SharpBilinearSimple,
        ShaderKind::Fxaa,
        ShaderKind::Xbr2x,
        ShaderKind::Xbr2xFast,
    ];

    /// Decode a stored value; anything unknown is `None`
    pub fn from_raw(raw: i32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.to_raw() == raw)
            .unwrap_or(ShaderKind::None)
    }

    pub fn to_raw(self) -> i32 {
        self as i32
    }

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            ShaderKind::None => "None",
            ShaderKind::Lcd3x => "LCD 3x",
            ShaderKind::Scale2x => "Scale 2x",
            ShaderKind::AdvancedAa => "Advanced AA",
            ShaderKind::SharpBilinear => "Sharp Bilinear (Scanlines)",
            ShaderKind::SharpBilinearSimple => "Sharp Bilinear",
            ShaderKind::Fxaa => "FXAA",
            ShaderKind::Xbr2x => "xBR x2",
            ShaderKind::Xbr2xFast => "xBR x2 (Fast)",
        }
    }
}

/// Errors raised while creating a shader program
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// No source is available for the named program
    MissingSource(String),

    /// The GPU rejected the program
    Compile { program: String, message: String },
}

impl std::fmt::Display for ShaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderError::MissingSource(name) => write!(f, "No source for program '{}'", name),
            ShaderError::Compile { program, message } => {
                write!(f, "Failed to compile '{}': {}", program, message)
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// GPU operations the shader selector needs
pub trait ShaderDevice {
    /// Compiled vertex + fragment program
    type Program;

    /// Compile and link a program pair
    fn create_program(&mut self, pair: &ProgramPair) -> Result<Self::Program, ShaderError>;

    /// Make `program` the one used to draw the frame texture
    fn bind_program(&mut self, program: &Self::Program);

    /// Clear the target and present it
    fn clear_and_swap(&mut self);

    /// Block until all submitted rendering has completed
    fn wait_rendering_done(&mut self);

    /// Release a program
    fn free_program(&mut self, program: Self::Program);
}

struct ActiveShader<P> {
    kind: ShaderKind,
    pair: ProgramPair,
    program: P,
}

/// Owns the currently bound shader program
pub struct ShaderSelector<P> {
    active: Option<ActiveShader<P>>,
}

impl<P> ShaderSelector<P> {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Kind most recently selected, if a program is bound
    pub fn active_kind(&self) -> Option<ShaderKind> {
        self.active.as_ref().map(|a| a.kind)
    }

    /// Program pair actually bound (may be the passthrough fallback)
    pub fn active_pair(&self) -> Option<ProgramPair> {
        self.active.as_ref().map(|a| a.pair)
    }

    /// Replace the active program with the one for `kind`
    ///
    /// The previous program is cleared first. If the requested pair cannot be
    /// created the passthrough pair is used instead; only a failure of the
    /// passthrough pair itself is returned as an error.
    pub fn select<D>(&mut self, device: &mut D, kind: ShaderKind) -> Result<ProgramPair, ShaderError>
    where
        D: ShaderDevice<Program = P>,
    {
        self.clear(device);

        let requested = program_pair(kind);
        let (pair, program) = match device.create_program(&requested) {
            Ok(program) => (requested, program),
            Err(e) if !requested.is_passthrough() => {
                log::warn!("Shader {:?} unavailable ({}), using passthrough", kind, e);
                (PASSTHROUGH, device.create_program(&PASSTHROUGH)?)
            }
            Err(e) => return Err(e),
        };

        device.bind_program(&program);

        for _ in 0..FLUSH_CYCLES {
            device.clear_and_swap();
            device.wait_rendering_done();
        }

        log::info!("Shader {:?} active ({})", kind, pair);
        self.active = Some(ActiveShader {
            kind,
            pair,
            program,
        });

        Ok(pair)
    }

    /// Release the active program, if any
    ///
    /// Returns whether a program was released.
    pub fn clear<D>(&mut self, device: &mut D) -> bool
    where
        D: ShaderDevice<Program = P>,
    {
        match self.active.take() {
            Some(active) => {
                device.wait_rendering_done();
                device.free_program(active.program);
                log::debug!("Released shader {}", active.pair);
                true
            }
            None => false,
        }
    }
}

impl<P> Default for ShaderSelector<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingDevice {
        available: Vec<&'static str>,
        created: Vec<ProgramPair>,
        bound: Vec<ProgramPair>,
        freed: Vec<ProgramPair>,
        swaps: usize,
        waits: usize,
    }

    impl ShaderDevice for RecordingDevice {
        type Program = ProgramPair;

        fn create_program(&mut self, pair: &ProgramPair) -> Result<ProgramPair, ShaderError> {
            if pair.is_passthrough() || self.available.contains(&pair.vertex) {
                self.created.push(*pair);
                Ok(*pair)
            } else {
                Err(ShaderError::MissingSource(pair.vertex.to_string()))
            }
        }

        fn bind_program(&mut self, program: &ProgramPair) {
            self.bound.push(*program);
        }

        fn clear_and_swap(&mut self) {
            self.swaps += 1;
        }

        fn wait_rendering_done(&mut self) {
            self.waits += 1;
        }

        fn free_program(&mut self, program: ProgramPair) {
            self.freed.push(program);
        }
    }

    #[test]
    fn test_from_raw_round_trip() {
        for kind in ShaderKind::ALL {
            assert_eq!(ShaderKind::from_raw(kind.to_raw()), kind);
        }
    }

    #[test]
    fn test_from_raw_unknown_is_none() {
        assert_eq!(ShaderKind::from_raw(-1), ShaderKind::None);
        assert_eq!(ShaderKind::from_raw(42), ShaderKind::None);
    }

    #[test]
    fn test_select_binds_and_flushes() {
        let mut device = RecordingDevice {
            available: vec!["lcd3x_v"],
            ..Default::default()
        };
        let mut selector = ShaderSelector::new();

        let pair = selector.select(&mut device, ShaderKind::Lcd3x).unwrap();

        assert_eq!(pair, program_pair(ShaderKind::Lcd3x));
        assert_eq!(device.bound, vec![pair]);
        assert_eq!(device.swaps, FLUSH_CYCLES);
        assert_eq!(selector.active_kind(), Some(ShaderKind::Lcd3x));
    }

    #[test]
    fn test_select_falls_back_to_passthrough() {
        let mut device = RecordingDevice::default();
        let mut selector = ShaderSelector::new();

        let pair = selector.select(&mut device, ShaderKind::Fxaa).unwrap();

        assert_eq!(pair, PASSTHROUGH);
        assert_eq!(selector.active_kind(), Some(ShaderKind::Fxaa));
        assert_eq!(selector.active_pair(), Some(PASSTHROUGH));
    }

    #[test]
    fn test_select_replaces_previous() {
        let mut device = RecordingDevice {
            available: vec!["lcd3x_v", "fxaa_v"],
            ..Default::default()
        };
        let mut selector = ShaderSelector::new();

        selector.select(&mut device, ShaderKind::Lcd3x).unwrap();
        selector.select(&mut device, ShaderKind::Fxaa).unwrap();

        assert_eq!(device.freed, vec![program_pair(ShaderKind::Lcd3x)]);
        assert_eq!(selector.active_kind(), Some(ShaderKind::Fxaa));
    }

    #[test]
    fn test_clear_twice_is_noop() {
        let mut device = RecordingDevice::default();
        let mut selector = ShaderSelector::new();
        selector.select(&mut device, ShaderKind::None).unwrap();

        let waits_before = device.waits;
        assert!(selector.clear(&mut device));
        assert!(!selector.clear(&mut device));

        assert_eq!(device.freed.len(), 1);
        assert_eq!(device.waits, waits_before + 1);
        assert!(!selector.is_active());
    }
}
