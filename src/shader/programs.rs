// Program table - maps each shader kind to its vertex/fragment program pair

use super::ShaderKind;

/// Names of a vertex program and the fragment program it is linked with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramPair {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

impl ProgramPair {
    pub const fn new(vertex: &'static str, fragment: &'static str) -> Self {
        Self { vertex, fragment }
    }

    /// Whether this is the plain texture passthrough pair
    pub fn is_passthrough(&self) -> bool {
        *self == PASSTHROUGH
    }
}

impl std::fmt::Display for ProgramPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.vertex, self.fragment)
    }
}

/// Plain texture sampling, used for `None` and as the fallback for everything else
pub const PASSTHROUGH: ProgramPair = ProgramPair::new("texture_v", "texture_f");

const PROGRAM_TABLE: [(ShaderKind, ProgramPair); 8] = [
    (ShaderKind::Lcd3x, ProgramPair::new("lcd3x_v", "lcd3x_f")),
    (ShaderKind::Scale2x, ProgramPair::new("scale2x_v", "scale2x_f")),
    (
        ShaderKind::AdvancedAa,
        ProgramPair::new("advanced_aa_v", "advanced_aa_f"),
    ),
    (
        ShaderKind::SharpBilinear,
        ProgramPair::new("sharp_bilinear_v", "sharp_bilinear_f"),
    ),
    (
        ShaderKind::SharpBilinearSimple,
        ProgramPair::new("sharp_bilinear_simple_v", "sharp_bilinear_simple_f"),
    ),
    (ShaderKind::Fxaa, ProgramPair::new("fxaa_v", "fxaa_f")),
    (ShaderKind::Xbr2x, ProgramPair::new("xbr_2x_v", "xbr_2x_f")),
    (
        ShaderKind::Xbr2xFast,
        ProgramPair::new("xbr_2x_fast_v", "xbr_2x_fast_f"),
    ),
];

/// Look up the program pair for `kind`
pub fn program_pair(kind: ShaderKind) -> ProgramPair {
    PROGRAM_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, pair)| *pair)
        .unwrap_or(PASSTHROUGH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_passthrough() {
        assert_eq!(program_pair(ShaderKind::None), PASSTHROUGH);
        assert!(program_pair(ShaderKind::None).is_passthrough());
    }

    #[test]
    fn test_every_other_kind_has_its_own_pair() {
        for kind in ShaderKind::ALL.iter().filter(|k| **k != ShaderKind::None) {
            let pair = program_pair(*kind);
            assert!(!pair.is_passthrough(), "{:?} mapped to passthrough", kind);
            assert!(pair.vertex.ends_with("_v"));
            assert!(pair.fragment.ends_with("_f"));
        }
    }

    #[test]
    fn test_pair_display() {
        assert_eq!(PASSTHROUGH.to_string(), "texture_v+texture_f");
    }
}
