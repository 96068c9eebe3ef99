// Error types for the video layer

use crate::shader::ShaderError;
use std::io;

/// Errors surfaced by the video layer
#[derive(Debug)]
pub enum VideoError {
    /// The graphics library refused the requested video mode
    ModeSet(String),

    /// A shader program could not be created
    Shader(ShaderError),

    /// I/O error
    Io(io::Error),

    /// Configuration could not be parsed or written
    Config(String),
}

impl std::fmt::Display for VideoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoError::ModeSet(msg) => write!(f, "Could not set video mode: {}", msg),
            VideoError::Shader(e) => write!(f, "Shader error: {}", e),
            VideoError::Io(e) => write!(f, "I/O error: {}", e),
            VideoError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for VideoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VideoError::Shader(e) => Some(e),
            VideoError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for VideoError {
    fn from(e: io::Error) -> Self {
        VideoError::Io(e)
    }
}

impl From<ShaderError> for VideoError {
    fn from(e: ShaderError) -> Self {
        VideoError::Shader(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = VideoError::ModeSet("no display".to_string());
        assert_eq!(err.to_string(), "Could not set video mode: no display");

        let err: VideoError = ShaderError::MissingSource("fxaa_v".to_string()).into();
        assert_eq!(err.to_string(), "Shader error: No source for program 'fxaa_v'");
    }
}
