// Settings - Fixed-layout binary persistence of user display preferences
//
// Layout (host byte order, no header, no version, no checksum):
//
//   offset  size  field
//   0       1     autohide       (bool, non-zero = true)
//   1       1     fullscreen     (bool)
//   2       1     bilinear       (bool)
//   3       1     tint_enabled   (bool)
//   4       12    tint_color     ([f32; 3])
//   16      4     shader         (i32, see ShaderKind)
//
// Reading stops at the first field that is not fully present; that field
// and every later one keep their previous values.

use crate::shader::ShaderKind;
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Default settings file location
pub const SETTINGS_FILE: &str = "data/video.cfg";

/// Size of the encoded settings blob in bytes
pub const SETTINGS_SIZE: usize = 4 + 3 * 4 + 4;

/// User display preferences
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Hide the overlay menu bar until the screen is touched
    pub autohide: bool,

    /// Stretch the picture over the whole native display
    pub fullscreen: bool,

    /// Bilinear filtering when scaling to the native display
    pub bilinear: bool,

    /// Draw the time-of-day tint overlay
    pub tint_enabled: bool,

    /// Tint overlay color (0.0-1.0 per component)
    pub tint_color: [f32; 3],

    /// Post-processing shader
    pub shader: ShaderKind,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            autohide: false,
            fullscreen: false,
            bilinear: true,
            tint_enabled: false,
            tint_color: [0.0; 3],
            shader: ShaderKind::None,
        }
    }
}

impl Settings {
    /// Decode fields from `reader`, overwriting only the fields that are fully present
    ///
    /// Returns the number of fields read. Errors other than a short read are returned.
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> io::Result<usize> {
        let mut fields = 0;

        macro_rules! field {
            ($read:expr, $target:expr) => {
                match $read {
                    Ok(value) => {
                        $target = value;
                        fields += 1;
                    }
                    Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(fields),
                    Err(e) => return Err(e),
                }
            };
        }

        field!(reader.read_u8().map(|b| b != 0), self.autohide);
        field!(reader.read_u8().map(|b| b != 0), self.fullscreen);
        field!(reader.read_u8().map(|b| b != 0), self.bilinear);
        field!(reader.read_u8().map(|b| b != 0), self.tint_enabled);
        field!(read_color(reader), self.tint_color);
        field!(
            reader.read_i32::<NativeEndian>().map(ShaderKind::from_raw),
            self.shader
        );

        Ok(fields)
    }

    /// Encode every field to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u8(self.autohide as u8)?;
        writer.write_u8(self.fullscreen as u8)?;
        writer.write_u8(self.bilinear as u8)?;
        writer.write_u8(self.tint_enabled as u8)?;
        for component in self.tint_color {
            writer.write_f32::<NativeEndian>(component)?;
        }
        writer.write_i32::<NativeEndian>(self.shader.to_raw())?;
        Ok(())
    }

    /// Encode to a byte vector
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(SETTINGS_SIZE);
        // Writing to a Vec cannot fail
        let _ = self.write_to(&mut bytes);
        bytes
    }

    /// Load settings from `path` into `self`
    ///
    /// A missing or unreadable file leaves every field unchanged. A short file
    /// overwrites only the leading fields it fully contains.
    pub fn load_from<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!("No settings at {} ({}), keeping defaults", path.display(), e);
                return;
            }
        };

        match self.read_from(&mut BufReader::new(file)) {
            Ok(6) => log::debug!("Loaded settings from {}", path.display()),
            Ok(fields) => log::warn!(
                "Settings file {} is truncated, read {} of 6 fields",
                path.display(),
                fields
            ),
            Err(e) => log::warn!("Failed to read settings from {}: {}", path.display(), e),
        }
    }

    /// Read settings from `path`, starting from the defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let mut settings = Self::default();
        settings.load_from(path);
        settings
    }

    /// Overwrite `path` with the current values
    ///
    /// The parent directory is created if needed. The write is not atomic.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;

        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }
}

fn read_color<R: Read>(reader: &mut R) -> io::Result<[f32; 3]> {
    // Read the whole field first so a short read leaves the color untouched
    let mut raw = [0u8; 12];
    reader.read_exact(&mut raw)?;

    let mut components = &raw[..];
    Ok([
        components.read_f32::<NativeEndian>()?,
        components.read_f32::<NativeEndian>()?,
        components.read_f32::<NativeEndian>()?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> Settings {
        Settings {
            autohide: true,
            fullscreen: true,
            bilinear: false,
            tint_enabled: true,
            tint_color: [1.0, 0.5, 0.25],
            shader: ShaderKind::SharpBilinear,
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(!settings.autohide);
        assert!(!settings.fullscreen);
        assert!(settings.bilinear);
        assert!(!settings.tint_enabled);
        assert_eq!(settings.shader, ShaderKind::None);
    }

    #[test]
    fn test_encoded_size() {
        assert_eq!(sample().to_bytes().len(), SETTINGS_SIZE);
        assert_eq!(SETTINGS_SIZE, 20);
    }

    #[test]
    fn test_field_layout() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[..4], &[1, 1, 0, 1]);
        assert_eq!(&bytes[4..8], &1.0f32.to_ne_bytes());
        assert_eq!(&bytes[16..20], &4i32.to_ne_bytes());
    }

    #[test]
    fn test_read_back() {
        let bytes = sample().to_bytes();
        let mut settings = Settings::default();
        let fields = settings.read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(fields, 6);
        assert_eq!(settings, sample());
    }

    #[test]
    fn test_truncated_keeps_trailing_fields() {
        let bytes = sample().to_bytes();
        let mut settings = Settings::default();

        // Flags plus half of the color
        let fields = settings.read_from(&mut Cursor::new(&bytes[..10])).unwrap();

        assert_eq!(fields, 4);
        assert!(settings.autohide);
        assert!(!settings.bilinear);
        assert_eq!(settings.tint_color, [0.0; 3]);
        assert_eq!(settings.shader, ShaderKind::None);
    }

    #[test]
    fn test_nonzero_bool_is_true() {
        let mut bytes = Settings::default().to_bytes();
        bytes[0] = 0x7F;
        let mut settings = Settings::default();
        settings.read_from(&mut Cursor::new(bytes)).unwrap();
        assert!(settings.autohide);
    }

    #[test]
    fn test_unknown_shader_decodes_to_none() {
        let mut bytes = sample().to_bytes();
        bytes[16..20].copy_from_slice(&99i32.to_ne_bytes());
        let mut settings = Settings::default();
        settings.read_from(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(settings.shader, ShaderKind::None);
    }

    #[test]
    fn test_missing_file_keeps_values() {
        let mut settings = sample();
        settings.load_from("this/path/does/not/exist.cfg");
        assert_eq!(settings, sample());
    }
}
