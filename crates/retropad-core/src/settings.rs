//! Persisted preferences.
//!
//! Settings live in a small INI file next to the executable (`retropad` -> `retropad.ini`).
//! Only the `[Font]` section is owned by the editor; every other section and key already in
//! the file is preserved when it is rewritten.

use ini::Ini;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const FONT_SECTION: &str = "Font";

/// `FW_NORMAL`.
pub const WEIGHT_NORMAL: i32 = 400;
/// `FW_BOLD`.
pub const WEIGHT_BOLD: i32 = 700;

/// Settings store errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        /// Settings file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The settings file exists but is not valid INI.
    #[error("{}: {source}", path.display())]
    Parse {
        /// Settings file path.
        path: PathBuf,
        /// Parser diagnostic with line and column.
        #[source]
        source: ini::ParseError,
    },
    /// The running executable's path could not be determined.
    #[error("cannot locate the executable: {0}")]
    NoExecutable(#[source] io::Error),
}

/// A logical font, field for field what the `[Font]` section stores.
///
/// The terminal shell renders weight, italic, underline and strike-out; the remaining fields
/// are kept so a settings file shared with other front ends round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    /// Typeface name. Never empty in a persisted font.
    pub face_name: String,
    /// Cell height; negative values are character heights.
    pub height: i32,
    pub width: i32,
    pub escapement: i32,
    pub orientation: i32,
    pub weight: i32,
    pub italic: u8,
    pub underline: u8,
    pub strike_out: u8,
    pub char_set: u8,
    pub out_precision: u8,
    pub clip_precision: u8,
    pub quality: u8,
    pub pitch_and_family: u8,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            face_name: "Consolas".to_string(),
            height: 0,
            width: 0,
            escapement: 0,
            orientation: 0,
            weight: WEIGHT_NORMAL,
            italic: 0,
            underline: 0,
            strike_out: 0,
            char_set: 1,
            out_precision: 0,
            clip_precision: 0,
            quality: 0,
            pitch_and_family: 0,
        }
    }
}

impl FontDescriptor {
    /// Weight at or above `FW_BOLD`.
    pub fn is_bold(&self) -> bool {
        self.weight >= WEIGHT_BOLD
    }

    /// Switch between `FW_BOLD` and `FW_NORMAL`.
    pub fn set_bold(&mut self, bold: bool) {
        self.weight = if bold { WEIGHT_BOLD } else { WEIGHT_NORMAL };
    }

    /// Nonzero `Italic` flag.
    pub fn is_italic(&self) -> bool {
        self.italic != 0
    }

    /// Nonzero `Underline` flag.
    pub fn is_underline(&self) -> bool {
        self.underline != 0
    }

    /// Nonzero `StrikeOut` flag.
    pub fn is_strike_out(&self) -> bool {
        self.strike_out != 0
    }

    /// Human readable summary, e.g. `Consolas 12 Bold Italic`.
    pub fn describe(&self) -> String {
        let mut out = self.face_name.clone();
        if self.height != 0 {
            out.push_str(&format!(" {}", self.height.abs()));
        }
        for (on, label) in [
            (self.is_bold(), "Bold"),
            (self.is_italic(), "Italic"),
            (self.is_underline(), "Underline"),
            (self.is_strike_out(), "Strikeout"),
        ] {
            if on {
                out.push(' ');
                out.push_str(label);
            }
        }
        out
    }
}

// Lenient integer parse: leading sign and digits, anything after is ignored, garbage is 0.
fn parse_long(value: &str) -> i64 {
    let value = value.trim_start();
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        });

    if negative { -magnitude } else { magnitude }
}

/// INI-backed settings store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Store backed by the INI file at `path`. Nothing is read until a font is loaded.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store colocated with the running executable, with its extension replaced by `.ini`.
    pub fn beside_executable() -> Result<Self, SettingsError> {
        let exe = std::env::current_exe().map_err(SettingsError::NoExecutable)?;
        Ok(Self::new(exe.with_extension("ini")))
    }

    /// Settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Ini, SettingsError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Ini::new()),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Ini::load_from_str(&content).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the persisted font. Absent when the file or its `FaceName` key is missing.
    pub fn load_font(&self) -> Option<FontDescriptor> {
        let ini = match self.read() {
            Ok(ini) => ini,
            Err(err) => {
                log::warn!("ignoring unreadable settings: {err}");
                return None;
            }
        };

        let section = ini.section(Some(FONT_SECTION))?;
        let face_name = section.get("FaceName").filter(|name| !name.is_empty())?;

        let long = |key: &str, default: i64| section.get(key).map_or(default, parse_long);
        // Narrowing matches the fixed-width LOGFONT fields.
        let int = |key: &str| long(key, 0) as i32;
        let byte = |key: &str, default: i64| long(key, default) as u8;

        Some(FontDescriptor {
            face_name: face_name.to_string(),
            height: int("Height"),
            width: int("Width"),
            escapement: int("Escapement"),
            orientation: int("Orientation"),
            weight: int("Weight"),
            italic: byte("Italic", 0),
            underline: byte("Underline", 0),
            strike_out: byte("StrikeOut", 0),
            char_set: byte("CharSet", 1),
            out_precision: byte("OutPrecision", 0),
            clip_precision: byte("ClipPrecision", 0),
            quality: byte("Quality", 0),
            pitch_and_family: byte("PitchAndFamily", 0),
        })
    }

    /// Persist `font` into the `[Font]` section, keeping everything else in the file.
    pub fn save_font(&self, font: &FontDescriptor) -> Result<(), SettingsError> {
        let mut ini = self.read()?;

        let fields: [(&str, String); 14] = [
            ("Height", font.height.to_string()),
            ("Width", font.width.to_string()),
            ("Escapement", font.escapement.to_string()),
            ("Orientation", font.orientation.to_string()),
            ("Weight", font.weight.to_string()),
            ("Italic", font.italic.to_string()),
            ("Underline", font.underline.to_string()),
            ("StrikeOut", font.strike_out.to_string()),
            ("CharSet", font.char_set.to_string()),
            ("OutPrecision", font.out_precision.to_string()),
            ("ClipPrecision", font.clip_precision.to_string()),
            ("Quality", font.quality.to_string()),
            ("PitchAndFamily", font.pitch_and_family.to_string()),
            ("FaceName", font.face_name.clone()),
        ];
        for (key, value) in fields {
            ini.with_section(Some(FONT_SECTION)).set(key, value);
        }

        ini.write_to_file(&self.path).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("saved font {} to {}", font.describe(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_long_is_lenient() {
        assert_eq!(parse_long("  -12px"), -12);
        assert_eq!(parse_long("+7"), 7);
        assert_eq!(parse_long("abc"), 0);
        assert_eq!(parse_long(""), 0);
    }

    #[test]
    fn describe_lists_styles() {
        let mut font = FontDescriptor {
            height: -12,
            italic: 1,
            ..FontDescriptor::default()
        };
        font.set_bold(true);
        assert_eq!(font.describe(), "Consolas 12 Bold Italic");
    }
}
