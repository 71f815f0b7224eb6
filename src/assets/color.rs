use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{FrameError, FrameResult};

/// Marker that flags a dark-mode capture in a screenshot path.
pub const DARK_MARKER: &str = "_Dark";

/// Parse `#RRGGBB` (or bare `RRGGBB`, case-insensitive) into an opaque color.
pub fn parse_hex(s: &str) -> FrameResult<Rgb8> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    if s.len() != 6 || !s.is_ascii() {
        return Err(FrameError::validation(format!(
            "hex color must be #RRGGBB, got \"{s}\""
        )));
    }

    fn hex_byte(pair: &str) -> FrameResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| FrameError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    Ok(Rgb8::new(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

/// Format a color as `#RRGGBB`.
pub fn to_hex(c: Rgb8) -> String {
    format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
}

impl Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&to_hex(*self))
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Appearance a screenshot was captured in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Default appearance.
    Light,
    /// Dark mode.
    Dark,
}

impl Theme {
    /// Infer the theme from a screenshot path: anything containing `_Dark` is dark.
    pub fn from_path(path: &Path) -> Self {
        if path.to_string_lossy().contains(DARK_MARKER) {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

/// Background color per theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeColors {
    /// Background behind light-mode screenshots.
    pub light: Rgb8,
    /// Background behind dark-mode screenshots.
    pub dark: Rgb8,
}

impl ThemeColors {
    /// Brand blue.
    pub const DEFAULT_LIGHT: Rgb8 = Rgb8::new(0x00, 0x7A, 0xFF);
    /// iOS dark system background.
    pub const DEFAULT_DARK: Rgb8 = Rgb8::new(0x1C, 0x1C, 0x1E);

    /// Background for `theme`.
    pub fn background(&self, theme: Theme) -> Rgb8 {
        match theme {
            Theme::Light => self.light,
            Theme::Dark => self.dark,
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            light: Self::DEFAULT_LIGHT,
            dark: Self::DEFAULT_DARK,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
