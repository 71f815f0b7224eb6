//! Frame configuration: built-in defaults, optionally overridden by a JSON file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::color::ThemeColors;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{FrameError, FrameResult};
use crate::locale::titles::{DEFAULT_LOCALE, TitleCatalog};

/// Margin left, right and below the screenshot, in pixels.
pub const PADDING: u32 = 100;
/// Space above and below the title line, in pixels.
pub const TITLE_PADDING: u32 = 80;
/// Title font size, in pixels.
pub const FONT_SIZE: u32 = 72;

/// Everything that controls how a screenshot is framed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Margin left, right and below the screenshot.
    pub padding: u32,
    /// Space above and below the title line.
    pub title_padding: u32,
    /// Title font size in pixels; also the reserved title line height.
    pub font_size: u32,
    /// Background color per theme.
    pub background: ThemeColors,
    /// Title text color.
    pub title_color: Rgb8,
    /// Font discovery settings.
    pub fonts: FontConfig,
    /// Locale whose titles are used for directories without their own table.
    pub fallback_locale: String,
    /// Extra or replacement titles, merged over the built-in tables.
    pub titles: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            padding: PADDING,
            title_padding: TITLE_PADDING,
            font_size: FONT_SIZE,
            background: ThemeColors::default(),
            title_color: Rgb8::WHITE,
            fonts: FontConfig::default(),
            fallback_locale: DEFAULT_LOCALE.to_owned(),
            titles: BTreeMap::new(),
        }
    }
}

impl FrameConfig {
    /// Load and validate a JSON config. Missing fields keep their defaults.
    pub fn from_path(path: &Path) -> FrameResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| FrameError::io(path, e))?;
        let cfg: Self = serde_json::from_str(&text)
            .map_err(|e| FrameError::serde(format!("config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse and validate a JSON config string.
    pub fn from_json(text: &str) -> FrameResult<Self> {
        let cfg: Self = serde_json::from_str(text).map_err(|e| FrameError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check value ranges.
    pub fn validate(&self) -> FrameResult<()> {
        if self.font_size == 0 {
            return Err(FrameError::validation("font_size must be > 0"));
        }
        if self.fallback_locale.trim().is_empty() {
            return Err(FrameError::validation("fallback_locale must be non-empty"));
        }
        for (locale, titles) in &self.titles {
            if locale.trim().is_empty() {
                return Err(FrameError::validation("title locale must be non-empty"));
            }
            if titles.keys().any(|k| k.trim().is_empty()) {
                return Err(FrameError::validation(format!(
                    "titles for '{locale}' contain an empty screenshot key"
                )));
            }
        }
        Ok(())
    }

    /// Title catalog: built-in tables merged with `titles`, using `fallback_locale`.
    pub fn title_catalog(&self) -> TitleCatalog {
        let mut catalog = TitleCatalog::builtin().with_fallback(self.fallback_locale.clone());
        catalog.merge(&self.titles);
        catalog
    }
}

/// Where to look for the title font.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Font files tried in order for every locale.
    pub paths: Vec<PathBuf>,
    /// Font files tried before `paths` for a specific locale.
    pub locale_paths: BTreeMap<String, Vec<PathBuf>>,
    /// Family names queried in the system font database when no locale file matches.
    pub fallback_families: BTreeMap<String, Vec<String>>,
    /// Allow querying installed system fonts. The bundled face is used either way.
    pub system_fallback: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        let paths = [
            "/System/Library/Fonts/SFNS.ttf",
            "/System/Library/Fonts/SFNSDisplay.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
            "/Library/Fonts/Arial.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "C:\\Windows\\Fonts\\segoeui.ttf",
        ];

        let cjk = |extra: &[&str]| -> Vec<PathBuf> {
            extra
                .iter()
                .chain([
                    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
                    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
                ]
                .iter())
                .map(PathBuf::from)
                .collect()
        };

        let locale_paths = BTreeMap::from([
            (
                "zh-Hant".to_owned(),
                cjk(&["/System/Library/Fonts/PingFang.ttc"]),
            ),
            (
                "zh-Hans".to_owned(),
                cjk(&["/System/Library/Fonts/PingFang.ttc"]),
            ),
            (
                "ja".to_owned(),
                cjk(&["/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc"]),
            ),
            (
                "ko".to_owned(),
                cjk(&["/System/Library/Fonts/AppleSDGothicNeo.ttc"]),
            ),
        ]);

        let families = |names: &[&str]| -> Vec<String> {
            names.iter().map(|s| (*s).to_owned()).collect()
        };
        let fallback_families = BTreeMap::from([
            (
                "zh-Hant".to_owned(),
                families(&["PingFang TC", "Noto Sans CJK TC", "Microsoft JhengHei"]),
            ),
            (
                "zh-Hans".to_owned(),
                families(&["PingFang SC", "Noto Sans CJK SC", "Microsoft YaHei"]),
            ),
            (
                "ja".to_owned(),
                families(&["Hiragino Sans", "Noto Sans CJK JP", "Yu Gothic"]),
            ),
            (
                "ko".to_owned(),
                families(&["Apple SD Gothic Neo", "Noto Sans CJK KR", "Malgun Gothic"]),
            ),
        ]);

        Self {
            paths: paths.iter().map(PathBuf::from).collect(),
            locale_paths,
            fallback_families,
            system_fallback: true,
        }
    }
}

impl FontConfig {
    /// Font files configured specifically for `locale`.
    pub fn locale_candidates(&self, locale: &str) -> impl Iterator<Item = &Path> {
        self.locale_paths
            .get(locale)
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
    }

    /// Candidate font files for `locale`, most specific first.
    pub fn candidates(&self, locale: &str) -> impl Iterator<Item = &Path> {
        self.locale_paths
            .get(locale)
            .into_iter()
            .flatten()
            .chain(self.paths.iter())
            .map(PathBuf::as_path)
    }

    /// System family names tried for `locale` after its own files, before `paths`.
    pub fn families(&self, locale: &str) -> &[String] {
        self.fallback_families
            .get(locale)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
