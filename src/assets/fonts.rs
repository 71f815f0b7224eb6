use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::Digest as _;
use usvg::fontdb;

use crate::config::FontConfig;
use crate::foundation::error::{FrameError, FrameResult};

/// Generic families tried after the locale-specific ones.
const GENERIC_SANS: [&str; 5] = [
    "Helvetica",
    "Arial",
    "DejaVu Sans",
    "Noto Sans",
    "Liberation Sans",
];

/// Last-resort title face compiled into the binary (Tuffy, public domain).
const BUILTIN_FONT: &[u8] = include_bytes!("../../assets/fonts/Tuffy.ttf");

/// Where a resolved font came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontOrigin {
    /// A configured font file.
    File(PathBuf),
    /// The installed system font database.
    System,
    /// The face bundled with the crate.
    Builtin,
}

impl fmt::Display for FontOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(p) => write!(f, "file {}", p.display()),
            Self::System => f.write_str("system"),
            Self::Builtin => f.write_str("builtin"),
        }
    }
}

/// Identity of a font face: SHA-256 of the font bytes plus the face index.
pub type FontKey = ([u8; 32], u32);

/// Font face chosen for a locale.
#[derive(Clone, Debug)]
pub struct ResolvedFont {
    /// Where the bytes were loaded from.
    pub origin: FontOrigin,
    /// Primary family name of the face.
    pub family: String,
    /// Raw font file bytes (TTF/OTF/TTC).
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection.
    pub index: u32,
    /// SHA-256 of `bytes`.
    pub sha256: [u8; 32],
}

impl ResolvedFont {
    /// Build a resolved font, fingerprinting `bytes`.
    pub fn new(origin: FontOrigin, family: String, bytes: Vec<u8>, index: u32) -> Self {
        let mut sha256 = [0u8; 32];
        sha256.copy_from_slice(&sha2::Sha256::digest(&bytes));
        Self {
            origin,
            family,
            bytes: Arc::new(bytes),
            index,
            sha256,
        }
    }

    /// Cache key for shaping and rasterization state.
    ///
    /// Family names are not unique across files, so the key is content based.
    pub fn key(&self) -> FontKey {
        (self.sha256, self.index)
    }

    /// Lowercase hex of `sha256`.
    pub fn sha256_hex(&self) -> String {
        self.sha256.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Picks a title font per locale.
///
/// Order: locale font files, the locale's system families, default font files,
/// generic system sans-serif, then the bundled face. Resolutions are cached per
/// locale, failures included, so a batch resolves each locale once.
pub struct FontResolver {
    config: FontConfig,
    cache: HashMap<String, Result<Arc<ResolvedFont>, String>>,
    system_db: Option<fontdb::Database>,
}

impl FontResolver {
    /// Create a resolver over `config`.
    pub fn new(config: FontConfig) -> Self {
        Self {
            config,
            cache: HashMap::new(),
            system_db: None,
        }
    }

    /// Resolve the font used for titles in `locale`.
    pub fn resolve(&mut self, locale: &str) -> FrameResult<Arc<ResolvedFont>> {
        if let Some(hit) = self.cache.get(locale) {
            return hit.clone().map_err(FrameError::font);
        }

        let resolved = self.resolve_uncached(locale);
        let entry = match resolved {
            Ok(font) => {
                tracing::debug!(
                    locale,
                    origin = %font.origin,
                    family = %font.family,
                    "resolved title font"
                );
                Ok(Arc::new(font))
            }
            Err(e) => {
                tracing::warn!(locale, error = %e, "no title font");
                Err(match e {
                    FrameError::Font(msg) => msg,
                    other => other.to_string(),
                })
            }
        };
        self.cache.insert(locale.to_owned(), entry.clone());
        entry.map_err(FrameError::font)
    }

    fn resolve_uncached(&mut self, locale: &str) -> FrameResult<ResolvedFont> {
        if let Some(font) = first_font_file(self.config.locale_candidates(locale)) {
            return Ok(font);
        }

        let families = self.config.families(locale).to_vec();
        if !families.is_empty()
            && let Some(font) = self
                .system_db()
                .and_then(|db| query_system_families(db, &families))
        {
            return Ok(font);
        }

        if let Some(font) = first_font_file(self.config.paths.iter().map(PathBuf::as_path)) {
            return Ok(font);
        }

        if let Some(font) = self.system_db().and_then(query_generic_sans) {
            return Ok(font);
        }

        tracing::debug!(locale, "falling back to the bundled title font");
        builtin_font()
    }

    fn system_db(&mut self) -> Option<&fontdb::Database> {
        if !self.config.system_fallback {
            return None;
        }
        Some(self.system_db.get_or_insert_with(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system font database");
            db
        }))
    }
}

fn first_font_file<'a>(paths: impl Iterator<Item = &'a Path>) -> Option<ResolvedFont> {
    for path in paths {
        if !path.is_file() {
            continue;
        }
        match load_font_file(path) {
            Ok(font) => return Some(font),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping font"),
        }
    }
    None
}

fn load_font_file(path: &Path) -> FrameResult<ResolvedFont> {
    let mut db = fontdb::Database::new();
    db.load_font_file(path).map_err(|e| FrameError::io(path, e))?;
    first_face(&db, FontOrigin::File(path.to_path_buf()))
        .ok_or_else(|| FrameError::font(format!("'{}' contains no usable font face", path.display())))
}

/// The bundled face, available regardless of configuration.
pub fn builtin_font() -> FrameResult<ResolvedFont> {
    let mut db = fontdb::Database::new();
    db.load_font_data(BUILTIN_FONT.to_vec());
    first_face(&db, FontOrigin::Builtin)
        .ok_or_else(|| FrameError::font("bundled font could not be parsed"))
}

fn first_face(db: &fontdb::Database, origin: FontOrigin) -> Option<ResolvedFont> {
    let face = db
        .faces()
        .find(|f| f.index == 0)
        .or_else(|| db.faces().next())?;
    face_to_font(db, face.id, origin)
}

/// Exact family names only; no generic or any-face fallback.
fn query_system_families(db: &fontdb::Database, families: &[String]) -> Option<ResolvedFont> {
    let wanted: Vec<fontdb::Family<'_>> = families
        .iter()
        .map(|name| fontdb::Family::Name(name.as_str()))
        .collect();
    let query = fontdb::Query {
        families: &wanted,
        ..Default::default()
    };
    let id = db.query(&query)?;
    face_to_font(db, id, FontOrigin::System)
}

fn query_generic_sans(db: &fontdb::Database) -> Option<ResolvedFont> {
    let mut wanted: Vec<fontdb::Family<'_>> = GENERIC_SANS
        .iter()
        .map(|name| fontdb::Family::Name(*name))
        .collect();
    wanted.push(fontdb::Family::SansSerif);

    let query = fontdb::Query {
        families: &wanted,
        ..Default::default()
    };

    let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    face_to_font(db, id, FontOrigin::System)
}

fn face_to_font(db: &fontdb::Database, id: fontdb::ID, origin: FontOrigin) -> Option<ResolvedFont> {
    let family = db
        .face(id)
        .and_then(|f| f.families.first())
        .map(|(name, _)| name.clone())
        .unwrap_or_default();

    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    Some(ResolvedFont::new(origin, family, bytes, index))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Stateful helper for building Parley text layouts from resolved fonts.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    // font identity -> family name as registered with Parley
    registered: HashMap<FontKey, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn family_for(&mut self, font: &ResolvedFont) -> FrameResult<String> {
        let key = font.key();
        if let Some(name) = self.registered.get(&key) {
            return Ok(name.clone());
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.to_vec()), None);
        let family_id = families
            .iter()
            .find(|(_, faces)| faces.iter().any(|f| f.index() == font.index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| FrameError::font("no font families registered from font bytes"))?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| FrameError::font("registered font family has no name"))?
            .to_string();

        self.registered.insert(key, family_name.clone());
        Ok(family_name)
    }

    /// Shape a single unwrapped line of text.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> FrameResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(FrameError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
