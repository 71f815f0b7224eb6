use std::collections::BTreeMap;
use std::path::PathBuf;

use super::*;

fn no_fonts_config(paths: Vec<PathBuf>) -> FontConfig {
    FontConfig {
        paths,
        locale_paths: BTreeMap::new(),
        fallback_families: BTreeMap::new(),
        system_fallback: false,
    }
}

#[test]
fn missing_files_without_system_fallback_use_builtin_face() {
    let mut resolver = FontResolver::new(no_fonts_config(vec![PathBuf::from(
        "target/fonts_unit/missing.ttf",
    )]));

    let font = resolver.resolve("en-US").unwrap();
    assert_eq!(font.origin, FontOrigin::Builtin);
    assert!(!font.family.is_empty());
    assert!(!font.bytes.is_empty());

    let again = resolver.resolve("en-US").unwrap();
    assert!(Arc::ptr_eq(&font, &again));
}

#[test]
fn empty_config_still_resolves_every_locale() {
    let mut resolver = FontResolver::new(no_fonts_config(Vec::new()));
    for locale in ["en-US", "ja", "ko", "zh-Hans", "zh-Hant", "fr"] {
        let font = resolver.resolve(locale).unwrap();
        assert_eq!(font.origin, FontOrigin::Builtin, "{locale}");
    }
}

#[test]
fn non_font_candidate_is_skipped() {
    let dir = PathBuf::from("target").join("fonts_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let bogus = dir.join("bogus.ttf");
    std::fs::write(&bogus, b"definitely not a font").unwrap();

    assert!(load_font_file(&bogus).is_err());

    let mut resolver = FontResolver::new(no_fonts_config(vec![bogus]));
    assert_eq!(resolver.resolve("ja").unwrap().origin, FontOrigin::Builtin);
}

#[test]
fn configured_file_wins_over_builtin() {
    let dir = PathBuf::from("target").join("fonts_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("builtin_copy.ttf");
    std::fs::write(&path, BUILTIN_FONT).unwrap();

    let mut resolver = FontResolver::new(no_fonts_config(vec![path.clone()]));
    let font = resolver.resolve("en-US").unwrap();
    assert_eq!(font.origin, FontOrigin::File(path));
}

#[test]
fn locale_families_are_tried_before_default_files() {
    const SANS: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

    let config = FontConfig {
        paths: vec![PathBuf::from(SANS)],
        locale_paths: BTreeMap::from([(
            "ja".to_owned(),
            vec![PathBuf::from("target/fonts_unit/missing-ja.ttc")],
        )]),
        fallback_families: BTreeMap::from([("ja".to_owned(), vec!["DejaVu Serif".to_owned()])]),
        system_fallback: true,
    };

    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let has_serif = query_system_families(&db, &["DejaVu Serif".to_owned()]).is_some();

    let mut resolver = FontResolver::new(config);
    let ja = resolver.resolve("ja").unwrap();
    if has_serif {
        assert_eq!(ja.origin, FontOrigin::System);
        assert_eq!(ja.family, "DejaVu Serif");
    } else {
        assert_ne!(ja.family, "DejaVu Serif");
    }

    // Locales without their own families go straight to the default files.
    let en = resolver.resolve("en-US").unwrap();
    if std::path::Path::new(SANS).is_file() {
        assert_eq!(en.origin, FontOrigin::File(PathBuf::from(SANS)));
    }
}

#[test]
fn unknown_family_does_not_match_an_arbitrary_face() {
    let mut db = fontdb::Database::new();
    db.load_font_data(BUILTIN_FONT.to_vec());
    assert!(query_system_families(&db, &["No Such Family 1234".to_owned()]).is_none());
    assert!(query_generic_sans(&db).is_some());
}

#[test]
fn font_key_distinguishes_same_family_from_different_bytes() {
    let builtin = builtin_font().unwrap();
    let mut renamed_bytes = builtin.bytes.to_vec();
    renamed_bytes.push(0);
    let other = ResolvedFont::new(
        FontOrigin::File(PathBuf::from("/fonts/other.ttf")),
        builtin.family.clone(),
        renamed_bytes,
        builtin.index,
    );

    assert_eq!(builtin.family, other.family);
    assert_ne!(builtin.key(), other.key());

    let same = ResolvedFont::new(
        FontOrigin::System,
        builtin.family.clone(),
        builtin.bytes.to_vec(),
        builtin.index,
    );
    assert_eq!(builtin.key(), same.key());
    assert_eq!(builtin.sha256_hex().len(), 64);
}

#[test]
fn layout_engine_registers_each_distinct_face() {
    let builtin = builtin_font().unwrap();
    let dejavu = PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf");
    let Ok(mut other) = load_font_file(&dejavu) else {
        eprintln!("DejaVu Sans not installed; skipping");
        return;
    };
    // Same family label, different faces.
    other.family = builtin.family.clone();

    let mut engine = TextLayoutEngine::new();
    let brush = TextBrushRgba8::default();
    engine.layout_line("Hi", &builtin, 40.0, brush).unwrap();
    engine.layout_line("Hi", &other, 40.0, brush).unwrap();
    assert_eq!(engine.registered.len(), 2);
}

#[test]
fn origin_display() {
    assert_eq!(FontOrigin::System.to_string(), "system");
    assert_eq!(FontOrigin::Builtin.to_string(), "builtin");
    assert_eq!(
        FontOrigin::File(PathBuf::from("/a/b.ttf")).to_string(),
        "file /a/b.ttf"
    );
}

#[test]
fn layout_rejects_bad_size() {
    let font = ResolvedFont::new(FontOrigin::System, String::new(), Vec::new(), 0);
    let mut engine = TextLayoutEngine::new();
    assert!(matches!(
        engine.layout_line("x", &font, 0.0, TextBrushRgba8::default()),
        Err(FrameError::Validation(_))
    ));
    assert!(matches!(
        engine.layout_line("x", &font, f32::NAN, TextBrushRgba8::default()),
        Err(FrameError::Validation(_))
    ));
}

#[test]
fn resolved_font_shapes_text() {
    let mut resolver = FontResolver::new(FontConfig::default());
    let font = resolver.resolve("en-US").unwrap();
    assert!(!font.bytes.is_empty());

    let mut engine = TextLayoutEngine::new();
    let brush = TextBrushRgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    let short = engine.layout_line("Hi", &font, 72.0, brush).unwrap();
    let long = engine
        .layout_line("Discover Nearby Devices", &font, 72.0, brush)
        .unwrap();
    assert!(short.width() > 0.0);
    assert!(long.width() > short.width());

    // Second resolve is served from the cache.
    let again = resolver.resolve("en-US").unwrap();
    assert!(Arc::ptr_eq(&font, &again));
}
