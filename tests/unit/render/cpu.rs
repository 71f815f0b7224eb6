use std::path::PathBuf;

use super::*;

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PreparedImage {
    let mut bytes: Vec<u8> = rgba
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    crate::assets::decode::premultiply_rgba8_in_place(&mut bytes);
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(bytes),
    }
}

fn small_config() -> FrameConfig {
    FrameConfig {
        padding: 2,
        title_padding: 3,
        font_size: 10,
        ..FrameConfig::default()
    }
}

fn close(a: [u8; 3], b: [u8; 3], tol: u8) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| x.abs_diff(*y) <= tol)
}

#[test]
fn untitled_frame_places_screenshot_on_background() {
    let mut r = FrameRenderer::new(small_config());
    let shot = solid(4, 3, [255, 0, 0, 255]);

    let frame = r.render(&shot, "", Theme::Light, "en-US").unwrap();
    assert_eq!((frame.width, frame.height), (8, 5));
    assert_eq!(frame.data.len(), 8 * 5 * 3);

    let blue = [0x00, 0x7A, 0xFF];
    assert_eq!(frame.pixel(0, 0), Some(blue));
    assert_eq!(frame.pixel(7, 4), Some(blue));
    assert_eq!(frame.pixel(3, 4), Some(blue));
    assert!(close(frame.pixel(3, 1).unwrap(), [255, 0, 0], 2));
    assert!(close(frame.pixel(2, 0).unwrap(), [255, 0, 0], 2));
    assert_eq!(frame.pixel(8, 0), None);
}

#[test]
fn dark_theme_uses_dark_background() {
    let mut r = FrameRenderer::new(small_config());
    let shot = solid(2, 2, [0, 255, 0, 255]);
    let frame = r.render(&shot, "", Theme::Dark, "en-US").unwrap();
    assert_eq!(frame.pixel(0, 0), Some([0x1C, 0x1C, 0x1E]));
}

#[test]
fn translucent_screenshot_is_composited_over_background() {
    let mut r = FrameRenderer::new(small_config());
    let shot = solid(2, 2, [255, 255, 255, 128]);
    let frame = r.render(&shot, "", Theme::Dark, "en-US").unwrap();

    // 50% white over #1C1C1E
    let px = frame.pixel(2, 0).unwrap();
    assert!(close(px, [141, 141, 142], 3), "{px:?}");
}

#[test]
fn renderer_context_is_reused_across_sizes() {
    let mut r = FrameRenderer::new(small_config());
    let a = r.render(&solid(4, 3, [1, 2, 3, 255]), "", Theme::Light, "en-US").unwrap();
    let b = r.render(&solid(6, 6, [1, 2, 3, 255]), "", Theme::Light, "en-US").unwrap();
    let c = r.render(&solid(4, 3, [1, 2, 3, 255]), "", Theme::Light, "en-US").unwrap();
    assert_eq!((b.width, b.height), (10, 8));
    assert_eq!(a, c);
}

#[test]
fn oversized_canvas_is_render_error() {
    let mut r = FrameRenderer::new(small_config());
    let shot = PreparedImage {
        width: 70_000,
        height: 1,
        rgba8_premul: Arc::new(Vec::new()),
    };
    assert!(matches!(
        r.render(&shot, "", Theme::Light, "en-US"),
        Err(FrameError::Render(_))
    ));
}

#[test]
fn titled_frame_draws_text_in_title_band() {
    let mut r = FrameRenderer::new(FrameConfig::default());

    let shot = solid(600, 100, [0, 0, 0, 255]);
    let frame = r.render(&shot, "Secure Chat", Theme::Light, "en-US").unwrap();
    assert_eq!((frame.width, frame.height), (800, 100 + 232 + 100));

    let blue = [0x00, 0x7A, 0xFF];
    let mut lit = 0usize;
    for y in 80..232 {
        for x in 0..frame.width {
            if frame.pixel(x, y) != Some(blue) {
                lit += 1;
            }
        }
    }
    assert!(lit > 0, "title band has no text pixels");
    // Top padding stays clean.
    for x in 0..frame.width {
        assert_eq!(frame.pixel(x, 0), Some(blue));
    }
}

#[test]
fn write_png_produces_rgb_png() {
    let dir = PathBuf::from("target").join("render_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("frame.png");

    let frame = FrameRGB {
        width: 2,
        height: 1,
        data: vec![1, 2, 3, 4, 5, 6],
    };
    write_png(&frame, &path).unwrap();

    let decoded = image::open(&path).unwrap();
    assert_eq!(decoded.color(), image::ColorType::Rgb8);
    let rgb = decoded.to_rgb8();
    assert_eq!(rgb.dimensions(), (2, 1));
    assert_eq!(rgb.into_raw(), frame.data);
}

#[test]
fn frame_screenshot_reports_missing_input() {
    let mut r = FrameRenderer::new(small_config());
    let err = r
        .frame_screenshot(
            Path::new("target/render_unit/missing.png"),
            Path::new("target/render_unit/missing_framed.png"),
            "en-US",
        )
        .unwrap_err();
    assert!(matches!(err, FrameError::Io { .. }));
}

#[test]
fn unpremultiply_to_rgb() {
    assert_eq!(premul_rgba_to_rgb(&[10, 20, 30, 255]), vec![10, 20, 30]);
    assert_eq!(premul_rgba_to_rgb(&[0, 0, 0, 0]), vec![0, 0, 0]);
    assert_eq!(premul_rgba_to_rgb(&[64, 0, 128, 128]), vec![128, 0, 255]);
}

#[test]
fn empty_screenshot_is_decode_error() {
    let mut r = FrameRenderer::new(small_config());
    let shot = PreparedImage {
        width: 0,
        height: 5,
        rgba8_premul: Arc::new(Vec::new()),
    };
    assert!(matches!(
        r.render(&shot, "", Theme::Light, "en-US"),
        Err(FrameError::Decode(_))
    ));
}
