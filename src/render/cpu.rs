use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use image::ImageEncoder as _;

use crate::assets::color::Theme;
use crate::assets::decode::{PreparedImage, load_image};
use crate::assets::fonts::{
    FontKey, FontResolver, ResolvedFont, TextBrushRgba8, TextLayoutEngine,
};
use crate::config::FrameConfig;
use crate::foundation::core::{Affine, Rgb8, Size};
use crate::foundation::error::{FrameError, FrameResult};
use crate::locale::titles::TitleCatalog;
use crate::render::layout::FrameLayout;

/// Rendered frame as opaque row-major RGB8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGB {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 3` bytes.
    pub data: Vec<u8>,
}

impl FrameRGB {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }
}

/// CPU renderer for framed screenshots, powered by `vello_cpu`.
///
/// Holds the title catalog, font resolver and text shaping state for a whole batch.
pub struct FrameRenderer {
    config: FrameConfig,
    catalog: TitleCatalog,
    fonts: FontResolver,
    text_engine: TextLayoutEngine,
    font_cache: HashMap<FontKey, vello_cpu::peniko::FontData>,
    ctx: Option<vello_cpu::RenderContext>,
}

impl FrameRenderer {
    /// Create a renderer for `config`.
    pub fn new(config: FrameConfig) -> Self {
        Self {
            catalog: config.title_catalog(),
            fonts: FontResolver::new(config.fonts.clone()),
            config,
            text_engine: TextLayoutEngine::new(),
            font_cache: HashMap::new(),
            ctx: None,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Title catalog built from the configuration.
    pub fn catalog(&self) -> &TitleCatalog {
        &self.catalog
    }

    /// Resolve the title font for `locale`.
    pub fn resolve_font(&mut self, locale: &str) -> FrameResult<Arc<ResolvedFont>> {
        self.fonts.resolve(locale)
    }

    /// Frame `input` and write the result as PNG to `output`.
    ///
    /// The theme comes from a `_Dark` marker in the input path; the title from the catalog.
    #[tracing::instrument(skip_all, fields(input = %input.display(), locale = %locale))]
    pub fn frame_screenshot(
        &mut self,
        input: &Path,
        output: &Path,
        locale: &str,
    ) -> FrameResult<()> {
        let theme = Theme::from_path(input);
        let screenshot = load_image(input)?;
        let title = self.catalog.title_for_path(input, locale).to_owned();
        tracing::debug!(?theme, %title, w = screenshot.width, h = screenshot.height, "framing");

        let frame = self.render(&screenshot, &title, theme, locale)?;
        write_png(&frame, output)
    }

    /// Composite `screenshot` onto a themed background with `title` centered above it.
    pub fn render(
        &mut self,
        screenshot: &PreparedImage,
        title: &str,
        theme: Theme,
        locale: &str,
    ) -> FrameResult<FrameRGB> {
        if screenshot.size().area() == 0 {
            return Err(FrameError::decode("screenshot has no pixels"));
        }
        let layout = FrameLayout::compute(screenshot.size(), !title.is_empty(), &self.config);
        let (w, h) = layout.canvas.to_u16()?;
        let background = self.config.background.background(theme);

        let text = if title.is_empty() {
            None
        } else {
            Some(self.shape_title(title, locale)?)
        };

        let image = rgba_premul_to_image(&screenshot.rgba8_premul, screenshot.size())?;

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(background));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(w),
                f64::from(h),
            ));

            if let Some((text_layout, font)) = &text {
                let origin = layout.text_origin(text_layout.width());
                ctx.set_transform(affine_to_cpu(Affine::translate(origin.to_vec2())));
                for line in text_layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };
                        let brush = run.style().brush;
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            brush.r, brush.g, brush.b, brush.a,
                        ));
                        let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(font)
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
            }

            let rect = layout.screenshot_rect();
            ctx.set_transform(affine_to_cpu(Affine::translate((rect.x0, rect.y0))));
            ctx.set_paint(image);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                rect.width(),
                rect.height(),
            ));

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
        });

        Ok(FrameRGB {
            width: layout.canvas.width,
            height: layout.canvas.height,
            data: premul_rgba_to_rgb(pixmap.data_as_u8_slice()),
        })
    }

    fn shape_title(
        &mut self,
        title: &str,
        locale: &str,
    ) -> FrameResult<(parley::Layout<TextBrushRgba8>, vello_cpu::peniko::FontData)> {
        let font = self.fonts.resolve(locale)?;
        let color = self.config.title_color;
        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: 255,
        };
        let layout =
            self.text_engine
                .layout_line(title, &font, self.config.font_size as f32, brush)?;

        let data = self
            .font_cache
            .entry(font.key())
            .or_insert_with(|| {
                vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.bytes.to_vec()),
                    font.index,
                )
            })
            .clone();
        Ok((layout, data))
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> R,
    ) -> R {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx);
        self.ctx = Some(ctx);
        out
    }
}

/// Encode `frame` as an optimized RGB PNG at `path`.
pub fn write_png(frame: &FrameRGB, path: &Path) -> FrameResult<()> {
    let file = File::create(path).map_err(|e| FrameError::io(path, e))?;
    let encoder = image::codecs::png::PngEncoder::new_with_quality(
        BufWriter::new(file),
        image::codecs::png::CompressionType::Best,
        image::codecs::png::FilterType::Adaptive,
    );
    encoder
        .write_image(
            &frame.data,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| FrameError::render(format!("write png '{}': {e}", path.display())))
}

fn color_to_cpu(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(bytes: &[u8], size: Size) -> FrameResult<vello_cpu::Pixmap> {
    let (w, h) = size.to_u16()?;
    if bytes.len() != size.area().saturating_mul(4) {
        return Err(FrameError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn rgba_premul_to_image(bytes_premul: &[u8], size: Size) -> FrameResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, size)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn premul_rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u16;
        if a == 255 || a == 0 {
            out.extend_from_slice(&px[..3]);
            continue;
        }
        for &c in &px[..3] {
            out.push(((c as u16 * 255 + a / 2) / a).min(255) as u8);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
