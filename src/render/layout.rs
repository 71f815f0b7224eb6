use crate::config::FrameConfig;
use crate::foundation::core::{Point, Rect, Size};

/// Placement of every element on a framed canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameLayout {
    /// Output canvas size.
    pub canvas: Size,
    /// Height of the title band at the top; 0 when there is no title.
    pub title_height: u32,
    /// Top-left corner of the pasted screenshot.
    pub screenshot_x: u32,
    /// Top-left corner of the pasted screenshot.
    pub screenshot_y: u32,
    /// Size of the pasted screenshot.
    pub screenshot: Size,
    title_padding: u32,
}

impl FrameLayout {
    /// Lay out a screenshot of `screenshot` size, with or without a title band.
    ///
    /// The canvas grows by `padding` left, right and bottom, and by
    /// `title_padding + font_size + title_padding` on top when there is a title.
    pub fn compute(screenshot: Size, has_title: bool, cfg: &FrameConfig) -> Self {
        let title_height = if has_title {
            cfg.title_padding
                .saturating_mul(2)
                .saturating_add(cfg.font_size)
        } else {
            0
        };

        let width = screenshot
            .width
            .saturating_add(cfg.padding.saturating_mul(2));
        let height = screenshot
            .height
            .saturating_add(title_height)
            .saturating_add(cfg.padding);

        Self {
            canvas: Size::new(width, height),
            title_height,
            screenshot_x: cfg.padding,
            screenshot_y: title_height,
            screenshot,
            title_padding: cfg.title_padding,
        }
    }

    /// Rectangle covered by the screenshot.
    pub fn screenshot_rect(&self) -> Rect {
        Rect::new(
            f64::from(self.screenshot_x),
            f64::from(self.screenshot_y),
            f64::from(self.screenshot_x) + f64::from(self.screenshot.width),
            f64::from(self.screenshot_y) + f64::from(self.screenshot.height),
        )
    }

    /// Top-left origin of a title line `text_width` pixels wide, centered horizontally.
    ///
    /// Uses floor division; text wider than the canvas gets a negative x and is clipped on both
    /// sides.
    pub fn text_origin(&self, text_width: f32) -> Point {
        let text_width = if text_width.is_finite() {
            text_width.max(0.0).round() as i64
        } else {
            0
        };
        let x = (i64::from(self.canvas.width) - text_width).div_euclid(2);
        Point::new(x as f64, f64::from(self.title_padding))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
