use crate::foundation::error::{FrameError, FrameResult};

pub use kurbo::{Affine, Point, Rect};

/// Opaque 8-bit sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Construct a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an `[r, g, b]` array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Pixel dimensions of an image or canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Construct a size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Narrow to the `u16` dimensions accepted by the rasterizer.
    pub fn to_u16(self) -> FrameResult<(u16, u16)> {
        let w: u16 = self.width.try_into().map_err(|_| {
            FrameError::render(format!("canvas width {} exceeds u16", self.width))
        })?;
        let h: u16 = self.height.try_into().map_err(|_| {
            FrameError::render(format!("canvas height {} exceeds u16", self.height))
        })?;
        Ok((w, h))
    }

    /// Number of pixels, saturating on overflow.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
