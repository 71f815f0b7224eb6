//! Frame layout and rasterization.

pub mod cpu;
pub mod layout;

pub use cpu::{FrameRGB, FrameRenderer, write_png};
pub use layout::FrameLayout;
