//! Shotframe frames raw App Store screenshots for marketing.
//!
//! Each screenshot gets a brand-colored background (blue for light mode, near-black for
//! `_Dark` captures), a localized title centered above it and a margin around it:
//!
//! - Build a [`FrameConfig`] (defaults or [`FrameConfig::from_path`])
//! - Create a [`FrameRenderer`]
//! - Run [`process_screenshots`] over a `screenshots/<locale>/*.png` tree
#![forbid(unsafe_code)]

pub mod assets;
pub mod batch;
pub mod config;
mod foundation;
pub mod locale;
pub mod render;

pub use crate::assets::color::{Theme, ThemeColors, parse_hex};
pub use crate::assets::fonts::{FontKey, FontOrigin, FontResolver, ResolvedFont};
pub use crate::batch::{
    BatchObserver, BatchOpts, BatchReport, NoopObserver, SkippedFile, process_screenshots,
};
pub use crate::config::{FontConfig, FrameConfig};
pub use crate::foundation::core::{Rgb8, Size};
pub use crate::foundation::error::{FrameError, FrameResult};
pub use crate::locale::titles::{TitleCatalog, screenshot_key};
pub use crate::render::cpu::{FrameRGB, FrameRenderer, write_png};
pub use crate::render::layout::FrameLayout;
