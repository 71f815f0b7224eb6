//! Localized screenshot titles.

pub mod titles;

pub use titles::{DEFAULT_LOCALE, SCREENSHOT_KEYS, TitleCatalog, screenshot_key};
