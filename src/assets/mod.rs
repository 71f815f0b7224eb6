//! Input assets: colors, decoded screenshots and fonts.

pub mod color;
pub mod decode;
pub mod fonts;
