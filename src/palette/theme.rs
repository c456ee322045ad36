// Theme mapping - palette colors onto presentation roles

use serde::Serialize;

use super::color::Rgba;
use super::quantizer::Palette;

/// Colors for the four presentation roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub background: Rgba,
    pub spectrum: Rgba,
    pub text: Rgba,
    pub border: Rgba,
}

impl Default for Theme {
    /// Dark background with white foreground, used before any cover is loaded
    fn default() -> Self {
        Self {
            background: Rgba::new(12, 4, 4, 255),
            spectrum: Rgba::WHITE,
            text: Rgba::WHITE,
            border: Rgba::WHITE,
        }
    }
}

impl Theme {
    /// Assign palette[0..4] to background, spectrum, text and border
    ///
    /// Roles without a palette color keep the default theme's color.
    pub fn from_palette(palette: &Palette) -> Self {
        let fallback = Self::default();
        Self {
            background: palette.get(0).unwrap_or(fallback.background),
            spectrum: palette.get(1).unwrap_or(fallback.spectrum),
            text: palette.get(2).unwrap_or(fallback.text),
            border: palette.get(3).unwrap_or(fallback.border),
        }
    }
}
