//! # Cover Tint
//!
//! A Rust crate for deriving legible theme palettes from cover artwork.
//!
//! This library turns an image into a small palette by:
//! - Extracting a raw dominant color with a pluggable strategy
//! - Fixing that color for WCAG AA contrast against white and black
//! - Nudging the display color's HSLuv lightness
//! - Picking black or white text for the display color
//!
//! Raw colors are cached per source and extraction strategy, and resolution
//! never fails: a source that cannot be read yields [`Palette::neutral`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use cover_tint::{ExtractorKind, ImageFile, PaletteResolver};
//!
//! # async fn run() {
//! let resolver = PaletteResolver::new();
//! let cover = ImageFile::new("covers/ten.jpg");
//!
//! let palette = resolver.resolve(&cover, ExtractorKind::QuantizedDominant, 5.0).await;
//! println!("background {}, text {}", palette.dominant, palette.text);
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod color;
pub mod config;
pub mod constants;
pub mod error;
pub mod extraction;
pub mod image_loader;
pub mod resolver;

pub use color::{ColorConverter, ContrastFixer, LightnessTweaker, Monochrome, PerceptualColor, Rgb};
pub use config::ResolverConfig;
pub use error::{Result, TintError};
pub use extraction::{ColorExtractor, ExtractorKind, ExtractorRegistry};
pub use resolver::{
    CacheKey, ColorCache, DecodedImage, EncodedImage, ImageFile, PaletteResolver, PixelSource,
};

/// Theme palette derived from one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    /// Display background color, `#rrggbb`
    pub dominant: String,
    /// Text color to draw on `dominant`
    pub text: Monochrome,
    /// Raw color darkened until it is legible on white
    pub on_white: String,
    /// Raw color lightened until it is legible on black
    pub on_black: String,
    /// Whether `dominant` reaches the minimum contrast against white
    pub is_dark: bool,
}

impl Palette {
    /// Palette used whenever a color cannot be extracted
    pub fn neutral() -> Self {
        Self {
            dominant: "#ffffff".to_string(),
            text: Monochrome::Black,
            on_white: "#000000".to_string(),
            on_black: "#ffffff".to_string(),
            is_dark: false,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_serialization() {
        let palette = Palette {
            dominant: "#c81e1e".to_string(),
            text: Monochrome::White,
            on_white: "#c81e1e".to_string(),
            on_black: "#f06a5c".to_string(),
            is_dark: true,
        };

        let json = serde_json::to_string(&palette).unwrap();
        assert!(json.contains("\"onWhite\":\"#c81e1e\""));
        assert!(json.contains("\"isDark\":true"));
        assert!(json.contains("\"text\":\"white\""));

        let deserialized: Palette = serde_json::from_str(&json).unwrap();
        assert_eq!(palette, deserialized);
    }

    #[test]
    fn test_neutral_palette_is_legible() {
        let converter = ColorConverter::new();
        let neutral = Palette::neutral();

        let on_white = converter.hex_to_rgb(&neutral.on_white).unwrap();
        let on_black = converter.hex_to_rgb(&neutral.on_black).unwrap();
        let dominant = converter.hex_to_rgb(&neutral.dominant).unwrap();

        assert!(color::contrast_ratio(on_white, Monochrome::White.rgb()) >= 4.5);
        assert!(color::contrast_ratio(on_black, Monochrome::Black.rgb()) >= 4.5);
        assert!(color::contrast_ratio(dominant, neutral.text.rgb()) >= 4.5);
        assert_eq!(Palette::default(), neutral);
    }
}
