//! Color conversion, contrast and lightness adjustment
//!
//! This module holds the pure color math of the pipeline: HSLuv conversion,
//! WCAG contrast, the lightness tweak and the contrast-fixing search.

pub mod contrast;
pub mod conversion;
pub mod fixer;
pub mod tweak;

pub use contrast::{contrast_ratio, relative_luminance};
pub use conversion::{ColorConverter, PerceptualColor, Rgb};
pub use fixer::{ContrastFixer, SearchReport};
pub use tweak::LightnessTweaker;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pure black or pure white, used both as a contrast target and a text color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Monochrome {
    Black,
    White,
}

impl Monochrome {
    /// RGB value of this shade
    pub fn rgb(self) -> Rgb {
        match self {
            Monochrome::Black => Rgb::new(0, 0, 0),
            Monochrome::White => Rgb::new(255, 255, 255),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Monochrome::Black => "black",
            Monochrome::White => "white",
        }
    }
}

impl fmt::Display for Monochrome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
