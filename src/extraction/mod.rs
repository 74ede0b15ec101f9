//! Raw color extraction from decoded pixels
//!
//! An extractor reduces an RGBA image to the single RGB value judged most
//! representative of it. Three strategies are provided and looked up by
//! [`ExtractorKind`] through an [`ExtractorRegistry`]:
//!
//! | Kind | Tag | Strategy |
//! |------|-----|----------|
//! | `QuantizedDominant` | `color-thief` | median-cut quantization, largest box |
//! | `AveragedSimple` | `fast-average` | alpha-weighted mean |
//! | `AveragedDominant` | `fast-dominant` | mean of the most populated color bucket |

pub mod average;
pub mod quantize;

pub use average::{DominantAverage, SimpleAverage};
pub use quantize::MedianCutQuantizer;

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::color::Rgb;
use crate::config::ExtractionConfig;
use crate::{Result, TintError};

/// Reduces an image to one representative color
///
/// Implementations must be pure: the same pixels always give the same color.
/// The resolver caches results on that assumption.
pub trait ColorExtractor: Send + Sync {
    fn extract(&self, image: &RgbaImage) -> Result<Rgb>;
}

/// Named extraction strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExtractorKind {
    /// Median-cut palette quantization, dominant box
    #[serde(rename = "color-thief")]
    QuantizedDominant,
    /// Plain pixel average
    #[serde(rename = "fast-average")]
    AveragedSimple,
    /// Average of the most frequent color bucket
    #[serde(rename = "fast-dominant")]
    AveragedDominant,
}

impl ExtractorKind {
    pub const ALL: [ExtractorKind; 3] = [
        ExtractorKind::QuantizedDominant,
        ExtractorKind::AveragedSimple,
        ExtractorKind::AveragedDominant,
    ];

    /// Short tag used in configuration and cache keys
    pub fn tag(self) -> &'static str {
        match self {
            ExtractorKind::QuantizedDominant => "color-thief",
            ExtractorKind::AveragedSimple => "fast-average",
            ExtractorKind::AveragedDominant => "fast-dominant",
        }
    }

    /// Human-readable label for pickers
    pub fn label(self) -> &'static str {
        match self {
            ExtractorKind::QuantizedDominant => "Median cut (dominant)",
            ExtractorKind::AveragedSimple => "Pixel average",
            ExtractorKind::AveragedDominant => "Pixel average (dominant)",
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ExtractorKind {
    type Err = TintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color-thief" | "quantized-dominant" => Ok(ExtractorKind::QuantizedDominant),
            "fast-average" | "averaged-simple" => Ok(ExtractorKind::AveragedSimple),
            "fast-dominant" | "averaged-dominant" => Ok(ExtractorKind::AveragedDominant),
            _ => Err(TintError::UnknownExtractor(s.to_string())),
        }
    }
}

/// Lookup table from kind to extractor
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: HashMap<ExtractorKind, Arc<dyn ColorExtractor>>,
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<_> = self.extractors.keys().collect();
        kinds.sort();
        f.debug_struct("ExtractorRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults(&ExtractionConfig::default())
    }
}

impl ExtractorRegistry {
    /// Registry with no extractors
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with the three built-in extractors
    pub fn with_defaults(config: &ExtractionConfig) -> Self {
        let mut registry = Self::empty();
        registry
            .register(
                ExtractorKind::QuantizedDominant,
                MedianCutQuantizer::from_config(config),
            )
            .register(
                ExtractorKind::AveragedSimple,
                SimpleAverage::new(config.average_step),
            )
            .register(
                ExtractorKind::AveragedDominant,
                DominantAverage::new(config.average_step, config.dominant_divider),
            );
        registry
    }

    /// Register or replace the extractor for `kind`
    pub fn register<E>(&mut self, kind: ExtractorKind, extractor: E) -> &mut Self
    where
        E: ColorExtractor + 'static,
    {
        self.extractors.insert(kind, Arc::new(extractor));
        self
    }

    /// Extractor registered for `kind`
    pub fn get(&self, kind: ExtractorKind) -> Result<&dyn ColorExtractor> {
        self.extractors
            .get(&kind)
            .map(|extractor| extractor.as_ref())
            .ok_or(TintError::ExtractorUnavailable { kind })
    }

    pub fn contains(&self, kind: ExtractorKind) -> bool {
        self.extractors.contains_key(&kind)
    }

    /// Run the extractor registered for `kind`
    pub fn extract(&self, kind: ExtractorKind, image: &RgbaImage) -> Result<Rgb> {
        self.get(kind)?.extract(image)
    }
}

/// Every `step`-th pixel in row-major order
pub(crate) fn sampled_pixels(image: &RgbaImage, step: usize) -> impl Iterator<Item = &Rgba<u8>> {
    image.pixels().step_by(step.max(1))
}

pub(crate) fn ensure_not_empty(image: &RgbaImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(TintError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}

/// `sum / weight` rounded to the nearest channel value
pub(crate) fn weighted_channel(sum: u64, weight: u64) -> u8 {
    (sum as f64 / weight as f64).round().clamp(0.0, 255.0) as u8
}
