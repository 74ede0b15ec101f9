//! Configuration for palette resolution
//!
//! Groups the tunable parameters of the pipeline: contrast targets, the
//! lightness tweak thresholds and extraction sampling.
//!
//! # Configuration Loading
//!
//! ```no_run
//! use cover_tint::ResolverConfig;
//! use std::path::Path;
//!
//! // Load from file
//! let config = ResolverConfig::from_json_file(Path::new("tint.json"))?;
//!
//! // Or use defaults
//! let config = ResolverConfig::default();
//! # Ok::<(), cover_tint::TintError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{contrast, extraction, tweak};
use crate::{Result, TintError};

/// Complete resolver configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Contrast search settings
    #[serde(default)]
    pub contrast: ContrastConfig,

    /// Lightness tweak thresholds
    #[serde(default)]
    pub tweak: TweakConfig,

    /// Extraction sampling settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Give up waiting for a pixel source after this many milliseconds.
    /// `None` waits for as long as the source takes.
    #[serde(default)]
    pub load_timeout_ms: Option<u64>,
}

/// Contrast search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastConfig {
    /// Minimum contrast ratio for text colors
    pub min_contrast: f64,

    /// Accepted overshoot above `min_contrast`
    pub epsilon: f64,

    /// Bisection step cap
    pub max_iterations: usize,
}

/// Lightness tweak thresholds, in HSLuv units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweakConfig {
    pub light_threshold: f64,
    pub super_light: f64,
    pub super_saturation: f64,
    pub saturation_factor: f64,
}

/// Extraction sampling parameters.
///
/// `quantize_*` apply to the median-cut extractor, `average_step` and
/// `dominant_divider` to the averaging ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sample every n-th pixel when quantizing (1 = every pixel)
    pub quantize_quality: usize,

    /// Number of color boxes to quantize into
    pub quantize_color_count: usize,

    /// Sample every n-th pixel when averaging
    pub average_step: usize,

    /// Channel bucket width for the dominant average
    pub dominant_divider: u8,

    /// Pixels below this alpha are skipped by the quantizer
    pub alpha_threshold: u8,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            min_contrast: contrast::AA_CONTRAST,
            epsilon: contrast::SEARCH_EPSILON,
            max_iterations: contrast::MAX_SEARCH_ITERATIONS,
        }
    }
}

impl Default for TweakConfig {
    fn default() -> Self {
        Self {
            light_threshold: tweak::LIGHT_THRESHOLD,
            super_light: tweak::SUPER_LIGHT,
            super_saturation: tweak::SUPER_SATURATION,
            saturation_factor: tweak::SATURATION_FACTOR,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            quantize_quality: extraction::QUANTIZE_QUALITY,
            quantize_color_count: extraction::QUANTIZE_COLOR_COUNT,
            average_step: extraction::AVERAGE_STEP,
            dominant_divider: extraction::DOMINANT_DIVIDER,
            alpha_threshold: extraction::ALPHA_THRESHOLD,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            contrast: ContrastConfig::default(),
            tweak: TweakConfig::default(),
            extraction: ExtractionConfig::default(),
            load_timeout_ms: None,
        }
    }
}

impl ResolverConfig {
    /// Load-readiness timeout, if any
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }

    /// Check parameter ranges
    ///
    /// # Errors
    ///
    /// Returns `TintError::InvalidParameter` naming the first bad field
    pub fn validate(&self) -> Result<()> {
        if !(self.contrast.min_contrast >= 1.0 && self.contrast.min_contrast <= 21.0) {
            return Err(TintError::invalid_parameter(
                "contrast.min_contrast",
                self.contrast.min_contrast,
            ));
        }
        if !(self.contrast.epsilon > 0.0) {
            return Err(TintError::invalid_parameter(
                "contrast.epsilon",
                self.contrast.epsilon,
            ));
        }
        if self.contrast.max_iterations == 0 {
            return Err(TintError::invalid_parameter("contrast.max_iterations", 0));
        }
        if !(self.tweak.saturation_factor >= 0.0) {
            return Err(TintError::invalid_parameter(
                "tweak.saturation_factor",
                self.tweak.saturation_factor,
            ));
        }
        if self.extraction.quantize_quality == 0 {
            return Err(TintError::invalid_parameter("extraction.quantize_quality", 0));
        }
        if !(2..=256).contains(&self.extraction.quantize_color_count) {
            return Err(TintError::invalid_parameter(
                "extraction.quantize_color_count",
                self.extraction.quantize_color_count,
            ));
        }
        if self.extraction.average_step == 0 {
            return Err(TintError::invalid_parameter("extraction.average_step", 0));
        }
        if self.extraction.dominant_divider == 0 {
            return Err(TintError::invalid_parameter("extraction.dominant_divider", 0));
        }
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TintError::config(format!("Failed to read {}", path.display()), e)
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            TintError::config(format!("Failed to parse {}", path.display()), e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| TintError::config("Failed to serialize configuration", e))?;
        std::fs::write(path, json).map_err(|e| {
            TintError::config(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(())
    }
}
