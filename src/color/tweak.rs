//! Perceptual lightness tweak
//!
//! Pushes already-light colors slightly darker and dim colors slightly
//! lighter, so a tile tinted with the color still stands out against a
//! light page background.

use super::{ColorConverter, Rgb};
use crate::config::TweakConfig;
use crate::constants::tweak::{
    LIGHT_THRESHOLD, SATURATION_FACTOR, SUPER_LIGHT, SUPER_SATURATION,
};

/// Lightness tweaker with configurable thresholds
#[derive(Debug, Clone)]
pub struct LightnessTweaker {
    converter: ColorConverter,
    light_threshold: f64,
    super_light: f64,
    super_saturation: f64,
    saturation_factor: f64,
}

impl Default for LightnessTweaker {
    fn default() -> Self {
        Self::new()
    }
}

impl LightnessTweaker {
    /// Create a tweaker with the reference thresholds
    pub fn new() -> Self {
        Self {
            converter: ColorConverter::new(),
            light_threshold: LIGHT_THRESHOLD,
            super_light: SUPER_LIGHT,
            super_saturation: SUPER_SATURATION,
            saturation_factor: SATURATION_FACTOR,
        }
    }

    /// Create a tweaker from configuration
    pub fn from_config(config: &TweakConfig) -> Self {
        Self {
            converter: ColorConverter::new(),
            light_threshold: config.light_threshold,
            super_light: config.super_light,
            super_saturation: config.super_saturation,
            saturation_factor: config.saturation_factor,
        }
    }

    /// Shift the HSLuv lightness of `color` by `percent`
    ///
    /// Colors above the light threshold are darkened by `percent`, others
    /// are lightened by it. A near-white, highly saturated input is also
    /// desaturated, since darkening it alone turns it garish.
    ///
    /// Callers keep `percent` within [0, 10]; larger values are not rejected.
    /// A zero percent returns `color` untouched.
    pub fn tweak(&self, color: Rgb, percent: f64) -> Rgb {
        if percent == 0.0 {
            return color;
        }

        let original = self.converter.to_perceptual(color);
        let mut adjusted = original;

        if original.lightness > self.light_threshold {
            adjusted.lightness -= percent;

            if original.lightness > self.super_light
                && original.saturation > self.super_saturation
            {
                adjusted.saturation *= self.saturation_factor;
            }
        } else {
            adjusted.lightness += percent;
        }

        self.converter.to_rgb(adjusted)
    }
}
