//! Minimum-contrast color fixing
//!
//! Finds the color closest to the input, in HSLuv lightness with hue and
//! saturation held fixed, that reaches a minimum contrast ratio against pure
//! black or pure white.
//!
//! The search is a bisection over lightness. Against white only darkening
//! raises contrast, so the interval is `[0, L]`; against black it is
//! `[L, 100]`. It stops as soon as the contrast lands in
//! `[target, target + epsilon]`, and never stops on convergence below the
//! target.

use tracing::{debug, trace};

use super::{contrast_ratio, ColorConverter, Monochrome, Rgb};
use crate::config::ContrastConfig;
use crate::constants::contrast::{AA_CONTRAST, MAX_SEARCH_ITERATIONS, SEARCH_EPSILON};

/// Outcome of a contrast search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchReport {
    /// Resulting color
    pub color: Rgb,
    /// Contrast of `color` against the target background
    pub contrast: f64,
    /// Bisection steps taken (0 when the input already passed)
    pub iterations: usize,
    /// False when the iteration cap was hit and a fallback was returned
    pub converged: bool,
}

/// Bisection solver for minimum contrast
#[derive(Debug, Clone)]
pub struct ContrastFixer {
    converter: ColorConverter,
    epsilon: f64,
    max_iterations: usize,
}

impl Default for ContrastFixer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContrastFixer {
    /// Create a fixer with epsilon 0.1 and a 100-step cap
    pub fn new() -> Self {
        Self::with_params(SEARCH_EPSILON, MAX_SEARCH_ITERATIONS)
    }

    /// Create a fixer with a custom overshoot tolerance and step cap
    pub fn with_params(epsilon: f64, max_iterations: usize) -> Self {
        Self {
            converter: ColorConverter::new(),
            epsilon,
            max_iterations,
        }
    }

    pub fn from_config(config: &ContrastConfig) -> Self {
        Self::with_params(config.epsilon, config.max_iterations)
    }

    /// Fix `color` for WCAG AA (4.5:1) against `against`
    pub fn fix_aa(&self, color: Rgb, against: Monochrome) -> Rgb {
        self.fix(color, against, AA_CONTRAST)
    }

    /// Return `color` adjusted to reach `min_contrast` against `against`
    ///
    /// Colors that already pass are returned as-is.
    pub fn fix(&self, color: Rgb, against: Monochrome, min_contrast: f64) -> Rgb {
        self.fix_with_report(color, against, min_contrast).color
    }

    /// Same as [`fix`](Self::fix), also reporting how the search ended
    ///
    /// When the step cap is exhausted the report carries the passing
    /// candidate with the lowest contrast seen. If no candidate passed, it
    /// carries the color at the far end of the interval (lightness 0 against
    /// white, 100 against black).
    pub fn fix_with_report(
        &self,
        color: Rgb,
        against: Monochrome,
        min_contrast: f64,
    ) -> SearchReport {
        let background = against.rgb();

        let contrast = contrast_ratio(color, background);
        if contrast >= min_contrast {
            return SearchReport {
                color,
                contrast,
                iterations: 0,
                converged: true,
            };
        }

        let perceptual = self.converter.to_perceptual(color);
        let targets_white = against == Monochrome::White;

        let (mut low, mut high) = if targets_white {
            (0.0, perceptual.lightness)
        } else {
            (perceptual.lightness, 100.0)
        };

        let mut best: Option<(Rgb, f64)> = None;

        for iteration in 1..=self.max_iterations {
            let lightness = low + (high - low) / 2.0;
            let candidate = self.converter.to_rgb(perceptual.with_lightness(lightness));
            let contrast = contrast_ratio(candidate, background);
            let diff = contrast - min_contrast;

            trace!(iteration, lightness, contrast, "contrast search step");

            if (0.0..=self.epsilon).contains(&diff) {
                return SearchReport {
                    color: candidate,
                    contrast,
                    iterations: iteration,
                    converged: true,
                };
            }

            if diff >= 0.0 && best.map_or(true, |(_, seen)| contrast < seen) {
                best = Some((candidate, contrast));
            }

            if targets_white == (diff < 0.0) {
                high = lightness;
            } else {
                low = lightness;
            }
        }

        let (color, contrast) = best.unwrap_or_else(|| {
            let extreme = if targets_white { 0.0 } else { 100.0 };
            let fallback = self.converter.to_rgb(perceptual.with_lightness(extreme));
            (fallback, contrast_ratio(fallback, background))
        });

        debug!(
            against = %against,
            min_contrast,
            contrast,
            max_iterations = self.max_iterations,
            "contrast search hit iteration cap"
        );

        SearchReport {
            color,
            contrast,
            iterations: self.max_iterations,
            converged: false,
        }
    }
}
