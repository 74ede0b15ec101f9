//! Color space conversion utilities
//!
//! Provides conversions between 8-bit sRGB and HSLuv, the perceptually
//! uniform counterpart of HSL:
//! - sRGB (0-255) to HSLuv through XYZ, Luv and LCHuv
//! - HSLuv back to sRGB with per-channel rounding and clamping
//! - Hex color representation
//!
//! Lightness in HSLuv is CIE L*, so equal lightness steps look like equal
//! brightness steps regardless of hue. Plain HSL lacks that property.

use palette::convert::FromColorUnclamped;
use palette::white_point::D65;
use palette::{Hsluv, Srgb};
use serde::{Deserialize, Serialize};

use crate::{Result, TintError};

/// 8-bit sRGB color without alpha
pub type Rgb = Srgb<u8>;

type Hsluv64 = Hsluv<D65, f64>;

/// Above this lightness the reference model snaps to pure white
const MAX_LIGHTNESS: f64 = 99.999_999_9;

/// Below this lightness the reference model snaps to pure black
const MIN_LIGHTNESS: f64 = 1e-8;

/// HSLuv coordinates
///
/// `lightness` is in [0, 100], `hue` in [0, 360). `saturation` is nominally
/// in [0, 100] but is allowed to exceed it while a color is being adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerceptualColor {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl PerceptualColor {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// Same hue and saturation at a different lightness
    pub fn with_lightness(self, lightness: f64) -> Self {
        Self { lightness, ..self }
    }
}

/// Converter between sRGB and HSLuv
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorConverter;

impl ColorConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert RGB (0-255) to HSLuv
    ///
    /// Saturation is not clamped. Pure black and white report zero
    /// saturation, matching the reference HSLuv model.
    pub fn to_perceptual(&self, color: Rgb) -> PerceptualColor {
        let srgb: Srgb<f64> = color.into_format();
        let hsluv = Hsluv64::from_color_unclamped(srgb);

        let lightness = hsluv.l;
        let saturation = if lightness > MAX_LIGHTNESS
            || lightness < MIN_LIGHTNESS
            || !hsluv.saturation.is_finite()
        {
            0.0
        } else {
            hsluv.saturation
        };

        let hue = hsluv.hue.into_positive_degrees();
        let hue = if hue.is_finite() { hue % 360.0 } else { 0.0 };

        PerceptualColor {
            hue,
            saturation,
            lightness,
        }
    }

    /// Convert HSLuv back to RGB (0-255)
    ///
    /// Channels are rounded to the nearest integer, then clamped into
    /// [0, 255]. Out-of-gamut input saturates instead of wrapping.
    pub fn to_rgb(&self, color: PerceptualColor) -> Rgb {
        if color.lightness > MAX_LIGHTNESS {
            return Rgb::new(255, 255, 255);
        }
        if color.lightness < MIN_LIGHTNESS {
            return Rgb::new(0, 0, 0);
        }

        let hsluv = Hsluv64::new(color.hue, color.saturation, color.lightness);
        let srgb = Srgb::<f64>::from_color_unclamped(hsluv);

        Rgb::new(
            to_channel(srgb.red),
            to_channel(srgb.green),
            to_channel(srgb.blue),
        )
    }

    /// Convert RGB to a lowercase hex string (e.g., "#c81e1e")
    pub fn to_hex(&self, color: Rgb) -> String {
        format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
    }

    /// Parse a hex color string, with or without the leading `#`
    ///
    /// # Errors
    ///
    /// Returns `TintError::InvalidHex` if the string is not six hex digits
    pub fn hex_to_rgb(&self, hex: &str) -> Result<Rgb> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(TintError::InvalidHex {
                value: hex.to_string(),
                reason: format!("expected 6 hex digits, got {}", digits.len()),
            });
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|e| TintError::InvalidHex {
                value: hex.to_string(),
                reason: e.to_string(),
            })
        };

        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

fn to_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
