//! Pixel-averaging extractors
//!
//! Both extractors weight each sampled pixel by its alpha, so transparent
//! margins around a cover do not drag the result toward black.

use image::RgbaImage;
use std::collections::BTreeMap;

use super::{ensure_not_empty, sampled_pixels, weighted_channel, ColorExtractor};
use crate::color::Rgb;
use crate::constants::extraction::{AVERAGE_STEP, DOMINANT_DIVIDER};
use crate::{Result, TintError};

/// Running alpha-weighted channel sums
#[derive(Debug, Clone, Copy, Default)]
struct WeightedSum {
    red: u64,
    green: u64,
    blue: u64,
    alpha: u64,
    count: u64,
}

impl WeightedSum {
    fn add(&mut self, [r, g, b, a]: [u8; 4]) {
        let alpha = a as u64;
        self.red += r as u64 * alpha;
        self.green += g as u64 * alpha;
        self.blue += b as u64 * alpha;
        self.alpha += alpha;
        self.count += 1;
    }

    fn mean(&self) -> Option<Rgb> {
        if self.alpha == 0 {
            return None;
        }
        Some(Rgb::new(
            weighted_channel(self.red, self.alpha),
            weighted_channel(self.green, self.alpha),
            weighted_channel(self.blue, self.alpha),
        ))
    }
}

/// Alpha-weighted mean of every `step`-th pixel
#[derive(Debug, Clone)]
pub struct SimpleAverage {
    step: usize,
}

impl Default for SimpleAverage {
    fn default() -> Self {
        Self::new(AVERAGE_STEP)
    }
}

impl SimpleAverage {
    pub fn new(step: usize) -> Self {
        Self { step: step.max(1) }
    }
}

impl ColorExtractor for SimpleAverage {
    fn extract(&self, image: &RgbaImage) -> Result<Rgb> {
        ensure_not_empty(image)?;

        let mut sum = WeightedSum::default();
        for pixel in sampled_pixels(image, self.step) {
            sum.add(pixel.0);
        }

        sum.mean().ok_or_else(|| TintError::ExtractionError {
            reason: "image is fully transparent".into(),
        })
    }
}

/// Mean of the most populated color bucket
///
/// Each channel is bucketed by `round(value / divider)`. The bucket holding
/// the most sampled pixels wins, with ties going to the lowest bucket key,
/// and its alpha-weighted mean is returned. Fully transparent pixels are
/// skipped.
#[derive(Debug, Clone)]
pub struct DominantAverage {
    step: usize,
    divider: u8,
}

impl Default for DominantAverage {
    fn default() -> Self {
        Self::new(AVERAGE_STEP, DOMINANT_DIVIDER)
    }
}

impl DominantAverage {
    pub fn new(step: usize, divider: u8) -> Self {
        Self {
            step: step.max(1),
            divider: divider.max(1),
        }
    }

    fn bucket(&self, value: u8) -> u8 {
        (value as f64 / self.divider as f64).round() as u8
    }
}

impl ColorExtractor for DominantAverage {
    fn extract(&self, image: &RgbaImage) -> Result<Rgb> {
        ensure_not_empty(image)?;

        let mut buckets: BTreeMap<[u8; 3], WeightedSum> = BTreeMap::new();
        for pixel in sampled_pixels(image, self.step) {
            let [r, g, b, a] = pixel.0;
            if a == 0 {
                continue;
            }
            let key = [self.bucket(r), self.bucket(g), self.bucket(b)];
            buckets.entry(key).or_default().add(pixel.0);
        }

        let mut winner: Option<&WeightedSum> = None;
        for sum in buckets.values() {
            if winner.map_or(true, |best| sum.count > best.count) {
                winner = Some(sum);
            }
        }

        winner
            .and_then(WeightedSum::mean)
            .ok_or_else(|| TintError::ExtractionError {
                reason: "image is fully transparent".into(),
            })
    }
}
