//! Median-cut color quantization
//!
//! Modified median cut in the style of Leptonica's MMCQ:
//! 1. Sample every `quality`-th pixel, skipping translucent and near-white
//!    pixels, into a 5-bit-per-channel histogram.
//! 2. Split the most populated box at its median along its widest axis until
//!    75% of the target box count is reached.
//! 3. Keep splitting, now ranked by population x volume, up to the target.
//! 4. Rank boxes by population x volume; the first one is the dominant color.
//!
//! Box colors are the exact mean of the pixels they hold, not the center of
//! the histogram cells.

use image::RgbaImage;

use super::{ensure_not_empty, sampled_pixels, weighted_channel, ColorExtractor, SimpleAverage};
use crate::color::Rgb;
use crate::config::ExtractionConfig;
use crate::constants::extraction::{
    ALPHA_THRESHOLD, NEAR_WHITE, QUANTIZE_COLOR_COUNT, QUANTIZE_FRACT_BY_POPULATION,
    QUANTIZE_MAX_ITERATIONS, QUANTIZE_QUALITY, QUANTIZE_SIGBITS,
};
use crate::{Result, TintError};

const RSHIFT: u32 = 8 - QUANTIZE_SIGBITS;
const SIDE: usize = 1 << QUANTIZE_SIGBITS;

fn cell_index(r: usize, g: usize, b: usize) -> usize {
    (r << (2 * QUANTIZE_SIGBITS)) + (g << QUANTIZE_SIGBITS) + b
}

/// Per-cell pixel counts and channel sums
struct Histogram {
    counts: Vec<u64>,
    sums: Vec<[u64; 3]>,
}

impl Histogram {
    fn new() -> Self {
        Self {
            counts: vec![0; SIDE * SIDE * SIDE],
            sums: vec![[0; 3]; SIDE * SIDE * SIDE],
        }
    }

    fn add(&mut self, r: u8, g: u8, b: u8) -> [usize; 3] {
        let cell = [
            (r >> RSHIFT) as usize,
            (g >> RSHIFT) as usize,
            (b >> RSHIFT) as usize,
        ];
        let index = cell_index(cell[0], cell[1], cell[2]);
        self.counts[index] += 1;
        self.sums[index][0] += r as u64;
        self.sums[index][1] += g as u64;
        self.sums[index][2] += b as u64;
        cell
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Red,
    Green,
    Blue,
}

/// Axis-aligned box of histogram cells, bounds inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VBox {
    lo: [usize; 3],
    hi: [usize; 3],
    count: u64,
}

impl VBox {
    /// Box over `[lo, hi]`, shrunk to the cells that hold pixels
    fn new(lo: [usize; 3], hi: [usize; 3], histogram: &Histogram) -> Self {
        let mut count = 0;
        let mut tight_lo = hi;
        let mut tight_hi = lo;

        for r in lo[0]..=hi[0] {
            for g in lo[1]..=hi[1] {
                for b in lo[2]..=hi[2] {
                    let cell_count = histogram.counts[cell_index(r, g, b)];
                    if cell_count == 0 {
                        continue;
                    }
                    count += cell_count;
                    for (axis, value) in [r, g, b].into_iter().enumerate() {
                        tight_lo[axis] = tight_lo[axis].min(value);
                        tight_hi[axis] = tight_hi[axis].max(value);
                    }
                }
            }
        }

        if count == 0 {
            return Self { lo, hi, count };
        }
        Self {
            lo: tight_lo,
            hi: tight_hi,
            count,
        }
    }

    fn cells(&self) -> impl Iterator<Item = usize> + '_ {
        (self.lo[0]..=self.hi[0]).flat_map(move |r| {
            (self.lo[1]..=self.hi[1])
                .flat_map(move |g| (self.lo[2]..=self.hi[2]).map(move |b| cell_index(r, g, b)))
        })
    }

    fn width(&self, axis: Axis) -> usize {
        let a = axis as usize;
        self.hi[a] - self.lo[a] + 1
    }

    fn volume(&self) -> u64 {
        (self.width(Axis::Red) * self.width(Axis::Green) * self.width(Axis::Blue)) as u64
    }

    fn priority(&self) -> u64 {
        self.count * self.volume()
    }

    /// Same box restricted to `[lo, hi]` along `axis`
    fn slice(&self, axis: Axis, lo: usize, hi: usize, histogram: &Histogram) -> Self {
        let mut low = self.lo;
        let mut high = self.hi;
        low[axis as usize] = lo;
        high[axis as usize] = hi;
        Self::new(low, high, histogram)
    }

    fn plane_count(&self, axis: Axis, at: usize, histogram: &Histogram) -> u64 {
        self.slice(axis, at, at, histogram).count
    }

    fn mean_color(&self, histogram: &Histogram) -> Rgb {
        let mut totals = [0u64; 3];
        let mut count = 0u64;
        for index in self.cells() {
            count += histogram.counts[index];
            for (total, sum) in totals.iter_mut().zip(histogram.sums[index]) {
                *total += sum;
            }
        }

        if count == 0 {
            // Empty box: report its center
            let center = |a: usize| (((self.lo[a] + self.hi[a] + 1) << RSHIFT) / 2).min(255) as u8;
            return Rgb::new(center(0), center(1), center(2));
        }

        Rgb::new(
            weighted_channel(totals[0], count),
            weighted_channel(totals[1], count),
            weighted_channel(totals[2], count),
        )
    }

    fn widest_axis(&self) -> Axis {
        let (r, g, b) = (
            self.width(Axis::Red),
            self.width(Axis::Green),
            self.width(Axis::Blue),
        );
        let widest = r.max(g).max(b);
        if r == widest {
            Axis::Red
        } else if g == widest {
            Axis::Green
        } else {
            Axis::Blue
        }
    }

    /// Split at the population median along the widest axis
    ///
    /// Returns `None` when the box cannot be split further.
    fn split(&self, histogram: &Histogram) -> Option<(VBox, VBox)> {
        if self.count <= 1 {
            return None;
        }

        let axis = self.widest_axis();
        let (lo, hi) = (self.lo[axis as usize], self.hi[axis as usize]);
        if lo == hi {
            return None;
        }

        let mut partial = [0u64; SIDE];
        let mut total = 0u64;
        for i in lo..=hi {
            total += self.plane_count(axis, i, histogram);
            partial[i] = total;
        }

        let median = (lo..=hi).find(|&i| 2 * partial[i] > total)?;
        let left = median - lo;
        let right = hi - median;

        // Cut in the middle of the longer side of the median
        let mut cut = if left <= right {
            (hi - 1).min(median + right / 2)
        } else {
            let target = median as f64 - 1.0 - left as f64 / 2.0;
            lo.max(target.max(0.0).trunc() as usize)
        };

        while partial[cut] == 0 {
            cut += 1;
        }
        while total - partial[cut] == 0 && cut > lo && partial[cut - 1] != 0 {
            cut -= 1;
        }
        if cut >= hi {
            return None;
        }

        Some((
            self.slice(axis, lo, cut, histogram),
            self.slice(axis, cut + 1, hi, histogram),
        ))
    }
}

/// Median-cut quantizer returning the dominant color
#[derive(Debug, Clone)]
pub struct MedianCutQuantizer {
    color_count: usize,
    quality: usize,
    alpha_threshold: u8,
}

impl Default for MedianCutQuantizer {
    fn default() -> Self {
        Self::new(QUANTIZE_COLOR_COUNT, QUANTIZE_QUALITY)
    }
}

impl MedianCutQuantizer {
    /// Quantize into `color_count` boxes, sampling every `quality`-th pixel
    pub fn new(color_count: usize, quality: usize) -> Self {
        Self {
            color_count: color_count.max(2),
            quality: quality.max(1),
            alpha_threshold: ALPHA_THRESHOLD,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            alpha_threshold: config.alpha_threshold,
            ..Self::new(config.quantize_color_count, config.quantize_quality)
        }
    }

    /// Quantized palette, most dominant color first
    ///
    /// Returns an empty palette when no sampled pixel is opaque enough and
    /// not near-white.
    pub fn palette(&self, image: &RgbaImage) -> Result<Vec<Rgb>> {
        ensure_not_empty(image)?;

        let mut histogram = Histogram::new();
        let mut lo = [SIDE - 1; 3];
        let mut hi = [0usize; 3];
        let mut sampled = 0usize;

        for pixel in sampled_pixels(image, self.quality) {
            let [r, g, b, a] = pixel.0;
            if a < self.alpha_threshold || (r > NEAR_WHITE && g > NEAR_WHITE && b > NEAR_WHITE) {
                continue;
            }
            let cell = histogram.add(r, g, b);
            for axis in 0..3 {
                lo[axis] = lo[axis].min(cell[axis]);
                hi[axis] = hi[axis].max(cell[axis]);
            }
            sampled += 1;
        }

        if sampled == 0 {
            return Ok(Vec::new());
        }

        let mut queue = vec![VBox::new(lo, hi, &histogram)];
        let mut settled = Vec::new();

        let by_population =
            (QUANTIZE_FRACT_BY_POPULATION * self.color_count as f64).ceil() as usize;
        split_boxes(&mut queue, &mut settled, by_population, &histogram, |v| v.count);
        split_boxes(&mut queue, &mut settled, self.color_count, &histogram, VBox::priority);

        queue.extend(settled);
        queue.sort_by(|a, b| b.priority().cmp(&a.priority()).then(b.count.cmp(&a.count)));

        Ok(queue.iter().map(|vbox| vbox.mean_color(&histogram)).collect())
    }
}

/// Split the highest-ranked box until `target` boxes exist
///
/// Boxes that cannot be split move to `settled`; they still count toward
/// the target.
fn split_boxes(
    queue: &mut Vec<VBox>,
    settled: &mut Vec<VBox>,
    target: usize,
    histogram: &Histogram,
    rank: impl Fn(&VBox) -> u64,
) {
    for _ in 0..QUANTIZE_MAX_ITERATIONS {
        if queue.len() + settled.len() >= target {
            return;
        }

        queue.sort_by_key(|vbox| rank(vbox));
        let Some(vbox) = queue.pop() else {
            return;
        };

        match vbox.split(histogram) {
            Some((first, second)) => {
                for part in [first, second] {
                    if part.count > 0 {
                        queue.push(part);
                    }
                }
            }
            None => settled.push(vbox),
        }
    }
}

impl ColorExtractor for MedianCutQuantizer {
    fn extract(&self, image: &RgbaImage) -> Result<Rgb> {
        match self.palette(image)?.first() {
            Some(&dominant) => Ok(dominant),
            // Nothing but white or transparent pixels
            None => SimpleAverage::new(self.quality)
                .extract(image)
                .map_err(|_| TintError::ExtractionError {
                    reason: "no opaque pixels to quantize".into(),
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn stripes(colors: &[([u8; 4], u32)]) -> RgbaImage {
        let width: u32 = colors.iter().map(|(_, w)| w).sum();
        RgbaImage::from_fn(width, 8, |x, _| {
            let mut edge = 0;
            for (color, w) in colors {
                edge += w;
                if x < edge {
                    return Rgba(*color);
                }
            }
            Rgba([0, 0, 0, 255])
        })
    }

    #[test]
    fn test_uniform_image_returns_exact_color() {
        let image = RgbaImage::from_pixel(20, 20, Rgba([200, 30, 30, 255]));
        let quantizer = MedianCutQuantizer::default();
        assert_eq!(quantizer.extract(&image).unwrap(), Rgb::new(200, 30, 30));
    }

    #[test]
    fn test_majority_color_is_dominant() {
        let image = stripes(&[([20, 40, 200, 255], 70), ([230, 200, 20, 255], 30)]);
        let quantizer = MedianCutQuantizer::new(5, 1);

        let palette = quantizer.palette(&image).unwrap();
        assert!(palette.len() >= 2);
        assert_eq!(palette[0], Rgb::new(20, 40, 200));
        assert!(palette.contains(&Rgb::new(230, 200, 20)));
    }

    #[test]
    fn test_near_white_pixels_are_ignored() {
        let image = stripes(&[([255, 255, 255, 255], 90), ([60, 120, 60, 255], 10)]);
        let quantizer = MedianCutQuantizer::new(5, 1);
        assert_eq!(quantizer.extract(&image).unwrap(), Rgb::new(60, 120, 60));
    }

    #[test]
    fn test_all_white_falls_back_to_average() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        let quantizer = MedianCutQuantizer::default();
        assert!(quantizer.palette(&image).unwrap().is_empty());
        assert_eq!(quantizer.extract(&image).unwrap(), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_fully_transparent_fails() {
        let image = RgbaImage::from_pixel(10, 10, Rgba([80, 80, 80, 0]));
        assert!(matches!(
            MedianCutQuantizer::default().extract(&image),
            Err(TintError::ExtractionError { .. })
        ));
    }

    #[test]
    fn test_palette_size_is_bounded() {
        let image = RgbaImage::from_fn(64, 64, |x, y| {
            Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255])
        });
        let quantizer = MedianCutQuantizer::new(8, 1);
        let palette = quantizer.palette(&image).unwrap();
        assert!(!palette.is_empty());
        assert!(palette.len() <= 8);
    }

    #[test]
    fn test_vbox_split_halves_population() {
        let mut histogram = Histogram::new();
        for value in [0u8, 64, 128, 192] {
            for _ in 0..10 {
                histogram.add(value, 0, 0);
            }
        }
        let vbox = VBox::new([0, 0, 0], [24, 0, 0], &histogram);
        assert_eq!(vbox.count, 40);

        let (first, second) = vbox.split(&histogram).unwrap();
        assert_eq!(first.count + second.count, 40);
        assert!(first.count > 0 && second.count > 0);
    }
}
