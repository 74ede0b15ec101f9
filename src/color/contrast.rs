//! WCAG 2.0 relative luminance and contrast ratio
//!
//! Formulas: <https://www.w3.org/TR/2008/REC-WCAG20-20081211/#relativeluminancedef>
//! and <https://www.w3.org/TR/2008/REC-WCAG20-20081211/#contrast-ratiodef>

use super::Rgb;
use crate::constants::contrast::{FLARE, LINEAR_THRESHOLD, LUMINANCE_WEIGHTS};

fn linearize(channel: u8) -> f64 {
    let value = channel as f64 / 255.0;
    if value < LINEAR_THRESHOLD {
        value / 12.92
    } else {
        ((value + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance in [0, 1]
pub fn relative_luminance(color: Rgb) -> f64 {
    let [wr, wg, wb] = LUMINANCE_WEIGHTS;
    wr * linearize(color.red) + wg * linearize(color.green) + wb * linearize(color.blue)
}

/// Contrast ratio in [1, 21], independent of argument order
pub fn contrast_ratio(first: Rgb, second: Rgb) -> f64 {
    let l1 = relative_luminance(first);
    let l2 = relative_luminance(second);

    if l1 > l2 {
        (l1 + FLARE) / (l2 + FLARE)
    } else {
        (l2 + FLARE) / (l1 + FLARE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_luminance_extremes() {
        assert!((relative_luminance(Rgb::new(255, 255, 255)) - 1.0).abs() < 1e-9);
        assert!(relative_luminance(Rgb::new(0, 0, 0)).abs() < 1e-9);
    }

    #[test]
    fn test_black_on_white_is_21() {
        assert!((contrast_ratio(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)) - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_linear_segment() {
        // 5/255 is below the threshold and stays on the linear segment
        let expected = 0.2126 * (5.0 / 255.0 / 12.92);
        assert!((relative_luminance(Rgb::new(5, 0, 0)) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_gray_on_white() {
        // #767676 is the classic lightest gray passing AA on white
        let ratio = contrast_ratio(Rgb::new(0x76, 0x76, 0x76), Rgb::new(255, 255, 255));
        assert!(ratio >= 4.5 && ratio < 4.6, "ratio = {ratio}");

        let ratio = contrast_ratio(Rgb::new(0x77, 0x77, 0x77), Rgb::new(255, 255, 255));
        assert!(ratio < 4.5, "ratio = {ratio}");
    }

    proptest! {
        #[test]
        fn prop_contrast_symmetric(
            a in any::<[u8; 3]>(),
            b in any::<[u8; 3]>(),
        ) {
            let a = Rgb::new(a[0], a[1], a[2]);
            let b = Rgb::new(b[0], b[1], b[2]);
            prop_assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
        }

        #[test]
        fn prop_self_contrast_is_one(c in any::<[u8; 3]>()) {
            let c = Rgb::new(c[0], c[1], c[2]);
            prop_assert!((contrast_ratio(c, c) - 1.0).abs() < 1e-12);
        }

        #[test]
        fn prop_contrast_in_range(a in any::<[u8; 3]>(), b in any::<[u8; 3]>()) {
            let ratio = contrast_ratio(Rgb::new(a[0], a[1], a[2]), Rgb::new(b[0], b[1], b[2]));
            prop_assert!((1.0..=21.0 + 1e-9).contains(&ratio));
        }
    }
}
