//! Reference constants for palette derivation
//!
//! Contrast targets follow WCAG 2.0; the lightness tweak thresholds and
//! extraction defaults are tuned for album-cover style artwork.

/// WCAG contrast parameters
pub mod contrast {
    /// WCAG AA minimum contrast for normal-size text
    pub const AA_CONTRAST: f64 = 4.5;

    /// Accepted overshoot above the target when searching for a fixed color
    pub const SEARCH_EPSILON: f64 = 0.1;

    /// Hard bound on lightness bisection steps
    pub const MAX_SEARCH_ITERATIONS: usize = 100;

    /// Channels below this normalized value use the linear segment
    pub const LINEAR_THRESHOLD: f64 = 0.03928;

    /// Luminance weights for red, green and blue
    pub const LUMINANCE_WEIGHTS: [f64; 3] = [0.2126, 0.7152, 0.0722];

    /// Flare term added to both luminances in the contrast ratio
    pub const FLARE: f64 = 0.05;
}

/// Lightness tweak thresholds (HSLuv units)
pub mod tweak {
    /// Colors lighter than this are darkened, others lightened
    pub const LIGHT_THRESHOLD: f64 = 30.0;

    /// Lightness above which a color counts as near-white
    pub const SUPER_LIGHT: f64 = 90.0;

    /// Saturation above which a near-white color is desaturated
    pub const SUPER_SATURATION: f64 = 90.0;

    /// Saturation multiplier for near-white, highly saturated colors
    pub const SATURATION_FACTOR: f64 = 0.75;

    /// Tweak percentage used by the gallery defaults
    pub const DEFAULT_PERCENT: f64 = 5.0;
}

/// Pixel extraction defaults
pub mod extraction {
    /// Sample every n-th pixel during quantization
    pub const QUANTIZE_QUALITY: usize = 10;

    /// Number of boxes produced by median-cut quantization
    pub const QUANTIZE_COLOR_COUNT: usize = 5;

    /// Significant bits kept per channel when building the histogram
    pub const QUANTIZE_SIGBITS: u32 = 5;

    /// Fraction of boxes produced by population-only splits
    pub const QUANTIZE_FRACT_BY_POPULATION: f64 = 0.75;

    /// Hard bound on box splits per phase
    pub const QUANTIZE_MAX_ITERATIONS: usize = 1000;

    /// Pixels above this value on every channel are treated as background white
    pub const NEAR_WHITE: u8 = 250;

    /// Pixels with alpha below this are ignored during quantization
    pub const ALPHA_THRESHOLD: u8 = 125;

    /// Sample every n-th pixel during averaging
    pub const AVERAGE_STEP: usize = 1;

    /// Channel bucket width for the dominant average
    pub const DOMINANT_DIVIDER: u8 = 24;
}
