//! Palette resolution
//!
//! Ties the pipeline together:
//! 1. Wait for the pixel source (optionally with a timeout)
//! 2. Look up or extract the raw dominant color, keyed by source and extractor
//! 3. Fix the raw color for contrast against white and black
//! 4. Tweak the display color's lightness
//! 5. Classify the display color as dark or light
//!
//! Resolution never fails: any error along the way yields
//! [`Palette::neutral`].

pub mod cache;
pub mod source;

pub use cache::{CacheKey, ColorCache};
pub use source::{DecodedImage, EncodedImage, ImageFile, PixelSource};

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::color::{contrast_ratio, ColorConverter, ContrastFixer, LightnessTweaker, Monochrome, Rgb};
use crate::config::ResolverConfig;
use crate::extraction::{ExtractorKind, ExtractorRegistry};
use crate::{Palette, Result, TintError};

/// Derives theme palettes from pixel sources
///
/// Owns the extractor lookup table and a shared [`ColorCache`]. Create one
/// per process (or session) and reuse it so the cache pays off.
#[derive(Debug)]
pub struct PaletteResolver {
    registry: ExtractorRegistry,
    cache: Arc<ColorCache>,
    converter: ColorConverter,
    fixer: ContrastFixer,
    tweaker: LightnessTweaker,
    min_contrast: f64,
    load_timeout: Option<Duration>,
}

impl Default for PaletteResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteResolver {
    /// Resolver with default configuration and built-in extractors
    pub fn new() -> Self {
        Self::with_config(&ResolverConfig::default())
    }

    pub fn with_config(config: &ResolverConfig) -> Self {
        Self {
            registry: ExtractorRegistry::with_defaults(&config.extraction),
            cache: Arc::new(ColorCache::new()),
            converter: ColorConverter::new(),
            fixer: ContrastFixer::from_config(&config.contrast),
            tweaker: LightnessTweaker::from_config(&config.tweak),
            min_contrast: config.contrast.min_contrast,
            load_timeout: config.load_timeout(),
        }
    }

    /// Replace the extractor lookup table
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Share an existing cache, e.g. between resolvers with different tweaks
    pub fn with_cache(mut self, cache: Arc<ColorCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<ColorCache> {
        &self.cache
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Resolve a palette, falling back to [`Palette::neutral`] on any failure
    ///
    /// `tweak_percent` shifts the display color's lightness (see
    /// [`LightnessTweaker`]); zero leaves it untouched.
    pub async fn resolve<S>(&self, source: &S, kind: ExtractorKind, tweak_percent: f64) -> Palette
    where
        S: PixelSource + ?Sized,
    {
        match self.try_resolve(source, kind, tweak_percent).await {
            Ok(palette) => palette,
            Err(err) => {
                warn!(
                    identity = source.identity(),
                    extractor = %kind,
                    error = %err,
                    "color extraction failed, using neutral palette"
                );
                Palette::neutral()
            }
        }
    }

    /// Resolve a palette, reporting failures instead of falling back
    pub async fn try_resolve<S>(
        &self,
        source: &S,
        kind: ExtractorKind,
        tweak_percent: f64,
    ) -> Result<Palette>
    where
        S: PixelSource + ?Sized,
    {
        let raw = self.dominant_color(source, kind).await?;
        Ok(self.palette_from_color(raw, tweak_percent))
    }

    /// Raw (untweaked) dominant color of `source`, cached per extractor
    pub async fn dominant_color<S>(&self, source: &S, kind: ExtractorKind) -> Result<Rgb>
    where
        S: PixelSource + ?Sized,
    {
        self.wait_for(source).await?;

        let key = CacheKey::new(source.identity(), kind);
        if let Some(color) = self.cache.get(&key) {
            debug!(identity = source.identity(), extractor = %kind, "dominant color cache hit");
            return Ok(color);
        }

        let extractor = self.registry.get(kind)?;
        let pixels = source.pixels().await?;
        let color = extractor.extract(&pixels)?;

        debug!(
            identity = source.identity(),
            extractor = %kind,
            color = %self.converter.to_hex(color),
            "extracted dominant color"
        );
        self.cache.insert(key, color);
        Ok(color)
    }

    /// Derive the palette for an already known raw color
    ///
    /// Contrast variants come from the raw color; only the display color is
    /// tweaked.
    pub fn palette_from_color(&self, raw: Rgb, tweak_percent: f64) -> Palette {
        let on_white = self.fixer.fix(raw, Monochrome::White, self.min_contrast);
        let on_black = self.fixer.fix(raw, Monochrome::Black, self.min_contrast);

        let display = if tweak_percent != 0.0 {
            self.tweaker.tweak(raw, tweak_percent)
        } else {
            raw
        };

        let is_dark = contrast_ratio(display, Monochrome::White.rgb()) >= self.min_contrast;

        Palette {
            dominant: self.converter.to_hex(display),
            text: if is_dark {
                Monochrome::White
            } else {
                Monochrome::Black
            },
            on_white: self.converter.to_hex(on_white),
            on_black: self.converter.to_hex(on_black),
            is_dark,
        }
    }

    async fn wait_for<S>(&self, source: &S) -> Result<()>
    where
        S: PixelSource + ?Sized,
    {
        match self.load_timeout {
            Some(limit) => tokio::time::timeout(limit, source.wait_until_ready())
                .await
                .map_err(|_| TintError::LoadTimeout {
                    identity: source.identity().to_string(),
                    timeout_ms: limit.as_millis() as u64,
                })?,
            None => source.wait_until_ready().await,
        }
    }
}
