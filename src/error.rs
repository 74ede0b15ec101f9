//! Error types for the cover_tint library

use thiserror::Error;

use crate::extraction::ExtractorKind;

/// Result type alias for cover_tint operations
pub type Result<T> = std::result::Result<T, TintError>;

/// Error types for palette derivation
///
/// [`PaletteResolver::resolve`](crate::PaletteResolver::resolve) never returns
/// these; they surface through `try_resolve` and the lower-level building blocks.
#[derive(Error, Debug)]
pub enum TintError {
    /// Pixel source reported a load failure
    #[error("Pixel source unavailable: {identity}")]
    SourceUnavailable {
        identity: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Pixel source did not become ready in time
    #[error("Pixel source {identity} not ready after {timeout_ms}ms")]
    LoadTimeout { identity: String, timeout_ms: u64 },

    /// Image bytes could not be read or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Image holds no usable pixels
    #[error("Image has no usable pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// No extractor registered for the requested kind
    #[error("No extractor registered for {kind}")]
    ExtractorUnavailable { kind: ExtractorKind },

    /// Extraction algorithm failed
    #[error("Extraction failed: {reason}")]
    ExtractionError { reason: String },

    /// Unrecognized extractor tag
    #[error("Unknown extractor: {0}")]
    UnknownExtractor(String),

    /// Malformed hex color string
    #[error("Invalid hex color {value:?}: {reason}")]
    InvalidHex { value: String, reason: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration could not be read or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl TintError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a source-unavailable error with context
    pub fn source_unavailable<E>(identity: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::SourceUnavailable {
            identity: identity.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// True when the pixel source never became ready, as opposed to a
    /// failure while reading or analyzing pixels
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            TintError::SourceUnavailable { .. } | TintError::LoadTimeout { .. }
        )
    }
}
