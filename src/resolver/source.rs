//! Pixel sources
//!
//! A pixel source is anything that can eventually hand over decoded pixels:
//! a file on disk, encoded bytes already in memory, or an image decoded by
//! the caller. Readiness is asynchronous so the resolver can await a source
//! that is still being fetched or written.

use async_trait::async_trait;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::image_loader::{decode_bytes, ImageFormat};
use crate::{Result, TintError};

/// Source of decoded pixels with a stable identity
#[async_trait]
pub trait PixelSource: Send + Sync {
    /// Stable identity used for caching, e.g. a path or URL
    fn identity(&self) -> &str;

    /// Wait until pixels can be read
    ///
    /// An error means the source will never load.
    async fn wait_until_ready(&self) -> Result<()>;

    /// Decoded pixels; only called after `wait_until_ready` succeeded
    async fn pixels(&self) -> Result<Arc<RgbaImage>>;
}

/// Image file on disk
#[derive(Debug, Clone)]
pub struct ImageFile {
    path: PathBuf,
    identity: String,
}

impl ImageFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let identity = path.display().to_string();
        Self { path, identity }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PixelSource for ImageFile {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn wait_until_ready(&self) -> Result<()> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| TintError::source_unavailable(&self.identity, e))?;

        if !metadata.is_file() {
            return Err(TintError::SourceUnavailable {
                identity: self.identity.clone(),
                source: None,
            });
        }
        Ok(())
    }

    async fn pixels(&self) -> Result<Arc<RgbaImage>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            TintError::image_load(format!("Failed to read {}", self.identity), e)
        })?;
        let decoded = decode_bytes(&bytes, ImageFormat::from_extension(&self.path))?;
        Ok(Arc::new(decoded))
    }
}

/// Encoded image bytes held in memory, e.g. a downloaded cover
#[derive(Debug, Clone)]
pub struct EncodedImage {
    identity: String,
    bytes: Arc<[u8]>,
}

impl EncodedImage {
    pub fn new(identity: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            identity: identity.into(),
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl PixelSource for EncodedImage {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn wait_until_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn pixels(&self) -> Result<Arc<RgbaImage>> {
        decode_bytes(&self.bytes, None).map(Arc::new)
    }
}

/// Pixels the caller already decoded
#[derive(Debug, Clone)]
pub struct DecodedImage {
    identity: String,
    image: Arc<RgbaImage>,
}

impl DecodedImage {
    pub fn new(identity: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            identity: identity.into(),
            image: Arc::new(image),
        }
    }
}

#[async_trait]
impl PixelSource for DecodedImage {
    fn identity(&self) -> &str {
        &self.identity
    }

    async fn wait_until_ready(&self) -> Result<()> {
        Ok(())
    }

    async fn pixels(&self) -> Result<Arc<RgbaImage>> {
        Ok(Arc::clone(&self.image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;

    fn png_bytes(color: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(2, 2, Rgba(color));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[tokio::test]
    async fn test_image_file_ready_and_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, png_bytes([10, 20, 30, 255])).unwrap();

        let source = ImageFile::new(&path);
        assert_eq!(source.identity(), path.display().to_string());
        source.wait_until_ready().await.unwrap();

        let pixels = source.pixels().await.unwrap();
        assert_eq!(pixels.get_pixel(1, 1), &Rgba([10, 20, 30, 255]));
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let source = ImageFile::new("no/such/cover.png");
        let err = source.wait_until_ready().await.unwrap_err();
        assert!(err.is_source_failure());
    }

    #[tokio::test]
    async fn test_directory_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = ImageFile::new(dir.path());
        assert!(matches!(
            source.wait_until_ready().await,
            Err(TintError::SourceUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_encoded_image_decodes() {
        let source = EncodedImage::new("memory://cover", png_bytes([1, 2, 3, 255]));
        source.wait_until_ready().await.unwrap();
        let pixels = source.pixels().await.unwrap();
        assert_eq!(pixels.dimensions(), (2, 2));
    }

    #[tokio::test]
    async fn test_corrupt_bytes_fail_after_ready() {
        let source = EncodedImage::new("memory://broken", b"not a png".to_vec());
        assert!(source.wait_until_ready().await.is_ok());
        assert!(matches!(
            source.pixels().await,
            Err(TintError::ImageLoadError { .. })
        ));
    }

    #[tokio::test]
    async fn test_decoded_image_shares_buffer() {
        let source = DecodedImage::new("decoded", RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 255])));
        let first = source.pixels().await.unwrap();
        let second = source.pixels().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
