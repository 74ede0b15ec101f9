//! Image decoding into RGBA pixel buffers
//!
//! All sources end up as an 8-bit [`RgbaImage`] so the extractors see one
//! pixel layout regardless of the input format. Alpha is kept; the
//! extractors use it to skip transparent margins.
//!
//! ## Supported Formats
//!
//! Via the `image` crate: JPEG, PNG, GIF (first frame), WebP, TIFF, BMP,
//! ICO, TGA, OpenEXR, PNM, QOI, DDS and Radiance HDR.

use crate::error::{Result, TintError};
use image::RgbaImage;
use std::path::Path;

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    /// GIF image (first frame only)
    Gif,
    WebP,
    Tiff,
    Bmp,
    Ico,
    Tga,
    /// OpenEXR image
    Exr,
    /// PNM image (PBM, PGM, PPM)
    Pnm,
    Qoi,
    Dds,
    Hdr,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            "ico" => Some(ImageFormat::Ico),
            "tga" => Some(ImageFormat::Tga),
            "exr" => Some(ImageFormat::Exr),
            "pbm" | "pgm" | "ppm" | "pnm" => Some(ImageFormat::Pnm),
            "qoi" => Some(ImageFormat::Qoi),
            "dds" => Some(ImageFormat::Dds),
            "hdr" => Some(ImageFormat::Hdr),
            _ => None,
        }
    }

    fn decoder_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Ico => image::ImageFormat::Ico,
            ImageFormat::Tga => image::ImageFormat::Tga,
            ImageFormat::Exr => image::ImageFormat::OpenExr,
            ImageFormat::Pnm => image::ImageFormat::Pnm,
            ImageFormat::Qoi => image::ImageFormat::Qoi,
            ImageFormat::Dds => image::ImageFormat::Dds,
            ImageFormat::Hdr => image::ImageFormat::Hdr,
        }
    }
}

/// Decode encoded image bytes into an RGBA buffer
///
/// With a format hint the matching decoder is used directly; without one
/// the format is guessed from the leading magic bytes.
///
/// # Errors
///
/// Returns `TintError::ImageLoadError` if decoding fails
pub fn decode_bytes(bytes: &[u8], hint: Option<ImageFormat>) -> Result<RgbaImage> {
    let decoded = match hint {
        Some(format) => image::load_from_memory_with_format(bytes, format.decoder_format()),
        None => image::load_from_memory(bytes),
    }
    .map_err(|e| TintError::image_load("Failed to decode image bytes", e))?;

    Ok(decoded.to_rgba8())
}

/// Load an image from disk into an RGBA buffer
///
/// # Example
///
/// ```rust,no_run
/// use cover_tint::image_loader::load_image;
/// use std::path::Path;
///
/// let pixels = load_image(Path::new("cover.jpg"))?;
/// println!("Loaded image: {}x{}", pixels.width(), pixels.height());
/// # Ok::<(), cover_tint::TintError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        TintError::image_load(format!("Failed to open image file: {}", path.display()), e)
    })?;

    decode_bytes(&bytes, ImageFormat::from_extension(path)).map_err(|e| match e {
        TintError::ImageLoadError { source, .. } => TintError::ImageLoadError {
            message: format!("Failed to decode image: {}", path.display()),
            source,
        },
        other => other,
    })
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp", "ico", "tga", "exr", "pbm",
        "pgm", "ppm", "pnm", "qoi", "dds", "hdr",
    ]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::io::Cursor;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_extension(Path::new("cover.jpg")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("cover.JPEG")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("cover.webp")),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_extension(Path::new("cover.heic")), None);
        assert_eq!(ImageFormat::from_extension(Path::new("cover")), None);
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("png"));
        assert!(is_supported_extension("JPG"));
        assert!(!is_supported_extension("heic"));
        assert!(!is_supported_extension("doc"));
    }

    #[test]
    fn test_decode_png_bytes() {
        let original = RgbaImage::from_pixel(3, 2, Rgba([12, 34, 56, 200]));
        let bytes = encode_png(&original);

        let guessed = decode_bytes(&bytes, None).unwrap();
        assert_eq!(guessed, original);

        let hinted = decode_bytes(&bytes, Some(ImageFormat::Png)).unwrap();
        assert_eq!(hinted, original);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode_bytes(b"definitely not an image", None);
        assert!(matches!(result, Err(TintError::ImageLoadError { .. })));
    }

    #[test]
    fn test_load_image_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        let original = RgbaImage::from_pixel(4, 4, Rgba([200, 30, 30, 255]));
        std::fs::write(&path, encode_png(&original)).unwrap();

        assert_eq!(load_image(&path).unwrap(), original);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_image(Path::new("no/such/cover.png"));
        assert!(matches!(result, Err(TintError::ImageLoadError { .. })));
    }
}
