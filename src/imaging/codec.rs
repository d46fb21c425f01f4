//! Conversion between encoded image files and [`Raster`]s.
//!
//! The [`ImageCodec`] trait is the seam between the raster core and file
//! formats; the core itself never parses image bytes. [`RustCodec`] is the
//! production implementation, built on the `image` crate:
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP, BMP) | `image::load_from_memory` → RGBA8 |
//! | Encode JPEG | `JpegEncoder::new_with_quality` on the RGB channels (alpha dropped) |
//! | Encode other formats | `DynamicImage::write_to` with RGBA8 |

use super::params::Quality;
use super::raster::Raster;
use crate::error::CoreError;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Raster(#[from] CoreError),
}

/// Extensions whose decoders are compiled in, paired with their format.
const CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("bmp", ImageFormat::Bmp),
];

static DECODABLE: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// File extensions (lowercase, no dot) that [`RustCodec`] can decode.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &DECODABLE
}

/// Resolve an output format from a file extension such as `"jpg"`.
pub fn output_format(extension: &str) -> Result<ImageFormat, CodecError> {
    ImageFormat::from_extension(extension)
        .filter(|fmt| fmt.writing_enabled())
        .ok_or_else(|| CodecError::UnsupportedFormat(extension.to_string()))
}

/// Lowercase extension of `path`, if any.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Decoder/encoder between file bytes and rasters.
pub trait ImageCodec: Sync {
    /// Decode an encoded image into an RGBA8 raster.
    fn decode(&self, bytes: &[u8]) -> Result<Raster, CodecError>;

    /// Encode `raster` in `format`.
    fn encode(&self, raster: &Raster, format: ImageFormat) -> Result<Vec<u8>, CodecError>;
}

/// Codec backed by the `image` crate's pure-Rust decoders and encoders.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCodec {
    quality: Quality,
}

impl RustCodec {
    pub fn new(quality: Quality) -> Self {
        Self { quality }
    }
}

impl ImageCodec for RustCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, CodecError> {
        let img = image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
        let rgba = img.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Raster::from_rgba(width, height, rgba.into_raw())?)
    }

    fn encode(&self, raster: &Raster, format: ImageFormat) -> Result<Vec<u8>, CodecError> {
        let (width, height) = raster.dimensions();
        let rgba = RgbaImage::from_raw(width, height, raster.as_raw().to_vec())
            .ok_or_else(|| CodecError::Encode("raster buffer does not match dimensions".into()))?;
        let img = DynamicImage::ImageRgba8(rgba);

        let mut out = Cursor::new(Vec::new());
        match format {
            ImageFormat::Jpeg => {
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    &mut out,
                    self.quality.value(),
                );
                DynamicImage::ImageRgb8(img.to_rgb8())
                    .write_with_encoder(encoder)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
            }
            other if other.writing_enabled() => img
                .write_to(&mut out, other)
                .map_err(|e| CodecError::Encode(e.to_string()))?,
            other => return Err(CodecError::UnsupportedFormat(format!("{other:?}"))),
        }
        Ok(out.into_inner())
    }
}
