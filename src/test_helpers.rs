//! Shared test utilities: small synthetic rasters and on-disk fixtures.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let src = gradient(8, 5);
//! let gray = from_brightness(2, 2, &[10, 200, 10, 200]);
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = write_jpeg(tmp.path(), "photo.jpg", 16, 9);
//! ```

use crate::imaging::{Raster, Rgba8};
use image::{ImageEncoder, RgbImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Synthetic rasters
// =========================================================================

/// Raster where every pixel is `color`.
pub fn solid(width: u32, height: u32, color: Rgba8) -> Raster {
    Raster::from_fn(width, height, |_, _| color).unwrap()
}

/// Raster with distinct, position-dependent channels (including alpha).
pub fn gradient(width: u32, height: u32) -> Raster {
    Raster::from_fn(width, height, |x, y| {
        Rgba8::new(
            (x * 37 % 256) as u8,
            (y * 53 % 256) as u8,
            ((x + y) * 11 % 256) as u8,
            (255 - (x * 3 + y) % 128) as u8,
        )
    })
    .unwrap()
}

/// Opaque gray raster whose pixel brightness values are given row-major.
pub fn from_brightness(width: u32, height: u32, values: &[u8]) -> Raster {
    assert_eq!(values.len(), (width * height) as usize);
    Raster::from_fn(width, height, |x, y| {
        Rgba8::gray(values[(y * width + x) as usize])
    })
    .unwrap()
}

// =========================================================================
// Fixtures on disk
// =========================================================================

/// Write a small valid JPEG into `dir` and return its path.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(&path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    path
}
