//! Owned, fixed-size RGBA8 pixel buffer.
//!
//! Storage is row-major, four bytes per pixel, and its length is always
//! `width * height * 4`. Pixel accessors are bounds-checked and panic on an
//! out-of-range coordinate; callers inside the crate never pass one.

use crate::error::{CoreError, Result};

/// Bytes per stored pixel.
pub const CHANNELS: usize = 4;

/// A single 8-bit RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Fully opaque gray with all three channels set to `value`.
    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    fn from_slice(px: &[u8]) -> Self {
        Self::new(px[0], px[1], px[2], px[3])
    }

    pub(crate) fn write_to(self, px: &mut [u8]) {
        px[0] = self.r;
        px[1] = self.g;
        px[2] = self.b;
        px[3] = self.a;
    }
}

/// Row-major RGBA8 raster with explicit dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Byte length for a `width x height` RGBA buffer, or `None` if it is empty
/// or does not fit in addressable memory.
fn storage_len(width: u32, height: u32) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(CHANNELS)
        .filter(|&len| len <= isize::MAX as usize)
}

impl Raster {
    /// Allocate a raster filled with transparent black.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = storage_len(width, height)
            .ok_or(CoreError::InvalidDimensions { width, height })?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
        })
    }

    /// Wrap an existing RGBA buffer. The buffer length must match the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        match storage_len(width, height) {
            Some(len) if len == pixels.len() => Ok(Self {
                width,
                height,
                pixels,
            }),
            _ => Err(CoreError::InvalidDimensions { width, height }),
        }
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba8) -> Result<Self> {
        let mut raster = Self::new(width, height)?;
        for y in 0..height {
            for x in 0..width {
                raster.set(x, y, f(x, y));
            }
        }
        Ok(raster)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Byte length of one row.
    pub fn row_stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} raster",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// Read the pixel at `(x, y)`. Panics when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Rgba8 {
        let i = self.offset(x, y);
        Rgba8::from_slice(&self.pixels[i..i + CHANNELS])
    }

    /// Write the pixel at `(x, y)`. Panics when out of bounds.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba8) {
        let i = self.offset(x, y);
        color.write_to(&mut self.pixels[i..i + CHANNELS]);
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}
