//! The five raster transforms.
//!
//! Every transform reads an immutable source [`Raster`] and returns a freshly
//! allocated destination; the source is never touched. Each destination pixel
//! depends only on source pixels, so all five run through the
//! [`RowBandScheduler`] and produce identical bytes for any worker count.
//!
//! | Transform | Destination pixel |
//! |---|---|
//! | [`negative`] | `(255-r, 255-g, 255-b, a)` |
//! | [`threshold`] | white if `brightness >= t`, else black |
//! | [`edge_detect`] | gray `min(255, |b - b_right| + |b - b_down|)` |
//! | [`resample`] | nearest neighbor, `floor(x * src_w / dst_w)` |
//! | [`rotate`] | quarter turn, dimensions swapped |
//!
//! Brightness is the HSB "value" component, `max(r, g, b)`, in 0–255.

use super::bands::RowBandScheduler;
use super::params::{OperationSpec, RotateDirection};
use super::raster::{Raster, Rgba8};
use crate::error::{CoreError, Result};

/// HSB value of a pixel: the largest of its color channels.
pub fn brightness(c: Rgba8) -> u8 {
    c.r.max(c.g).max(c.b)
}

/// Allocate a `width x height` destination and fill it band by band with `f(x, y)`.
fn map_pixels<F>(scheduler: &RowBandScheduler, width: u32, height: u32, f: F) -> Result<Raster>
where
    F: Fn(u32, u32) -> Rgba8 + Sync,
{
    let mut dst = Raster::new(width, height)?;
    scheduler.run(&mut dst, |band| {
        band.fill_with(&f);
        Ok(())
    })?;
    Ok(dst)
}

/// Invert color channels, keeping alpha.
pub fn negative(src: &Raster, scheduler: &RowBandScheduler) -> Result<Raster> {
    map_pixels(scheduler, src.width(), src.height(), |x, y| {
        let c = src.get(x, y);
        Rgba8::new(255 - c.r, 255 - c.g, 255 - c.b, c.a)
    })
}

/// Binarize on brightness: opaque white at or above `level`, opaque black below.
pub fn threshold(src: &Raster, level: u8, scheduler: &RowBandScheduler) -> Result<Raster> {
    map_pixels(scheduler, src.width(), src.height(), |x, y| {
        if brightness(src.get(x, y)) >= level {
            Rgba8::WHITE
        } else {
            Rgba8::BLACK
        }
    })
}

/// Forward-difference edge magnitude as an opaque grayscale image.
///
/// Neighbors past the right or bottom edge count as black, so the last
/// column and row carry the pixel's own brightness as their difference.
pub fn edge_detect(src: &Raster, scheduler: &RowBandScheduler) -> Result<Raster> {
    let (width, height) = src.dimensions();
    if width < 2 || height < 2 {
        return Err(CoreError::ImageTooSmall { width, height });
    }
    let b = |x: u32, y: u32| brightness(src.get(x, y)) as u16;
    map_pixels(scheduler, width, height, |x, y| {
        let here = b(x, y);
        let right = if x + 1 < width { b(x + 1, y) } else { 0 };
        let down = if y + 1 < height { b(x, y + 1) } else { 0 };
        let edge = here.abs_diff(right) + here.abs_diff(down);
        Rgba8::gray(edge.min(255) as u8)
    })
}

/// Nearest-neighbor scale to `width x height`.
pub fn resample(
    src: &Raster,
    width: u32,
    height: u32,
    scheduler: &RowBandScheduler,
) -> Result<Raster> {
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }
    let (src_w, src_h) = src.dimensions();
    map_pixels(scheduler, width, height, |x, y| {
        // floor(x * src_w / dst_w) < src_w for every x < dst_w
        let sx = (x as u64 * src_w as u64 / width as u64) as u32;
        let sy = (y as u64 * src_h as u64 / height as u64) as u32;
        src.get(sx, sy)
    })
}

/// Quarter-turn rotation; the destination has swapped dimensions.
///
/// Right maps source `(x, y)` to `(h-1-y, x)`; Left maps it to `(y, w-1-x)`.
/// Both are evaluated as the inverse lookup from each destination pixel.
pub fn rotate(
    src: &Raster,
    direction: RotateDirection,
    scheduler: &RowBandScheduler,
) -> Result<Raster> {
    let (w, h) = src.dimensions();
    map_pixels(scheduler, h, w, |dx, dy| match direction {
        RotateDirection::Right => src.get(dy, h - 1 - dx),
        RotateDirection::Left => src.get(w - 1 - dy, dx),
    })
}

/// Dispatch an [`OperationSpec`] to its transform.
pub fn apply(src: &Raster, op: &OperationSpec, scheduler: &RowBandScheduler) -> Result<Raster> {
    match *op {
        OperationSpec::Negative => negative(src, scheduler),
        OperationSpec::Threshold { threshold: t } => threshold(src, t, scheduler),
        OperationSpec::EdgeDetect => edge_detect(src, scheduler),
        OperationSpec::Resample { width, height } => resample(src, width, height, scheduler),
        OperationSpec::Rotate { direction } => rotate(src, direction, scheduler),
    }
}
