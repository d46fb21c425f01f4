//! Row-band partitioning and the worker pool that drives per-band work.
//!
//! A raster of height `H` is split into `N` contiguous bands: band `i` starts
//! at row `i * (H / N)` and the last band absorbs the remainder, so `H` need
//! not divide evenly. When `H < N` the leading bands are empty.
//!
//! Each worker receives a [`BandWriter`] that owns a mutable slice covering
//! only its band of the destination raster. The slices come from
//! `split_at_mut`, so disjoint writes are enforced by the borrow checker and
//! no lock guards the destination. The source raster is shared read-only.
//!
//! Bands run on a [rayon](https://docs.rs/rayon) pool owned by the
//! scheduler. Every band runs to completion even when another fails, and the
//! error reported is the one from the lowest band index.

use super::raster::{CHANNELS, Raster, Rgba8};
use crate::error::{CoreError, Result};
use rayon::prelude::*;
use std::ops::Range;

/// Half-open range of rows `[start_row, end_row)` owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    pub start_row: u32,
    pub end_row: u32,
}

impl RowBand {
    pub fn rows(&self) -> Range<u32> {
        self.start_row..self.end_row
    }

    pub fn len(&self) -> u32 {
        self.end_row - self.start_row
    }

    pub fn is_empty(&self) -> bool {
        self.start_row == self.end_row
    }

    pub fn contains(&self, row: u32) -> bool {
        self.rows().contains(&row)
    }
}

/// Split `[0, height)` into `worker_count` bands; the last band takes the remainder.
///
/// `worker_count` must be non-zero.
pub fn partition_rows(height: u32, worker_count: usize) -> Vec<RowBand> {
    assert!(worker_count > 0, "worker_count must be non-zero");
    let n = worker_count as u64;
    let segment = height as u64 / n;
    (0..n)
        .map(|i| {
            let start = i * segment;
            let end = if i == n - 1 {
                height as u64
            } else {
                (i + 1) * segment
            };
            // start <= end <= height, so both fit in u32
            RowBand {
                start_row: start as u32,
                end_row: end as u32,
            }
        })
        .collect()
}

/// Exclusive write access to one band of a destination raster.
#[derive(Debug)]
pub struct BandWriter<'a> {
    band: RowBand,
    width: u32,
    pixels: &'a mut [u8],
}

impl BandWriter<'_> {
    pub fn band(&self) -> RowBand {
        self.band
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Write pixel `(x, y)`, where `y` is an absolute row of the full raster.
    ///
    /// Panics when `x` is past the row end or `y` lies outside this band.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba8) {
        assert!(
            x < self.width && self.band.contains(y),
            "pixel ({x}, {y}) outside band rows {:?} of width {}",
            self.band.rows(),
            self.width
        );
        let row = (y - self.band.start_row) as usize;
        let i = (row * self.width as usize + x as usize) * CHANNELS;
        color.write_to(&mut self.pixels[i..i + CHANNELS]);
    }

    /// Fill every pixel of the band with `f(x, y)`.
    pub fn fill_with(&mut self, f: impl Fn(u32, u32) -> Rgba8) {
        let width = self.width;
        for y in self.band.rows() {
            for x in 0..width {
                self.set(x, y, f(x, y));
            }
        }
    }
}

/// Fixed-size worker pool executing per-band work over a destination raster.
pub struct RowBandScheduler {
    workers: usize,
    pool: rayon::ThreadPool,
}

impl std::fmt::Debug for RowBandScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowBandScheduler")
            .field("workers", &self.workers)
            .finish()
    }
}

impl RowBandScheduler {
    pub const DEFAULT_WORKERS: usize = 4;

    /// Start a pool with `workers` threads; one band is cut per worker.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(CoreError::InvalidWorkerCount(workers));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("row-band-{i}"))
            .build()
            .map_err(|e| CoreError::PoolUnavailable(e.to_string()))?;
        Ok(Self { workers, pool })
    }

    /// Bands this scheduler would cut for a raster of `height` rows.
    pub fn bands(&self, height: u32) -> Vec<RowBand> {
        partition_rows(height, self.workers)
    }

    /// Run `body` once per band of `dst`, blocking until every band finishes.
    ///
    /// On failure the first error by band index is returned as
    /// [`CoreError::WorkerFailure`]; `dst` then holds partial output and must
    /// be discarded by the caller.
    pub fn run<F>(&self, dst: &mut Raster, body: F) -> Result<()>
    where
        F: Fn(&mut BandWriter<'_>) -> Result<()> + Sync,
    {
        let width = dst.width();
        let stride = dst.row_stride();
        let bands = self.bands(dst.height());

        let mut writers = Vec::with_capacity(bands.len());
        let mut rest = dst.pixels_mut();
        for band in bands {
            let len = band.len() as usize * stride;
            let (head, tail) = std::mem::take(&mut rest).split_at_mut(len);
            writers.push(BandWriter {
                band,
                width,
                pixels: head,
            });
            rest = tail;
        }

        // collect() keeps band order and never short-circuits, so all bands finish
        let results: Vec<Result<()>> = self.pool.install(|| {
            writers
                .into_par_iter()
                .map(|mut writer| body(&mut writer))
                .collect()
        });

        match results
            .into_iter()
            .enumerate()
            .find_map(|(band, r)| r.err().map(|e| (band, e)))
        {
            Some((band, e)) => Err(CoreError::WorkerFailure {
                band,
                message: e.to_string(),
            }),
            None => Ok(()),
        }
    }
}
