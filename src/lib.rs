//! # rasterkit
//!
//! A small raster-editing engine: tonal inversion, binary thresholding,
//! gradient edge extraction, nearest-neighbor resampling, and quarter-turn
//! rotation over in-memory RGBA8 images, with per-pixel work split across a
//! fixed worker pool.
//!
//! # Architecture
//!
//! ```text
//! Editor::apply(op)                       validation + audit trail
//!   └─ ImageSession::apply(op)            current / original / modified
//!        └─ pixel_ops::apply(src, op)     allocate destination
//!             └─ RowBandScheduler::run    one band of rows per worker
//! ```
//!
//! The core (`imaging` + `session`) has no UI, file or logging dependencies:
//! given a [`Raster`](imaging::Raster) and an [`OperationSpec`](imaging::OperationSpec)
//! it produces a new raster deterministically. Decoding, saving and auditing
//! sit around it as collaborators.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Raster buffer, row-band scheduler, the five transforms, codec |
//! | [`session`] | `ImageSession` state machine (Empty → Loaded → Dirty) |
//! | [`error`] | `CoreError`, the core's recoverable failures |
//! | [`editor`] | Open / apply / save workflow with validation and auditing |
//! | [`audit`] | Append-only audit log sink |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`output`] | CLI message formatting |
//!
//! # Design Decisions
//!
//! ## Ownership Instead of Locks
//!
//! Transforms never mutate their source. The destination buffer is cut into
//! per-band `&mut [u8]` slices with `split_at_mut`, and each worker gets one.
//! Two workers cannot write the same row because the borrow checker will not
//! hand out overlapping slices, so the destination needs no mutex, and the
//! shared source is plain `&Raster`.
//!
//! ## Deterministic Output
//!
//! Every destination pixel is a pure function of source pixels, and band
//! boundaries depend only on height and worker count. Running the same
//! transform with 1, 2, 4 or 7 workers yields byte-identical rasters.
//!
//! ## Atomic Operations
//!
//! A failed transform (too-small image, worker error) discards its
//! destination. The session's current raster is replaced only by a fully
//! formed result.

pub mod audit;
pub mod config;
pub mod editor;
pub mod error;
pub mod imaging;
pub mod output;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
