//! Raster core: pixel buffers, row-band parallelism and the transforms.
//!
//! | Operation | Function |
//! |---|---|
//! | **Negative** | [`pixel_ops::negative`] |
//! | **Threshold** | [`pixel_ops::threshold`] |
//! | **Edge detect** | [`pixel_ops::edge_detect`] |
//! | **Resample** | [`pixel_ops::resample`] (nearest neighbor) |
//! | **Rotate** | [`pixel_ops::rotate`] (quarter turns) |
//!
//! The module is split into:
//! - **Raster**: owned RGBA8 buffer with bounds-checked access
//! - **Bands**: row partitioning + [`RowBandScheduler`] worker pool
//! - **Pixel ops**: the transforms, each source → fresh destination
//! - **Parameters**: [`OperationSpec`] and friends
//! - **Codec**: [`ImageCodec`] trait + [`RustCodec`] (file bytes ↔ raster)

pub mod bands;
pub mod codec;
mod params;
pub mod pixel_ops;
mod raster;

pub use bands::{BandWriter, RowBand, RowBandScheduler, partition_rows};
pub use codec::{CodecError, ImageCodec, RustCodec};
pub use params::{
    DEFAULT_THRESHOLD, OperationSpec, ParseOperationError, Quality, RotateDirection,
};
pub use raster::{Raster, Rgba8};
