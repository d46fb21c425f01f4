//! Error type shared by the raster core ([`imaging`](crate::imaging) and
//! [`session`](crate::session)).
//!
//! Every variant is recoverable and is returned to the caller, which decides
//! how to surface it. Out-of-bounds pixel access is deliberately absent: it is
//! a contract violation and panics at the call site.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Image too small for edge detection: {width}x{height} (needs at least 2x2)")]
    ImageTooSmall { width: u32, height: u32 },
    #[error("No image loaded")]
    NoImageLoaded,
    #[error("Worker for row band {band} failed: {message}")]
    WorkerFailure { band: usize, message: String },
    #[error("Worker count must be at least 1 (got {0})")]
    InvalidWorkerCount(usize),
    #[error("Could not start worker pool: {0}")]
    PoolUnavailable(String),
    #[error("Threshold must be within 0-255 (got {0})")]
    InvalidThreshold(u32),
}

pub type Result<T> = std::result::Result<T, CoreError>;
