//! Artifact encoder trait and shared types.
//!
//! The [`ArtifactEncoder`] trait defines the two operations every encoder
//! must support: a boxed JPEG (thumbnail and overview) and a lossy JPEG 2000
//! stream (original). Both are pure functions of the raster they are given.
//!
//! The production implementation is
//! [`RustEncoder`](super::rust_backend::RustEncoder).

use super::params::{BoxParams, Jp2Params};
use super::raster::RasterBuffer;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid output box {width}x{height}")]
    InvalidBox { width: u32, height: u32 },
    #[error("Resampling failed: {0}")]
    Resample(String),
    #[error("Compression failed: {0}")]
    Compression(String),
}

/// Trait for artifact encoders.
///
/// Output is all-or-nothing: an `Ok` carries the complete encoded stream, an
/// `Err` means no bytes were produced.
pub trait ArtifactEncoder: Sync {
    /// Resample `raster` to exactly `params.width × params.height` and encode a
    /// baseline 3-component JPEG.
    fn encode_boxed(&self, raster: &RasterBuffer, params: &BoxParams) -> Result<Vec<u8>, EncodeError>;

    /// Flatten alpha (if any) and encode a lossy JPEG 2000 (JP2 container).
    fn encode_lossy_jp2(&self, raster: &RasterBuffer, params: &Jp2Params) -> Result<Vec<u8>, EncodeError>;
}
