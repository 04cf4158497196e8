//! Parameter types for artifact encoding.
//!
//! These structs describe *what* to produce, not *how*. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides which artifacts to create) and the
//! [`backend`](super::backend) (which does the pixel and codec work). Keeping
//! them separate lets tests swap in a recording encoder without changing
//! operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (1–100, default 75). Clamped on construction.
//! - [`BoxParams`]: Exact output box for a resampled JPEG.
//! - [`Jp2Params`]: Fixed lossy JPEG 2000 profile.

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Exact output dimensions for a boxed JPEG (thumbnail or overview).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxParams {
    pub width: u32,
    pub height: u32,
}

impl BoxParams {
    pub fn new((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Lossy JPEG 2000 profile.
///
/// One quality layer at a fixed compression ratio with the irreversible 9/7
/// wavelet. Not configurable per call: every original is written at the
/// encoder's lowest lossy setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jp2Params {
    /// Target compression ratio for the single quality layer.
    pub compression_ratio: f32,
    /// Upper bound on wavelet decomposition levels (reduced for small rasters).
    pub max_resolutions: u32,
}

impl Jp2Params {
    /// The fixed profile used for every original.
    pub const fn lowest_lossy() -> Self {
        Self {
            compression_ratio: 20.0,
            max_resolutions: 6,
        }
    }

    /// Resolution levels usable for a raster whose shorter edge is `min_edge`.
    ///
    /// OpenJPEG rejects a decomposition deeper than the image allows
    /// (`2^(levels-1)` must not exceed the shorter edge).
    pub fn resolutions_for(&self, min_edge: u32) -> u32 {
        let fit = u32::BITS - min_edge.max(1).leading_zeros();
        fit.clamp(1, self.max_resolutions.max(1))
    }
}

impl Default for Jp2Params {
    fn default() -> Self {
        Self::lowest_lossy()
    }
}
