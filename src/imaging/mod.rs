//! Image derivation: scaling math, raster handling and artifact encoding.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Overview box** | [`calculate_overview_dimensions`] (pure) |
//! | **Thumbnail / overview** | Lanczos3 `resize_to_fill` + baseline JPEG |
//! | **Original** | alpha dropped, lossy JPEG 2000 via OpenJPEG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Raster**: [`RasterBuffer`], the decoded image handed between stages
//! - **Parameters**: Data structures describing encode operations
//! - **Backend**: [`ArtifactEncoder`] trait + [`RustEncoder`]
//! - **Operations**: High-level functions combining calculations + encoder

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod raster;
pub mod rust_backend;

pub use backend::{ArtifactEncoder, EncodeError};
pub use calculations::{DEFAULT_OVERVIEW_MAX_SIDE, THUMBNAIL_BOX, calculate_overview_dimensions};
pub use operations::{create_original, create_overview, create_thumbnail, plan_overview};
pub use params::{BoxParams, Jp2Params, Quality};
pub use raster::{RasterBuffer, RasterError};
pub use rust_backend::RustEncoder;
