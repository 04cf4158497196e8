//! In-memory decoded raster.
//!
//! A [`RasterBuffer`] is what the decoder hands to the encoders: interleaved
//! 8-bit samples, either RGB (3 components) or RGBA (4 components). The
//! dimension and component invariants are enforced at construction so every
//! downstream operation can rely on them.

use image::{DynamicImage, RgbImage, RgbaImage};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RasterError {
    #[error("raster dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("unsupported component count {0} (expected 3 or 4)")]
    UnsupportedComponents(u8),
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Decoded image: dimensions, component count and interleaved pixel data.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    components: u8,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Build a raster, checking `width > 0`, `height > 0`, `components ∈ {3, 4}`
    /// and that `pixels` holds exactly `width * height * components` bytes.
    pub fn new(width: u32, height: u32, components: u8, pixels: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyDimensions { width, height });
        }
        if components != 3 && components != 4 {
            return Err(RasterError::UnsupportedComponents(components));
        }
        let expected = width as usize * height as usize * components as usize;
        if pixels.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            components,
            pixels,
        })
    }

    /// Wrap an already-decoded `image` crate buffer.
    ///
    /// Anything that is not 8-bit RGB or RGBA is converted: images carrying an
    /// alpha channel become RGBA, everything else RGB.
    pub fn from_dynamic(img: DynamicImage) -> Result<Self, RasterError> {
        let (width, height) = (img.width(), img.height());
        match img {
            DynamicImage::ImageRgb8(rgb) => Self::new(width, height, 3, rgb.into_raw()),
            DynamicImage::ImageRgba8(rgba) => Self::new(width, height, 4, rgba.into_raw()),
            other if other.color().has_alpha() => Self::new(width, height, 4, other.to_rgba8().into_raw()),
            other => Self::new(width, height, 3, other.to_rgb8().into_raw()),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn components(&self) -> u8 {
        self.components
    }

    pub fn has_alpha(&self) -> bool {
        self.components == 4
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB copy of the pixel data. Alpha is discarded, not blended.
    pub fn to_rgb_pixels(&self) -> Vec<u8> {
        if !self.has_alpha() {
            return self.pixels.clone();
        }
        self.pixels
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect()
    }

    /// Copy into an `image` crate buffer for resampling.
    pub fn to_dynamic(&self) -> DynamicImage {
        // Dimensions and buffer length were validated in `new`, so `from_raw`
        // cannot fail; fall back to an empty image rather than panic.
        if self.has_alpha() {
            RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
                .map(DynamicImage::ImageRgba8)
                .unwrap_or_else(|| DynamicImage::new_rgba8(self.width, self.height))
        } else {
            RgbImage::from_raw(self.width, self.height, self.pixels.clone())
                .map(DynamicImage::ImageRgb8)
                .unwrap_or_else(|| DynamicImage::new_rgb8(self.width, self.height))
        }
    }
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("components", &self.components)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}
