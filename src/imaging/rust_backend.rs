//! Production encoder: `image` crate for JPEG, OpenJPEG for JPEG 2000.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Resample to box | `image::DynamicImage::resize_to_fill` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (baseline, RGB8) |
//! | Alpha flattening | [`RasterBuffer::to_rgb_pixels`] (alpha dropped) |
//! | Encode → JP2 | `openjpeg-sys` (`opj_create_compress(OPJ_CODEC_JP2)`) into an in-memory sink |

use super::backend::{ArtifactEncoder, EncodeError};
use super::params::{BoxParams, Jp2Params, Quality};
use super::raster::RasterBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use openjpeg_sys as opj;
use std::ffi::{CStr, c_char, c_void};
use std::io::{Cursor, Write};
use tracing::{debug, warn};

/// Internal buffer size handed to `opj_stream_create`.
const STREAM_CHUNK_SIZE: usize = 1 << 20;

/// Encoder backed by the `image` crate and OpenJPEG.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustEncoder {
    quality: Quality,
}

impl RustEncoder {
    pub fn new() -> Self {
        Self::with_quality(Quality::default())
    }

    pub fn with_quality(quality: Quality) -> Self {
        Self { quality }
    }
}

impl Default for RustEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode an RGB buffer as a baseline JPEG into memory.
fn encode_jpeg(img: &RgbImage, quality: Quality) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.value())
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::Compression(format!("JPEG encode failed: {e}")))?;
    Ok(out)
}

// -----------------------------------------------------------------------------
// OpenJPEG handles. Each owns one C object and releases it on drop, so every
// early return below cleans up.
// -----------------------------------------------------------------------------

struct ImageHandle(*mut opj::opj_image_t);

impl Drop for ImageHandle {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { opj::opj_image_destroy(self.0) };
        }
    }
}

struct CodecHandle(*mut opj::opj_codec_t);

impl Drop for CodecHandle {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { opj::opj_destroy_codec(self.0) };
        }
    }
}

struct StreamHandle(*mut opj::opj_stream_t);

impl Drop for StreamHandle {
    fn drop(&mut self) {
        if !self.0.is_null() {
            unsafe { opj::opj_stream_destroy(self.0) };
        }
    }
}

// -----------------------------------------------------------------------------
// Output stream callbacks. `user` is always the `Cursor<Vec<u8>>` registered in
// `encode_jp2`, which outlives the stream.
// -----------------------------------------------------------------------------

unsafe extern "C" fn sink_write(
    buffer: *mut c_void,
    len: opj::OPJ_SIZE_T,
    user: *mut c_void,
) -> opj::OPJ_SIZE_T {
    let sink = unsafe { &mut *(user as *mut Cursor<Vec<u8>>) };
    let bytes = unsafe { std::slice::from_raw_parts(buffer as *const u8, len as usize) };
    match sink.write_all(bytes) {
        Ok(()) => len,
        Err(_) => opj::OPJ_SIZE_T::MAX,
    }
}

unsafe extern "C" fn sink_skip(offset: opj::OPJ_OFF_T, user: *mut c_void) -> opj::OPJ_OFF_T {
    let sink = unsafe { &mut *(user as *mut Cursor<Vec<u8>>) };
    let target = sink.position() as i64 + offset as i64;
    if target < 0 {
        return -1;
    }
    // Skipping past the end is fine: the next write zero-fills the gap.
    sink.set_position(target as u64);
    offset
}

unsafe extern "C" fn sink_seek(offset: opj::OPJ_OFF_T, user: *mut c_void) -> opj::OPJ_BOOL {
    let sink = unsafe { &mut *(user as *mut Cursor<Vec<u8>>) };
    if offset < 0 {
        return 0;
    }
    sink.set_position(offset as u64);
    1
}

unsafe fn codec_message(msg: *const c_char) -> Option<String> {
    if msg.is_null() {
        return None;
    }
    let text = unsafe { CStr::from_ptr(msg) }.to_string_lossy();
    Some(text.trim_end().to_string())
}

// Codec errors also fail the encode call with an `EncodeError`.
unsafe extern "C" fn log_codec_error(msg: *const c_char, _client: *mut c_void) {
    if let Some(text) = unsafe { codec_message(msg) } {
        debug!("openjpeg: {text}");
    }
}

unsafe extern "C" fn log_codec_warning(msg: *const c_char, _client: *mut c_void) {
    if let Some(text) = unsafe { codec_message(msg) } {
        warn!("openjpeg: {text}");
    }
}

/// Encode interleaved RGB8 samples as a lossy JP2 file.
fn encode_jp2(rgb: &[u8], width: u32, height: u32, params: &Jp2Params) -> Result<Vec<u8>, EncodeError> {
    const COMPONENTS: usize = 3;
    let pixel_count = width as usize * height as usize;
    if rgb.len() != pixel_count * COMPONENTS {
        return Err(EncodeError::Compression(format!(
            "RGB buffer holds {} bytes, expected {}",
            rgb.len(),
            pixel_count * COMPONENTS
        )));
    }

    unsafe {
        let mut cparams: opj::opj_cparameters_t = std::mem::zeroed();
        opj::opj_set_default_encoder_parameters(&mut cparams);
        cparams.tcp_numlayers = 1;
        cparams.tcp_rates[0] = params.compression_ratio;
        cparams.cp_disto_alloc = 1;
        cparams.irreversible = 1;
        cparams.tcp_mct = 1;
        cparams.numresolution = params.resolutions_for(width.min(height)) as _;

        let mut comp_params: [opj::opj_image_cmptparm_t; COMPONENTS] = std::mem::zeroed();
        for cp in comp_params.iter_mut() {
            cp.dx = 1;
            cp.dy = 1;
            cp.w = width;
            cp.h = height;
            cp.prec = 8;
            cp.sgnd = 0;
        }

        let image = ImageHandle(opj::opj_image_create(
            COMPONENTS as _,
            comp_params.as_mut_ptr(),
            opj::OPJ_COLOR_SPACE::OPJ_CLRSPC_SRGB,
        ));
        if image.0.is_null() {
            return Err(EncodeError::Compression("opj_image_create failed".into()));
        }
        (*image.0).x0 = 0;
        (*image.0).y0 = 0;
        (*image.0).x1 = width;
        (*image.0).y1 = height;

        // De-interleave into one plane per component
        for c in 0..COMPONENTS {
            let comp = &mut *(*image.0).comps.add(c);
            let plane = std::slice::from_raw_parts_mut(comp.data, pixel_count);
            for (sample, px) in plane.iter_mut().zip(rgb.chunks_exact(COMPONENTS)) {
                *sample = px[c] as _;
            }
        }

        let codec = CodecHandle(opj::opj_create_compress(opj::OPJ_CODEC_FORMAT::OPJ_CODEC_JP2));
        if codec.0.is_null() {
            return Err(EncodeError::Compression("opj_create_compress failed".into()));
        }
        opj::opj_set_error_handler(codec.0, Some(log_codec_error), std::ptr::null_mut());
        opj::opj_set_warning_handler(codec.0, Some(log_codec_warning), std::ptr::null_mut());

        if opj::opj_setup_encoder(codec.0, &mut cparams, image.0) == 0 {
            return Err(EncodeError::Compression("opj_setup_encoder rejected parameters".into()));
        }

        let mut sink = Cursor::new(Vec::new());
        let stream = StreamHandle(opj::opj_stream_create(STREAM_CHUNK_SIZE as _, 0));
        if stream.0.is_null() {
            return Err(EncodeError::Compression("opj_stream_create failed".into()));
        }
        opj::opj_stream_set_user_data(
            stream.0,
            &mut sink as *mut Cursor<Vec<u8>> as *mut c_void,
            None,
        );
        opj::opj_stream_set_write_function(stream.0, Some(sink_write));
        opj::opj_stream_set_skip_function(stream.0, Some(sink_skip));
        opj::opj_stream_set_seek_function(stream.0, Some(sink_seek));

        let encoded = opj::opj_start_compress(codec.0, image.0, stream.0) != 0
            && opj::opj_encode(codec.0, stream.0) != 0
            && opj::opj_end_compress(codec.0, stream.0) != 0;

        // Release the stream before taking the sink back
        drop(stream);

        if !encoded {
            return Err(EncodeError::Compression("JPEG 2000 encode failed".into()));
        }
        Ok(sink.into_inner())
    }
}

impl ArtifactEncoder for RustEncoder {
    fn encode_boxed(&self, raster: &RasterBuffer, params: &BoxParams) -> Result<Vec<u8>, EncodeError> {
        if params.width == 0 || params.height == 0 {
            return Err(EncodeError::InvalidBox {
                width: params.width,
                height: params.height,
            });
        }

        // Fill-resize then center-crop to exact dimensions
        let filled = raster
            .to_dynamic()
            .resize_to_fill(params.width, params.height, FilterType::Lanczos3);
        let rgb = filled.to_rgb8();
        if rgb.dimensions() != (params.width, params.height) {
            return Err(EncodeError::Resample(format!(
                "resampled to {}x{}, expected {}x{}",
                rgb.width(),
                rgb.height(),
                params.width,
                params.height
            )));
        }

        encode_jpeg(&rgb, self.quality)
    }

    fn encode_lossy_jp2(&self, raster: &RasterBuffer, params: &Jp2Params) -> Result<Vec<u8>, EncodeError> {
        let rgb = raster.to_rgb_pixels();
        encode_jp2(&rgb, raster.width(), raster.height(), params)
    }
}
