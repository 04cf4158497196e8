//! NITF decoding boundary.
//!
//! Parsing NITF segments and rendering them to pixels is not done here; this
//! module defines what the pipeline expects from a decoder and the plumbing
//! around it:
//!
//! - [`ImageDecoder`]: bytes in, first renderable raster out (or nothing).
//! - [`spool`]: buffers the source stream into a [`SpooledTempFile`] (memory
//!   up to a threshold, then disk) so decoders can seek and re-read.
//! - [`SegmentDecoder`]: builds an [`ImageDecoder`] from a [`NitfParser`]
//!   that yields image segments lazily and a [`SegmentRenderer`] that turns
//!   one segment into a raster. [`first_renderable`] walks the segments and
//!   stops at the first one that renders.

use crate::imaging::RasterBuffer;
use std::io::{self, Read, Seek};
use tempfile::SpooledTempFile;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed NITF: {0}")]
    Malformed(String),
    #[error("Segment render failed: {0}")]
    Render(String),
}

/// Seekable byte source handed to decoders.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// Decodes a NITF byte stream into its first renderable image.
///
/// `Ok(None)` means the file holds no renderable image segment. Errors are
/// reserved for structurally broken input.
pub trait ImageDecoder: Sync {
    fn decode(&self, input: &mut dyn ReadSeek) -> Result<Option<RasterBuffer>, DecodeError>;
}

/// Copy `reader` into a spooled temporary buffer and rewind it.
///
/// Data stays in memory up to `threshold` bytes and rolls over to an
/// anonymous temp file beyond that. The file is removed when the returned
/// value is dropped.
pub fn spool(reader: &mut dyn Read, threshold: usize) -> io::Result<SpooledTempFile> {
    let mut spooled = SpooledTempFile::new(threshold);
    io::copy(reader, &mut spooled)?;
    spooled.rewind()?;
    Ok(spooled)
}

/// Spool `reader` and run `decoder` over the spooled copy.
///
/// The spooled copy is released before returning, on success and failure alike.
pub fn decode_spooled(
    decoder: &impl ImageDecoder,
    reader: &mut dyn Read,
    threshold: usize,
) -> Result<Option<RasterBuffer>, DecodeError> {
    let mut spooled = spool(reader, threshold)?;
    if spooled.is_rolled() {
        debug!("Spooled source exceeded {threshold} bytes, decoding from disk");
    }
    decoder.decode(&mut spooled)
}

/// Return the first segment that renders to a raster.
///
/// Segments are pulled lazily; the walk stops as soon as one renders. A
/// segment whose render fails is logged and skipped. An error yielded by the
/// segment iterator itself (the container is broken) ends the walk with that
/// error.
pub fn first_renderable<S, I, F>(segments: I, mut render: F) -> Result<Option<RasterBuffer>, DecodeError>
where
    I: IntoIterator<Item = Result<S, DecodeError>>,
    F: FnMut(S) -> Result<Option<RasterBuffer>, DecodeError>,
{
    for (index, segment) in segments.into_iter().enumerate() {
        match render(segment?) {
            Ok(Some(raster)) => return Ok(Some(raster)),
            Ok(None) => debug!("Image segment {index} is not renderable"),
            Err(e) => debug!("Unable to render image segment {index}: {e}"),
        }
    }
    Ok(None)
}

/// Lazily yields the image segments of a NITF stream.
pub trait NitfParser: Sync {
    type Segment;

    fn image_segments<'a>(
        &self,
        input: &'a mut dyn ReadSeek,
    ) -> Result<Box<dyn Iterator<Item = Result<Self::Segment, DecodeError>> + 'a>, DecodeError>;
}

/// Renders one image segment to a raster (`Ok(None)` if the segment holds no
/// displayable image, e.g. an unsupported representation).
pub trait SegmentRenderer<S>: Sync {
    fn render(&self, segment: S) -> Result<Option<RasterBuffer>, DecodeError>;
}

/// [`ImageDecoder`] composed from a segment parser and a segment renderer.
pub struct SegmentDecoder<P, R> {
    parser: P,
    renderer: R,
}

impl<P, R> SegmentDecoder<P, R> {
    pub fn new(parser: P, renderer: R) -> Self {
        Self { parser, renderer }
    }
}

impl<P, R> ImageDecoder for SegmentDecoder<P, R>
where
    P: NitfParser,
    R: SegmentRenderer<P::Segment>,
{
    fn decode(&self, input: &mut dyn ReadSeek) -> Result<Option<RasterBuffer>, DecodeError> {
        let segments = self.parser.image_segments(input)?;
        first_renderable(segments, |segment| self.renderer.render(segment))
    }
}
