//! High-level artifact operations.
//!
//! These functions combine calculations with encoder execution: they take a
//! decoded raster and settings, compute the encoding parameters, call the
//! encoder and wrap the bytes in a [`DerivedArtifact`].

use super::backend::{ArtifactEncoder, EncodeError};
use super::calculations::{THUMBNAIL_BOX, calculate_overview_dimensions};
use super::params::{BoxParams, Jp2Params};
use super::raster::RasterBuffer;
use crate::naming::derived_filename;
use crate::types::{ArtifactRole, DerivedArtifact};

/// Result type for artifact operations.
pub type Result<T> = std::result::Result<T, EncodeError>;

/// Plan the overview box without encoding anything.
pub fn plan_overview(raster: &RasterBuffer, max_side: f64) -> BoxParams {
    BoxParams::new(calculate_overview_dimensions(
        (raster.width(), raster.height()),
        max_side,
    ))
}

fn artifact(role: ArtifactRole, title: &str, bytes: Vec<u8>) -> DerivedArtifact {
    DerivedArtifact {
        role,
        bytes,
        mime_type: role.mime_type().to_string(),
        filename: derived_filename(title, role.qualifier(), role.extension()),
    }
}

/// Create the fixed-box 200×200 JPEG thumbnail.
pub fn create_thumbnail(
    encoder: &impl ArtifactEncoder,
    raster: &RasterBuffer,
    title: &str,
) -> Result<DerivedArtifact> {
    let bytes = encoder.encode_boxed(raster, &BoxParams::new(THUMBNAIL_BOX))?;
    Ok(artifact(ArtifactRole::Thumbnail, title, bytes))
}

/// Create the overview JPEG, bounded to `max_side` on the longer edge.
pub fn create_overview(
    encoder: &impl ArtifactEncoder,
    raster: &RasterBuffer,
    title: &str,
    max_side: f64,
) -> Result<DerivedArtifact> {
    let params = plan_overview(raster, max_side);
    let bytes = encoder.encode_boxed(raster, &params)?;
    Ok(artifact(ArtifactRole::Overview, title, bytes))
}

/// Create the full-resolution lossy JPEG 2000 original.
pub fn create_original(
    encoder: &impl ArtifactEncoder,
    raster: &RasterBuffer,
    title: &str,
) -> Result<DerivedArtifact> {
    let bytes = encoder.encode_lossy_jp2(raster, &Jp2Params::lowest_lossy())?;
    Ok(artifact(ArtifactRole::Original, title, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockEncoder, RecordedOp};

    fn raster(w: u32, h: u32, components: u8) -> RasterBuffer {
        RasterBuffer::new(w, h, components, vec![0; (w * h * components as u32) as usize]).unwrap()
    }

    #[test]
    fn plan_overview_uses_scaling_policy() {
        let params = plan_overview(&raster(4000, 3000, 3), 1024.0);
        assert_eq!((params.width, params.height), (1024, 768));
    }

    #[test]
    fn create_thumbnail_uses_fixed_box() {
        let encoder = MockEncoder::new();
        let thumb = create_thumbnail(&encoder, &raster(640, 480, 3), "Scene").unwrap();

        assert_eq!(thumb.role, ArtifactRole::Thumbnail);
        assert_eq!(thumb.mime_type, "image/jpeg");
        assert_eq!(thumb.bytes, b"jpeg:200x200");
        assert_eq!(
            encoder.get_operations(),
            vec![RecordedOp::Boxed {
                width: 200,
                height: 200,
                components: 3
            }]
        );
    }

    #[test]
    fn create_overview_names_and_sizes_artifact() {
        let encoder = MockEncoder::new();
        let overview =
            create_overview(&encoder, &raster(3000, 4000, 3), "My Sat Image #1!", 1024.0).unwrap();

        assert_eq!(overview.role, ArtifactRole::Overview);
        assert_eq!(overview.filename, "overview-mysatimage1.jpg");
        assert_eq!(overview.mime_type, "image/jpeg");
        assert_eq!(overview.bytes, b"jpeg:768x1024");
        assert_eq!(overview.len(), overview.bytes.len());
    }

    #[test]
    fn create_original_is_jp2() {
        let encoder = MockEncoder::new();
        let original = create_original(&encoder, &raster(10, 10, 4), "Scene 4").unwrap();

        assert_eq!(original.role, ArtifactRole::Original);
        assert_eq!(original.filename, "original-scene4.jp2");
        assert_eq!(original.mime_type, "image/jp2");
        assert!(matches!(
            &encoder.get_operations()[0],
            RecordedOp::Jp2 { components: 4, .. }
        ));
    }

    #[test]
    fn create_original_fallback_name_uses_jpg() {
        let encoder = MockEncoder::new();
        let original = create_original(&encoder, &raster(10, 10, 3), "***").unwrap();
        assert_eq!(original.filename, "original.jpg");
    }

    #[test]
    fn encoder_error_propagates() {
        let encoder = MockEncoder::failing_box((200, 200));
        let result = create_thumbnail(&encoder, &raster(10, 10, 3), "x");
        assert!(matches!(result, Err(EncodeError::Resample(_))));
    }
}
