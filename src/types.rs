//! Shared types flowing through the derivation pipeline.
//!
//! A [`SourceResource`] goes in; a [`DerivationOutcome`] holding zero or more
//! [`DerivedArtifact`]s and the per-stage [`StageFailure`]s comes out.

use std::fmt;
use std::io::{Cursor, Read};

/// MIME type of NITF source resources.
pub const NITF_MIME_TYPE: &str = "image/nitf";
/// MIME type of thumbnails and overviews.
pub const JPEG_MIME_TYPE: &str = "image/jpeg";
/// MIME type of recompressed originals.
pub const JP2_MIME_TYPE: &str = "image/jp2";

/// The three derivatives produced from one decoded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactRole {
    Thumbnail,
    Overview,
    Original,
}

impl ArtifactRole {
    /// Lowercase qualifier used in filenames and derived resource URIs.
    pub fn qualifier(self) -> &'static str {
        match self {
            Self::Thumbnail => "thumbnail",
            Self::Overview => "overview",
            Self::Original => "original",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Thumbnail | Self::Overview => JPEG_MIME_TYPE,
            Self::Original => JP2_MIME_TYPE,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Thumbnail | Self::Overview => "jpg",
            Self::Original => "jp2",
        }
    }
}

impl fmt::Display for ArtifactRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualifier())
    }
}

/// A resource handed to the pipeline: declared metadata plus a byte stream.
///
/// Size and MIME type are author-declared and only used for gating; the
/// stream is read once.
pub struct SourceResource {
    /// Identifier of the catalog record this resource belongs to.
    pub record_id: String,
    /// Human-readable title, used to name derived files.
    pub title: String,
    /// Resource name (usually the original filename).
    pub name: String,
    pub mime_type: String,
    /// Declared size in bytes; may be approximate.
    pub size_bytes: u64,
    /// Qualifier of a derived resource (`overview`, `original`), `None` for
    /// ingested sources.
    pub qualifier: Option<String>,
    reader: Box<dyn Read + Send>,
}

impl SourceResource {
    pub fn from_reader(
        record_id: impl Into<String>,
        title: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        reader: impl Read + Send + 'static,
    ) -> Self {
        let title = title.into();
        Self {
            record_id: record_id.into(),
            name: title.clone(),
            title,
            mime_type: mime_type.into(),
            size_bytes,
            qualifier: None,
            reader: Box::new(reader),
        }
    }

    /// Source backed by an in-memory buffer; the declared size is the buffer length.
    pub fn from_bytes(
        record_id: impl Into<String>,
        title: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let size = bytes.len() as u64;
        Self::from_reader(record_id, title, mime_type, size, Cursor::new(bytes))
    }

    /// Override the declared size (declared sizes need not match the stream).
    pub fn with_declared_size(mut self, size_bytes: u64) -> Self {
        self.size_bytes = size_bytes;
        self
    }

    /// Resource wrapping a produced artifact, linked to the same record.
    pub fn from_artifact(record_id: impl Into<String>, artifact: DerivedArtifact) -> Self {
        let DerivedArtifact {
            role,
            bytes,
            mime_type,
            filename,
        } = artifact;
        let mut resource = Self::from_bytes(record_id, filename.clone(), mime_type, bytes);
        resource.name = filename;
        resource.qualifier = Some(role.qualifier().to_string());
        resource
    }

    /// Mutable access to the byte stream.
    pub fn reader(&mut self) -> &mut (dyn Read + Send) {
        self.reader.as_mut()
    }
}

impl fmt::Debug for SourceResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceResource")
            .field("record_id", &self.record_id)
            .field("title", &self.title)
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .field("qualifier", &self.qualifier)
            .finish_non_exhaustive()
    }
}

/// One encoded derivative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedArtifact {
    pub role: ArtifactRole,
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub filename: String,
}

impl DerivedArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A stage that ran but produced nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub role: ArtifactRole,
    pub reason: String,
}

/// Result of one pipeline run over one source.
///
/// Thumbnail, overview and original succeed or fail independently. A run that
/// never reached the encoders (gated, undecodable) has no artifacts and no
/// failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivationOutcome {
    pub artifacts: Vec<DerivedArtifact>,
    pub failures: Vec<StageFailure>,
}

impl DerivationOutcome {
    pub fn artifact(&self, role: ArtifactRole) -> Option<&DerivedArtifact> {
        self.artifacts.iter().find(|a| a.role == role)
    }

    pub fn failure(&self, role: ArtifactRole) -> Option<&StageFailure> {
        self.failures.iter().find(|f| f.role == role)
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty() && self.failures.is_empty()
    }

    pub(crate) fn record(&mut self, role: ArtifactRole, result: Result<DerivedArtifact, String>) {
        match result {
            Ok(artifact) => self.artifacts.push(artifact),
            Err(reason) => self.failures.push(StageFailure { role, reason }),
        }
    }
}
