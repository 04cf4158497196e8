//! Derivation pipeline and batch request processing.
//!
//! Takes NITF source resources attached to catalog records and derives, per
//! source, a thumbnail, an overview and a recompressed original.
//!
//! ## Stages
//!
//! ```text
//! Gate ──► Decode ──► Thumbnail ──► Overview ──► Original ──► Done
//!  │          │           │            │            │
//!  skip       no image    failure logged, next stage still runs
//! ```
//!
//! - **Gate**: the source must exist, be `image/nitf` and declare at most
//!   `max_source_size_mb` whole megabytes. Anything else is skipped silently.
//! - **Decode**: the stream is spooled (memory, then disk past
//!   `spool_threshold_bytes`) and handed to the [`ImageDecoder`]. A decode
//!   error or a file without a renderable segment ends the run with nothing.
//! - **Thumbnail / Overview / Original**: independent stages over the same
//!   raster. A failure omits that one artifact.
//!
//! ## Batches
//!
//! [`RenderPipeline::process_request`] runs items in parallel with
//! [rayon](https://docs.rs/rayon) on a pool sized by
//! [`effective_threads`]. Each item owns its source and record, so runs
//! share nothing mutable. For every overview and original produced, a new
//! item carrying that artifact is appended to the request.

use crate::config::{RenderConfig, effective_threads};
use crate::decode::{ImageDecoder, decode_spooled};
use crate::imaging::{ArtifactEncoder, RasterBuffer, create_original, create_overview, create_thumbnail};
use crate::record::{CatalogRecord, attach_thumbnail, derived_resource_uri, register_derived};
use crate::types::{ArtifactRole, DerivationOutcome, NITF_MIME_TYPE, SourceResource};
use rayon::prelude::*;
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

const MEGABYTE: u64 = 1024 * 1024;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Unable to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a source was not rendered. Not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingResource,
    NotNitf(String),
    TooLarge { size_mb: u64, max_mb: u64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingResource => f.write_str("no resource"),
            Self::NotNitf(mime) => write!(f, "mime type {mime:?} is not {NITF_MIME_TYPE}"),
            Self::TooLarge { size_mb, max_mb } => {
                write!(f, "{size_mb} MB exceeds the {max_mb} MB limit")
            }
        }
    }
}

/// Whether `raw` names the NITF image type.
///
/// Type and subtype compare case-insensitively; parameters after `;` are
/// ignored. Anything that is not `type/subtype` does not match.
pub fn is_nitf_mime_type(raw: &str) -> bool {
    let essence = raw.split(';').next().unwrap_or_default().trim();
    let Some((kind, subtype)) = essence.split_once('/') else {
        debug!("Unable to parse mime type {raw:?}");
        return false;
    };
    matches!(
        NITF_MIME_TYPE.split_once('/'),
        Some((nitf_kind, nitf_subtype))
            if kind.trim().eq_ignore_ascii_case(nitf_kind)
                && subtype.trim().eq_ignore_ascii_case(nitf_subtype)
    )
}

/// Declared size in whole megabytes, rounded down.
pub fn size_in_megabytes(size_bytes: u64) -> u64 {
    size_bytes / MEGABYTE
}

/// Kind of request an item belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create,
    /// Update of an existing record; `previous` is its state before the update.
    Update { previous: CatalogRecord },
}

/// One unit of a processing request: a record and, optionally, the resource
/// stored for it.
#[derive(Debug)]
pub struct ProcessItem {
    pub operation: Operation,
    pub resource: Option<SourceResource>,
    pub record: CatalogRecord,
}

impl ProcessItem {
    pub fn create(resource: Option<SourceResource>, record: CatalogRecord) -> Self {
        Self {
            operation: Operation::Create,
            resource,
            record,
        }
    }

    pub fn update(
        resource: Option<SourceResource>,
        record: CatalogRecord,
        previous: CatalogRecord,
    ) -> Self {
        Self {
            operation: Operation::Update { previous },
            resource,
            record,
        }
    }
}

/// The derivation pipeline: configuration plus a decoder and an encoder.
pub struct RenderPipeline<D, E> {
    config: RenderConfig,
    decoder: D,
    encoder: E,
}

impl<D: ImageDecoder, E: ArtifactEncoder> RenderPipeline<D, E> {
    pub fn new(config: RenderConfig, decoder: D, encoder: E) -> Self {
        Self {
            config,
            decoder,
            encoder,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Decide whether a source should be rendered.
    pub fn gate(&self, resource: Option<&SourceResource>) -> Result<(), SkipReason> {
        let resource = resource.ok_or(SkipReason::MissingResource)?;
        if !is_nitf_mime_type(&resource.mime_type) {
            return Err(SkipReason::NotNitf(resource.mime_type.clone()));
        }
        let size_mb = size_in_megabytes(resource.size_bytes);
        let max_mb = self.config.render.max_source_size_mb;
        if size_mb > max_mb {
            return Err(SkipReason::TooLarge { size_mb, max_mb });
        }
        Ok(())
    }

    /// Run one source through every stage.
    ///
    /// Never fails: skipped and undecodable sources give an empty outcome,
    /// failed stages are listed in [`DerivationOutcome::failures`].
    pub fn derive(&self, resource: &mut SourceResource) -> DerivationOutcome {
        if let Err(reason) = self.gate(Some(&*resource)) {
            debug!("Skipping resource {}: {reason}", resource.name);
            return DerivationOutcome::default();
        }

        let threshold = self.config.processing.spool_threshold_bytes;
        match decode_spooled(&self.decoder, resource.reader(), threshold) {
            Ok(Some(raster)) => self.derive_from_raster(&raster, &resource.title),
            Ok(None) => {
                debug!("No renderable image in NITF {}", resource.name);
                DerivationOutcome::default()
            }
            Err(e) => {
                debug!("Unable to render image from NITF {}: {e}", resource.name);
                DerivationOutcome::default()
            }
        }
    }

    /// Run the encode stages over an already decoded raster.
    pub fn derive_from_raster(&self, raster: &RasterBuffer, title: &str) -> DerivationOutcome {
        let render = &self.config.render;
        let mut outcome = DerivationOutcome::default();

        let thumbnail = create_thumbnail(&self.encoder, raster, title);
        outcome.record(ArtifactRole::Thumbnail, stage_result(ArtifactRole::Thumbnail, thumbnail));

        if render.create_overview {
            let side = render.effective_overview_side();
            let overview = create_overview(&self.encoder, raster, title, side);
            outcome.record(ArtifactRole::Overview, stage_result(ArtifactRole::Overview, overview));
        }

        if render.store_original_image {
            let original = create_original(&self.encoder, raster, title);
            outcome.record(ArtifactRole::Original, stage_result(ArtifactRole::Original, original));
        }

        outcome
    }

    /// Process one item, returning it followed by any derived items.
    pub fn process_item(&self, mut item: ProcessItem) -> Vec<ProcessItem> {
        let outcome = match item.resource.as_mut() {
            Some(resource) => self.derive(resource),
            None => {
                debug!("Skipping record {}: {}", item.record.id, SkipReason::MissingResource);
                DerivationOutcome::default()
            }
        };

        let DerivationOutcome { artifacts, .. } = outcome;
        let mut derived = Vec::new();
        for artifact in artifacts {
            match artifact.role {
                ArtifactRole::Thumbnail => {
                    if !artifact.is_empty() {
                        attach_thumbnail(&mut item.record, artifact.bytes);
                    }
                }
                ArtifactRole::Overview | ArtifactRole::Original => {
                    let uri = derived_resource_uri(&item.record.id, artifact.role.qualifier());
                    register_derived(&mut item.record, &uri);
                    trace!(
                        "Successfully rendered and stored {} image for NITF with id={}",
                        artifact.role,
                        item.record.id
                    );
                    derived.push(SourceResource::from_artifact(item.record.id.clone(), artifact));
                }
            }
        }

        let derived_items: Vec<ProcessItem> = derived
            .into_iter()
            .map(|resource| ProcessItem {
                operation: item.operation.clone(),
                resource: Some(resource),
                record: item.record.clone(),
            })
            .collect();

        let mut items = Vec::with_capacity(1 + derived_items.len());
        items.push(item);
        items.extend(derived_items);
        items
    }

    /// Process a whole request in parallel.
    ///
    /// The returned list holds the input items in their original order
    /// (records updated), followed by the derived items in the same order.
    pub fn process_request(&self, items: Vec<ProcessItem>) -> Result<Vec<ProcessItem>, ProcessError> {
        let threads = effective_threads(&self.config.processing);
        let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

        let processed: Vec<Vec<ProcessItem>> =
            pool.install(|| items.into_par_iter().map(|item| self.process_item(item)).collect());

        let mut originals = Vec::with_capacity(processed.len());
        let mut derived = Vec::new();
        for group in processed {
            let mut group = group.into_iter();
            originals.extend(group.next());
            derived.extend(group);
        }
        originals.extend(derived);
        Ok(originals)
    }
}

fn stage_result<T, E: fmt::Display>(role: ArtifactRole, result: Result<T, E>) -> Result<T, String> {
    result.map_err(|e| {
        debug!("Unable to generate {role} image from NITF: {e}");
        e.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{DecodeError, ReadSeek};
    use crate::imaging::backend::tests::{MockEncoder, RecordedOp};
    use crate::record::DERIVED_RESOURCE_URI;
    use std::io::Read;
    use std::sync::Mutex;

    /// Decoder returning a fixed result and recording the bytes it saw.
    struct ScriptedDecoder {
        result: fn() -> Result<Option<RasterBuffer>, DecodeError>,
        seen: Mutex<Vec<Vec<u8>>>,
    }

    impl ScriptedDecoder {
        fn new(result: fn() -> Result<Option<RasterBuffer>, DecodeError>) -> Self {
            Self {
                result,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl ImageDecoder for ScriptedDecoder {
        fn decode(&self, input: &mut dyn ReadSeek) -> Result<Option<RasterBuffer>, DecodeError> {
            let mut bytes = Vec::new();
            input.read_to_end(&mut bytes)?;
            self.seen.lock().unwrap().push(bytes);
            (self.result)()
        }
    }

    fn landscape() -> Result<Option<RasterBuffer>, DecodeError> {
        Ok(Some(RasterBuffer::new(400, 300, 3, vec![0; 400 * 300 * 3]).unwrap()))
    }

    fn no_image() -> Result<Option<RasterBuffer>, DecodeError> {
        Ok(None)
    }

    fn malformed() -> Result<Option<RasterBuffer>, DecodeError> {
        Err(DecodeError::Malformed("bad header".into()))
    }

    fn pipeline(
        config: RenderConfig,
        decoder: ScriptedDecoder,
        encoder: MockEncoder,
    ) -> RenderPipeline<ScriptedDecoder, MockEncoder> {
        RenderPipeline::new(config, decoder, encoder)
    }

    fn nitf(title: &str) -> SourceResource {
        SourceResource::from_bytes("rec-1", title, NITF_MIME_TYPE, b"NITF02.10".to_vec())
    }

    // =========================================================================
    // MIME / size gating tests
    // =========================================================================

    #[test]
    fn nitf_mime_matching() {
        assert!(is_nitf_mime_type("image/nitf"));
        assert!(is_nitf_mime_type("IMAGE/NITF"));
        assert!(is_nitf_mime_type("image/nitf; version=2.1"));
        assert!(!is_nitf_mime_type("image/jpeg"));
        assert!(!is_nitf_mime_type("application/nitf"));
        assert!(!is_nitf_mime_type("nitf"));
        assert!(!is_nitf_mime_type(""));
    }

    #[test]
    fn size_uses_whole_megabytes() {
        assert_eq!(size_in_megabytes(MEGABYTE - 1), 0);
        assert_eq!(size_in_megabytes(121 * MEGABYTE - 1), 120);
        assert_eq!(size_in_megabytes(121 * MEGABYTE), 121);
    }

    #[test]
    fn gate_rejects_missing_resource() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(landscape), MockEncoder::new());
        assert_eq!(p.gate(None), Err(SkipReason::MissingResource));
    }

    #[test]
    fn gate_size_boundary() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(landscape), MockEncoder::new());

        let just_under = nitf("a").with_declared_size(121 * MEGABYTE - 1);
        assert_eq!(p.gate(Some(&just_under)), Ok(()));

        let over = nitf("a").with_declared_size(121 * MEGABYTE);
        assert_eq!(
            p.gate(Some(&over)),
            Err(SkipReason::TooLarge {
                size_mb: 121,
                max_mb: 120
            })
        );
    }

    #[test]
    fn non_nitf_source_produces_nothing() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(landscape), MockEncoder::new());
        let resource = SourceResource::from_bytes("rec-1", "photo", "image/jpeg", vec![1, 2, 3]);
        let record = CatalogRecord::new("rec-1", "photo");

        let items = p.process_item(ProcessItem::create(Some(resource), record.clone()));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].record, record);
        assert_eq!(p.decoder.calls(), 0);
        assert!(p.encoder.get_operations().is_empty());
    }

    #[test]
    fn oversized_source_is_not_decoded() {
        let mut config = RenderConfig::default();
        config.render.max_source_size_mb = 1;
        let p = pipeline(config, ScriptedDecoder::new(landscape), MockEncoder::new());
        let mut resource = nitf("big").with_declared_size(2 * MEGABYTE);

        assert!(p.derive(&mut resource).is_empty());
        assert_eq!(p.decoder.calls(), 0);
    }

    // =========================================================================
    // derive tests
    // =========================================================================

    #[test]
    fn derive_produces_all_three_artifacts() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(landscape), MockEncoder::new());
        let mut resource = nitf("Pass 7");

        let outcome = p.derive(&mut resource);

        assert!(outcome.failures.is_empty());
        let roles: Vec<_> = outcome.artifacts.iter().map(|a| a.role).collect();
        assert_eq!(
            roles,
            vec![ArtifactRole::Thumbnail, ArtifactRole::Overview, ArtifactRole::Original]
        );
        assert_eq!(
            outcome.artifact(ArtifactRole::Overview).unwrap().filename,
            "overview-pass7.jpg"
        );
        assert_eq!(
            outcome.artifact(ArtifactRole::Original).unwrap().filename,
            "original-pass7.jp2"
        );
    }

    #[test]
    fn decoder_sees_full_source_bytes() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(no_image), MockEncoder::new());
        let mut resource = nitf("x");
        p.derive(&mut resource);
        assert_eq!(p.decoder.seen.lock().unwrap()[0], b"NITF02.10");
    }

    #[test]
    fn decode_error_yields_empty_outcome() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(malformed), MockEncoder::new());
        let outcome = p.derive(&mut nitf("x"));
        assert!(outcome.is_empty());
        assert!(p.encoder.get_operations().is_empty());
    }

    #[test]
    fn no_image_yields_empty_outcome() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(no_image), MockEncoder::new());
        assert!(p.derive(&mut nitf("x")).is_empty());
    }

    #[test]
    fn overview_uses_configured_side() {
        let mut config = RenderConfig::default();
        config.render.overview_max_side_length = 100.0;
        let p = pipeline(config, ScriptedDecoder::new(landscape), MockEncoder::new());

        p.derive(&mut nitf("x"));

        assert!(p.encoder.get_operations().contains(&RecordedOp::Boxed {
            width: 100,
            height: 75,
            components: 3
        }));
    }

    #[test]
    fn invalid_overview_side_falls_back_to_default() {
        let mut config = RenderConfig::default();
        config.render.overview_max_side_length = 0.0;
        let p = pipeline(config, ScriptedDecoder::new(landscape), MockEncoder::new());

        p.derive(&mut nitf("x"));

        // 400x300 fits inside 1024, so the overview keeps the source size
        assert!(p.encoder.get_operations().contains(&RecordedOp::Boxed {
            width: 400,
            height: 300,
            components: 3
        }));
    }

    #[test]
    fn disabling_overview_keeps_other_stages() {
        let mut config = RenderConfig::default();
        config.render.create_overview = false;
        let p = pipeline(config, ScriptedDecoder::new(landscape), MockEncoder::new());

        let outcome = p.derive(&mut nitf("x"));

        assert!(outcome.artifact(ArtifactRole::Thumbnail).is_some());
        assert!(outcome.artifact(ArtifactRole::Overview).is_none());
        assert!(outcome.artifact(ArtifactRole::Original).is_some());
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn disabling_original_keeps_other_stages() {
        let mut config = RenderConfig::default();
        config.render.store_original_image = false;
        let p = pipeline(config, ScriptedDecoder::new(landscape), MockEncoder::new());

        let outcome = p.derive(&mut nitf("x"));

        assert_eq!(outcome.artifacts.len(), 2);
        assert!(outcome.artifact(ArtifactRole::Original).is_none());
    }

    #[test]
    fn thumbnail_failure_does_not_block_siblings() {
        let encoder = MockEncoder::failing_box((200, 200));
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(landscape), encoder);

        let outcome = p.derive(&mut nitf("x"));

        assert!(outcome.artifact(ArtifactRole::Thumbnail).is_none());
        assert!(outcome.failure(ArtifactRole::Thumbnail).is_some());
        assert!(outcome.artifact(ArtifactRole::Overview).is_some());
        assert!(outcome.artifact(ArtifactRole::Original).is_some());
    }

    #[test]
    fn overview_failure_does_not_block_original() {
        let encoder = MockEncoder::failing_box((400, 300));
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(landscape), encoder);

        let outcome = p.derive(&mut nitf("x"));

        assert!(outcome.failure(ArtifactRole::Overview).is_some());
        assert!(outcome.artifact(ArtifactRole::Thumbnail).is_some());
        assert!(outcome.artifact(ArtifactRole::Original).is_some());
    }

    #[test]
    fn original_failure_is_isolated() {
        let p = pipeline(
            RenderConfig::default(),
            ScriptedDecoder::new(landscape),
            MockEncoder::failing_jp2(),
        );

        let outcome = p.derive(&mut nitf("x"));

        assert_eq!(outcome.artifacts.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].role, ArtifactRole::Original);
    }

    // =========================================================================
    // process_item / process_request tests
    // =========================================================================

    #[test]
    fn process_item_attaches_and_appends_derived_items() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(landscape), MockEncoder::new());
        let record = CatalogRecord::new("rec-1", "Pass 7");

        let items = p.process_item(ProcessItem::create(Some(nitf("Pass 7")), record));

        assert_eq!(items.len(), 3);
        let source = &items[0];
        assert_eq!(source.record.thumbnail(), Some(&b"jpeg:200x200"[..]));
        assert_eq!(
            source.record.derived_resource_uris(),
            vec!["content:rec-1#overview", "content:rec-1#original"]
        );

        let overview = items[1].resource.as_ref().unwrap();
        assert_eq!(overview.qualifier.as_deref(), Some("overview"));
        assert_eq!(overview.name, "overview-pass7.jpg");
        assert_eq!(overview.mime_type, "image/jpeg");
        assert_eq!(overview.record_id, "rec-1");

        let original = items[2].resource.as_ref().unwrap();
        assert_eq!(original.qualifier.as_deref(), Some("original"));
        assert_eq!(original.mime_type, "image/jp2");
        assert_eq!(original.size_bytes, 3);

        for item in &items {
            assert_eq!(item.operation, Operation::Create);
            assert_eq!(item.record, source.record);
        }
    }

    #[test]
    fn update_items_keep_previous_record() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(landscape), MockEncoder::new());
        let previous = CatalogRecord::new("rec-1", "old");
        let item = ProcessItem::update(
            Some(nitf("new")),
            CatalogRecord::new("rec-1", "new"),
            previous.clone(),
        );

        let items = p.process_item(item);

        assert_eq!(items.len(), 3);
        for item in &items {
            assert_eq!(
                item.operation,
                Operation::Update {
                    previous: previous.clone()
                }
            );
        }
    }

    #[test]
    fn failed_stage_registers_no_uri() {
        let p = pipeline(
            RenderConfig::default(),
            ScriptedDecoder::new(landscape),
            MockEncoder::failing_jp2(),
        );

        let items = p.process_item(ProcessItem::create(
            Some(nitf("x")),
            CatalogRecord::new("rec-1", "x"),
        ));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].record.derived_resource_uris(), vec!["content:rec-1#overview"]);
    }

    #[test]
    fn decode_failure_leaves_record_untouched() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(malformed), MockEncoder::new());
        let record = CatalogRecord::new("rec-1", "x");

        let items = p.process_item(ProcessItem::create(Some(nitf("x")), record.clone()));

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].record, record);
        assert!(items[0].record.attribute(DERIVED_RESOURCE_URI).is_none());
    }

    #[test]
    fn process_request_continues_past_skipped_items() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(landscape), MockEncoder::new());
        let items = vec![
            ProcessItem::create(None, CatalogRecord::new("a", "a")),
            ProcessItem::create(
                Some(SourceResource::from_bytes("b", "b", "text/plain", vec![1])),
                CatalogRecord::new("b", "b"),
            ),
            ProcessItem::create(Some(nitf("c")), CatalogRecord::new("c", "c")),
        ];

        let out = p.process_request(items).unwrap();

        let ids: Vec<_> = out.iter().map(|i| i.record.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "c", "c"]);
        assert!(out[0].record.thumbnail().is_none());
        assert!(out[1].record.thumbnail().is_none());
        assert!(out[2].record.thumbnail().is_some());
        assert_eq!(
            out[3].resource.as_ref().unwrap().qualifier.as_deref(),
            Some("overview")
        );
        assert_eq!(
            out[4].resource.as_ref().unwrap().qualifier.as_deref(),
            Some("original")
        );
    }

    #[test]
    fn process_request_preserves_input_order() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(no_image), MockEncoder::new());
        let items: Vec<_> = (0..20)
            .map(|i| {
                let id = format!("rec-{i}");
                ProcessItem::create(Some(nitf("x")), CatalogRecord::new(id, "x"))
            })
            .collect();

        let out = p.process_request(items).unwrap();

        let ids: Vec<_> = out.iter().map(|i| i.record.id.clone()).collect();
        let expected: Vec<_> = (0..20).map(|i| format!("rec-{i}")).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn derived_resource_is_readable() {
        let p = pipeline(RenderConfig::default(), ScriptedDecoder::new(landscape), MockEncoder::new());
        let mut items = p.process_item(ProcessItem::create(
            Some(nitf("x")),
            CatalogRecord::new("rec-1", "x"),
        ));

        let mut bytes = Vec::new();
        items[1]
            .resource
            .as_mut()
            .unwrap()
            .reader()
            .read_to_end(&mut bytes)
            .unwrap();
        assert_eq!(bytes, b"jpeg:400x300");
    }
}
