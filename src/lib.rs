//! # NITF Render
//!
//! Post-processing for NITF imagery ingested into a catalog. For each NITF
//! source the first renderable image segment is decoded once and three
//! derivatives are produced from it:
//!
//! ```text
//!                            ┌──► thumbnail  200×200 JPEG   → record attribute
//! source ─► gate ─► decode ──┼──► overview   ≤1024px JPEG   → derived resource
//!                            └──► original   lossy JPEG2000 → derived resource
//! ```
//!
//! Each derivative succeeds or fails on its own. A source that cannot be
//! decoded, or that is not NITF, or that is too large, simply produces
//! nothing; the batch carries on.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`process`] | Gate, decode, per-stage isolation, batch requests |
//! | [`decode`] | The decoder boundary, spooling, first-renderable segment walk |
//! | [`imaging`] | Raster buffer, overview sizing, JPEG and JPEG 2000 encoding |
//! | [`naming`] | Derived filenames from record titles |
//! | [`record`] | Catalog record attributes: thumbnail, derived resource URIs |
//! | [`metadata`] | NITF header / TRE fields → attributes, FIPS → ISO 3166 lookup |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`types`] | Source resources, artifacts and outcomes shared between modules |
//!
//! # Design Decisions
//!
//! ## Decoding Is Pluggable
//!
//! NITF parsing is not part of this crate. The pipeline talks to an
//! [`decode::ImageDecoder`]; [`decode::SegmentDecoder`] assembles one from a
//! segment parser and a segment renderer. Sources are spooled before decode
//! so parsers can seek freely regardless of where the bytes came from.
//!
//! ## Encoders Behind a Trait
//!
//! Encoding goes through [`imaging::ArtifactEncoder`]. The production
//! [`imaging::RustEncoder`] uses the `image` crate for Lanczos3 resampling and
//! JPEG, and OpenJPEG for JPEG 2000. Tests swap in a recording mock, so
//! pipeline logic is exercised without encoding pixels.
//!
//! ## Logging
//!
//! The crate logs through `tracing` and never installs a subscriber. Skips
//! and stage failures are `debug`, stored artifacts are `trace`.

pub mod config;
pub mod decode;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod process;
pub mod record;
pub mod types;
