//! Render configuration.
//!
//! Loads, validates and merges `config.toml`. Stock defaults are the base
//! layer; a user file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [render]
//! create_overview = true             # Produce the bounded overview JPEG
//! store_original_image = true        # Produce the lossy JPEG 2000 original
//! overview_max_side_length = 1024.0  # Longer overview edge, in pixels
//! max_source_size_mb = 120           # Larger sources are skipped
//!
//! [processing]
//! max_processes = 4                  # Parallel workers (omit for auto = CPU cores)
//! spool_threshold_bytes = 1048576    # Sources above this spill to a temp file
//! ```
//!
//! Unknown keys are rejected to catch typos early. An out-of-range
//! `overview_max_side_length` is not an error: it falls back to the default
//! when used (see [`RenderSettings::effective_overview_side`]).

use crate::imaging::DEFAULT_OVERVIEW_MAX_SIDE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Default source size ceiling in whole megabytes.
pub const DEFAULT_MAX_SOURCE_SIZE_MB: u64 = 120;
/// Default in-memory spool size before rolling over to disk.
pub const DEFAULT_SPOOL_THRESHOLD_BYTES: usize = 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Which derivatives to produce and how large.
    pub render: RenderSettings,
    /// Parallelism and buffering.
    pub processing: ProcessingConfig,
}

impl RenderConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.spool_threshold_bytes == 0 {
            return Err(ConfigError::Validation(
                "processing.spool_threshold_bytes must be non-zero".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Derivation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    pub create_overview: bool,
    pub store_original_image: bool,
    /// Upper bound on the overview's longer edge. Non-positive values are
    /// replaced by the default at use.
    pub overview_max_side_length: f64,
    /// Sources whose declared size in whole megabytes (`bytes / 1048576`,
    /// rounded down) exceeds this are skipped.
    pub max_source_size_mb: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            create_overview: true,
            store_original_image: true,
            overview_max_side_length: DEFAULT_OVERVIEW_MAX_SIDE,
            max_source_size_mb: DEFAULT_MAX_SOURCE_SIZE_MB,
        }
    }
}

impl RenderSettings {
    /// The overview bound actually used: the configured value when positive
    /// and finite, the default otherwise.
    pub fn effective_overview_side(&self) -> f64 {
        let side = self.overview_max_side_length;
        if side.is_finite() && side > 0.0 {
            side
        } else {
            debug!(
                "Invalid overview_max_side_length {side}, using {DEFAULT_OVERVIEW_MAX_SIDE}"
            );
            DEFAULT_OVERVIEW_MAX_SIDE
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
    /// Bytes of a source kept in memory before spooling to a temp file.
    pub spool_threshold_bytes: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_processes: None,
            spool_threshold_bytes: DEFAULT_SPOOL_THRESHOLD_BYTES,
        }
    }
}

/// Worker count for a request: all cores when unset, otherwise the
/// configured value capped at the core count.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Stock defaults as a `toml::Value::Table`, the base layer for merging.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(RenderConfig::default())?)
}

/// Layer `overlay` onto `base`. Nested tables merge per key; any other
/// overlay value replaces the base value outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Build a validated [`RenderConfig`] from `base` plus an optional user layer.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<RenderConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: RenderConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<RenderConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// A fully-commented stock `config.toml` with every key at its default.
pub fn stock_config_toml() -> &'static str {
    r#"# NITF Render Configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

[render]
# Produce a JPEG overview bounded on its longer edge.
create_overview = true

# Keep a lossy JPEG 2000 copy of the full-resolution image.
store_original_image = true

# Longer edge of the overview, in pixels. Smaller images are not upscaled.
# Zero or negative values fall back to 1024.
overview_max_side_length = 1024.0

# Sources larger than this many whole megabytes are not rendered.
max_source_size_mb = 120

[processing]
# Maximum parallel workers. Omit for auto (= number of CPU cores).
# Values above the core count are clamped down.
# max_processes = 4

# Sources up to this many bytes are decoded from memory; larger ones are
# spooled to a temporary file first.
spool_threshold_bytes = 1048576
"#
}
