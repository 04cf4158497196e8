//! FIPS 10-4 → ISO 3166 alpha-3 country code lookup.
//!
//! A FIPS code can map to zero, one or several alpha-3 codes (`WE`, the West
//! Bank, has historically mapped to more than one entry). Callers that need
//! exactly one answer use [`CountryCodeResolver::resolve_single`], which turns
//! an ambiguous mapping into an error instead of picking one.

use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("FIPS code {fips:?} maps to more than one ISO 3166 alpha-3 code: {candidates:?}")]
pub struct AmbiguousMappingError {
    pub fips: String,
    pub candidates: Vec<String>,
}

/// FIPS → alpha-3 lookup.
pub trait CountryCodeResolver: Send + Sync {
    /// Every alpha-3 code `fips` maps to, in table order.
    fn resolve(&self, fips: &str) -> Vec<String>;

    /// The single alpha-3 code for `fips`.
    ///
    /// `Ok(None)` for an empty or unknown code, an error when the code maps
    /// to more than one country.
    fn resolve_single(&self, fips: &str) -> Result<Option<String>, AmbiguousMappingError> {
        if fips.is_empty() {
            return Ok(None);
        }
        let mut codes = self.resolve(fips);
        match codes.len() {
            0 => Ok(None),
            1 => Ok(codes.pop()),
            _ => Err(AmbiguousMappingError {
                fips: fips.to_string(),
                candidates: codes,
            }),
        }
    }
}

/// Immutable lookup table, built once and shared by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryCodeTable {
    codes: HashMap<String, Vec<String>>,
}

impl CountryCodeTable {
    /// Parse `FIPS=ISO3[,ISO3...]` properties text.
    ///
    /// Blank lines and lines starting with `#` or `!` are ignored, `:` is
    /// accepted as separator, whitespace around keys and codes is trimmed.
    /// A line without a separator is skipped.
    pub fn from_properties(text: &str) -> Self {
        let mut codes = HashMap::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((fips, iso)) = line.split_once(['=', ':']) else {
                debug!("Ignoring country code line {}: {line:?}", number + 1);
                continue;
            };
            let iso: Vec<String> = iso
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(str::to_string)
                .collect();
            codes.insert(fips.trim().to_string(), iso);
        }
        Self { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for CountryCodeTable {
    fn from_iter<I: IntoIterator<Item = (K, Vec<String>)>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl CountryCodeResolver for CountryCodeTable {
    fn resolve(&self, fips: &str) -> Vec<String> {
        self.codes.get(fips).cloned().unwrap_or_default()
    }
}
