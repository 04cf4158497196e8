//! NITF header and TRE metadata → catalog attributes.
//!
//! Parsing the NITF file header and its TREs is done elsewhere; this module
//! sees them through [`FieldSource`], a lookup from short field code
//! (`FTITLE`, `AC_MSN_ID`, ...) to the field's text.
//!
//! What gets extracted is pure data: ordered tables of [`AttributeMapping`]
//! rows in [`fields`], each pairing an attribute name with a field code, an
//! extractor and the attribute type. [`TableExtractor`] walks a table
//! generically. A row that fails (an ambiguous country mapping, a
//! non-numeric integer field) is reported on its own in
//! [`Extraction::failures`]; every other row is still extracted.
//!
//! ```
//! use std::collections::HashMap;
//! use nitf_render::metadata::{CountryCodeTable, MetadataExtractor, TableExtractor, fields};
//! use nitf_render::record::CatalogRecord;
//!
//! let countries = CountryCodeTable::from_properties("US=USA\n");
//! let header: HashMap<String, String> =
//!     HashMap::from([("FTITLE".to_string(), "Harbour pass".to_string())]);
//!
//! let extractor = TableExtractor::new(fields::HEADER_ATTRIBUTES, &countries);
//! let mut record = CatalogRecord::new("id-1", "");
//! extractor.extract(&header).apply_to(&mut record);
//!
//! assert!(record.attribute("title").is_some());
//! ```

mod country;
pub mod fields;

pub use country::{AmbiguousMappingError, CountryCodeResolver, CountryCodeTable};

use crate::record::{Attribute, AttributeValue, CatalogRecord};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error(transparent)]
    Ambiguous(#[from] AmbiguousMappingError),
    #[error("Field {field} is not an integer: {value:?}")]
    InvalidInteger { field: String, value: String },
}

/// Read access to the fields of a parsed NITF header or TRE.
pub trait FieldSource {
    fn field_value(&self, code: &str) -> Option<&str>;
}

impl FieldSource for HashMap<String, String> {
    fn field_value(&self, code: &str) -> Option<&str> {
        self.get(code).map(String::as_str)
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn field_value(&self, code: &str) -> Option<&str> {
        self.get(code).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    Text,
    Integer,
    Date,
}

/// Collaborators an extractor may consult.
pub struct ExtractContext<'a> {
    pub countries: &'a dyn CountryCodeResolver,
}

/// Turns one trimmed, non-empty field value into an attribute value.
pub type ExtractFn =
    fn(&AttributeMapping, &str, &ExtractContext<'_>) -> Result<Option<AttributeValue>, ExtractError>;

/// One row of an attribute table.
pub struct AttributeMapping {
    /// Attribute written on the record.
    pub name: &'static str,
    /// Short field code read from the [`FieldSource`].
    pub field_code: &'static str,
    pub extract: ExtractFn,
    pub attribute_type: AttributeType,
}

impl AttributeMapping {
    /// Extract this row's value from `source`.
    ///
    /// Missing and blank (all-space) fields give `Ok(None)`.
    pub fn apply(
        &self,
        source: &dyn FieldSource,
        context: &ExtractContext<'_>,
    ) -> Result<Option<AttributeValue>, ExtractError> {
        match source.field_value(self.field_code).map(str::trim) {
            Some(raw) if !raw.is_empty() => (self.extract)(self, raw, context),
            _ => Ok(None),
        }
    }
}

/// Parse a NITF date-time into a UTC timestamp.
///
/// Accepts the NITF 2.1 form `CCYYMMDDhhmmss` and the NITF 2.0 form
/// `DDhhmmssZMONYY`. Partially unknown dates (NITF 2.1 allows `-` for
/// unknown digits) and anything else give `None`.
pub fn parse_nitf_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y%m%d%H%M%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%d%H%M%SZ%b%y"))
        .ok()
        .map(|naive| naive.and_utc())
}

/// A failed table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFailure {
    pub name: &'static str,
    pub error: ExtractError,
}

/// Values extracted from one source, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub values: Vec<(&'static str, AttributeValue)>,
    pub failures: Vec<AttributeFailure>,
}

impl Extraction {
    pub fn value(&self, name: &str) -> Option<&AttributeValue> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    pub fn failure(&self, name: &str) -> Option<&ExtractError> {
        self.failures.iter().find(|f| f.name == name).map(|f| &f.error)
    }

    /// Write every extracted value onto `record`, replacing same-named
    /// attributes.
    pub fn apply_to(&self, record: &mut CatalogRecord) {
        for (name, value) in &self.values {
            record.set_attribute(Attribute::new(*name, value.clone()));
        }
    }
}

/// Produces attribute values from a parsed NITF structure.
pub trait MetadataExtractor {
    fn extract(&self, source: &dyn FieldSource) -> Extraction;
}

/// [`MetadataExtractor`] driven by an attribute table.
pub struct TableExtractor<'a> {
    table: &'static [AttributeMapping],
    context: ExtractContext<'a>,
}

impl<'a> TableExtractor<'a> {
    pub fn new(table: &'static [AttributeMapping], countries: &'a dyn CountryCodeResolver) -> Self {
        Self {
            table,
            context: ExtractContext { countries },
        }
    }
}

impl MetadataExtractor for TableExtractor<'_> {
    fn extract(&self, source: &dyn FieldSource) -> Extraction {
        let mut extraction = Extraction::default();
        for mapping in self.table {
            match mapping.apply(source, &self.context) {
                Ok(Some(value)) => extraction.values.push((mapping.name, value)),
                Ok(None) => {}
                Err(error) => {
                    debug!("Unable to extract attribute {}: {error}", mapping.name);
                    extraction.failures.push(AttributeFailure {
                        name: mapping.name,
                        error,
                    });
                }
            }
        }
        extraction
    }
}
