//! Catalog record model and the two mutations the pipeline performs on it.
//!
//! A record is a bag of named, multi-valued attributes. The pipeline only
//! ever touches two of them:
//!
//! | Attribute | Shape | Mutation |
//! |---|---|---|
//! | [`THUMBNAIL`] | single binary value | [`attach_thumbnail`] overwrites |
//! | [`DERIVED_RESOURCE_URI`] | ordered list of URIs | [`register_derived`] appends |
//!
//! Metadata extraction (see [`crate::metadata`]) writes further attributes
//! through [`CatalogRecord::set_attribute`].

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Attribute holding the record's thumbnail JPEG.
pub const THUMBNAIL: &str = "thumbnail";
/// Attribute accumulating URIs of resources derived from the record's source.
pub const DERIVED_RESOURCE_URI: &str = "resource.derived-uri";

/// One attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Date(DateTime<Utc>),
    Binary(Vec<u8>),
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }
}

/// A named attribute with one or more values, in insertion order.
///
/// Single- and multi-valued attributes share this shape: a single value is a
/// list of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    values: Vec<AttributeValue>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            values: vec![value],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// First value.
    pub fn value(&self) -> Option<&AttributeValue> {
        self.values.first()
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn add_value(&mut self, value: AttributeValue) {
        self.values.push(value);
    }
}

/// The catalog entry being enriched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    pub id: String,
    pub title: String,
    attributes: BTreeMap<String, Attribute>,
}

impl CatalogRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Set an attribute, replacing any attribute of the same name.
    pub fn set_attribute(&mut self, attribute: Attribute) {
        self.attributes.insert(attribute.name.clone(), attribute);
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.attribute(THUMBNAIL)
            .and_then(Attribute::value)
            .and_then(AttributeValue::as_binary)
    }

    /// Derived resource URIs in registration order.
    pub fn derived_resource_uris(&self) -> Vec<&str> {
        self.attribute(DERIVED_RESOURCE_URI)
            .map(|a| a.values().iter().filter_map(AttributeValue::as_text).collect())
            .unwrap_or_default()
    }
}

/// URI under which a derived resource of `record_id` is stored.
pub fn derived_resource_uri(record_id: &str, qualifier: &str) -> String {
    format!("content:{record_id}#{qualifier}")
}

/// Set the record's thumbnail, overwriting any previous one.
pub fn attach_thumbnail(record: &mut CatalogRecord, bytes: Vec<u8>) {
    record.set_attribute(Attribute::new(THUMBNAIL, AttributeValue::Binary(bytes)));
}

/// Append `uri` to the record's derived resource URIs.
///
/// The first registration creates the attribute with a single value; later
/// ones append, keeping earlier values and their order.
pub fn register_derived(record: &mut CatalogRecord, uri: &str) {
    let value = AttributeValue::Text(uri.to_string());
    let attribute = match record.attribute(DERIVED_RESOURCE_URI) {
        Some(existing) => {
            let mut updated = existing.clone();
            updated.add_value(value);
            updated
        }
        None => Attribute::new(DERIVED_RESOURCE_URI, value),
    };
    record.set_attribute(attribute);
}
