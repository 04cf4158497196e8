//! Attribute tables for the NITF file header and the TREs we map.
//!
//! Rows are extracted in order. Where a field feeds a shared taxonomy
//! attribute (`title`, `security.classification`, ...) it appears twice: once
//! under the taxonomy name and once under its `ext.nitf.` name.

use super::{AttributeMapping, AttributeType, ExtractContext, ExtractError, parse_nitf_date};
use crate::record::AttributeValue;

const EXT: &str = "ext.nitf.";

macro_rules! ext {
    ($name:literal) => {
        concat!("ext.nitf.", $name)
    };
}

macro_rules! acftb {
    ($name:literal) => {
        concat!("ext.nitf.acftb.", $name)
    };
}

// Taxonomy attributes
pub const MEDIA_FORMAT: &str = "media.format";
pub const MEDIA_FORMAT_VERSION: &str = "media.format-version";
pub const ORGANIZATIONAL_UNIT: &str = "isr.organizational-unit";
pub const TITLE: &str = "title";
pub const CREATED: &str = "created";
pub const MODIFIED: &str = "modified";
pub const EFFECTIVE: &str = "effective";
pub const CLASSIFICATION: &str = "security.classification";
pub const CLASSIFICATION_SYSTEM: &str = "security.classification-system";
pub const CODEWORDS: &str = "security.codewords";
pub const DISSEMINATION_CONTROLS: &str = "security.dissemination-controls";
pub const RELEASABILITY: &str = "security.releasability";
pub const CREATOR_NAME: &str = "contact.creator-name";
pub const CREATOR_PHONE: &str = "contact.creator-phone";
pub const MISSION_ID: &str = "isr.mission-id";
pub const PLATFORM_ID: &str = "isr.platform-id";
pub const SENSOR_TYPE: &str = "isr.sensor-type";
pub const SENSOR_ID: &str = "isr.sensor-id";
pub const COUNTRY_CODE: &str = "location.country-code";

// NITF-specific attributes
pub const FILE_PROFILE_NAME: &str = ext!("file-profile-name");
pub const FILE_VERSION: &str = ext!("file-version");
pub const ORIGINATING_STATION_ID: &str = ext!("originating-station-id");
pub const FILE_TITLE: &str = ext!("file-title");
pub const FILE_DATE_AND_TIME: &str = ext!("file-date-and-time");
pub const FILE_SECURITY_CLASSIFICATION: &str = ext!("file-security-classification");
pub const FILE_CLASSIFICATION_SECURITY_SYSTEM: &str = ext!("file-classification-security-system");
pub const FILE_CODEWORDS: &str = ext!("file-codewords");
pub const FILE_CONTROL_AND_HANDLING: &str = ext!("file-control-and-handling");
pub const FILE_RELEASING_INSTRUCTIONS: &str = ext!("file-releasing-instructions");
pub const ORIGINATORS_NAME: &str = ext!("originators-name");
pub const ORIGINATORS_PHONE_NUMBER: &str = ext!("originators-phone-number");
pub const COMPLEXITY_LEVEL: &str = ext!("complexity-level");
pub const STANDARD_TYPE: &str = ext!("standard-type");
pub const FILE_DECLASSIFICATION_EXEMPTION: &str = ext!("file-declassification-exemption");
pub const FILE_DECLASSIFICATION_TYPE: &str = ext!("file-declassification-type");
pub const FILE_DECLASSIFICATION_DATE: &str = ext!("file-declassification-date");
pub const FILE_DOWNGRADE: &str = ext!("file-downgrade");
pub const FILE_DOWNGRADE_DATE: &str = ext!("file-downgrade-date");
pub const FILE_CLASSIFICATION_TEXT: &str = ext!("file-classification-text");
pub const FILE_CLASSIFICATION_AUTHORITY_TYPE: &str = ext!("file-classification-authority-type");
pub const FILE_CLASSIFICATION_AUTHORITY: &str = ext!("file-classification-authority");
pub const FILE_CLASSIFICATION_REASON: &str = ext!("file-classification-reason");
pub const FILE_SECURITY_SOURCE_DATE: &str = ext!("file-security-source-date");
pub const FILE_SECURITY_CONTROL_NUMBER: &str = ext!("file-security-control-number");
pub const FILE_COPY_NUMBER: &str = ext!("file-copy-number");
pub const FILE_NUMBER_OF_COPIES: &str = ext!("file-number-of-copies");
pub const FILE_BACKGROUND_COLOR: &str = ext!("file-background-color");

pub const AIRCRAFT_MISSION_ID: &str = acftb!("aircraft-mission-id");
pub const AIRCRAFT_TAIL_NUMBER: &str = acftb!("aircraft-tail-number");
pub const SENSOR_ID_TYPE_NAME: &str = acftb!("sensor-id-type");
pub const SENSOR_ID_NAME: &str = acftb!("sensor-id");
pub const AIRCRAFT_TAKEOFF: &str = acftb!("aircraft-take-off");
pub const SCENE_SOURCE: &str = acftb!("scene-source");
pub const SCENE_NUMBER: &str = acftb!("scene-number");
pub const PROCESSING_DATE: &str = acftb!("processing-date");
pub const IMMEDIATE_SCENE_HOST: &str = acftb!("immediate-scene-host");
pub const IMMEDIATE_SCENE_REQUEST_ID: &str = acftb!("immediate-scene-request-id");
pub const MISSION_PLAN_MODE: &str = acftb!("mission-plan-mode");

pub const STDIDC_COUNTRY: &str = ext!("stdidc.country");

// =============================================================================
// Extractors
// =============================================================================

type Extracted = Result<Option<AttributeValue>, ExtractError>;

fn text(_: &AttributeMapping, raw: &str, _: &ExtractContext<'_>) -> Extracted {
    Ok(Some(AttributeValue::Text(raw.to_string())))
}

fn integer(mapping: &AttributeMapping, raw: &str, _: &ExtractContext<'_>) -> Extracted {
    raw.parse::<i64>()
        .map(|n| Some(AttributeValue::Integer(n)))
        .map_err(|_| ExtractError::InvalidInteger {
            field: mapping.field_code.to_string(),
            value: raw.to_string(),
        })
}

fn date(_: &AttributeMapping, raw: &str, _: &ExtractContext<'_>) -> Extracted {
    Ok(parse_nitf_date(raw).map(AttributeValue::Date))
}

/// Single-letter security classification spelled out.
fn classification(_: &AttributeMapping, raw: &str, _: &ExtractContext<'_>) -> Extracted {
    let name = match raw {
        "T" => "TOP_SECRET",
        "S" => "SECRET",
        "C" => "CONFIDENTIAL",
        "R" => "RESTRICTED",
        "U" => "UNCLASSIFIED",
        other => other,
    };
    Ok(Some(AttributeValue::Text(name.to_string())))
}

/// FIPS country code converted to exactly one ISO 3166 alpha-3 code.
fn alpha3_country(_: &AttributeMapping, raw: &str, context: &ExtractContext<'_>) -> Extracted {
    Ok(context
        .countries
        .resolve_single(raw)?
        .map(AttributeValue::Text))
}

const fn row(
    name: &'static str,
    field_code: &'static str,
    extract: super::ExtractFn,
    attribute_type: AttributeType,
) -> AttributeMapping {
    AttributeMapping {
        name,
        field_code,
        extract,
        attribute_type,
    }
}

// =============================================================================
// Tables
// =============================================================================

use AttributeType::{Date, Integer, Text};

/// NITF file header.
pub static HEADER_ATTRIBUTES: &[AttributeMapping] = &[
    row(MEDIA_FORMAT, "FHDR", text, Text),
    row(MEDIA_FORMAT_VERSION, "FVER", text, Text),
    row(ORGANIZATIONAL_UNIT, "OSTAID", text, Text),
    row(TITLE, "FTITLE", text, Text),
    row(CREATED, "FDT", date, Date),
    row(MODIFIED, "FDT", date, Date),
    row(EFFECTIVE, "FDT", date, Date),
    row(CLASSIFICATION, "FSCLAS", classification, Text),
    row(CLASSIFICATION_SYSTEM, "FSCLSY", alpha3_country, Text),
    row(CODEWORDS, "FSCODE", text, Text),
    row(DISSEMINATION_CONTROLS, "FSCTLH", text, Text),
    row(RELEASABILITY, "FSREL", text, Text),
    row(CREATOR_NAME, "ONAME", text, Text),
    row(CREATOR_PHONE, "OPHONE", text, Text),
    row(FILE_PROFILE_NAME, "FHDR", text, Text),
    row(FILE_VERSION, "FVER", text, Text),
    row(ORIGINATING_STATION_ID, "OSTAID", text, Text),
    row(FILE_TITLE, "FTITLE", text, Text),
    row(FILE_DATE_AND_TIME, "FDT", date, Date),
    row(FILE_SECURITY_CLASSIFICATION, "FSCLAS", classification, Text),
    row(FILE_CLASSIFICATION_SECURITY_SYSTEM, "FSCLSY", text, Text),
    row(FILE_CODEWORDS, "FSCODE", text, Text),
    row(FILE_CONTROL_AND_HANDLING, "FSCTLH", text, Text),
    row(FILE_RELEASING_INSTRUCTIONS, "FSREL", text, Text),
    row(ORIGINATORS_NAME, "ONAME", text, Text),
    row(ORIGINATORS_PHONE_NUMBER, "OPHONE", text, Text),
    row(COMPLEXITY_LEVEL, "CLEVEL", integer, Integer),
    row(STANDARD_TYPE, "STYPE", text, Text),
    row(FILE_DECLASSIFICATION_EXEMPTION, "FSDCXM", text, Text),
    row(FILE_DECLASSIFICATION_TYPE, "FSDCTP", text, Text),
    row(FILE_DECLASSIFICATION_DATE, "FSDCDT", text, Text),
    row(FILE_DOWNGRADE, "FSDG", text, Text),
    row(FILE_DOWNGRADE_DATE, "FSDGDT", text, Text),
    row(FILE_CLASSIFICATION_TEXT, "FSCLTX", text, Text),
    row(FILE_CLASSIFICATION_AUTHORITY_TYPE, "FSCATP", text, Text),
    row(FILE_CLASSIFICATION_AUTHORITY, "FSCAUT", text, Text),
    row(FILE_CLASSIFICATION_REASON, "FSCRSN", text, Text),
    row(FILE_SECURITY_SOURCE_DATE, "FSSRDT", text, Text),
    row(FILE_SECURITY_CONTROL_NUMBER, "FSCTLN", text, Text),
    row(FILE_COPY_NUMBER, "FSCOP", text, Text),
    row(FILE_NUMBER_OF_COPIES, "FSCPYS", text, Text),
    row(FILE_BACKGROUND_COLOR, "FBKGC", text, Text),
];

/// ACFTB (aircraft information) TRE.
pub static ACFTB_ATTRIBUTES: &[AttributeMapping] = &[
    row(MISSION_ID, "AC_MSN_ID", text, Text),
    row(PLATFORM_ID, "AC_TAIL_NO", text, Text),
    row(SENSOR_TYPE, "SENSOR_ID_TYPE", text, Text),
    row(SENSOR_ID, "SENSOR_ID", text, Text),
    row(AIRCRAFT_MISSION_ID, "AC_MSN_ID", text, Text),
    row(AIRCRAFT_TAIL_NUMBER, "AC_TAIL_NO", text, Text),
    row(SENSOR_ID_TYPE_NAME, "SENSOR_ID_TYPE", text, Text),
    row(SENSOR_ID_NAME, "SENSOR_ID", text, Text),
    row(AIRCRAFT_TAKEOFF, "AC_TO", text, Text),
    row(SCENE_SOURCE, "SCENE_SOURCE", text, Text),
    row(SCENE_NUMBER, "SCNUM", text, Text),
    row(PROCESSING_DATE, "PDATE", text, Text),
    row(IMMEDIATE_SCENE_HOST, "IMHOSTNO", text, Text),
    row(IMMEDIATE_SCENE_REQUEST_ID, "IMREQID", text, Text),
    row(MISSION_PLAN_MODE, "MPLAN", text, Text),
];

/// STDIDC (standard ID) TRE country fields.
pub static STDIDC_ATTRIBUTES: &[AttributeMapping] = &[
    row(COUNTRY_CODE, "COUNTRY", alpha3_country, Text),
    row(STDIDC_COUNTRY, "COUNTRY", text, Text),
];

/// Every attribute name a table can produce.
pub fn attribute_names(table: &[AttributeMapping]) -> impl Iterator<Item = &'static str> + '_ {
    table.iter().map(|m| m.name)
}

/// Whether `name` is a NITF-specific (`ext.nitf.`) attribute.
pub fn is_nitf_extension(name: &str) -> bool {
    name.starts_with(EXT)
}
