//! Filenames for derived resources.
//!
//! Derived files are named after the record title so they stay recognisable
//! in the content store:
//!
//! - `"My Sat Image #1!"` → `overview-mysatimage1.jpg`
//! - `"/data/ingest/scene_04.ntf"` → `original-scene04.jp2`
//!
//! The title is reduced to its base filename (directory and extension
//! removed), then to its ASCII alphanumerics, then lowercased. When nothing
//! alphanumeric is left the name falls back to `{qualifier}.jpg`. The fallback
//! extension is always `jpg`, even for a `jp2` original.

const FALLBACK_EXTENSION: &str = "jpg";

/// Build the filename for a derived artifact.
///
/// Never fails and never returns an empty string.
pub fn derived_filename(title: &str, qualifier: &str, extension: &str) -> String {
    let stripped: String = base_name(title)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();

    if stripped.is_empty() {
        return format!("{qualifier}.{FALLBACK_EXTENSION}").to_lowercase();
    }
    format!("{qualifier}-{stripped}.{extension}").to_lowercase()
}

/// Base filename of a path-like title: last path segment, without extension.
///
/// Both `/` and `\` separate segments. Only the final `.suffix` is removed, so
/// `"a.b.c"` becomes `"a.b"`; a title that is only an extension (`".ntf"`)
/// has an empty base name.
fn base_name(title: &str) -> &str {
    let file = title.rsplit(['/', '\\']).next().unwrap_or(title);
    match file.rfind('.') {
        Some(dot) => &file[..dot],
        None => file,
    }
}
