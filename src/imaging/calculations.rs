//! Pure calculation functions for derived image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Longer-edge bound used when the configured overview size is unusable.
pub const DEFAULT_OVERVIEW_MAX_SIDE: f64 = 1024.0;

/// Edge length of the square thumbnail box.
pub const THUMBNAIL_BOX: (u32, u32) = (200, 200);

/// Calculate the overview box for a source image.
///
/// The longer edge is clamped to `max_side`; the shorter edge is scaled by the
/// same factor and rounded to the nearest pixel. A square source takes the
/// landscape branch so both edges are clamped equally.
///
/// `max_side` must be positive; callers substitute
/// [`DEFAULT_OVERVIEW_MAX_SIDE`] before calling (see
/// [`RenderConfig::effective_overview_side`](crate::config::RenderConfig::effective_overview_side)).
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `max_side` - Upper bound for the longer edge, in pixels
///
/// # Returns
/// * `(width, height)` - Overview dimensions, each at least 1
///
/// # Examples
/// ```
/// # use nitf_render::imaging::calculate_overview_dimensions;
/// // 4096x2048 landscape clamped to 1024 on the long edge
/// assert_eq!(calculate_overview_dimensions((4096, 2048), 1024.0), (1024, 512));
///
/// // Portrait: height is the long edge
/// assert_eq!(calculate_overview_dimensions((1500, 3000), 1024.0), (512, 1024));
/// ```
pub fn calculate_overview_dimensions(source: (u32, u32), max_side: f64) -> (u32, u32) {
    let (src_w, src_h) = source;
    let bound = max_side.floor().max(1.0) as u32;

    if src_w >= src_h {
        // Landscape or square: width is the long edge
        let w = src_w.min(bound);
        let h = scale_edge(src_h, w, src_w);
        (w, h)
    } else {
        // Portrait: height is the long edge
        let h = src_h.min(bound);
        let w = scale_edge(src_w, h, src_h);
        (w, h)
    }
}

/// Scale `edge` by `target / reference`, rounding to nearest and never below 1.
fn scale_edge(edge: u32, target: u32, reference: u32) -> u32 {
    let scaled = (edge as f64 * (target as f64 / reference as f64)).round() as u32;
    scaled.max(1)
}
