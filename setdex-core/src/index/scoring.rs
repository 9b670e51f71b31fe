//! Scoring functions.

/// Similarity of a query to an indexed set from their sizes and the size of
/// their intersection: `common / (set_size + query_size - common)`.
///
/// Returns 0.0 when both sets are empty.
#[inline(always)]
pub(crate) fn overlap(common: u64, set_size: u64, query_size: u64) -> f64 {
    let union = (set_size + query_size).saturating_sub(common);
    if union == 0 {
        return 0.0;
    }
    common as f64 / union as f64
}
