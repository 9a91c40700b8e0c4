//! # Median
//!
//! Order-independent aggregation. For an even count the lower of the two
//! middle values is returned, keeping the result an observed value and the
//! arithmetic free of rounding.

/// Lower median of `values`. `None` for an empty slice.
pub fn median(values: &[u64]) -> Option<u64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    Some(sorted[(sorted.len() - 1) / 2])
}
