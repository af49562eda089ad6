//! As-of resolution: the latest known version not newer than a request.

use super::VersionKey;

/// Return the greatest element of `sorted` that is `<= requested`.
///
/// `sorted` must be ascending. Returns `None` when `requested` predates
/// every element (or `sorted` is empty).
pub fn resolve(sorted: &[VersionKey], requested: &VersionKey) -> Option<VersionKey> {
    debug_assert!(sorted.windows(2).all(|w| w[0] <= w[1]), "versions must be sorted");
    let idx = sorted.partition_point(|v| v <= requested);
    idx.checked_sub(1).map(|i| sorted[i])
}

/// Earliest version of an ascending list.
pub fn first_available(sorted: &[VersionKey]) -> Option<VersionKey> {
    sorted.first().copied()
}
