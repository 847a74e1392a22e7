//! Pagination stage: 1-based page windows.

use crate::query::PageSpec;

/// Slice `[(number - 1) * size, number * size)` out of `records`, clipped to
/// the input length.
///
/// A page past the end yields an empty vector; the caller decides whether
/// to reset to page 1 (see [`crate::query::PageWindow::is_out_of_range`]).
pub fn paginate<T>(records: impl IntoIterator<Item = T>, page: PageSpec) -> Vec<T> {
    records
        .into_iter()
        .skip(page.offset())
        .take(page.size())
        .collect()
}
