//! Search stage: case-insensitive substring match across fields.

use tracing::debug;

use crate::record::TableRecord;

/// Whether any of `fields` contains the already case-folded `needle`.
pub fn matches_query<R: TableRecord, S: AsRef<str>>(record: &R, needle: &str, fields: &[S]) -> bool {
    fields.iter().any(|field| {
        record
            .field(field.as_ref())
            .is_some_and(|value| value.folded().contains(needle))
    })
}

/// Keep records where at least one of `fields` contains `query`.
///
/// An empty or whitespace-only query returns the input unchanged. Lists and
/// numbers are stringified before matching; absent fields are skipped.
pub fn search<T: TableRecord, S: AsRef<str>>(
    records: impl IntoIterator<Item = T>,
    query: &str,
    fields: &[S],
) -> Vec<T> {
    if query.trim().is_empty() {
        return records.into_iter().collect();
    }
    let needle = query.to_lowercase();
    let kept: Vec<T> = records
        .into_iter()
        .filter(|r| matches_query(r, &needle, fields))
        .collect();
    debug!(query, output_count = kept.len(), "search stage");
    kept
}
