//! Sort stage: stable, type-aware ordering by one field.

use std::cmp::Ordering;

use tracing::debug;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::query::{SortDirection, SortSpec};
use crate::record::TableRecord;
use crate::schema::{SortKind, TableSchema};

/// Precomputed comparison key for one record.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    /// Accent-stripped primary key, then the case-folded text.
    Text { base: String, folded: String },
}

/// Case-folded text with diacritics removed: `"Élodie"` becomes `"elodie"`.
fn collation_base(folded: &str) -> String {
    folded.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

impl SortKey {
    fn of<R: TableRecord>(record: &R, field: &str, kind: SortKind) -> Self {
        match kind {
            // Missing and non-numeric values sort as zero.
            SortKind::Numeric => SortKey::Number(record.field_number(field).unwrap_or(0.0)),
            SortKind::Text => {
                let folded = record
                    .field(field)
                    .map(|v| v.folded())
                    .unwrap_or_default();
                SortKey::Text {
                    base: collation_base(&folded),
                    folded,
                }
            }
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (
                SortKey::Text { base: a, folded: fa },
                SortKey::Text { base: b, folded: fb },
            ) => a.cmp(b).then_with(|| fa.cmp(fb)),
            // A single sort uses one kind throughout.
            (SortKey::Number(_), SortKey::Text { .. }) => Ordering::Less,
            (SortKey::Text { .. }, SortKey::Number(_)) => Ordering::Greater,
        }
    }
}

/// Order records by `spec.field`.
///
/// Numeric fields compare as numbers with missing values as 0; text fields
/// compare case-folded with accents ignored first (`"Élodie"` between
/// `"Ana"` and `"Emma"`). Equal keys keep their input order. A field the
/// schema does not list as sortable leaves the order unchanged.
pub fn sort<T: TableRecord>(
    records: impl IntoIterator<Item = T>,
    spec: &SortSpec,
    schema: &TableSchema,
) -> Vec<T> {
    let Some(kind) = schema.sort_kind(&spec.field) else {
        debug!(field = %spec.field, "sort field not sortable, keeping input order");
        return records.into_iter().collect();
    };

    let mut keyed: Vec<(SortKey, T)> = records
        .into_iter()
        .map(|r| (SortKey::of(&r, &spec.field, kind), r))
        .collect();

    // `sort_by` is stable; reversing the comparator (not the output) keeps
    // ties in input order for descending sorts too.
    keyed.sort_by(|(a, _), (b, _)| match spec.direction {
        SortDirection::Asc => a.compare(b),
        SortDirection::Desc => b.compare(a),
    });

    debug!(field = %spec.field, direction = ?spec.direction, count = keyed.len(), "sort stage");
    keyed.into_iter().map(|(_, r)| r).collect()
}
