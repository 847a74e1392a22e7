//! Summary cards: counts, sums and averages over the filtered set.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::record::TableRecord;
use crate::schema::TableSchema;

/// Sum and average of one numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FieldSummary {
    pub sum: f64,
    /// Mean over the records carrying a number; 0 when none do.
    pub average: f64,
    /// Records that carried a number for this field.
    pub count: usize,
}

/// Aggregates over a filtered and searched record set.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SummaryStats {
    pub total: usize,
    /// Record count per status value, keyed by the value as written.
    pub by_status: BTreeMap<String, usize>,
    pub fields: BTreeMap<String, FieldSummary>,
}

impl SummaryStats {
    /// Count of records whose status equals `status`, ignoring case.
    pub fn status_count(&self, status: &str) -> usize {
        let wanted = status.to_lowercase();
        self.by_status
            .iter()
            .filter(|(value, _)| value.to_lowercase() == wanted)
            .map(|(_, count)| count)
            .sum()
    }

    /// Summary for `field`, zeros if it was not aggregated.
    pub fn field(&self, field: &str) -> FieldSummary {
        self.fields.get(field).copied().unwrap_or_default()
    }
}

/// Summarize `records` using the schema's status and summary fields.
pub fn summarize<T: TableRecord>(
    records: impl IntoIterator<Item = T>,
    schema: &TableSchema,
) -> SummaryStats {
    let mut stats = SummaryStats {
        fields: schema
            .summary_fields
            .iter()
            .map(|f| (f.clone(), FieldSummary::default()))
            .collect(),
        ..SummaryStats::default()
    };

    for record in records {
        stats.total += 1;

        if let Some(status_field) = &schema.status_field {
            let status = record.field_text(status_field);
            if !status.is_empty() {
                *stats.by_status.entry(status).or_insert(0) += 1;
            }
        }

        for (field, summary) in stats.fields.iter_mut() {
            if let Some(n) = record.field_number(field) {
                summary.sum += n;
                summary.count += 1;
            }
        }
    }

    for summary in stats.fields.values_mut() {
        if summary.count > 0 {
            summary.average = summary.sum / summary.count as f64;
        }
    }

    stats
}

/// Sorted distinct non-empty values of `field`, for filter option lists.
pub fn distinct_values<T: TableRecord>(
    records: impl IntoIterator<Item = T>,
    field: &str,
) -> Vec<String> {
    records
        .into_iter()
        .map(|r| r.field_text(field))
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
