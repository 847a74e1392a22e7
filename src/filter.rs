//! Filter stage: equality and date-range constraints.

use chrono::NaiveDateTime;
use tracing::debug;

use crate::query::FilterCriteria;
use crate::record::TableRecord;
use crate::schema::{DatePolicy, TableSchema};

/// Criteria prepared for repeated matching: values case-folded once and
/// the date window resolved once.
#[derive(Debug, Clone)]
pub struct FilterMatcher<'a> {
    equalities: Vec<(&'a str, String)>,
    window: Option<(NaiveDateTime, NaiveDateTime)>,
    date_field: Option<&'a str>,
    policy: DatePolicy,
}

impl<'a> FilterMatcher<'a> {
    pub fn new(criteria: &'a FilterCriteria, schema: &'a TableSchema) -> Self {
        let equalities = criteria
            .active()
            .map(|(field, value)| (field, value.to_lowercase()))
            .collect();
        // Without a configured date field the range has nothing to test.
        let date_field = schema.date_field.as_deref();
        let window = match date_field {
            Some(_) => criteria.date_range.as_ref().and_then(|r| r.window()),
            None => None,
        };
        Self {
            equalities,
            window,
            date_field,
            policy: schema.date_policy,
        }
    }

    /// No constraint is active.
    pub fn is_identity(&self) -> bool {
        self.equalities.is_empty() && self.window.is_none()
    }

    pub fn matches<R: TableRecord>(&self, record: &R) -> bool {
        let fields_match = self.equalities.iter().all(|(field, want)| {
            let have = record.field(field).map(|v| v.folded()).unwrap_or_default();
            have == *want
        });
        fields_match && self.date_matches(record)
    }

    fn date_matches<R: TableRecord>(&self, record: &R) -> bool {
        let (Some((from, until)), Some(field)) = (self.window, self.date_field) else {
            return true;
        };
        match record.field(field).and_then(|v| v.as_datetime()) {
            Some(date) => from <= date && date < until,
            None => self.policy == DatePolicy::Include,
        }
    }
}

/// Keep the records that satisfy every active criterion.
///
/// `"all"` and empty values are ignored. A missing field compares as the
/// empty string. The date range applies only when both bounds parse;
/// records with a missing or malformed date follow the schema's
/// [`DatePolicy`].
pub fn filter<T: TableRecord>(
    records: impl IntoIterator<Item = T>,
    criteria: &FilterCriteria,
    schema: &TableSchema,
) -> Vec<T> {
    let matcher = FilterMatcher::new(criteria, schema);
    if matcher.is_identity() {
        return records.into_iter().collect();
    }
    let mut input_count = 0;
    let kept: Vec<T> = records
        .into_iter()
        .inspect(|_| input_count += 1)
        .filter(|r| matcher.matches(r))
        .collect();
    debug!(input_count, output_count = kept.len(), "filter stage");
    kept
}
