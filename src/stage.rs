//! Pipeline stages as data.
//!
//! A [`QueryState`] expands into an ordered list of [`Stage`]s:
//!
//! ```text
//! FILTER -> SEARCH -> SORT -> PAGINATE
//! ```
//!
//! Stages that would not change their input (no active criteria, blank
//! search, no sort) are left out. [`execute_stages_debug`] reports record
//! counts between stages for diagnostics.

use tracing::debug;

use crate::filter::filter;
use crate::paginate::paginate;
use crate::query::{FilterCriteria, PageSpec, QueryState, SortSpec};
use crate::record::TableRecord;
use crate::schema::TableSchema;
use crate::search::search;
use crate::sort::sort;

/// One step of the record pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Equality and date-range constraints.
    Filter(FilterCriteria),
    /// Substring match over the given fields.
    Search { query: String, fields: Vec<String> },
    /// Stable ordering by one field.
    Sort(SortSpec),
    /// Page window.
    Paginate(PageSpec),
}

impl Stage {
    /// Stage name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Filter(_) => "FILTER",
            Stage::Search { .. } => "SEARCH",
            Stage::Sort(_) => "SORT",
            Stage::Paginate(_) => "PAGINATE",
        }
    }

    /// Run this stage over `records`.
    pub fn apply<T: TableRecord>(&self, records: Vec<T>, schema: &TableSchema) -> Vec<T> {
        match self {
            Stage::Filter(criteria) => filter(records, criteria, schema),
            Stage::Search { query, fields } => search(records, query, fields),
            Stage::Sort(spec) => sort(records, spec, schema),
            Stage::Paginate(page) => paginate(records, *page),
        }
    }
}

/// Stages for `state`, without the page window.
///
/// The summary and export read this full result; only the table body is
/// paginated.
pub fn result_stages(state: &QueryState, schema: &TableSchema) -> Vec<Stage> {
    let mut stages = Vec::new();
    let criteria = state.criteria();
    if criteria.active().next().is_some() || criteria.date_range.is_some() {
        stages.push(Stage::Filter(criteria.clone()));
    }
    if !state.search().trim().is_empty() {
        stages.push(Stage::Search {
            query: state.search().to_string(),
            fields: schema.search_fields.clone(),
        });
    }
    if let Some(spec) = state.sort() {
        stages.push(Stage::Sort(spec.clone()));
    }
    stages
}

/// Stages for `state`, ending with the page window.
pub fn page_stages(state: &QueryState, schema: &TableSchema) -> Vec<Stage> {
    let mut stages = result_stages(state, schema);
    stages.push(Stage::Paginate(state.page()));
    stages
}

/// Per-stage record counts from one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugInfo {
    pub stage_name: String,
    pub input_count: usize,
    pub output_count: usize,
}

impl DebugInfo {
    pub fn new(stage_name: &str, input_count: usize, output_count: usize) -> Self {
        Self {
            stage_name: stage_name.to_string(),
            input_count,
            output_count,
        }
    }
}

/// Run `stages` in order.
pub fn execute_stages<T: TableRecord>(
    records: Vec<T>,
    stages: &[Stage],
    schema: &TableSchema,
) -> Vec<T> {
    stages
        .iter()
        .fold(records, |current, stage| stage.apply(current, schema))
}

/// Run `stages` in order, recording counts before and after each.
pub fn execute_stages_debug<T: TableRecord>(
    records: Vec<T>,
    stages: &[Stage],
    schema: &TableSchema,
) -> (Vec<T>, Vec<DebugInfo>) {
    let mut debug_info = Vec::with_capacity(stages.len());
    let mut current = records;

    for stage in stages {
        let input_count = current.len();
        current = stage.apply(current, schema);
        let output_count = current.len();
        debug!(stage = stage.name(), input_count, output_count, "stage complete");
        debug_info.push(DebugInfo::new(stage.name(), input_count, output_count));
    }

    (current, debug_info)
}
