//! Memoized table view.
//!
//! [`TableView`] owns one table's records and schema and derives every
//! output (page, page window, summary, export, ids) from a [`QueryState`].
//! Each stage caches its output as record indices and is rebuilt only when
//! its own inputs change:
//!
//! | cache    | key                                    |
//! |----------|----------------------------------------|
//! | filtered | criteria                               |
//! | searched | filtered generation, search text       |
//! | sorted   | searched generation, sort spec         |
//!
//! The page slice is cut from the sorted indices on every call.

use std::borrow::Cow;

use tracing::debug;

use crate::error::PipelineError;
use crate::export::{ExportOptions, ExportRequest, ExportTable, to_export_table};
use crate::filter::filter;
use crate::paginate::paginate;
use crate::query::{FilterCriteria, PageWindow, QueryState, SortSpec};
use crate::record::{RecordId, TableRecord};
use crate::schema::TableSchema;
use crate::search::search;
use crate::sort::sort;
use crate::source::RecordSource;
use crate::summary::{SummaryStats, distinct_values, summarize};
use crate::value::Value;

/// A borrowed record tagged with its position in the view.
struct Indexed<'a, R> {
    index: usize,
    record: &'a R,
}

impl<R: TableRecord> TableRecord for Indexed<'_, R> {
    fn id(&self) -> RecordId {
        self.record.id()
    }

    fn field(&self, name: &str) -> Option<Cow<'_, Value>> {
        self.record.field(name)
    }
}

fn indexed<'a, R>(
    records: &'a [R],
    indices: &'a [usize],
) -> impl Iterator<Item = Indexed<'a, R>> + 'a {
    indices.iter().map(move |&index| Indexed {
        index,
        record: &records[index],
    })
}

fn positions<R>(items: Vec<Indexed<'_, R>>) -> Vec<usize> {
    items.into_iter().map(|item| item.index).collect()
}

#[derive(Debug)]
struct Cached<K> {
    key: K,
    generation: u64,
    indices: Vec<usize>,
}

/// How many times each cache has been rebuilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Recomputations {
    pub filter: usize,
    pub search: usize,
    pub sort: usize,
}

/// One table's records plus memoized pipeline results.
#[derive(Debug)]
pub struct TableView<R> {
    records: Vec<R>,
    all: Vec<usize>,
    schema: TableSchema,
    filtered: Option<Cached<FilterCriteria>>,
    searched: Option<Cached<(u64, String)>>,
    sorted: Option<Cached<(u64, Option<SortSpec>)>>,
    generation: u64,
    recomputations: Recomputations,
}

impl<R: TableRecord> TableView<R> {
    pub fn new(records: Vec<R>, schema: TableSchema) -> Self {
        let all = (0..records.len()).collect();
        Self {
            records,
            all,
            schema,
            filtered: None,
            searched: None,
            sorted: None,
            generation: 0,
            recomputations: Recomputations::default(),
        }
    }

    /// Load every record `source` offers.
    pub fn from_source(
        source: &impl RecordSource<R>,
        schema: TableSchema,
    ) -> Result<Self, PipelineError> {
        let records = source.fetch(&FilterCriteria::default())?;
        Ok(Self::new(records, schema))
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn recomputations(&self) -> Recomputations {
        self.recomputations
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn refresh_filtered(&mut self, criteria: &FilterCriteria) -> u64 {
        if let Some(cached) = &self.filtered
            && cached.key == *criteria
        {
            return cached.generation;
        }
        let kept = filter(indexed(&self.records, &self.all), criteria, &self.schema);
        let indices = positions(kept);
        debug!(output_count = indices.len(), "recomputed filter stage");
        let generation = self.next_generation();
        self.recomputations.filter += 1;
        self.filtered = Some(Cached {
            key: criteria.clone(),
            generation,
            indices,
        });
        generation
    }

    fn refresh_searched(&mut self, filtered_generation: u64, query: &str) -> u64 {
        if let Some(cached) = &self.searched
            && cached.key.0 == filtered_generation
            && cached.key.1 == query
        {
            return cached.generation;
        }
        let source = self.filtered.as_ref().map_or(&[][..], |c| &c.indices[..]);
        let kept = search(
            indexed(&self.records, source),
            query,
            &self.schema.search_fields,
        );
        let indices = positions(kept);
        debug!(query, output_count = indices.len(), "recomputed search stage");
        let generation = self.next_generation();
        self.recomputations.search += 1;
        self.searched = Some(Cached {
            key: (filtered_generation, query.to_string()),
            generation,
            indices,
        });
        generation
    }

    fn refresh_sorted(&mut self, searched_generation: u64, spec: Option<&SortSpec>) {
        if let Some(cached) = &self.sorted
            && cached.key.0 == searched_generation
            && cached.key.1.as_ref() == spec
        {
            return;
        }
        let source = self.searched.as_ref().map_or(&[][..], |c| &c.indices[..]);
        let indices = match spec {
            Some(spec) => positions(sort(indexed(&self.records, source), spec, &self.schema)),
            None => source.to_vec(),
        };
        debug!(sort = ?spec, "recomputed sort stage");
        let generation = self.next_generation();
        self.recomputations.sort += 1;
        self.sorted = Some(Cached {
            key: (searched_generation, spec.cloned()),
            generation,
            indices,
        });
    }

    /// Bring every cache up to date with `state`.
    fn refresh(&mut self, state: &QueryState) {
        let filtered = self.refresh_filtered(state.criteria());
        let searched = self.refresh_searched(filtered, state.search());
        self.refresh_sorted(searched, state.sort());
    }

    fn sorted_indices(&mut self, state: &QueryState) -> &[usize] {
        self.refresh(state);
        self.sorted.as_ref().map_or(&[][..], |c| &c.indices[..])
    }

    /// Full filtered, searched and sorted result.
    pub fn result(&mut self, state: &QueryState) -> Vec<&R> {
        self.refresh(state);
        let indices = self.sorted.as_ref().map_or(&[][..], |c| &c.indices[..]);
        indices.iter().map(|&i| &self.records[i]).collect()
    }

    /// Number of records in the full result.
    pub fn result_len(&mut self, state: &QueryState) -> usize {
        self.sorted_indices(state).len()
    }

    /// Records on the requested page. Empty when the page is out of range.
    pub fn page(&mut self, state: &QueryState) -> Vec<&R> {
        self.refresh(state);
        let indices = self.sorted.as_ref().map_or(&[][..], |c| &c.indices[..]);
        paginate(indices.iter().map(|&i| &self.records[i]), state.page())
    }

    pub fn page_window(&mut self, state: &QueryState) -> PageWindow {
        let total = self.result_len(state);
        PageWindow::new(total, state.page())
    }

    /// Ids in the full result, for "select all matching".
    pub fn result_ids(&mut self, state: &QueryState) -> Vec<RecordId> {
        self.result(state).iter().map(|r| r.id()).collect()
    }

    /// Ids on the requested page, for "select all on page".
    pub fn page_ids(&mut self, state: &QueryState) -> Vec<RecordId> {
        self.page(state).iter().map(|r| r.id()).collect()
    }

    /// Summary over the filtered and searched set.
    pub fn summary(&mut self, state: &QueryState) -> SummaryStats {
        self.refresh(state);
        let indices = self.searched.as_ref().map_or(&[][..], |c| &c.indices[..]);
        summarize(indexed(&self.records, indices), &self.schema)
    }

    /// Export table over the full sorted result.
    pub fn export(&mut self, state: &QueryState) -> ExportTable {
        self.refresh(state);
        let indices = self.sorted.as_ref().map_or(&[][..], |c| &c.indices[..]);
        to_export_table(
            indexed(&self.records, indices),
            &self.schema.columns,
            &self.schema.title,
        )
    }

    /// Export table plus the table's default download options.
    pub fn export_request(&mut self, state: &QueryState) -> ExportRequest {
        ExportRequest {
            table: self.export(state),
            options: ExportOptions::for_schema(&self.schema),
        }
    }

    /// Distinct values of `field` across all records, for filter options.
    pub fn options(&self, field: &str) -> Vec<String> {
        distinct_values(&self.records, field)
    }
}
