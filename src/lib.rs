//! # roster-pipeline
//!
//! Filter, search, sort and paginate HR roster records for an admin console.
//!
//! The console lists HR managers and staff across companies. Every table
//! runs the same pipeline over its records:
//!
//! - **Filter**: equality on status, department, company; inclusive date range
//! - **Search**: case-insensitive substring over several fields
//! - **Sort**: stable, numeric or text by field
//! - **Paginate**: 1-based page windows
//!
//! and derives a summary (counts, sums, averages) and an export table from
//! the full result. [`TableView`] memoizes each stage so paging does not
//! redo the filtering.
//!
//! ## Example
//!
//! ```
//! use roster_pipeline::{QueryState, Record, SortSpec, TableSchema, TableView};
//!
//! let schema = TableSchema {
//!     numeric_fields: vec!["rating".to_string()],
//!     status_field: Some("status".to_string()),
//!     summary_fields: vec!["rating".to_string()],
//!     ..TableSchema::default()
//! };
//! let records = vec![
//!     Record::new(1).with("status", "Active").with("rating", 4.8),
//!     Record::new(2).with("status", "Inactive").with("rating", 4.2),
//!     Record::new(3).with("status", "Active").with("rating", 4.5),
//! ];
//!
//! let mut view = TableView::new(records, schema);
//! let state = QueryState::new(10)
//!     .unwrap()
//!     .with_filter("status", "Active")
//!     .with_sort(Some(SortSpec::desc("rating")));
//!
//! assert_eq!(view.page(&state).len(), 2);
//! assert_eq!(view.summary(&state).total, 2);
//! ```

pub mod error;
pub mod export;
pub mod filter;
pub mod paginate;
pub mod query;
pub mod record;
pub mod roster;
pub mod schema;
pub mod search;
pub mod selection;
pub mod sort;
pub mod source;
pub mod stage;
pub mod summary;
pub mod value;
pub mod view;

pub use error::PipelineError;
pub use export::{
    ExportOptions, ExportRequest, ExportSink, ExportTable, JsonExportSink, to_export_table,
};
pub use filter::{FilterMatcher, filter};
pub use paginate::paginate;
pub use query::{DateRange, FilterCriteria, PageSpec, PageWindow, QueryState, SortDirection, SortSpec};
pub use record::{Record, RecordId, TableRecord};
pub use roster::{HrManager, StaffMember};
pub use schema::{ColumnFormat, DatePolicy, ExportColumn, SortKind, TableSchema};
pub use search::search;
pub use selection::{CheckState, SelectionTracker};
pub use sort::sort;
pub use source::{JsonFileSource, RecordSource, StaticSource};
pub use stage::{DebugInfo, Stage, execute_stages, execute_stages_debug, page_stages, result_stages};
pub use summary::{FieldSummary, SummaryStats, distinct_values, summarize};
pub use value::Value;
pub use view::{Recomputations, TableView};
