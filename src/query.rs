//! Query parameters supplied by the presentation layer.
//!
//! [`QueryState`] bundles filter criteria, search text, sort and page into
//! one immutable value. Every setter returns a new state, and any change
//! that reshapes the result set sends the page back to 1.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use chrono::{Days, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PipelineError;
use crate::schema::TableSchema;
use crate::value::parse_datetime;

/// Criterion value meaning "no constraint".
pub const ALL: &str = "all";

/// Inclusive calendar date range. Applied only when both ends parse.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    /// Half-open window `[start 00:00, end + 1 day 00:00)`.
    ///
    /// Returns `None` unless both bounds are present and parseable.
    pub fn window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let (start, end) = (self.start.as_deref()?, self.end.as_deref()?);
        let (Some(from), Some(to)) = (parse_datetime(start), parse_datetime(end)) else {
            warn!(start, end, "ignoring date range with unparseable bound");
            return None;
        };
        let from = from.date().and_hms_opt(0, 0, 0)?;
        let until = to
            .date()
            .checked_add_days(Days::new(1))?
            .and_hms_opt(0, 0, 0)?;
        Some((from, until))
    }
}

/// Equality constraints per field plus an optional date range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(default, rename = "dateRange")]
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style equality constraint.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Constraints that actually narrow the set: not `"all"`, not empty.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|(_, value)| !value.is_empty() && !value.eq_ignore_ascii_case(ALL))
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    /// Parse a `field=value` argument.
    pub fn parse_arg(arg: &str) -> Result<(String, String), PipelineError> {
        match arg.split_once('=') {
            Some((field, value)) if !field.trim().is_empty() => {
                Ok((field.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(PipelineError::InvalidFilter(arg.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Sort field and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Column header click: the same field flips direction, a new field
    /// starts ascending.
    pub fn toggled(current: Option<&SortSpec>, field: &str) -> Self {
        match current {
            Some(spec) if spec.field == field => Self {
                field: spec.field.clone(),
                direction: spec.direction.reversed(),
            },
            _ => Self::asc(field),
        }
    }

    /// Parse `field`, `field:asc` or `field:desc`.
    pub fn parse(arg: &str) -> Result<Self, PipelineError> {
        let (field, direction) = match arg.split_once(':') {
            Some((field, dir)) => {
                let direction = match dir.trim().to_ascii_lowercase().as_str() {
                    "asc" => SortDirection::Asc,
                    "desc" => SortDirection::Desc,
                    _ => return Err(PipelineError::InvalidSort(arg.to_string())),
                };
                (field.trim(), direction)
            }
            None => (arg.trim(), SortDirection::Asc),
        };
        if field.is_empty() {
            return Err(PipelineError::InvalidSort(arg.to_string()));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Requested page: 1-based number and positive size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    number: NonZeroUsize,
    size: NonZeroUsize,
}

impl PageSpec {
    pub fn new(number: usize, size: usize) -> Result<Self, PipelineError> {
        match (NonZeroUsize::new(number), NonZeroUsize::new(size)) {
            (Some(number), Some(size)) => Ok(Self { number, size }),
            _ => Err(PipelineError::InvalidPage { number, size }),
        }
    }

    /// Page 1 of the given size.
    pub fn first(size: usize) -> Result<Self, PipelineError> {
        Self::new(1, size)
    }

    pub fn number(&self) -> usize {
        self.number.get()
    }

    pub fn size(&self) -> usize {
        self.size.get()
    }

    /// Index of the first record on this page.
    pub fn offset(&self) -> usize {
        (self.number() - 1).saturating_mul(self.size())
    }

    fn with_number(self, number: NonZeroUsize) -> Self {
        Self { number, ..self }
    }
}

/// Caption data for a page: "showing `first` to `last` of `total`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub total: usize,
    pub page_count: usize,
    pub number: usize,
    pub size: usize,
    /// 1-based position of the first record shown, 0 when none.
    pub first: usize,
    /// 1-based position of the last record shown, 0 when none.
    pub last: usize,
}

impl PageWindow {
    pub fn new(total: usize, page: PageSpec) -> Self {
        let page_count = total.div_ceil(page.size());
        let offset = page.offset();
        let (first, last) = if offset < total {
            (offset + 1, (offset + page.size()).min(total))
        } else {
            (0, 0)
        };
        Self {
            total,
            page_count,
            number: page.number(),
            size: page.size(),
            first,
            last,
        }
    }

    /// The page lies past the end of a non-empty result, or past page 1 of
    /// an empty one. The presentation layer resets to page 1 when it sees it.
    pub fn is_out_of_range(&self) -> bool {
        self.number > self.page_count.max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.page_count
    }
}

/// Everything the presentation layer passes into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    criteria: FilterCriteria,
    search: String,
    sort: Option<SortSpec>,
    page: PageSpec,
}

impl QueryState {
    pub fn new(page_size: usize) -> Result<Self, PipelineError> {
        Ok(Self {
            criteria: FilterCriteria::default(),
            search: String::new(),
            sort: None,
            page: PageSpec::first(page_size)?,
        })
    }

    /// Initial state using the table's default page size.
    pub fn for_schema(schema: &TableSchema) -> Result<Self, PipelineError> {
        Self::new(schema.page_size)
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> PageSpec {
        self.page
    }

    pub fn with_criteria(&self, criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            ..self.first_page()
        }
    }

    /// Set one equality constraint; `"all"` clears it in effect.
    pub fn with_filter(&self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_criteria(self.criteria.clone().with(field, value))
    }

    pub fn with_date_range(&self, range: Option<DateRange>) -> Self {
        let mut criteria = self.criteria.clone();
        criteria.date_range = range;
        self.with_criteria(criteria)
    }

    pub fn with_search(&self, text: impl Into<String>) -> Self {
        Self {
            search: text.into(),
            ..self.first_page()
        }
    }

    pub fn with_sort(&self, sort: Option<SortSpec>) -> Self {
        Self {
            sort,
            ..self.first_page()
        }
    }

    /// Header click on `field`.
    pub fn sort_by(&self, field: &str) -> Self {
        self.with_sort(Some(SortSpec::toggled(self.sort.as_ref(), field)))
    }

    pub fn with_page(&self, number: usize) -> Result<Self, PipelineError> {
        Ok(Self {
            page: PageSpec::new(number, self.page.size())?,
            ..self.clone()
        })
    }

    pub fn with_page_size(&self, size: usize) -> Result<Self, PipelineError> {
        Ok(Self {
            page: PageSpec::first(size)?,
            ..self.clone()
        })
    }

    /// Same state on page 1.
    pub fn first_page(&self) -> Self {
        Self {
            page: self.page.with_number(NonZeroUsize::MIN),
            ..self.clone()
        }
    }
}
