//! Per-table field configuration.
//!
//! A [`TableSchema`] tells the generic pipeline which fields sort as
//! numbers, which as text, which are searched, which date the range filter
//! targets, and how each export column is formatted. The console ships
//! three tables, available as presets; others load from YAML or JSON.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Names accepted by [`TableSchema::preset`].
pub const PRESETS: [&str; 3] = ["hr-managers", "company-hr-managers", "staff"];

/// What to do with a record whose date is missing or unparseable while a
/// date range is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Treat the record as out of range.
    #[default]
    Exclude,
    /// Keep the record.
    Include,
}

/// How a field compares when sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKind {
    Numeric,
    Text,
}

/// Display format of an export column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnFormat {
    #[default]
    Text,
    /// List joined with `", "`.
    List,
    /// Calendar date as `M/D/YYYY`.
    Date,
    /// Money with symbol, grouping and two decimals.
    Currency { symbol: String },
    /// Number with thousands separators.
    Number,
    /// Whole number with thousands separators.
    Integer,
}

/// One export column: source field, header label and format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportColumn {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub format: ColumnFormat,
}

impl ExportColumn {
    pub fn new(id: &str, label: &str, format: ColumnFormat) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            format,
        }
    }
}

/// Field configuration for one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSchema {
    pub name: String,
    /// Title handed to the export collaborator.
    pub title: String,
    pub numeric_fields: Vec<String>,
    pub text_fields: Vec<String>,
    pub search_fields: Vec<String>,
    /// Field the date range criterion applies to.
    pub date_field: Option<String>,
    pub date_policy: DatePolicy,
    /// Field whose values the summary counts.
    pub status_field: Option<String>,
    /// Numeric fields summed and averaged by the summary.
    pub summary_fields: Vec<String>,
    pub columns: Vec<ExportColumn>,
    pub page_size: usize,
}

impl Default for TableSchema {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: String::new(),
            numeric_fields: Vec::new(),
            text_fields: Vec::new(),
            search_fields: Vec::new(),
            date_field: None,
            date_policy: DatePolicy::Exclude,
            status_field: None,
            summary_fields: Vec::new(),
            columns: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl TableSchema {
    /// How `field` sorts, or `None` if the table does not sort on it.
    pub fn sort_kind(&self, field: &str) -> Option<SortKind> {
        if self.numeric_fields.iter().any(|f| f == field) {
            Some(SortKind::Numeric)
        } else if self.text_fields.iter().any(|f| f == field) {
            Some(SortKind::Text)
        } else {
            None
        }
    }

    pub fn with_date_policy(mut self, policy: DatePolicy) -> Self {
        self.date_policy = policy;
        self
    }

    /// Look up a built-in schema by name.
    pub fn preset(name: &str) -> Result<Self, PipelineError> {
        match name {
            "hr-managers" => Ok(Self::hr_managers()),
            "company-hr-managers" => Ok(Self::company_hr_managers()),
            "staff" => Ok(Self::staff()),
            other => Err(PipelineError::UnknownPreset(other.to_string())),
        }
    }

    /// HR managers across all companies.
    pub fn hr_managers() -> Self {
        Self {
            name: "hr-managers".to_string(),
            title: "HR Managers".to_string(),
            numeric_fields: strings(&["rating", "employeesManaged", "experience"]),
            text_fields: strings(&[
                "name",
                "email",
                "company",
                "department",
                "status",
                "location",
                "joinDate",
            ]),
            search_fields: strings(&[
                "name",
                "email",
                "company",
                "department",
                "location",
                "specializations",
            ]),
            date_field: Some("joinDate".to_string()),
            date_policy: DatePolicy::Exclude,
            status_field: Some("status".to_string()),
            summary_fields: strings(&["employeesManaged", "rating", "experience"]),
            columns: vec![
                ExportColumn::new("name", "Name", ColumnFormat::Text),
                ExportColumn::new("email", "Email", ColumnFormat::Text),
                ExportColumn::new("company", "Company", ColumnFormat::Text),
                ExportColumn::new("department", "Department", ColumnFormat::Text),
                ExportColumn::new("status", "Status", ColumnFormat::Text),
                ExportColumn::new("rating", "Rating", ColumnFormat::Number),
                ExportColumn::new("employeesManaged", "Employees", ColumnFormat::Integer),
                ExportColumn::new("joinDate", "Join Date", ColumnFormat::Date),
                ExportColumn::new("specializations", "Specializations", ColumnFormat::List),
            ],
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// HR managers of a single company: no company column, smaller pages.
    pub fn company_hr_managers() -> Self {
        let mut schema = Self::hr_managers();
        schema.name = "company-hr-managers".to_string();
        schema.title = "Company HR Managers".to_string();
        schema.search_fields.retain(|f| f != "company");
        schema.columns.retain(|c| c.id != "company");
        schema.page_size = 5;
        schema
    }

    /// Staff members across all companies.
    pub fn staff() -> Self {
        Self {
            name: "staff".to_string(),
            title: "Staff".to_string(),
            numeric_fields: strings(&["salary", "experience", "rating"]),
            text_fields: strings(&[
                "name",
                "email",
                "position",
                "department",
                "company",
                "status",
                "manager",
                "hireDate",
            ]),
            search_fields: strings(&[
                "name",
                "email",
                "position",
                "department",
                "company",
                "skills",
            ]),
            date_field: Some("hireDate".to_string()),
            date_policy: DatePolicy::Exclude,
            status_field: Some("status".to_string()),
            summary_fields: strings(&["salary", "experience", "rating"]),
            columns: vec![
                ExportColumn::new("name", "Name", ColumnFormat::Text),
                ExportColumn::new("position", "Position", ColumnFormat::Text),
                ExportColumn::new("department", "Department", ColumnFormat::Text),
                ExportColumn::new("company", "Company", ColumnFormat::Text),
                ExportColumn::new("status", "Status", ColumnFormat::Text),
                ExportColumn::new(
                    "salary",
                    "Salary",
                    ColumnFormat::Currency {
                        symbol: "$".to_string(),
                    },
                ),
                ExportColumn::new("experience", "Experience (yrs)", ColumnFormat::Integer),
                ExportColumn::new("hireDate", "Hire Date", ColumnFormat::Date),
                ExportColumn::new("skills", "Skills", ColumnFormat::List),
            ],
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, PipelineError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a schema file. `.json` files parse as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }
}
