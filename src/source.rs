//! Record sources.
//!
//! The console currently reads static mock data; a backend would replace
//! it behind [`RecordSource`]. Sources receive the filter criteria and may
//! pre-narrow on their side. The pipeline filters again afterwards, which
//! is harmless because filtering is idempotent.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::PipelineError;
use crate::query::FilterCriteria;

/// Supplier of records for one table.
pub trait RecordSource<R> {
    fn fetch(&self, criteria: &FilterCriteria) -> Result<Vec<R>, PipelineError>;
}

/// In-memory records, returned in full regardless of criteria.
#[derive(Debug, Clone, Default)]
pub struct StaticSource<R> {
    records: Vec<R>,
}

impl<R> StaticSource<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }
}

impl<R: Clone> RecordSource<R> for StaticSource<R> {
    fn fetch(&self, _criteria: &FilterCriteria) -> Result<Vec<R>, PipelineError> {
        Ok(self.records.clone())
    }
}

/// A JSON file holding an array of records.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: DeserializeOwned> RecordSource<R> for JsonFileSource {
    fn fetch(&self, _criteria: &FilterCriteria) -> Result<Vec<R>, PipelineError> {
        let text = fs::read_to_string(&self.path).map_err(|source| PipelineError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records: Vec<R> = serde_json::from_str(&text)?;
        debug!(path = %self.path.display(), count = records.len(), "loaded records");
        Ok(records)
    }
}
