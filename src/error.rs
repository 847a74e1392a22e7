//! Error types for the roster pipeline.
//!
//! The pipeline stages themselves never fail: bad values degrade to
//! "no match" or "empty". Errors only arise at the edges, when query
//! parameters are constructed or records and schemas are loaded.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building queries or loading records and schemas.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Page number or page size was zero.
    #[error("invalid page: number={number}, size={size} (both must be at least 1)")]
    InvalidPage { number: usize, size: usize },

    /// A `field=value` filter argument could not be parsed.
    #[error("invalid filter '{0}' (expected field=value)")]
    InvalidFilter(String),

    /// A `field[:asc|desc]` sort argument could not be parsed.
    #[error("invalid sort '{0}' (expected field, field:asc or field:desc)")]
    InvalidSort(String),

    /// No built-in schema exists under this name.
    #[error("unknown schema preset '{0}'")]
    UnknownPreset(String),

    /// Reading a records or schema file failed.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record or schema JSON was malformed.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema YAML was malformed.
    #[error("malformed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Writing an export payload failed.
    #[error("export failed: {0}")]
    Export(#[source] std::io::Error),
}

impl PipelineError {
    /// Classify a serde_json failure raised while writing output: a failing
    /// writer is an export error, anything else is a JSON error.
    pub fn from_json_write(err: serde_json::Error) -> Self {
        if err.is_io() {
            PipelineError::Export(err.into())
        } else {
            PipelineError::Json(err)
        }
    }
}
