//! Error types for document loading and writing
//!
//! Traversal itself never fails: absent schemas, bodies or responses are
//! "nothing to visit". Only the file and format boundary produces errors.

use std::path::PathBuf;

/// Errors raised while reading or writing an OpenAPI document
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// IO error at the file boundary
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid YAML (or does not match the OpenAPI shape)
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Document is not valid JSON (or does not match the OpenAPI shape)
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither YAML nor JSON
    #[error("unsupported document format: '{0}'")]
    UnsupportedFormat(String),

    /// A `$ref` that is not an internal component reference
    #[error("unresolved reference: {0}")]
    UnresolvedRef(String),
}

impl SpecError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for document operations
pub type SpecResult<T> = Result<T, SpecError>;
