//! Error types for scenario graphs and their persistence

use crate::graph::VertexId;
use std::path::PathBuf;

/// Structural errors of a [`ScenarioGraph`](crate::graph::ScenarioGraph)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Topological order does not exist; no partial order is returned
    #[error("cycle detected in scenario graph: {remaining} vertices cannot be ordered")]
    CycleDetected { remaining: usize },

    /// Edge endpoint or lookup refers to a vertex that does not exist
    #[error("vertex {0} not found")]
    VertexNotFound(VertexId),

    /// Serialized vertex ids are not `0..n`
    #[error("vertex ids must be dense: expected {expected}, found {found}")]
    SparseVertexIds { expected: VertexId, found: VertexId },
}

/// Errors reading or writing scenario files
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// IO error at the file boundary
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed scenario JSON, including structural violations
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScenarioError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
