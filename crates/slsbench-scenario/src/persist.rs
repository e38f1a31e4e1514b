//! Scenario files
//!
//! JSON with vertices keyed by their id. Loading validates the structure, so a
//! loaded graph always has dense ids and no dangling edges.

use crate::error::ScenarioError;
use crate::graph::ScenarioGraph;
use std::fs;
use std::path::Path;
use tracing::info;

/// Serialize `graph` to a JSON string
pub fn to_json_string(graph: &ScenarioGraph, pretty: bool) -> Result<String, ScenarioError> {
    let json = if pretty {
        serde_json::to_string_pretty(graph)?
    } else {
        serde_json::to_string(graph)?
    };
    Ok(json)
}

/// Parse a graph from JSON
pub fn from_json_str(json: &str) -> Result<ScenarioGraph, ScenarioError> {
    Ok(serde_json::from_str(json)?)
}

/// Write `graph` to `path`
pub fn save_scenario(
    graph: &ScenarioGraph,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ScenarioError> {
    let path = path.as_ref();
    let json = to_json_string(graph, pretty)?;
    fs::write(path, json).map_err(|e| ScenarioError::io_error(path, e))?;
    info!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "scenario saved"
    );
    Ok(())
}

/// Read a graph previously written by [`save_scenario`]
pub fn load_scenario(path: impl AsRef<Path>) -> Result<ScenarioGraph, ScenarioError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| ScenarioError::io_error(path, e))?;
    from_json_str(&json)
}
