//! slsbench scenario: ordered multi-request test scenarios
//!
//! - [`ScenarioGraph`]: vertices (operation + response code) and edges
//!   carrying field mappings, with Kahn ordering and cycle reporting
//! - [`ScenarioBuilder`]: menu-driven construction through a [`Selector`]
//! - [`save_scenario`] / [`load_scenario`]: JSON persistence
//!
//! # Example
//!
//! ```rust,ignore
//! use slsbench_core::{build_data_model, ReplaySelector};
//! use slsbench_scenario::{create_scenario, save_scenario};
//!
//! let model = build_data_model(&doc);
//! let graph = create_scenario(&model, ReplaySelector::new([0, 0, 3]));
//! save_scenario(&graph, "scenario.json", true)?;
//! ```
//!
//! [`Selector`]: slsbench_core::Selector

#![allow(missing_docs)]

pub mod builder;
pub mod error;
pub mod graph;
pub mod persist;

pub use builder::{
    create_scenario, log_execution_order, request_field_paths, Action, ActionOutcome,
    CatalogueEntry, Rejection, ScenarioBuilder,
};
pub use error::{GraphError, ScenarioError};
pub use graph::{Edge, ScenarioGraph, Vertex, VertexId};
pub use persist::{from_json_str, load_scenario, save_scenario, to_json_string};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building scenarios
    pub use crate::builder::{create_scenario, Action, ActionOutcome, ScenarioBuilder};
    pub use crate::error::{GraphError, ScenarioError};
    pub use crate::graph::{Edge, ScenarioGraph, Vertex, VertexId};
    pub use crate::persist::{load_scenario, save_scenario};
}
