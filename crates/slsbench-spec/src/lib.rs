//! OpenAPI document model and traversal
//!
//! # Architecture
//!
//! ```text
//! YAML/JSON → raw (serde mirror) → Document (schema arena) → SpecWalker → Visitor
//!                                        ↓
//!                                  YAML/JSON writer
//! ```
//!
//! `$ref`s to component schemas resolve to a single arena node, so
//! recursive schemas are cycles in the arena and the walker's active-stack
//! discipline is what guarantees termination.
//!
//! # Example
//!
//! ```rust,ignore
//! use slsbench_spec::prelude::*;
//!
//! struct Paths(Vec<String>);
//!
//! impl Visitor for Paths {
//!     fn visit_property(&mut self, path: &str, _schema: SchemaId) {
//!         self.0.push(path.to_string());
//!     }
//! }
//!
//! let doc = load_document("api.yaml")?;
//! let mut paths = Paths(Vec::new());
//! SpecWalker::new(&doc).walk(&mut paths);
//! ```

pub mod document;
pub mod error;
pub mod loader;
mod raw;
pub mod walker;

pub use document::{
    AdditionalProperties, Document, MediaType, Method, Operation, Parameter, ParameterLocation,
    PathItem, RequestBody, Response, Schema, SchemaId, COMPONENT_SCHEMA_PREFIX,
};
pub use error::{SpecError, SpecResult};
pub use loader::{load_document, save_yaml, Format};
pub use walker::{Scope, SpecWalker, Visitor};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for walking documents
    pub use crate::document::{Document, Method, ParameterLocation, Schema, SchemaId};
    pub use crate::error::{SpecError, SpecResult};
    pub use crate::loader::{load_document, save_yaml};
    pub use crate::walker::{Scope, SpecWalker, Visitor};
}
