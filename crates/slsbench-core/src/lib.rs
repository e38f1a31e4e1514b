//! slsbench core: data model extraction and hint enrichment
//!
//! - [`DataModelBuilder`]: walker visitor producing endpoints → operations → fields
//! - [`HintEnricher`]: walker visitor assigning semantic hints to leaf fields
//! - [`Selector`]: the single-choice capability both interactive flows run on
//!
//! # Example
//!
//! ```rust,ignore
//! use slsbench_core::{build_data_model, enrich_document, ReplaySelector};
//! use slsbench_spec::load_document;
//!
//! let mut doc = load_document("api.yaml")?;
//! enrich_document(&mut doc, ReplaySelector::new([4, 23]));
//! let model = build_data_model(&doc);
//! for (path, method, _) in model.operations() {
//!     println!("{method} {path}");
//! }
//! ```

#![allow(missing_docs)]

pub mod builder;
pub mod enrich;
pub mod error;
pub mod hint;
pub mod model;
pub mod prompt;
pub mod select;

pub use builder::{build_data_model, DataModelBuilder};
pub use enrich::{collect_hint_requests, enrich_document, EnrichReport, HintEnricher, HintRequest};
pub use error::{SelectError, SelectResult};
pub use hint::{Hint, HintCategory};
pub use model::{DataModel, DataStructure, Endpoint, Field, Operation};
pub use prompt::{hint_prompt, readable_path};
pub use select::{ReplaySelector, Selection, Selector};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building data models
    pub use crate::{
        build_data_model, enrich_document, DataModel, Field, Hint, HintEnricher, ReplaySelector,
        SelectError, Selection, Selector,
    };
}
