//! Interactive hint enrichment
//!
//! Runs in two phases over the document: an immutable walk collects one
//! request per leaf schema node, then each request is put to the selector
//! and the answer is written back onto the node as `x-user-hint`.
//!
//! Containers never get a hint. Arrays redirect to their innermost item
//! schema (path gains `[]`), objects with properties are skipped because
//! the walker reaches their properties on its own. A composition is a
//! container only when one of its branches is structured; wrapping a scalar
//! in `allOf` keeps the field a leaf.

use crate::hint::Hint;
use crate::prompt::hint_prompt;
use crate::select::Selector;
use slsbench_spec::{Document, Schema, SchemaId, SpecWalker, Visitor};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Outcome counters of one enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichReport {
    /// Leaf fields the user was asked about
    pub requested: usize,
    /// Fields that received a hint
    pub applied: usize,
    /// Fields skipped after a failed selection
    pub abandoned: usize,
}

/// A leaf schema awaiting a hint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    /// Walker path, with `[]` appended for each array redirect
    pub path: String,
    pub target: SchemaId,
}

/// Assigns hints to leaf fields through a [`Selector`]
#[derive(Debug)]
pub struct HintEnricher<S> {
    selector: S,
}

impl<S: Selector> HintEnricher<S> {
    #[must_use]
    pub fn new(selector: S) -> Self {
        Self { selector }
    }

    /// Give back the selector, e.g. to inspect a scripted one
    #[must_use]
    pub fn into_selector(self) -> S {
        self.selector
    }

    /// Prompt for every leaf field of `document` and record the answers
    ///
    /// A failed selection abandons that field only.
    pub fn enrich(&mut self, document: &mut Document) -> EnrichReport {
        let requests = collect_hint_requests(document);
        let options = Hint::options();
        let mut report = EnrichReport {
            requested: requests.len(),
            ..EnrichReport::default()
        };

        for request in requests {
            let label = hint_prompt(&request.path);
            let selection = match self.selector.select(&label, &options) {
                Ok(selection) => selection,
                Err(err) => {
                    warn!(
                        path = %request.path,
                        error = %err,
                        "hint selection failed, skipping field"
                    );
                    report.abandoned += 1;
                    continue;
                }
            };
            let Some(hint) = Hint::ALL.get(selection.index).copied() else {
                report.abandoned += 1;
                continue;
            };
            if let Some(schema) = document.schema_mut(request.target) {
                schema.user_hint = Some(hint.as_str().to_string());
                report.applied += 1;
                debug!(path = %request.path, %hint, "hint applied");
            }
        }

        info!(
            requested = report.requested,
            applied = report.applied,
            abandoned = report.abandoned,
            "enrichment finished"
        );
        report
    }
}

/// Run one enrichment pass with `selector`
pub fn enrich_document<S: Selector>(document: &mut Document, selector: S) -> EnrichReport {
    HintEnricher::new(selector).enrich(document)
}

/// Leaf schemas reachable from `document`, one request per node
///
/// A node shared by several paths is asked about once, under the first path
/// that reaches it.
#[must_use]
pub fn collect_hint_requests(document: &Document) -> Vec<HintRequest> {
    let mut collector = RequestCollector {
        document,
        requests: Vec::new(),
        seen: HashSet::new(),
    };
    SpecWalker::new(document).walk(&mut collector);
    collector.requests
}

struct RequestCollector<'d> {
    document: &'d Document,
    requests: Vec<HintRequest>,
    seen: HashSet<SchemaId>,
}

impl Visitor for RequestCollector<'_> {
    fn visit_property(&mut self, path: &str, schema: SchemaId) {
        let Some(request) = leaf_target(self.document, schema, path) else {
            return;
        };
        if self.seen.insert(request.target) {
            self.requests.push(request);
        }
    }
}

fn is_container(document: &Document, schema: &Schema) -> bool {
    !schema.properties.is_empty()
        || schema.additional_properties_schema().is_some()
        || composes_structure(document, schema, &mut HashSet::new())
}

/// Whether an `allOf`/`anyOf`/`oneOf` branch, followed through nested
/// compositions, is an object, an array or a map
///
/// A composition of scalars (`allOf: [{$ref: Status}]`) is a leaf.
fn composes_structure(document: &Document, schema: &Schema, seen: &mut HashSet<SchemaId>) -> bool {
    let branches = schema.all_of.iter().chain(&schema.any_of).chain(&schema.one_of);
    for &branch in branches {
        if !seen.insert(branch) {
            continue;
        }
        let Some(node) = document.schema(branch) else {
            continue;
        };
        if node.is_object()
            || node.is_array()
            || !node.properties.is_empty()
            || node.additional_properties_schema().is_some()
            || composes_structure(document, node, seen)
        {
            return true;
        }
    }
    false
}

/// Follow array items down to a leaf; `None` for containers
fn leaf_target(document: &Document, schema: SchemaId, path: &str) -> Option<HintRequest> {
    let mut id = schema;
    let mut path = path.to_string();
    let mut followed = HashSet::new();

    loop {
        if !followed.insert(id) {
            // Array whose items lead back to itself.
            return None;
        }
        let node = document.schema(id)?;
        if node.is_array() {
            id = node.items?;
            path.push_str("[]");
            continue;
        }
        if is_container(document, node) {
            return None;
        }
        return Some(HintRequest { path, target: id });
    }
}
