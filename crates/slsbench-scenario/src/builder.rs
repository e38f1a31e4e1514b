//! Selection-driven scenario construction
//!
//! The builder is a small state machine over a read-only catalogue of
//! operations. Each [`Action`] is one menu entry; applying it asks the
//! selector a short sequence of questions and either changes the graph or
//! reports why it did not. A failed selection only ever abandons the
//! current action.

use crate::graph::{ScenarioGraph, Vertex, VertexId};
use slsbench_core::{DataModel, Field, Operation, SelectError, Selector};
use slsbench_spec::Method;
use tracing::{debug, info, warn};

const MENU_PROMPT: &str = "Select action";
const DEFAULT_RESPONSE: &str = "default";

/// One entry of the builder's main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AddVertex,
    AddEdge,
    AddMapping,
    Finish,
}

impl Action {
    /// Menu order
    pub const ALL: [Action; 4] = [
        Action::AddVertex,
        Action::AddEdge,
        Action::AddMapping,
        Action::Finish,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Action::AddVertex => "Add new endpoint (vertex)",
            Action::AddEdge => "Add connection between endpoints",
            Action::AddMapping => "Add field mapping to connection",
            Action::Finish => "Done - finish building graph",
        }
    }

    fn menu() -> Vec<String> {
        Self::ALL.iter().map(|a| a.label().to_string()).collect()
    }
}

/// Why an action left the graph unchanged
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("no operations available")]
    NoOperations,

    #[error("need at least 2 vertices to create a connection")]
    NotEnoughVertices,

    #[error("no other vertices available as target")]
    NoTargetCandidates,

    #[error("connection already exists between [{from}] and [{to}]")]
    DuplicateEdge { from: VertexId, to: VertexId },

    #[error("no connections exist, create a connection first")]
    NoEdges,

    #[error("no request fields available in source vertex")]
    NoSourceFields,

    #[error("no request fields available in target vertex")]
    NoTargetFields,

    #[error(transparent)]
    InvalidEdge(#[from] crate::error::GraphError),
}

/// Result of applying one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The graph changed
    Applied,
    /// A precondition failed; the graph is unchanged
    Rejected(Rejection),
    /// A selection failed midway; the graph is unchanged
    Abandoned(SelectError),
    /// The user asked to stop
    Finished,
}

/// An operation the user can turn into a vertex
#[derive(Debug, Clone, Copy)]
pub struct CatalogueEntry<'m> {
    pub path: &'m str,
    pub method: Method,
    pub operation: &'m Operation,
}

impl CatalogueEntry<'_> {
    /// `<METHOD> <path>`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    /// Sorted response codes with their option labels
    fn response_options(&self) -> Vec<(String, String)> {
        self.operation
            .responses
            .iter()
            .map(|(code, body)| {
                let label = if body.is_some() {
                    code.clone()
                } else {
                    format!("{code} (no body)")
                };
                (code.clone(), label)
            })
            .collect()
    }
}

/// Builds a [`ScenarioGraph`] from answers to a [`Selector`]
#[derive(Debug)]
pub struct ScenarioBuilder<'m> {
    catalogue: Vec<CatalogueEntry<'m>>,
    graph: ScenarioGraph,
}

impl<'m> ScenarioBuilder<'m> {
    /// Builder over every operation of `model`, sorted by path then method
    #[must_use]
    pub fn new(model: &'m DataModel) -> Self {
        Self::with_graph(model, ScenarioGraph::new())
    }

    /// Continue building an existing graph
    #[must_use]
    pub fn with_graph(model: &'m DataModel, graph: ScenarioGraph) -> Self {
        let catalogue = model
            .operations()
            .map(|(path, method, operation)| CatalogueEntry {
                path,
                method,
                operation,
            })
            .collect();
        Self { catalogue, graph }
    }

    #[inline]
    #[must_use]
    pub fn catalogue(&self) -> &[CatalogueEntry<'m>] {
        &self.catalogue
    }

    #[inline]
    #[must_use]
    pub fn graph(&self) -> &ScenarioGraph {
        &self.graph
    }

    #[must_use]
    pub fn into_graph(self) -> ScenarioGraph {
        self.graph
    }

    /// Run the menu loop until the user finishes or a menu selection fails
    pub fn run<S: Selector>(self, selector: S) -> ScenarioGraph {
        self.run_with(selector, |_, _, _| {})
    }

    /// [`run`](Self::run), calling `on_step` after every action
    pub fn run_with<S, F>(mut self, mut selector: S, mut on_step: F) -> ScenarioGraph
    where
        S: Selector,
        F: FnMut(&ScenarioGraph, Action, &ActionOutcome),
    {
        if self.catalogue.is_empty() {
            info!("no operations found in data model, scenario is empty");
            return self.graph;
        }
        info!(operations = self.catalogue.len(), "starting scenario builder");

        let menu = Action::menu();
        loop {
            let action = match selector.select(MENU_PROMPT, &menu) {
                Ok(selection) => match Action::ALL.get(selection.index) {
                    Some(action) => *action,
                    None => break,
                },
                Err(err) => {
                    warn!(error = %err, "menu selection failed, finishing scenario");
                    break;
                }
            };

            let outcome = self.apply(action, &mut selector);
            match &outcome {
                ActionOutcome::Applied => debug!(?action, "action applied"),
                ActionOutcome::Rejected(reason) => warn!(?action, %reason, "action rejected"),
                ActionOutcome::Abandoned(err) => warn!(?action, error = %err, "action abandoned"),
                ActionOutcome::Finished => {}
            }
            on_step(&self.graph, action, &outcome);
            if outcome == ActionOutcome::Finished {
                break;
            }
        }

        info!(
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            "scenario builder finished"
        );
        self.graph
    }

    /// Apply one action, asking `selector` whatever it needs
    pub fn apply<S: Selector + ?Sized>(
        &mut self,
        action: Action,
        selector: &mut S,
    ) -> ActionOutcome {
        let result = match action {
            Action::AddVertex => self.add_vertex(selector),
            Action::AddEdge => self.add_edge(selector),
            Action::AddMapping => self.add_mapping(selector),
            Action::Finish => return ActionOutcome::Finished,
        };
        match result {
            Ok(Ok(())) => ActionOutcome::Applied,
            Ok(Err(rejection)) => ActionOutcome::Rejected(rejection),
            Err(err) => ActionOutcome::Abandoned(err),
        }
    }

    fn add_vertex<S: Selector + ?Sized>(
        &mut self,
        selector: &mut S,
    ) -> Result<Result<(), Rejection>, SelectError> {
        if self.catalogue.is_empty() {
            return Ok(Err(Rejection::NoOperations));
        }
        let options: Vec<String> = self.catalogue.iter().map(CatalogueEntry::label).collect();
        let chosen = selector.select("Select endpoint to add", &options)?;
        let entry = *chosen_item(&self.catalogue, chosen.index)?;

        let responses = entry.response_options();
        let code = match responses.as_slice() {
            [] => DEFAULT_RESPONSE.to_string(),
            [(only, _)] => only.clone(),
            _ => {
                let labels: Vec<String> =
                    responses.iter().map(|(_, label)| label.clone()).collect();
                let picked = selector.select("Select response code", &labels)?;
                chosen_item(&responses, picked.index)?.0.clone()
            }
        };

        let vertex = Vertex::from_operation(entry.path, entry.operation, code);
        let label = vertex.label();
        let id = self.graph.add_vertex(vertex);
        info!(%id, %label, "added vertex");
        Ok(Ok(()))
    }

    fn add_edge<S: Selector + ?Sized>(
        &mut self,
        selector: &mut S,
    ) -> Result<Result<(), Rejection>, SelectError> {
        if self.graph.vertex_count() < 2 {
            return Ok(Err(Rejection::NotEnoughVertices));
        }

        let sources: Vec<(VertexId, String)> = self
            .graph
            .vertices()
            .map(|(id, v)| (id, format!("[{id}] {}", v.label())))
            .collect();
        let source_labels: Vec<String> = sources.iter().map(|(_, l)| l.clone()).collect();
        let picked = selector.select("Select SOURCE vertex (response provider)", &source_labels)?;
        let from = chosen_item(&sources, picked.index)?.0;

        let targets: Vec<&(VertexId, String)> =
            sources.iter().filter(|(id, _)| *id != from).collect();
        if targets.is_empty() {
            return Ok(Err(Rejection::NoTargetCandidates));
        }
        let target_labels: Vec<String> = targets.iter().map(|(_, l)| l.clone()).collect();
        let picked = selector.select("Select TARGET vertex (request consumer)", &target_labels)?;
        let to = chosen_item(&targets, picked.index)?.0;

        if self.graph.edge(from, to).is_some() {
            return Ok(Err(Rejection::DuplicateEdge { from, to }));
        }
        if let Err(err) = self.graph.add_edge(from, to) {
            return Ok(Err(err.into()));
        }
        info!(%from, %to, "added connection");
        Ok(Ok(()))
    }

    fn add_mapping<S: Selector + ?Sized>(
        &mut self,
        selector: &mut S,
    ) -> Result<Result<(), Rejection>, SelectError> {
        if self.graph.edge_count() == 0 {
            return Ok(Err(Rejection::NoEdges));
        }

        let edge_labels: Vec<String> = self
            .graph
            .edges()
            .iter()
            .map(|e| self.graph.edge_label(e))
            .collect();
        let picked = selector.select("Select connection to add mapping to", &edge_labels)?;
        let edge_index = picked.index;
        let (from, to) = {
            let edge = chosen_item(self.graph.edges(), edge_index)?;
            (edge.from, edge.to)
        };

        let (Some(source), Some(target)) = (self.graph.vertex(from), self.graph.vertex(to)) else {
            let missing = if self.graph.vertex(from).is_none() { from } else { to };
            return Ok(Err(crate::error::GraphError::VertexNotFound(missing).into()));
        };
        let source_fields = request_field_paths(source);
        if source_fields.is_empty() {
            return Ok(Err(Rejection::NoSourceFields));
        }
        let target_fields = request_field_paths(target);
        if target_fields.is_empty() {
            return Ok(Err(Rejection::NoTargetFields));
        }

        let source_field =
            selector.select("Select SOURCE field (from previous request)", &source_fields)?;
        let target_field = selector.select("Select TARGET field (to map to)", &target_fields)?;

        let Some(edge) = self.graph.edge_at_mut(edge_index) else {
            return Ok(Err(Rejection::NoEdges));
        };
        if let Some(previous) =
            edge.add_mapping(source_field.label.clone(), target_field.label.clone())
        {
            warn!(
                source = %source_field.label,
                %previous,
                "overwriting existing mapping"
            );
        }
        info!(
            %from,
            %to,
            source = %source_field.label,
            target = %target_field.label,
            "added mapping"
        );
        Ok(Ok(()))
    }
}

/// Build a scenario over `model` and log its execution order
///
/// A cyclic scenario is still returned; the cycle is reported with the
/// vertices involved.
pub fn create_scenario<S: Selector>(model: &DataModel, selector: S) -> ScenarioGraph {
    let graph = ScenarioBuilder::new(model).run(selector);
    log_execution_order(&graph);
    graph
}

/// Log the topological order of `graph`, or the cycles preventing one
pub fn log_execution_order(graph: &ScenarioGraph) {
    match graph.topological_sort() {
        Ok(order) => {
            for (step, id) in order.iter().enumerate() {
                if let Some(vertex) = graph.vertex(*id) {
                    info!(
                        step = step + 1,
                        vertex = %id,
                        label = %vertex.label(),
                        "execution order"
                    );
                }
            }
        }
        Err(err) => {
            let groups: Vec<String> = graph
                .cyclic_groups()
                .iter()
                .map(|group| {
                    group
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .collect();
            warn!(error = %err, cycles = ?groups, "scenario has no execution order");
        }
    }
}

/// Field paths a vertex's request exposes for mapping
///
/// Body fields come first as `body.<name>`, nested properties extend the
/// path with `.<child>` and array items with `[]`. Parameters follow as
/// `<in>.<name>`.
#[must_use]
pub fn request_field_paths(vertex: &Vertex) -> Vec<String> {
    let mut paths = Vec::new();
    if let Some(body) = &vertex.request_body {
        for field in &body.fields {
            push_field_paths(field, "body", &mut paths);
        }
    }
    for param in &vertex.parameters {
        let location = param.location.map_or("param", |loc| loc.as_str());
        paths.push(format!("{location}.{}", param.name));
    }
    paths
}

fn push_field_paths(field: &Field, prefix: &str, out: &mut Vec<String>) {
    let path = format!("{prefix}.{}", field.name);
    out.push(path.clone());
    push_nested_paths(field, &path, out);
}

fn push_nested_paths(field: &Field, path: &str, out: &mut Vec<String>) {
    for child in field.properties.values() {
        push_field_paths(child, path, out);
    }
    if let Some(items) = &field.items {
        push_nested_paths(items, &format!("{path}[]"), out);
    }
}

/// `items[index]`, or `OutOfRange` when a selector answers past the end
fn chosen_item<T>(items: &[T], index: usize) -> Result<&T, SelectError> {
    items.get(index).ok_or(SelectError::OutOfRange {
        index,
        len: items.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slsbench_core::{DataStructure, ReplaySelector};
    use slsbench_spec::ParameterLocation;

    fn model() -> DataModel {
        let mut model = DataModel::new();
        let get = model.operation_mut("/users", Method::Get);
        get.responses.insert("200".into(), None);
        let post = model.operation_mut("/users", Method::Post);
        post.responses.insert("201".into(), None);
        post.responses.insert("400".into(), None);
        model
    }

    #[test]
    fn menu_labels_are_stable() {
        assert_eq!(
            Action::menu(),
            vec![
                "Add new endpoint (vertex)",
                "Add connection between endpoints",
                "Add field mapping to connection",
                "Done - finish building graph",
            ]
        );
    }

    #[test]
    fn single_response_code_is_chosen_without_asking() {
        let model = model();
        let mut builder = ScenarioBuilder::new(&model);
        let mut selector = ReplaySelector::new([0]);
        assert_eq!(builder.apply(Action::AddVertex, &mut selector), ActionOutcome::Applied);
        assert_eq!(selector.prompts(), ["Select endpoint to add"]);
        assert_eq!(builder.graph().vertex(VertexId(0)).unwrap().response_code, "200");
    }

    #[test]
    fn several_response_codes_are_offered_sorted() {
        let model = model();
        let mut builder = ScenarioBuilder::new(&model);
        let mut selector = ReplaySelector::new([1, 1]);
        assert_eq!(builder.apply(Action::AddVertex, &mut selector), ActionOutcome::Applied);
        assert_eq!(builder.graph().vertex(VertexId(0)).unwrap().label(), "POST /users [400]");
    }

    #[test]
    fn operation_without_responses_uses_default_code() {
        let mut model = DataModel::new();
        model.operation_mut("/ping", Method::Head);
        let mut builder = ScenarioBuilder::new(&model);
        builder.apply(Action::AddVertex, &mut ReplaySelector::new([0]));
        assert_eq!(builder.graph().vertex(VertexId(0)).unwrap().response_code, "default");
    }

    #[test]
    fn abandoned_vertex_leaves_graph_unchanged() {
        let model = model();
        let mut builder = ScenarioBuilder::new(&model);
        // Endpoint picked, response code prompt runs out of answers.
        let outcome = builder.apply(Action::AddVertex, &mut ReplaySelector::new([1]));
        assert_eq!(outcome, ActionOutcome::Abandoned(SelectError::Exhausted));
        assert!(builder.graph().is_empty());
    }

    #[test]
    fn edge_needs_two_vertices() {
        let model = model();
        let mut builder = ScenarioBuilder::new(&model);
        builder.apply(Action::AddVertex, &mut ReplaySelector::new([0]));
        assert_eq!(
            builder.apply(Action::AddEdge, &mut ReplaySelector::default()),
            ActionOutcome::Rejected(Rejection::NotEnoughVertices)
        );
    }

    #[test]
    fn mapping_needs_an_edge() {
        let model = model();
        let mut builder = ScenarioBuilder::new(&model);
        assert_eq!(
            builder.apply(Action::AddMapping, &mut ReplaySelector::default()),
            ActionOutcome::Rejected(Rejection::NoEdges)
        );
    }

    #[test]
    fn field_paths_cover_nested_body_and_parameters() {
        let mut author = Field::new("author", "p.author").with_type("object");
        author
            .properties
            .insert("name".into(), Field::new("name", "p.author.name"));
        let mut tags = Field::new("tags", "p.tags").with_type("array");
        let mut item = Field::new("", "p.tags[]").with_type("object");
        item.properties.insert("label".into(), Field::new("label", "p.tags[].label"));
        tags.items = Some(Box::new(item));

        let mut vertex = Vertex::new("/posts/{id}", Method::Put, "200");
        vertex.request_body = Some(DataStructure {
            name: "Post".into(),
            reference: None,
            content_type: "application/json".into(),
            fields: vec![Field::new("title", "p.title"), author, tags],
        });
        vertex.parameters = vec![
            Field::new("id", "p.id").with_location(ParameterLocation::Path),
            Field::new("loose", "p.loose"),
        ];

        assert_eq!(
            request_field_paths(&vertex),
            vec![
                "body.title",
                "body.author",
                "body.author.name",
                "body.tags",
                "body.tags[].label",
                "path.id",
                "param.loose",
            ]
        );
    }
}
