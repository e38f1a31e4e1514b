//! Scenario graph: vertices in an append-only arena, edges in a list
//!
//! Vertex ids are dense and assigned in insertion order (`id` = vertex count
//! at insertion). There is no removal, so ids are never reused or renumbered.
//! The graph itself permits parallel edges; refusing a second edge between
//! the same pair is the builder's job.

use crate::error::GraphError;
use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize, Serializer};
use slsbench_core::{DataStructure, Field, Operation};
use slsbench_spec::Method;
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Dense vertex id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub usize);

impl VertexId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One concrete operation invocation answering with one response code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vertex {
    pub path: String,
    pub method: Method,
    #[serde(default)]
    pub parameters: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<DataStructure>,
    pub response_code: String,
}

impl Vertex {
    /// Vertex without parameters or body
    #[must_use]
    pub fn new(path: impl Into<String>, method: Method, response_code: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            parameters: Vec::new(),
            request_body: None,
            response_code: response_code.into(),
        }
    }

    /// Vertex carrying the request shape of `operation`
    #[must_use]
    pub fn from_operation(
        path: impl Into<String>,
        operation: &Operation,
        response_code: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method: operation.method,
            parameters: operation.parameters.clone(),
            request_body: operation.request_body.clone(),
            response_code: response_code.into(),
        }
    }

    /// `<METHOD> <path> [<code>]`
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {} [{}]", self.method, self.path, self.response_code)
    }
}

/// Directed data dependency carrying field mappings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    /// Source field path → target field path; one entry per source path
    #[serde(default)]
    pub mappings: IndexMap<String, String>,
}

impl Edge {
    #[must_use]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self {
            from,
            to,
            mappings: IndexMap::new(),
        }
    }

    /// Map `source` to `target`, returning the target it replaced
    pub fn add_mapping(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Option<String> {
        self.mappings.insert(source.into(), target.into())
    }
}

/// The scenario under construction
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "GraphRepr")]
pub struct ScenarioGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl ScenarioGraph {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex; its id is the vertex count before insertion
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(vertex);
        id
    }

    /// Append an edge with no mappings
    ///
    /// Both endpoints must exist. Parallel edges are not refused here.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> Result<&mut Edge, GraphError> {
        for id in [from, to] {
            if self.vertex(id).is_none() {
                return Err(GraphError::VertexNotFound(id));
            }
        }
        self.edges.push(Edge::new(from, to));
        let index = self.edges.len() - 1;
        Ok(&mut self.edges[index])
    }

    #[must_use]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0)
    }

    /// Vertices with their ids, in id order
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter().enumerate().map(|(i, v)| (VertexId(i), v))
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// First edge from `from` to `to`
    #[must_use]
    pub fn edge(&self, from: VertexId, to: VertexId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }

    /// First edge from `from` to `to`, mutably
    pub fn edge_mut(&mut self, from: VertexId, to: VertexId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.from == from && e.to == to)
    }

    /// Edge by position in the edge list
    pub fn edge_at_mut(&mut self, index: usize) -> Option<&mut Edge> {
        self.edges.get_mut(index)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Kahn's algorithm
    ///
    /// Ties between ready vertices are broken by id. On a cycle the partial
    /// order is discarded.
    pub fn topological_sort(&self) -> Result<Vec<VertexId>, GraphError> {
        let n = self.vertices.len();
        let mut in_degree = vec![0usize; n];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for edge in &self.edges {
            let (from, to) = (edge.from.0, edge.to.0);
            if from >= n || to >= n {
                return Err(GraphError::VertexNotFound(if from >= n { edge.from } else { edge.to }));
            }
            in_degree[to] += 1;
            successors[from].push(to);
        }

        let mut queue: VecDeque<usize> = (0..n).filter(|&v| in_degree[v] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(current) = queue.pop_front() {
            order.push(VertexId(current));
            for &next in &successors[current] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    queue.push_back(next);
                }
            }
        }

        if order.len() == n {
            Ok(order)
        } else {
            Err(GraphError::CycleDetected {
                remaining: n - order.len(),
            })
        }
    }

    /// Groups of vertices that sit on a cycle
    ///
    /// Each group is a strongly connected component with more than one
    /// vertex, or a single vertex with a self-loop. Groups and their members
    /// are sorted by id.
    #[must_use]
    pub fn cyclic_groups(&self) -> Vec<Vec<VertexId>> {
        let mut graph = DiGraph::<(), ()>::with_capacity(self.vertices.len(), self.edges.len());
        for _ in &self.vertices {
            graph.add_node(());
        }
        for edge in &self.edges {
            if edge.from.0 < self.vertices.len() && edge.to.0 < self.vertices.len() {
                graph.add_edge(NodeIndex::new(edge.from.0), NodeIndex::new(edge.to.0), ());
            }
        }

        let mut groups: Vec<Vec<VertexId>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|component| {
                let mut ids: Vec<VertexId> =
                    component.into_iter().map(|n| VertexId(n.index())).collect();
                ids.sort();
                ids
            })
            .collect();
        groups.sort();
        groups
    }

    fn vertex_label(&self, id: VertexId) -> String {
        self.vertex(id)
            .map_or_else(|| "(unknown)".to_string(), Vertex::label)
    }

    /// `[from] label -> [to] label`
    #[must_use]
    pub fn edge_label(&self, edge: &Edge) -> String {
        format!(
            "[{}] {} -> [{}] {}",
            edge.from,
            self.vertex_label(edge.from),
            edge.to,
            self.vertex_label(edge.to)
        )
    }
}

impl fmt::Display for ScenarioGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========== SCENARIO GRAPH ==========")?;
        writeln!(f, "--- VERTICES ---")?;
        if self.vertices.is_empty() {
            writeln!(f, "  (no vertices)")?;
        }
        for (id, vertex) in self.vertices() {
            writeln!(f, "  [{id}] {}", vertex.label())?;
        }
        writeln!(f, "--- EDGES ---")?;
        if self.edges.is_empty() {
            writeln!(f, "  (no edges)")?;
        }
        for edge in &self.edges {
            writeln!(f, "  {}", self.edge_label(edge))?;
            if !edge.mappings.is_empty() {
                writeln!(f, "    Mappings:")?;
                for (source, target) in &edge.mappings {
                    writeln!(f, "      {source} -> {target}")?;
                }
            }
        }
        write!(f, "=====================================")
    }
}

/// Wire form: `{"vertices": {"<id>": Vertex}, "edges": [Edge]}`
#[derive(Deserialize)]
struct GraphRepr {
    #[serde(default)]
    vertices: BTreeMap<VertexId, Vertex>,
    #[serde(default)]
    edges: Vec<Edge>,
}

impl TryFrom<GraphRepr> for ScenarioGraph {
    type Error = GraphError;

    fn try_from(repr: GraphRepr) -> Result<Self, Self::Error> {
        let mut vertices = Vec::with_capacity(repr.vertices.len());
        for (expected, (id, vertex)) in repr.vertices.into_iter().enumerate() {
            if id.0 != expected {
                return Err(GraphError::SparseVertexIds {
                    expected: VertexId(expected),
                    found: id,
                });
            }
            vertices.push(vertex);
        }
        for edge in &repr.edges {
            for id in [edge.from, edge.to] {
                if id.0 >= vertices.len() {
                    return Err(GraphError::VertexNotFound(id));
                }
            }
        }
        Ok(Self {
            vertices,
            edges: repr.edges,
        })
    }
}

impl Serialize for ScenarioGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'g> {
            vertices: BTreeMap<VertexId, &'g Vertex>,
            edges: &'g [Edge],
        }

        Repr {
            vertices: self.vertices().collect(),
            edges: &self.edges,
        }
        .serialize(serializer)
    }
}
