//! In-memory OpenAPI document
//!
//! Schemas live in an arena owned by [`Document`] and are addressed by
//! [`SchemaId`]. Every `$ref` to `#/components/schemas/X` resolves to the
//! single arena node of component `X`, so self- and mutually-referential
//! schemas form real cycles and node identity is the id itself.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Identity of a schema node inside a [`Document`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub(crate) usize);

impl SchemaId {
    /// Arena index of this node
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema#{}", self.0)
    }
}

/// HTTP method of an operation
///
/// Declaration order is the order the walker visits operations in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl Method {
    /// All methods in visiting order
    pub const ALL: [Method; 8] = [
        Method::Get,
        Method::Put,
        Method::Post,
        Method::Delete,
        Method::Options,
        Method::Head,
        Method::Patch,
        Method::Trace,
    ];

    /// Upper-case name used in walker paths and labels
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
            Method::Post => "POST",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
            Method::Patch => "PATCH",
            Method::Trace => "TRACE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown http method: {s}"))
    }
}

/// Where a parameter is carried in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
}

impl ParameterLocation {
    /// Wire name (`query`, `path`, `header`, `cookie`)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Path => "path",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "path" => Ok(Self::Path),
            "header" => Ok(Self::Header),
            "cookie" => Ok(Self::Cookie),
            other => Err(format!("unknown parameter location: {other}")),
        }
    }
}

/// `additionalProperties` is either a flag or a value schema ("map of X")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(SchemaId),
}

/// One schema node
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Declared types; 3.0 documents carry at most one
    pub types: Vec<String>,
    pub format: Option<String>,
    pub properties: IndexMap<String, SchemaId>,
    pub required: Vec<String>,
    pub items: Option<SchemaId>,
    pub all_of: Vec<SchemaId>,
    pub any_of: Vec<SchemaId>,
    pub one_of: Vec<SchemaId>,
    pub not: Option<SchemaId>,
    pub additional_properties: Option<AdditionalProperties>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<String>,
    /// `x-user-hint`
    pub user_hint: Option<String>,
    /// `x-slsbench-unique`
    pub unique: Option<bool>,
    /// Keys not modelled above, kept for round-tripping
    pub extra: IndexMap<String, Value>,
}

impl Schema {
    /// Schema with a single declared type
    #[must_use]
    pub fn of_type(schema_type: impl Into<String>) -> Self {
        Self {
            types: vec![schema_type.into()],
            ..Self::default()
        }
    }

    /// First declared type, if any
    #[must_use]
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        self.primary_type() == Some("array")
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        self.primary_type() == Some("object")
    }

    /// Schema given by `additionalProperties`, when it is a schema
    #[must_use]
    pub fn additional_properties_schema(&self) -> Option<SchemaId> {
        match self.additional_properties {
            Some(AdditionalProperties::Schema(id)) => Some(id),
            _ => None,
        }
    }

    /// Whether `name` is listed in this schema's `required`
    #[must_use]
    pub fn requires(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Media type entry of a body
#[derive(Debug, Clone, Default)]
pub struct MediaType {
    pub schema: Option<SchemaId>,
    pub extra: IndexMap<String, Value>,
}

/// A parameter with its references resolved
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Option<SchemaId>,
    pub extra: IndexMap<String, Value>,
}

impl Parameter {
    /// Parameter without schema or extra keys
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            required: location == ParameterLocation::Path,
            schema: None,
            extra: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_schema(mut self, schema: SchemaId) -> Self {
        self.schema = Some(schema);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    /// Content type → media type, in document order
    pub content: IndexMap<String, MediaType>,
    pub required: bool,
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct Response {
    /// Content type → media type; empty for body-less responses such as 204
    pub content: IndexMap<String, MediaType>,
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct Operation {
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    /// Status code (or `default`) → response, in document order
    pub responses: IndexMap<String, Response>,
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct PathItem {
    /// Parameters shared by every operation under this path
    pub parameters: Vec<Parameter>,
    /// Operations keyed by method, in [`Method::ALL`] order
    pub operations: IndexMap<Method, Operation>,
    pub extra: IndexMap<String, Value>,
}

impl PathItem {
    /// Insert an operation, keeping [`Method::ALL`] order
    pub fn insert_operation(&mut self, method: Method, operation: Operation) {
        self.operations.insert(method, operation);
        self.operations.sort_keys();
    }
}

/// OpenAPI document with an owned schema arena
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub openapi: String,
    pub paths: IndexMap<String, PathItem>,
    pub(crate) schemas: Vec<Schema>,
    pub(crate) component_schemas: IndexMap<String, SchemaId>,
    /// Non-schema `components` entries, written back verbatim
    pub(crate) component_extra: IndexMap<String, Value>,
    /// Top-level keys such as `info` and `servers`
    pub(crate) extra: IndexMap<String, Value>,
}

impl Document {
    /// Empty 3.0 document
    #[must_use]
    pub fn new() -> Self {
        Self {
            openapi: "3.0.3".to_string(),
            ..Self::default()
        }
    }

    /// Add a schema node to the arena
    pub fn add_schema(&mut self, schema: Schema) -> SchemaId {
        let id = SchemaId(self.schemas.len());
        self.schemas.push(schema);
        id
    }

    /// Register `id` as the named component schema
    pub fn insert_component_schema(&mut self, name: impl Into<String>, id: SchemaId) {
        self.component_schemas.insert(name.into(), id);
    }

    #[must_use]
    pub fn schema(&self, id: SchemaId) -> Option<&Schema> {
        self.schemas.get(id.0)
    }

    pub fn schema_mut(&mut self, id: SchemaId) -> Option<&mut Schema> {
        self.schemas.get_mut(id.0)
    }

    /// Number of schema nodes in the arena
    #[must_use]
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Named component schemas in document order
    pub fn component_schemas(&self) -> impl Iterator<Item = (&str, SchemaId)> + '_ {
        self.component_schemas
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
    }

    /// Component id by name
    #[must_use]
    pub fn component_schema(&self, name: &str) -> Option<SchemaId> {
        self.component_schemas.get(name).copied()
    }

    /// Component name of `id`, if the node is a named component
    #[must_use]
    pub fn component_name(&self, id: SchemaId) -> Option<&str> {
        self.component_schemas
            .iter()
            .find(|(_, candidate)| **candidate == id)
            .map(|(name, _)| name.as_str())
    }

    /// `#/components/schemas/<name>` for component nodes
    #[must_use]
    pub fn reference_of(&self, id: SchemaId) -> Option<String> {
        self.component_name(id)
            .map(|name| format!("{COMPONENT_SCHEMA_PREFIX}{name}"))
    }

    /// Top-level key not modelled by the document (e.g. `info`)
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Prefix of internal component schema references
pub const COMPONENT_SCHEMA_PREFIX: &str = "#/components/schemas/";
