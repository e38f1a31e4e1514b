//! Data model extracted from an OpenAPI document
//!
//! Endpoints → operations → fields, with validation constraints and hints
//! carried as typed fields. Built once per run by
//! [`DataModelBuilder`](crate::builder::DataModelBuilder), read-only afterwards.

use crate::hint::Hint;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use slsbench_spec::{Method, ParameterLocation};
use std::collections::BTreeMap;

/// One field of a body or one parameter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    /// Declared type (`string`, `integer`, `object`, `array`, ...); empty if undeclared
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<Hint>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Full walker path of this occurrence
    pub path: String,
    /// `#/components/schemas/<name>` when the field's schema is a component
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Item shape of an array field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Field>>,
    /// Nested fields of an object field, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Field>,
    /// Parameter location; only set on parameters
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ParameterLocation>,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = field_type.into();
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: ParameterLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Whether this field has no nested items or properties
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.items.is_none() && self.properties.is_empty()
    }
}

/// Shape of a request or response body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataStructure {
    /// Walker path of the body
    pub name: String,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub content_type: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl DataStructure {
    /// Top-level field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// One HTTP operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub method: Method,
    /// Query and path parameters
    #[serde(default)]
    pub parameters: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<DataStructure>,
    /// Status code → body; `None` for responses without a body
    #[serde(default)]
    pub responses: BTreeMap<String, Option<DataStructure>>,
}

impl Operation {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            parameters: Vec::new(),
            request_body: None,
            responses: BTreeMap::new(),
        }
    }

    /// Parameter by name and location
    #[must_use]
    pub fn parameter(&self, name: &str, location: ParameterLocation) -> Option<&Field> {
        self.parameters
            .iter()
            .find(|p| p.name == name && p.location == Some(location))
    }
}

/// One path template with its operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub path: String,
    #[serde(default)]
    pub operations: BTreeMap<Method, Operation>,
}

impl Endpoint {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            operations: BTreeMap::new(),
        }
    }
}

/// Every endpoint of a document, keyed by path template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataModel {
    #[serde(default)]
    pub endpoints: BTreeMap<String, Endpoint>,
}

impl DataModel {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> Option<&Endpoint> {
        self.endpoints.get(path)
    }

    #[must_use]
    pub fn operation(&self, path: &str, method: Method) -> Option<&Operation> {
        self.endpoints.get(path)?.operations.get(&method)
    }

    /// Entry for `path`/`method`, created empty if absent
    pub fn operation_mut(&mut self, path: &str, method: Method) -> &mut Operation {
        self.endpoints
            .entry(path.to_string())
            .or_insert_with(|| Endpoint::new(path))
            .operations
            .entry(method)
            .or_insert_with(|| Operation::new(method))
    }

    /// Every operation as `(path, method, operation)`, sorted by path then method
    pub fn operations(&self) -> impl Iterator<Item = (&str, Method, &Operation)> + '_ {
        self.endpoints.iter().flat_map(|(path, endpoint)| {
            endpoint
                .operations
                .iter()
                .map(move |(method, operation)| (path.as_str(), *method, operation))
        })
    }

    /// Number of operations across all endpoints
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.endpoints.values().map(|e| e.operations.len()).sum()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
