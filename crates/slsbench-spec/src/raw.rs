//! Serde mirror of the OpenAPI 3.x wire format
//!
//! These types exist only at the file boundary. They keep `$ref`s as strings
//! and carry every key they do not model in a flattened `extra` map so that a
//! document survives a load → enrich → save round trip.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Either an inline item or a `$ref` to a component
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum RefOr<T> {
    Ref {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Item(T),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(default)]
    pub(crate) openapi: String,
    #[serde(default)]
    pub(crate) paths: IndexMap<String, RawPathItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) components: Option<RawComponents>,
    #[serde(flatten)]
    pub(crate) extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawComponents {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) schemas: IndexMap<String, RefOr<RawSchema>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) parameters: IndexMap<String, RefOr<RawParameter>>,
    #[serde(
        default,
        rename = "requestBodies",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub(crate) request_bodies: IndexMap<String, RefOr<RawRequestBody>>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) responses: IndexMap<String, RefOr<RawResponse>>,
    #[serde(flatten)]
    pub(crate) extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawPathItem {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) parameters: Vec<RefOr<RawParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) get: Option<RawOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) put: Option<RawOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) post: Option<RawOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) delete: Option<RawOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) options: Option<RawOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) head: Option<RawOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) patch: Option<RawOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) trace: Option<RawOperation>,
    #[serde(flatten)]
    pub(crate) extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawOperation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) parameters: Vec<RefOr<RawParameter>>,
    #[serde(
        default,
        rename = "requestBody",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) request_body: Option<RefOr<RawRequestBody>>,
    #[serde(default)]
    pub(crate) responses: IndexMap<String, RefOr<RawResponse>>,
    #[serde(flatten)]
    pub(crate) extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawParameter {
    pub(crate) name: String,
    #[serde(rename = "in")]
    pub(crate) location: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) schema: Option<RefOr<RawSchema>>,
    #[serde(flatten)]
    pub(crate) extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawRequestBody {
    #[serde(default)]
    pub(crate) content: IndexMap<String, RawMediaType>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub(crate) required: bool,
    #[serde(flatten)]
    pub(crate) extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawResponse {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) content: IndexMap<String, RawMediaType>,
    #[serde(flatten)]
    pub(crate) extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawMediaType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) schema: Option<RefOr<RawSchema>>,
    #[serde(flatten)]
    pub(crate) extra: IndexMap<String, Value>,
}

/// `type` is a single string in 3.0 and may be a list in 3.1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawType {
    Single(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAdditionalProperties {
    Allowed(bool),
    Schema(Box<RefOr<RawSchema>>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawSchema {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub(crate) schema_type: Option<RawType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) format: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub(crate) properties: IndexMap<String, RefOr<RawSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) required: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) items: Option<Box<RefOr<RawSchema>>>,
    #[serde(default, rename = "allOf", skip_serializing_if = "Vec::is_empty")]
    pub(crate) all_of: Vec<RefOr<RawSchema>>,
    #[serde(default, rename = "anyOf", skip_serializing_if = "Vec::is_empty")]
    pub(crate) any_of: Vec<RefOr<RawSchema>>,
    #[serde(default, rename = "oneOf", skip_serializing_if = "Vec::is_empty")]
    pub(crate) one_of: Vec<RefOr<RawSchema>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) not: Option<Box<RefOr<RawSchema>>>,
    #[serde(
        default,
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) additional_properties: Option<RawAdditionalProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) maximum: Option<f64>,
    #[serde(default, rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub(crate) min_length: Option<u64>,
    #[serde(default, rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub(crate) max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) pattern: Option<String>,
    #[serde(default, rename = "x-user-hint", skip_serializing_if = "Option::is_none")]
    pub(crate) user_hint: Option<String>,
    #[serde(
        default,
        rename = "x-slsbench-unique",
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) unique: Option<bool>,
    #[serde(flatten)]
    pub(crate) extra: IndexMap<String, Value>,
}
