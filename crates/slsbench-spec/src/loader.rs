//! Loading and saving documents
//!
//! Lowering turns the wire form into the arena form:
//! - component schemas get their arena slot reserved first, so `$ref`s to
//!   them (including self references) resolve to that one node
//! - `$ref`s to component parameters, request bodies and responses are
//!   inlined by value
//! - unresolvable references become absent slots and are logged
//!
//! Raising is the reverse: component nodes are emitted under
//! `components.schemas` and referenced as `$ref` wherever they appear.

use crate::document::{
    AdditionalProperties, Document, MediaType, Method, Operation, Parameter, PathItem,
    RequestBody, Response, Schema, SchemaId, COMPONENT_SCHEMA_PREFIX,
};
use crate::error::{SpecError, SpecResult};
use crate::raw::{
    RawAdditionalProperties, RawComponents, RawDocument, RawMediaType, RawOperation,
    RawParameter, RawPathItem, RawRequestBody, RawResponse, RawSchema, RawType, RefOr,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

const COMPONENT_PARAMETER_PREFIX: &str = "#/components/parameters/";
const COMPONENT_REQUEST_BODY_PREFIX: &str = "#/components/requestBodies/";
const COMPONENT_RESPONSE_PREFIX: &str = "#/components/responses/";

/// Maximum `$ref` → `$ref` hops followed before giving up
const MAX_REF_CHAIN: usize = 32;

/// Source format of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> SpecResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            Some(other) => Err(SpecError::UnsupportedFormat(other.to_string())),
            None => Err(SpecError::UnsupportedFormat(String::new())),
        }
    }

    /// Guess the format from content: a leading `{` means JSON
    #[must_use]
    pub fn sniff(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            Format::Json
        } else {
            Format::Yaml
        }
    }
}

/// Load a document from a `.yaml`, `.yml` or `.json` file
///
/// Files without an extension are sniffed by content.
pub fn load_document(path: impl AsRef<Path>) -> SpecResult<Document> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).map_err(|e| SpecError::io_error(path, e))?;
    let format = match Format::from_path(path) {
        Ok(format) => format,
        Err(SpecError::UnsupportedFormat(ext)) if ext.is_empty() => Format::sniff(&content),
        Err(e) => return Err(e),
    };
    debug!(path = %path.display(), ?format, "loading openapi document");
    Document::parse(&content, format)
}

/// Write a document as YAML
pub fn save_yaml(document: &Document, path: impl AsRef<Path>) -> SpecResult<()> {
    let path = path.as_ref();
    let yaml = document.to_yaml_string()?;
    std::fs::write(path, yaml).map_err(|e| SpecError::io_error(path, e))
}

impl Document {
    /// Parse a document in the given format
    pub fn parse(content: &str, format: Format) -> SpecResult<Self> {
        let raw: RawDocument = match format {
            Format::Yaml => serde_yaml::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
        };
        Lowering::lower(raw)
    }

    pub fn from_yaml_str(content: &str) -> SpecResult<Self> {
        Self::parse(content, Format::Yaml)
    }

    pub fn from_json_str(content: &str) -> SpecResult<Self> {
        Self::parse(content, Format::Json)
    }

    /// Serialize as YAML, components referenced by `$ref`
    pub fn to_yaml_string(&self) -> SpecResult<String> {
        Ok(serde_yaml::to_string(&Raising::new(self).raise())?)
    }

    /// Serialize as pretty JSON, components referenced by `$ref`
    pub fn to_json_string(&self) -> SpecResult<String> {
        Ok(serde_json::to_string_pretty(&Raising::new(self).raise())?)
    }
}

fn component_name<'r>(reference: &'r str, prefix: &str) -> SpecResult<&'r str> {
    reference
        .strip_prefix(prefix)
        .ok_or_else(|| SpecError::UnresolvedRef(reference.to_string()))
}

/// Wire form → arena form
struct Lowering {
    document: Document,
    raw_parameters: IndexMap<String, RefOr<RawParameter>>,
    raw_request_bodies: IndexMap<String, RefOr<RawRequestBody>>,
    raw_responses: IndexMap<String, RefOr<RawResponse>>,
}

impl Lowering {
    fn lower(raw: RawDocument) -> SpecResult<Document> {
        let RawDocument {
            openapi,
            paths,
            components,
            extra,
        } = raw;
        let RawComponents {
            schemas,
            parameters,
            request_bodies,
            responses,
            extra: components_extra,
        } = components.unwrap_or_default();

        let mut component_extra = components_extra;
        if !parameters.is_empty() {
            component_extra.insert("parameters".to_string(), serde_json::to_value(&parameters)?);
        }
        if !request_bodies.is_empty() {
            component_extra.insert(
                "requestBodies".to_string(),
                serde_json::to_value(&request_bodies)?,
            );
        }
        if !responses.is_empty() {
            component_extra.insert("responses".to_string(), serde_json::to_value(&responses)?);
        }

        let mut lowering = Lowering {
            document: Document {
                openapi,
                component_extra,
                extra,
                ..Document::default()
            },
            raw_parameters: parameters,
            raw_request_bodies: request_bodies,
            raw_responses: responses,
        };

        lowering.lower_component_schemas(&schemas);

        for (path, raw_item) in paths {
            let item = lowering.lower_path_item(&path, raw_item);
            lowering.document.paths.insert(path, item);
        }

        Ok(lowering.document)
    }

    fn lower_component_schemas(&mut self, schemas: &IndexMap<String, RefOr<RawSchema>>) {
        // Reserve a slot per inline component so forward and self refs resolve.
        for (name, entry) in schemas {
            if let RefOr::Item(_) = entry {
                let id = self.document.add_schema(Schema::default());
                self.document.component_schemas.insert(name.clone(), id);
            }
        }

        // Aliases (`Foo: {$ref: Bar}`) share their target's node.
        for (name, entry) in schemas {
            if let RefOr::Ref { reference } = entry {
                match self.resolve_alias(schemas, reference) {
                    Ok(id) => {
                        self.document.component_schemas.insert(name.clone(), id);
                    }
                    Err(err) => warn!(component = %name, error = %err, "skipping component alias"),
                }
            }
        }

        for (name, entry) in schemas {
            if let RefOr::Item(raw) = entry {
                let Some(id) = self.document.component_schema(name) else {
                    continue;
                };
                let schema = self.lower_schema_body(raw);
                if let Some(slot) = self.document.schema_mut(id) {
                    *slot = schema;
                }
            }
        }
    }

    fn resolve_alias(
        &self,
        schemas: &IndexMap<String, RefOr<RawSchema>>,
        reference: &str,
    ) -> SpecResult<SchemaId> {
        let mut current = reference.to_string();
        for _ in 0..MAX_REF_CHAIN {
            let name = component_name(&current, COMPONENT_SCHEMA_PREFIX)?;
            match schemas.get(name) {
                Some(RefOr::Item(_)) => {
                    return self
                        .document
                        .component_schema(name)
                        .ok_or_else(|| SpecError::UnresolvedRef(current.clone()));
                }
                Some(RefOr::Ref { reference }) => current = reference.clone(),
                None => break,
            }
        }
        Err(SpecError::UnresolvedRef(current))
    }

    fn lower_schema(&mut self, entry: &RefOr<RawSchema>) -> Option<SchemaId> {
        match entry {
            RefOr::Ref { reference } => {
                let resolved = component_name(reference, COMPONENT_SCHEMA_PREFIX).and_then(|name| {
                    self.document
                        .component_schema(name)
                        .ok_or_else(|| SpecError::UnresolvedRef(reference.clone()))
                });
                match resolved {
                    Ok(id) => Some(id),
                    Err(err) => {
                        warn!(error = %err, "treating unresolved schema reference as absent");
                        None
                    }
                }
            }
            RefOr::Item(raw) => {
                let schema = self.lower_schema_body(raw);
                Some(self.document.add_schema(schema))
            }
        }
    }

    fn lower_optional(&mut self, entry: Option<&RefOr<RawSchema>>) -> Option<SchemaId> {
        entry.and_then(|e| self.lower_schema(e))
    }

    fn lower_list(&mut self, entries: &[RefOr<RawSchema>]) -> Vec<SchemaId> {
        entries.iter().filter_map(|e| self.lower_schema(e)).collect()
    }

    fn lower_schema_body(&mut self, raw: &RawSchema) -> Schema {
        let types = match &raw.schema_type {
            Some(RawType::Single(t)) => vec![t.clone()],
            Some(RawType::Many(ts)) => ts.clone(),
            None => Vec::new(),
        };

        let mut properties = IndexMap::with_capacity(raw.properties.len());
        for (name, entry) in &raw.properties {
            if let Some(id) = self.lower_schema(entry) {
                properties.insert(name.clone(), id);
            }
        }

        let additional_properties = match &raw.additional_properties {
            Some(RawAdditionalProperties::Allowed(flag)) => {
                Some(AdditionalProperties::Allowed(*flag))
            }
            Some(RawAdditionalProperties::Schema(entry)) => self
                .lower_schema(entry)
                .map(AdditionalProperties::Schema),
            None => None,
        };

        Schema {
            types,
            format: raw.format.clone(),
            properties,
            required: raw.required.clone(),
            items: self.lower_optional(raw.items.as_deref()),
            all_of: self.lower_list(&raw.all_of),
            any_of: self.lower_list(&raw.any_of),
            one_of: self.lower_list(&raw.one_of),
            not: self.lower_optional(raw.not.as_deref()),
            additional_properties,
            minimum: raw.minimum,
            maximum: raw.maximum,
            min_length: raw.min_length,
            max_length: raw.max_length,
            pattern: raw.pattern.clone(),
            user_hint: raw.user_hint.clone(),
            unique: raw.unique,
            extra: raw.extra.clone(),
        }
    }

    fn lower_path_item(&mut self, path: &str, raw: RawPathItem) -> PathItem {
        let RawPathItem {
            parameters,
            get,
            put,
            post,
            delete,
            options,
            head,
            patch,
            trace,
            extra,
        } = raw;

        let mut item = PathItem {
            parameters: self.lower_parameters(path, &parameters),
            operations: IndexMap::new(),
            extra,
        };

        let declared = [get, put, post, delete, options, head, patch, trace];
        for (method, raw_operation) in Method::ALL.into_iter().zip(declared) {
            if let Some(raw_operation) = raw_operation {
                let operation = self.lower_operation(path, method, raw_operation);
                item.operations.insert(method, operation);
            }
        }
        item
    }

    fn lower_operation(&mut self, path: &str, method: Method, raw: RawOperation) -> Operation {
        let context = format!("{path}/{method}");
        let parameters = self.lower_parameters(&context, &raw.parameters);

        let request_body = raw.request_body.as_ref().and_then(|entry| {
            let resolved = self.resolve_request_body(entry);
            if resolved.is_none() {
                warn!(operation = %context, "skipping unresolved request body");
            }
            resolved.map(|body| self.lower_request_body(&body))
        });

        let mut responses = IndexMap::with_capacity(raw.responses.len());
        for (status, entry) in &raw.responses {
            match self.resolve_response(entry) {
                Some(response) => {
                    let lowered = self.lower_response(&response);
                    responses.insert(status.clone(), lowered);
                }
                None => warn!(operation = %context, %status, "skipping unresolved response"),
            }
        }

        Operation {
            parameters,
            request_body,
            responses,
            extra: raw.extra,
        }
    }

    fn lower_parameters(
        &mut self,
        context: &str,
        entries: &[RefOr<RawParameter>],
    ) -> Vec<Parameter> {
        let mut parameters = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(raw) = self.resolve_parameter(entry) else {
                warn!(%context, "skipping unresolved parameter");
                continue;
            };
            let location = match raw.location.parse() {
                Ok(location) => location,
                Err(err) => {
                    warn!(%context, parameter = %raw.name, error = %err, "skipping parameter");
                    continue;
                }
            };
            parameters.push(Parameter {
                name: raw.name.clone(),
                location,
                required: raw.required,
                schema: self.lower_optional(raw.schema.as_ref()),
                extra: raw.extra.clone(),
            });
        }
        parameters
    }

    fn lower_media(
        &mut self,
        content: &IndexMap<String, RawMediaType>,
    ) -> IndexMap<String, MediaType> {
        content
            .iter()
            .map(|(content_type, media)| {
                let lowered = MediaType {
                    schema: self.lower_optional(media.schema.as_ref()),
                    extra: media.extra.clone(),
                };
                (content_type.clone(), lowered)
            })
            .collect()
    }

    fn lower_request_body(&mut self, raw: &RawRequestBody) -> RequestBody {
        RequestBody {
            content: self.lower_media(&raw.content),
            required: raw.required,
            extra: raw.extra.clone(),
        }
    }

    fn lower_response(&mut self, raw: &RawResponse) -> Response {
        Response {
            content: self.lower_media(&raw.content),
            extra: raw.extra.clone(),
        }
    }

    fn resolve_parameter(&self, entry: &RefOr<RawParameter>) -> Option<RawParameter> {
        follow(entry, &self.raw_parameters, COMPONENT_PARAMETER_PREFIX)
    }

    fn resolve_request_body(&self, entry: &RefOr<RawRequestBody>) -> Option<RawRequestBody> {
        follow(entry, &self.raw_request_bodies, COMPONENT_REQUEST_BODY_PREFIX)
    }

    fn resolve_response(&self, entry: &RefOr<RawResponse>) -> Option<RawResponse> {
        follow(entry, &self.raw_responses, COMPONENT_RESPONSE_PREFIX)
    }
}

/// Follow a `$ref` chain through one component table, inlining by value
fn follow<T: Clone>(
    entry: &RefOr<T>,
    table: &IndexMap<String, RefOr<T>>,
    prefix: &str,
) -> Option<T> {
    let mut current = entry;
    for _ in 0..MAX_REF_CHAIN {
        match current {
            RefOr::Item(item) => return Some(item.clone()),
            RefOr::Ref { reference } => {
                let next = component_name(reference, prefix)
                    .and_then(|name| {
                        table
                            .get(name)
                            .ok_or_else(|| SpecError::UnresolvedRef(reference.clone()))
                    });
                match next {
                    Ok(next) => current = next,
                    Err(err) => {
                        warn!(error = %err, "reference not found");
                        return None;
                    }
                }
            }
        }
    }
    warn!(prefix, "reference chain too long");
    None
}

/// Arena form → wire form
struct Raising<'d> {
    document: &'d Document,
    names: HashMap<SchemaId, &'d str>,
}

impl<'d> Raising<'d> {
    fn new(document: &'d Document) -> Self {
        let mut names = HashMap::new();
        for (name, id) in document.component_schemas() {
            // First name wins for aliases sharing a node.
            names.entry(id).or_insert(name);
        }
        Self { document, names }
    }

    fn raise(&self) -> RawDocument {
        let paths = self
            .document
            .paths
            .iter()
            .map(|(path, item)| (path.clone(), self.raise_path_item(item)))
            .collect();

        let schemas: IndexMap<String, RefOr<RawSchema>> = self
            .document
            .component_schemas()
            .map(|(name, id)| {
                let entry = match self.names.get(&id) {
                    Some(owner) if *owner != name => RefOr::Ref {
                        reference: format!("{COMPONENT_SCHEMA_PREFIX}{owner}"),
                    },
                    _ => RefOr::Item(self.raise_schema_body(id, &mut HashSet::new())),
                };
                (name.to_string(), entry)
            })
            .collect();

        let components = if schemas.is_empty() && self.document.component_extra.is_empty() {
            None
        } else {
            Some(RawComponents {
                schemas,
                extra: self.document.component_extra.clone(),
                ..RawComponents::default()
            })
        };

        RawDocument {
            openapi: self.document.openapi.clone(),
            paths,
            components,
            extra: self.document.extra.clone(),
        }
    }

    fn raise_path_item(&self, item: &PathItem) -> RawPathItem {
        let mut raw = RawPathItem {
            parameters: self.raise_parameters(&item.parameters),
            extra: item.extra.clone(),
            ..RawPathItem::default()
        };
        for (method, operation) in &item.operations {
            let raised = Some(self.raise_operation(operation));
            match method {
                Method::Get => raw.get = raised,
                Method::Put => raw.put = raised,
                Method::Post => raw.post = raised,
                Method::Delete => raw.delete = raised,
                Method::Options => raw.options = raised,
                Method::Head => raw.head = raised,
                Method::Patch => raw.patch = raised,
                Method::Trace => raw.trace = raised,
            }
        }
        raw
    }

    fn raise_operation(&self, operation: &Operation) -> RawOperation {
        RawOperation {
            parameters: self.raise_parameters(&operation.parameters),
            request_body: operation.request_body.as_ref().map(|body| {
                RefOr::Item(RawRequestBody {
                    content: self.raise_media(&body.content),
                    required: body.required,
                    extra: body.extra.clone(),
                })
            }),
            responses: operation
                .responses
                .iter()
                .map(|(status, response)| {
                    let raw = RawResponse {
                        content: self.raise_media(&response.content),
                        extra: response.extra.clone(),
                    };
                    (status.clone(), RefOr::Item(raw))
                })
                .collect(),
            extra: operation.extra.clone(),
        }
    }

    fn raise_parameters(&self, parameters: &[Parameter]) -> Vec<RefOr<RawParameter>> {
        parameters
            .iter()
            .map(|p| {
                RefOr::Item(RawParameter {
                    name: p.name.clone(),
                    location: p.location.as_str().to_string(),
                    required: p.required,
                    schema: p.schema.map(|id| self.raise_slot(id, &mut HashSet::new())),
                    extra: p.extra.clone(),
                })
            })
            .collect()
    }

    fn raise_media(&self, content: &IndexMap<String, MediaType>) -> IndexMap<String, RawMediaType> {
        content
            .iter()
            .map(|(content_type, media)| {
                let raw = RawMediaType {
                    schema: media.schema.map(|id| self.raise_slot(id, &mut HashSet::new())),
                    extra: media.extra.clone(),
                };
                (content_type.clone(), raw)
            })
            .collect()
    }

    /// A schema slot: `$ref` for components, inline body otherwise
    fn raise_slot(&self, id: SchemaId, active: &mut HashSet<SchemaId>) -> RefOr<RawSchema> {
        if let Some(name) = self.names.get(&id) {
            return RefOr::Ref {
                reference: format!("{COMPONENT_SCHEMA_PREFIX}{name}"),
            };
        }
        if !active.insert(id) {
            // Only reachable for hand-built arenas with anonymous cycles.
            warn!(%id, "anonymous schema cycle, writing empty schema");
            return RefOr::Item(RawSchema::default());
        }
        let body = self.raise_schema_body(id, active);
        active.remove(&id);
        RefOr::Item(body)
    }

    fn raise_schema_body(&self, id: SchemaId, active: &mut HashSet<SchemaId>) -> RawSchema {
        let Some(schema) = self.document.schema(id) else {
            return RawSchema::default();
        };

        let schema_type = match schema.types.as_slice() {
            [] => None,
            [single] => Some(RawType::Single(single.clone())),
            many => Some(RawType::Many(many.to_vec())),
        };

        let mut slot = |child: SchemaId| self.raise_slot(child, active);
        let properties = schema
            .properties
            .iter()
            .map(|(name, child)| (name.clone(), slot(*child)))
            .collect();
        let items = schema.items.map(|child| Box::new(slot(child)));
        let all_of = schema.all_of.iter().map(|child| slot(*child)).collect();
        let any_of = schema.any_of.iter().map(|child| slot(*child)).collect();
        let one_of = schema.one_of.iter().map(|child| slot(*child)).collect();
        let not = schema.not.map(|child| Box::new(slot(child)));
        let additional_properties = schema.additional_properties.map(|ap| match ap {
            AdditionalProperties::Allowed(flag) => RawAdditionalProperties::Allowed(flag),
            AdditionalProperties::Schema(child) => {
                RawAdditionalProperties::Schema(Box::new(slot(child)))
            }
        });

        RawSchema {
            schema_type,
            format: schema.format.clone(),
            properties,
            required: schema.required.clone(),
            items,
            all_of,
            any_of,
            one_of,
            not,
            additional_properties,
            minimum: schema.minimum,
            maximum: schema.maximum,
            min_length: schema.min_length,
            max_length: schema.max_length,
            pattern: schema.pattern.clone(),
            user_hint: schema.user_hint.clone(),
            unique: schema.unique,
            extra: schema.extra.clone(),
        }
    }
}

impl Document {
    /// Set a top-level key (e.g. `x-enriched-at`)
    pub fn set_extra(&mut self, key: impl Into<String>, value: Value) {
        self.extra.insert(key.into(), value);
    }
}
