//! Recursive traversal of a [`Document`] with pluggable callbacks
//!
//! Every visitor method has a no-op default, so a visitor implements only
//! the events it cares about. Schema recursion keeps the set of node ids on
//! the active recursion stack: a node already on the stack is not entered
//! again (self or mutual reference), while the same node reached through a
//! sibling path is visited as usual.
//!
//! Paths built during descent:
//!
//! ```text
//! /users/parameter/tenant                     path-level parameter
//! /users/{id}/GET/parameter/id                operation parameter
//! /users/POST/requestBody/application/json    request body
//! /users/GET/response/200/application/json    response body
//! #/components/schemas/User                   component schema
//! <base>.<prop>   <base>[]   <base>/allOf[i]   <base>/not   <base>/additionalProperties
//! ```

use crate::document::{
    Document, Method, Operation, Parameter, PathItem, RequestBody, Response, SchemaId,
    COMPONENT_SCHEMA_PREFIX,
};
use std::collections::HashSet;
use tracing::trace;

/// Endpoint context of a visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope<'a> {
    /// Path template, e.g. `/users/{id}`
    pub endpoint: &'a str,
    /// `None` for path-level items
    pub method: Option<Method>,
}

/// Callbacks invoked by [`SpecWalker`]
#[allow(unused_variables)]
pub trait Visitor {
    fn visit_path(&mut self, path: &str, item: &PathItem) {}

    fn visit_operation(&mut self, path: &str, scope: Scope<'_>, operation: &Operation) {}

    fn visit_parameter(&mut self, path: &str, scope: Scope<'_>, parameter: &Parameter) {}

    /// Called once per content type of the body
    fn visit_request_body(
        &mut self,
        path: &str,
        scope: Scope<'_>,
        content_type: &str,
        body: &RequestBody,
    ) {
    }

    /// Called once per content type; `content_type` is `None` for a response
    /// without a body (e.g. `204`)
    fn visit_response(
        &mut self,
        path: &str,
        scope: Scope<'_>,
        status: &str,
        content_type: Option<&str>,
        response: &Response,
    ) {
    }

    fn visit_component_schema(&mut self, name: &str, schema: SchemaId) {}

    /// A named property, a parameter's schema, or an `additionalProperties`
    /// value schema
    fn visit_property(&mut self, path: &str, schema: SchemaId) {}
}

/// Stateless traversal over a borrowed document
#[derive(Debug, Clone, Copy)]
pub struct SpecWalker<'d> {
    document: &'d Document,
}

impl<'d> SpecWalker<'d> {
    #[inline]
    #[must_use]
    pub fn new(document: &'d Document) -> Self {
        Self { document }
    }

    /// Walk paths, operations and component schemas, in document order
    pub fn walk<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        let mut active = HashSet::new();

        for (endpoint, item) in &self.document.paths {
            visitor.visit_path(endpoint, item);
            let path_scope = Scope {
                endpoint,
                method: None,
            };

            for parameter in &item.parameters {
                let path = format!("{endpoint}/parameter/{}", parameter.name);
                self.walk_parameter(&path, path_scope, parameter, visitor, &mut active);
            }

            for method in Method::ALL {
                let Some(operation) = item.operations.get(&method) else {
                    continue;
                };
                self.walk_operation(endpoint, method, operation, visitor, &mut active);
            }
        }

        for (name, id) in self.document.component_schemas() {
            visitor.visit_component_schema(name, id);
            let path = format!("{COMPONENT_SCHEMA_PREFIX}{name}");
            self.walk_schema(&path, id, visitor, &mut active);
        }
    }

    fn walk_operation<V: Visitor + ?Sized>(
        &self,
        endpoint: &str,
        method: Method,
        operation: &Operation,
        visitor: &mut V,
        active: &mut HashSet<SchemaId>,
    ) {
        let operation_path = format!("{endpoint}/{method}");
        let scope = Scope {
            endpoint,
            method: Some(method),
        };
        visitor.visit_operation(&operation_path, scope, operation);

        for parameter in &operation.parameters {
            let path = format!("{operation_path}/parameter/{}", parameter.name);
            self.walk_parameter(&path, scope, parameter, visitor, active);
        }

        if let Some(body) = &operation.request_body {
            for (content_type, media) in &body.content {
                let path = format!("{operation_path}/requestBody/{content_type}");
                visitor.visit_request_body(&path, scope, content_type, body);
                if let Some(schema) = media.schema {
                    self.walk_schema(&path, schema, visitor, active);
                }
            }
        }

        for (status, response) in &operation.responses {
            if response.content.is_empty() {
                let path = format!("{operation_path}/response/{status}");
                visitor.visit_response(&path, scope, status, None, response);
                continue;
            }
            for (content_type, media) in &response.content {
                let path = format!("{operation_path}/response/{status}/{content_type}");
                visitor.visit_response(&path, scope, status, Some(content_type), response);
                if let Some(schema) = media.schema {
                    self.walk_schema(&path, schema, visitor, active);
                }
            }
        }
    }

    fn walk_parameter<V: Visitor + ?Sized>(
        &self,
        path: &str,
        scope: Scope<'_>,
        parameter: &Parameter,
        visitor: &mut V,
        active: &mut HashSet<SchemaId>,
    ) {
        visitor.visit_parameter(path, scope, parameter);
        if let Some(schema) = parameter.schema {
            visitor.visit_property(path, schema);
            self.walk_schema(path, schema, visitor, active);
        }
    }

    fn walk_schema<V: Visitor + ?Sized>(
        &self,
        base: &str,
        id: SchemaId,
        visitor: &mut V,
        active: &mut HashSet<SchemaId>,
    ) {
        let Some(schema) = self.document.schema(id) else {
            return;
        };
        if !active.insert(id) {
            trace!(path = base, %id, "schema already on stack");
            return;
        }

        for (name, &child) in &schema.properties {
            let path = format!("{base}.{name}");
            visitor.visit_property(&path, child);
            self.walk_schema(&path, child, visitor, active);
        }

        if let Some(items) = schema.items {
            self.walk_schema(&format!("{base}[]"), items, visitor, active);
        }

        for (i, &branch) in schema.all_of.iter().enumerate() {
            self.walk_schema(&format!("{base}/allOf[{i}]"), branch, visitor, active);
        }
        for (i, &branch) in schema.any_of.iter().enumerate() {
            self.walk_schema(&format!("{base}/anyOf[{i}]"), branch, visitor, active);
        }
        for (i, &branch) in schema.one_of.iter().enumerate() {
            self.walk_schema(&format!("{base}/oneOf[{i}]"), branch, visitor, active);
        }

        if let Some(not) = schema.not {
            self.walk_schema(&format!("{base}/not"), not, visitor, active);
        }

        if let Some(values) = schema.additional_properties_schema() {
            let path = format!("{base}/additionalProperties");
            visitor.visit_property(&path, values);
            self.walk_schema(&path, values, visitor, active);
        }

        active.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{AdditionalProperties, MediaType, Schema};

    #[derive(Default)]
    struct Properties(Vec<String>);

    impl Visitor for Properties {
        fn visit_property(&mut self, path: &str, _schema: SchemaId) {
            self.0.push(path.to_string());
        }
    }

    fn response_with(doc: &mut Document, schema: SchemaId) {
        let mut response = Response::default();
        response.content.insert(
            "application/json".to_string(),
            MediaType {
                schema: Some(schema),
                ..MediaType::default()
            },
        );
        let mut operation = Operation::default();
        operation.responses.insert("200".to_string(), response);
        let mut item = PathItem::default();
        item.insert_operation(Method::Get, operation);
        doc.paths.insert("/x".to_string(), item);
    }

    #[test]
    fn self_loop_terminates() {
        let mut doc = Document::new();
        let node = doc.add_schema(Schema::of_type("object"));
        let name = doc.add_schema(Schema::of_type("string"));
        let schema = doc.schema_mut(node).unwrap();
        schema.properties.insert("name".to_string(), name);
        schema.properties.insert("parent".to_string(), node);
        response_with(&mut doc, node);

        let mut props = Properties::default();
        SpecWalker::new(&doc).walk(&mut props);
        assert_eq!(
            props.0,
            vec![
                "/x/GET/response/200/application/json.name",
                "/x/GET/response/200/application/json.parent",
            ]
        );
    }

    #[test]
    fn sibling_paths_revisit_shared_schema() {
        let mut doc = Document::new();
        let address = doc.add_schema(Schema::of_type("object"));
        let street = doc.add_schema(Schema::of_type("string"));
        doc.schema_mut(address)
            .unwrap()
            .properties
            .insert("street".to_string(), street);
        let mut root = Schema::of_type("object");
        root.properties.insert("home".to_string(), address);
        root.properties.insert("work".to_string(), address);
        let root = doc.add_schema(root);
        response_with(&mut doc, root);

        let mut props = Properties::default();
        SpecWalker::new(&doc).walk(&mut props);
        assert!(props.0.iter().any(|p| p.ends_with(".home.street")));
        assert!(props.0.iter().any(|p| p.ends_with(".work.street")));
    }

    #[test]
    fn additional_properties_reported_as_property() {
        let mut doc = Document::new();
        let value = doc.add_schema(Schema::of_type("integer"));
        let mut map = Schema::of_type("object");
        map.additional_properties = Some(AdditionalProperties::Schema(value));
        let map = doc.add_schema(map);
        response_with(&mut doc, map);

        let mut props = Properties::default();
        SpecWalker::new(&doc).walk(&mut props);
        assert_eq!(
            props.0,
            vec!["/x/GET/response/200/application/json/additionalProperties"]
        );
    }

    #[test]
    fn dangling_schema_id_is_skipped() {
        let mut doc = Document::new();
        response_with(&mut doc, SchemaId(42));
        let mut props = Properties::default();
        SpecWalker::new(&doc).walk(&mut props);
        assert!(props.0.is_empty());
    }
}
