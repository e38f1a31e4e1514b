//! Walker visitor that accumulates a [`DataModel`]
//!
//! Field trees are built with their own active-stack recursion rather than
//! from walker events, because a field owns its whole subtree while the
//! walker only streams paths.

use crate::hint::Hint;
use crate::model::{DataModel, DataStructure, Field};
use slsbench_spec::{
    Document, Operation, Parameter, ParameterLocation, PathItem, RequestBody, Response, Schema,
    SchemaId, Scope, SpecWalker, Visitor,
};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Build the data model of `document`
#[must_use]
pub fn build_data_model(document: &Document) -> DataModel {
    let mut builder = DataModelBuilder::new(document);
    SpecWalker::new(document).walk(&mut builder);
    builder.finish()
}

/// Visitor turning walker events into a [`DataModel`]
#[derive(Debug)]
pub struct DataModelBuilder<'d> {
    document: &'d Document,
    model: DataModel,
    /// Path-level parameters of the path currently being walked
    shared_parameters: Vec<Field>,
}

impl<'d> DataModelBuilder<'d> {
    #[must_use]
    pub fn new(document: &'d Document) -> Self {
        Self {
            document,
            model: DataModel::new(),
            shared_parameters: Vec::new(),
        }
    }

    /// Consume the builder and return the model
    #[must_use]
    pub fn finish(self) -> DataModel {
        debug!(
            endpoints = self.model.endpoints.len(),
            operations = self.model.operation_count(),
            "data model built"
        );
        self.model
    }

    fn parameter_field(&self, path: &str, parameter: &Parameter) -> Option<Field> {
        if !matches!(
            parameter.location,
            ParameterLocation::Query | ParameterLocation::Path
        ) {
            return None;
        }
        let schema = parameter.schema?;
        let mut field =
            self.build_field(&parameter.name, schema, path.to_string(), &mut HashSet::new());
        field.required = parameter.required;
        field.location = Some(parameter.location);
        Some(field)
    }

    fn data_structure(&self, path: &str, content_type: &str, schema: SchemaId) -> DataStructure {
        let mut active = HashSet::new();
        let fields = match self.document.schema(schema) {
            Some(root) => {
                active.insert(schema);
                self.collect_fields(root, path, &mut active)
            }
            None => Vec::new(),
        };
        DataStructure {
            name: path.to_string(),
            reference: self.document.reference_of(schema),
            content_type: content_type.to_string(),
            fields,
        }
    }

    /// Fields of an object schema: its properties, then those of its `allOf` branches
    fn collect_fields(
        &self,
        schema: &Schema,
        base: &str,
        active: &mut HashSet<SchemaId>,
    ) -> Vec<Field> {
        let mut fields = Vec::with_capacity(schema.properties.len());

        for (name, &child) in &schema.properties {
            let mut field = self.build_field(name, child, format!("{base}.{name}"), active);
            field.required = schema.requires(name);
            fields.push(field);
        }

        for (i, &branch) in schema.all_of.iter().enumerate() {
            let Some(branch_schema) = self.document.schema(branch) else {
                continue;
            };
            if !active.insert(branch) {
                continue;
            }
            fields.extend(self.collect_fields(
                branch_schema,
                &format!("{base}/allOf[{i}]"),
                active,
            ));
            active.remove(&branch);
        }

        fields
    }

    fn build_field(
        &self,
        name: &str,
        id: SchemaId,
        path: String,
        active: &mut HashSet<SchemaId>,
    ) -> Field {
        let mut field = Field::new(name, path);
        field.reference = self.document.reference_of(id);

        let Some(schema) = self.document.schema(id) else {
            return field;
        };

        // `allOf: [{$ref: Scalar}]` takes its type from the first typed branch.
        let declared = schema.primary_type().or_else(|| {
            schema
                .all_of
                .iter()
                .find_map(|&branch| self.document.schema(branch).and_then(Schema::primary_type))
        });
        field.field_type = declared.unwrap_or_default().to_string();
        field.format.clone_from(&schema.format);
        field.unique = schema.unique.unwrap_or(false);
        field.min = schema.minimum;
        field.max = schema.maximum;
        field.min_length = schema.min_length;
        field.max_length = schema.max_length;
        field.pattern.clone_from(&schema.pattern);
        field.hint = schema.user_hint.as_deref().and_then(|raw| match raw.parse::<Hint>() {
            Ok(hint) => Some(hint),
            Err(err) => {
                warn!(path = %field.path, error = %err, "ignoring unknown hint");
                None
            }
        });

        // Already being expanded further up: keep the leaf attributes only.
        if !active.insert(id) {
            return field;
        }

        if let Some(items) = schema.items {
            let item_path = format!("{}[]", field.path);
            field.items = Some(Box::new(self.build_field("", items, item_path, active)));
        }

        for nested in self.collect_fields(schema, &field.path, active) {
            field.properties.insert(nested.name.clone(), nested);
        }

        active.remove(&id);
        field
    }
}

impl Visitor for DataModelBuilder<'_> {
    fn visit_path(&mut self, _path: &str, _item: &PathItem) {
        self.shared_parameters.clear();
    }

    fn visit_operation(&mut self, _path: &str, scope: Scope<'_>, _operation: &Operation) {
        let Some(method) = scope.method else {
            return;
        };
        let shared = self.shared_parameters.clone();
        let operation = self.model.operation_mut(scope.endpoint, method);
        operation.parameters.extend(shared);
    }

    fn visit_parameter(&mut self, path: &str, scope: Scope<'_>, parameter: &Parameter) {
        let Some(field) = self.parameter_field(path, parameter) else {
            return;
        };
        let Some(method) = scope.method else {
            self.shared_parameters.push(field);
            return;
        };

        let operation = self.model.operation_mut(scope.endpoint, method);
        // An operation-level parameter overrides the path-level one.
        match operation
            .parameters
            .iter_mut()
            .find(|p| p.name == field.name && p.location == field.location)
        {
            Some(existing) => *existing = field,
            None => operation.parameters.push(field),
        }
    }

    fn visit_request_body(
        &mut self,
        path: &str,
        scope: Scope<'_>,
        content_type: &str,
        body: &RequestBody,
    ) {
        let Some(method) = scope.method else {
            return;
        };
        let Some(schema) = body.content.get(content_type).and_then(|m| m.schema) else {
            return;
        };
        if self
            .model
            .operation(scope.endpoint, method)
            .is_some_and(|op| op.request_body.is_some())
        {
            debug!(path, "keeping first request body content type");
            return;
        }
        let structure = self.data_structure(path, content_type, schema);
        self.model.operation_mut(scope.endpoint, method).request_body = Some(structure);
    }

    fn visit_response(
        &mut self,
        path: &str,
        scope: Scope<'_>,
        status: &str,
        content_type: Option<&str>,
        response: &Response,
    ) {
        let Some(method) = scope.method else {
            return;
        };
        let structure = content_type
            .and_then(|ct| response.content.get(ct).and_then(|m| m.schema).map(|s| (ct, s)))
            .map(|(ct, schema)| self.data_structure(path, ct, schema));

        let operation = self.model.operation_mut(scope.endpoint, method);
        match operation.responses.get(status) {
            Some(Some(_)) => {}
            _ => {
                operation.responses.insert(status.to_string(), structure);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slsbench_spec::Method;

    const NESTED: &str = r##"
openapi: 3.0.3
paths:
  /orders:
    post:
      requestBody:
        content:
          application/json:
            schema:
              type: object
              required: [customer]
              properties:
                customer:
                  type: object
                  required: [email]
                  properties:
                    email: {type: string, x-user-hint: email}
                    nickname: {type: string}
                lines:
                  type: array
                  items:
                    type: object
                    properties:
                      sku: {type: string, pattern: "^[A-Z]{3}$"}
                      qty: {type: integer, minimum: 1}
      responses:
        "201": {description: created}
"##;

    #[test]
    fn nested_required_comes_from_parent() {
        let doc = Document::from_yaml_str(NESTED).unwrap();
        let model = build_data_model(&doc);
        let body = model
            .operation("/orders", Method::Post)
            .and_then(|op| op.request_body.as_ref())
            .unwrap();

        let customer = body.field("customer").unwrap();
        assert!(customer.required);
        assert!(customer.properties["email"].required);
        assert!(!customer.properties["nickname"].required);
        assert_eq!(customer.properties["email"].hint, Some(Hint::Email));
        assert!(!body.field("lines").unwrap().required);
    }

    #[test]
    fn array_items_get_bracketed_paths_and_constraints() {
        let doc = Document::from_yaml_str(NESTED).unwrap();
        let model = build_data_model(&doc);
        let body = model.operation("/orders", Method::Post).unwrap().request_body.as_ref().unwrap();

        let lines = body.field("lines").unwrap();
        assert_eq!(lines.field_type, "array");
        let item = lines.items.as_deref().unwrap();
        assert_eq!(item.path, "/orders/POST/requestBody/application/json.lines[]");
        assert_eq!(item.properties["qty"].min, Some(1.0));
        assert_eq!(item.properties["sku"].pattern.as_deref(), Some("^[A-Z]{3}$"));
        assert_eq!(
            item.properties["sku"].path,
            "/orders/POST/requestBody/application/json.lines[].sku"
        );
    }

    #[test]
    fn bodyless_response_is_recorded_as_none() {
        let doc = Document::from_yaml_str(NESTED).unwrap();
        let model = build_data_model(&doc);
        let op = model.operation("/orders", Method::Post).unwrap();
        assert_eq!(op.responses.len(), 1);
        assert_eq!(op.responses["201"], None);
    }

    #[test]
    fn unknown_hint_is_dropped() {
        let mut doc = Document::new();
        let mut schema = Schema::of_type("string");
        schema.user_hint = Some("shoeSize".to_string());
        let id = doc.add_schema(schema);
        let builder = DataModelBuilder::new(&doc);
        let field = builder.build_field("size", id, "p".to_string(), &mut HashSet::new());
        assert_eq!(field.hint, None);
        assert_eq!(field.field_type, "string");
    }
}
