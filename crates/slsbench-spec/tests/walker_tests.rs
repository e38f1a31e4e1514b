use pretty_assertions::assert_eq;
use proptest::prelude::*;
use slsbench_spec::{
    Document, Operation, Parameter, PathItem, RequestBody, Response, Schema, SchemaId, Scope,
    SpecWalker, Visitor,
};
use slsbench_test_utils::{
    load_fixture, ARRAY_RESPONSE, COMPOSITION, MOVIES, PARAMETERS, RECURSIVE, SIMPLE_USERS,
};

/// Records every event as a path string
#[derive(Default)]
struct Recorder {
    paths: Vec<String>,
    operations: Vec<String>,
    parameters: Vec<String>,
    request_bodies: Vec<String>,
    responses: Vec<String>,
    components: Vec<String>,
    properties: Vec<String>,
}

impl Recorder {
    fn walk(doc: &Document) -> Self {
        let mut recorder = Self::default();
        SpecWalker::new(doc).walk(&mut recorder);
        recorder
    }

    fn sorted_properties(&self) -> Vec<String> {
        let mut paths = self.properties.clone();
        paths.sort();
        paths
    }
}

impl Visitor for Recorder {
    fn visit_path(&mut self, path: &str, _item: &PathItem) {
        self.paths.push(path.to_string());
    }

    fn visit_operation(&mut self, path: &str, _scope: Scope<'_>, _operation: &Operation) {
        self.operations.push(path.to_string());
    }

    fn visit_parameter(&mut self, path: &str, _scope: Scope<'_>, _parameter: &Parameter) {
        self.parameters.push(path.to_string());
    }

    fn visit_request_body(
        &mut self,
        path: &str,
        _scope: Scope<'_>,
        _content_type: &str,
        _body: &RequestBody,
    ) {
        self.request_bodies.push(path.to_string());
    }

    fn visit_response(
        &mut self,
        path: &str,
        _scope: Scope<'_>,
        _status: &str,
        _content_type: Option<&str>,
        _response: &Response,
    ) {
        self.responses.push(path.to_string());
    }

    fn visit_component_schema(&mut self, name: &str, _schema: SchemaId) {
        self.components.push(name.to_string());
    }

    fn visit_property(&mut self, path: &str, _schema: SchemaId) {
        self.properties.push(path.to_string());
    }
}

#[test]
fn simple_object_reports_three_leaves() {
    let recorder = Recorder::walk(&load_fixture(SIMPLE_USERS));
    assert_eq!(
        recorder.sorted_properties(),
        vec![
            "/api/users/GET/response/200/application/json.email",
            "/api/users/GET/response/200/application/json.id",
            "/api/users/GET/response/200/application/json.name",
        ]
    );
    assert_eq!(recorder.paths, vec!["/api/users"]);
    assert_eq!(recorder.operations, vec!["/api/users/GET"]);
    assert_eq!(
        recorder.responses,
        vec!["/api/users/GET/response/200/application/json"]
    );
}

#[test]
fn array_boundaries_carry_bracket_segment() {
    let recorder = Recorder::walk(&load_fixture(ARRAY_RESPONSE));
    let base = "/api/items/GET/response/200/application/json";
    assert_eq!(
        recorder.sorted_properties(),
        vec![
            format!("{base}[].id"),
            format!("{base}[].name"),
            format!("{base}[].tags"),
            format!("{base}[].tags[].name"),
        ]
    );
}

#[test]
fn composition_branches_extend_path() {
    let recorder = Recorder::walk(&load_fixture(COMPOSITION));
    let request = "/shapes/POST/requestBody/application/json";
    let response = "/shapes/POST/response/200/application/json";
    let mut expected = vec![
        format!("{request}/allOf[0].name"),
        format!("{request}/allOf[1].sides"),
        format!("{response}.colour"),
        format!("{response}.colour/anyOf[0].rgb"),
        format!("{response}.outline"),
        format!("{response}.outline/oneOf[0].width"),
        format!("{response}.forbidden"),
        format!("{response}.forbidden/not.secret"),
        format!("{response}.labels"),
        format!("{response}.labels/additionalProperties"),
        "#/components/schemas/Named.name".to_string(),
    ];
    expected.sort();
    assert_eq!(recorder.sorted_properties(), expected);
    assert_eq!(recorder.components, vec!["Named"]);
}

#[test]
fn recursive_schemas_terminate_and_visit_each_acyclic_path() {
    let recorder = Recorder::walk(&load_fixture(RECURSIVE));
    let tree = "/tree/GET/response/200/application/json";
    let authors = "/authors/POST/requestBody/application/json";
    let mut expected = vec![
        format!("{tree}.value"),
        format!("{tree}.children"),
        format!("{authors}.name"),
        format!("{authors}.books"),
        format!("{authors}.books[].title"),
        format!("{authors}.books[].author"),
        "#/components/schemas/Node.value".to_string(),
        "#/components/schemas/Node.children".to_string(),
        "#/components/schemas/Author.name".to_string(),
        "#/components/schemas/Author.books".to_string(),
        "#/components/schemas/Author.books[].title".to_string(),
        "#/components/schemas/Author.books[].author".to_string(),
        "#/components/schemas/Book.title".to_string(),
        "#/components/schemas/Book.author".to_string(),
        "#/components/schemas/Book.author.name".to_string(),
        "#/components/schemas/Book.author.books".to_string(),
    ];
    expected.sort();
    assert_eq!(recorder.sorted_properties(), expected);
}

#[test]
fn parameters_are_visited_and_reported_as_properties() {
    let recorder = Recorder::walk(&load_fixture(PARAMETERS));
    let base = "/tenants/{tenant}/orders";
    assert_eq!(
        recorder.parameters,
        vec![
            format!("{base}/parameter/tenant"),
            format!("{base}/GET/parameter/limit"),
            format!("{base}/GET/parameter/X-Trace"),
            format!("{base}/GET/parameter/session"),
            format!("{base}/POST/parameter/tenant"),
        ]
    );

    let mut expected: Vec<String> = recorder.parameters.clone();
    expected.push(format!("{base}/POST/requestBody/application/json.sku"));
    expected.sort();
    assert_eq!(recorder.sorted_properties(), expected);
}

#[test]
fn bodyless_responses_are_reported_without_content_type() {
    let recorder = Recorder::walk(&load_fixture(PARAMETERS));
    assert_eq!(
        recorder.responses,
        vec![
            "/tenants/{tenant}/orders/GET/response/200",
            "/tenants/{tenant}/orders/POST/response/201",
        ]
    );
    assert_eq!(
        recorder.request_bodies,
        vec!["/tenants/{tenant}/orders/POST/requestBody/application/json"]
    );
}

#[test]
fn operations_follow_method_order() {
    let recorder = Recorder::walk(&load_fixture(MOVIES));
    assert_eq!(
        recorder.operations,
        vec![
            "/movies/GET",
            "/movies/POST",
            "/movies/{id}/GET",
            "/movies/{id}/DELETE",
        ]
    );
}

#[test]
fn empty_document_visits_nothing() {
    let recorder = Recorder::walk(&Document::new());
    assert!(recorder.paths.is_empty());
    assert!(recorder.properties.is_empty());
}

#[test]
fn default_visitor_methods_are_no_ops() {
    struct Silent;
    impl Visitor for Silent {}

    SpecWalker::new(&load_fixture(RECURSIVE)).walk(&mut Silent);
}

fn arena(links: &[(usize, usize, bool)], size: usize) -> Document {
    let mut doc = Document::new();
    let ids: Vec<SchemaId> = (0..size)
        .map(|_| doc.add_schema(Schema::of_type("object")))
        .collect();
    for (n, &(from, to, as_items)) in links.iter().enumerate() {
        let (from, to) = (ids[from % size], ids[to % size]);
        if let Some(schema) = doc.schema_mut(from) {
            if as_items {
                schema.items = Some(to);
            } else {
                schema.properties.insert(format!("p{n}"), to);
            }
        }
    }
    for (i, id) in ids.iter().enumerate() {
        doc.insert_component_schema(format!("S{i}"), *id);
    }
    doc
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_walk_terminates_on_cyclic_arenas(
        size in 1..6usize,
        links in proptest::collection::vec((0..6usize, 0..6usize, any::<bool>()), 0..8),
    ) {
        let doc = arena(&links, size);
        let recorder = Recorder::walk(&doc);
        prop_assert_eq!(recorder.components.len(), size);
        // Every reported path stays below the component it started from.
        for path in &recorder.properties {
            prop_assert!(path.starts_with("#/components/schemas/S"));
        }
    }
}
