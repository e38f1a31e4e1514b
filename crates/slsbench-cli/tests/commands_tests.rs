use pretty_assertions::assert_eq;
use slsbench_cli::commands::{self, order_lines};
use slsbench_cli::Settings;
use slsbench_core::{build_data_model, Hint, ReplaySelector};
use slsbench_scenario::{load_scenario, save_scenario, VertexId};
use slsbench_spec::{load_document, Method, ParameterLocation};
use slsbench_test_utils::{graph_with_edges, MOVIES};
use std::path::{Path, PathBuf};

fn write_spec(dir: &Path) -> PathBuf {
    let path = dir.join("movies.yaml");
    std::fs::write(&path, MOVIES).unwrap();
    path
}

fn settings(dir: &Path) -> Settings {
    Settings::new()
        .with_output_dir(dir.join("out"))
        .with_timestamp_format("%Y%m%d%H%M%S%f")
}

#[test]
fn enrich_writes_a_reloadable_document() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(dir.path());
    let email = Hint::ALL.iter().position(|h| *h == Hint::Email).unwrap();

    // Only the first field (the `genre` query parameter) is answered.
    let output =
        commands::enrich(&spec, &settings(dir.path()), ReplaySelector::new([email])).unwrap();

    let name = output.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("enriched-spec-") && name.ends_with(".yaml"));
    assert_eq!(output.parent().unwrap(), dir.path().join("out"));

    let model = build_data_model(&load_document(&output).unwrap());
    let genre = model
        .operation("/movies", Method::Get)
        .unwrap()
        .parameter("genre", ParameterLocation::Query)
        .unwrap();
    assert_eq!(genre.hint, Some(Hint::Email));
}

#[test]
fn enrich_reports_unreadable_input() {
    let dir = tempfile::tempdir().unwrap();
    let err = commands::enrich(
        &dir.path().join("missing.yaml"),
        &settings(dir.path()),
        ReplaySelector::default(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("missing.yaml"));
}

#[test]
fn scenario_is_built_and_saved() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(dir.path());
    // POST /movies [201], POST /reviews, edge 0 -> 1, body.id -> body.movie_id, done
    let script = [0, 1, 0, 0, 4, 1, 0, 0, 2, 0, 0, 0, 3];
    let mut steps = 0;

    let output = commands::scenario(&spec, &settings(dir.path()), ReplaySelector::new(script), |_| {
        steps += 1;
    })
    .unwrap();

    assert_eq!(steps, 5);
    let graph = load_scenario(&output).unwrap();
    assert_eq!(graph.vertex_count(), 2);
    let edge = graph.edge(VertexId(0), VertexId(1)).unwrap();
    assert_eq!(edge.mappings["body.id"], "body.movie_id");
}

#[test]
fn order_lists_every_vertex_once() {
    let graph = graph_with_edges(3, &[(2, 0), (0, 1)]);
    assert_eq!(
        order_lines(&graph).unwrap(),
        vec!["1. [2] GET /v2 [200]", "2. [0] GET /v0 [200]", "3. [1] GET /v1 [200]"]
    );
}

#[test]
fn order_of_a_cyclic_scenario_names_the_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cyclic.json");
    save_scenario(&graph_with_edges(3, &[(0, 1), (1, 0), (1, 2)]), &path, true).unwrap();

    let report = commands::order(&path).unwrap().unwrap_err();
    assert_eq!(
        report.groups,
        vec![vec!["[0] GET /v0 [200]".to_string(), "[1] GET /v1 [200]".to_string()]]
    );
}
