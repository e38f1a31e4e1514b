use pretty_assertions::assert_eq;
use slsbench_core::{
    build_data_model, DataModel, ReplaySelector, SelectError, SelectResult, Selection, Selector,
};
use slsbench_scenario::{
    request_field_paths, Action, ActionOutcome, Rejection, ScenarioBuilder, VertexId,
};
use slsbench_spec::Method;
use slsbench_test_utils::{load_fixture, MOVIES};
use std::collections::VecDeque;

const ADD_VERTEX: usize = 0;
const ADD_EDGE: usize = 1;
const ADD_MAPPING: usize = 2;
const FINISH: usize = 3;

// Catalogue of MOVIES: GET /movies, POST /movies, GET /movies/{id},
// DELETE /movies/{id}, POST /reviews.
const POST_MOVIES: usize = 1;
const GET_MOVIE: usize = 2;
const POST_REVIEWS: usize = 4;

fn movies() -> DataModel {
    build_data_model(&load_fixture(MOVIES))
}

/// Two vertices, one edge between them
fn connected_script() -> Vec<usize> {
    vec![
        ADD_VERTEX, POST_MOVIES, 0, // 201
        ADD_VERTEX, POST_REVIEWS, // single response, no prompt
        ADD_EDGE, 0, 0,
    ]
}

#[test]
fn two_vertices_one_edge_one_mapping() {
    let model = movies();
    let mut script = connected_script();
    script.extend([ADD_MAPPING, 0, 0, 0, FINISH]);
    let mut selector = ReplaySelector::new(script);

    let graph = ScenarioBuilder::new(&model).run(&mut selector);

    assert_eq!(graph.vertex_count(), 2);
    assert_eq!(graph.vertex(VertexId(0)).unwrap().label(), "POST /movies [201]");
    assert_eq!(graph.vertex(VertexId(1)).unwrap().label(), "POST /reviews [201]");
    assert_eq!(graph.edge_count(), 1);
    let edge = graph.edge(VertexId(0), VertexId(1)).unwrap();
    assert_eq!(edge.mappings.len(), 1);
    assert_eq!(edge.mappings["body.id"], "body.movie_id");
    assert_eq!(selector.remaining(), 0);
}

#[test]
fn prompts_follow_the_action_sequence() {
    let model = movies();
    let mut script = connected_script();
    script.push(FINISH);
    let mut selector = ReplaySelector::new(script);
    ScenarioBuilder::new(&model).run(&mut selector);

    assert_eq!(
        selector.prompts(),
        [
            "Select action",
            "Select endpoint to add",
            "Select response code",
            "Select action",
            "Select endpoint to add",
            "Select action",
            "Select SOURCE vertex (response provider)",
            "Select TARGET vertex (request consumer)",
            "Select action",
        ]
    );
}

#[test]
fn duplicate_edge_is_rejected() {
    let model = movies();
    let mut script = connected_script();
    script.extend([ADD_EDGE, 0, 0, FINISH]);

    let mut outcomes = Vec::new();
    let graph =
        ScenarioBuilder::new(&model).run_with(ReplaySelector::new(script), |_, action, outcome| {
            outcomes.push((action, outcome.clone()));
        });

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(
        outcomes[3],
        (
            Action::AddEdge,
            ActionOutcome::Rejected(Rejection::DuplicateEdge {
                from: VertexId(0),
                to: VertexId(1)
            })
        )
    );
    assert_eq!(outcomes.last().unwrap().1, ActionOutcome::Finished);
}

#[test]
fn reverse_edge_is_allowed_and_makes_a_cycle() {
    let model = movies();
    let mut script = connected_script();
    script.extend([ADD_EDGE, 1, 0, FINISH]);
    let graph = ScenarioBuilder::new(&model).run(ReplaySelector::new(script));

    assert_eq!(graph.edge_count(), 2);
    assert!(graph.topological_sort().is_err());
    assert_eq!(graph.cyclic_groups(), vec![vec![VertexId(0), VertexId(1)]]);
}

#[test]
fn remapping_a_source_field_overwrites_its_target() {
    let model = movies();
    let mut script = connected_script();
    script.extend([ADD_MAPPING, 0, 0, 0]); // body.id -> body.movie_id
    script.extend([ADD_MAPPING, 0, 0, 1]); // body.id -> body.rating
    script.push(FINISH);
    let graph = ScenarioBuilder::new(&model).run(ReplaySelector::new(script));

    let edge = graph.edge(VertexId(0), VertexId(1)).unwrap();
    assert_eq!(edge.mappings.len(), 1);
    assert_eq!(edge.mappings["body.id"], "body.rating");
}

#[test]
fn parameters_are_offered_with_their_location() {
    let model = movies();
    let mut builder = ScenarioBuilder::new(&model);
    let mut selector = ReplaySelector::new([GET_MOVIE]);
    assert_eq!(builder.apply(Action::AddVertex, &mut selector), ActionOutcome::Applied);

    let vertex = builder.graph().vertex(VertexId(0)).unwrap();
    assert_eq!(vertex.response_code, "200");
    assert_eq!(request_field_paths(vertex), vec!["path.id"]);
}

#[test]
fn mapping_needs_fields_on_both_sides() {
    let mut model = DataModel::new();
    for path in ["/health", "/ping"] {
        model
            .operation_mut(path, Method::Get)
            .responses
            .insert("200".into(), None);
    }

    let mut builder = ScenarioBuilder::new(&model);
    // Both vertices, then the only possible edge.
    let mut selector = ReplaySelector::new([0, 1, 0, 0, 0]);
    builder.apply(Action::AddVertex, &mut selector);
    builder.apply(Action::AddVertex, &mut selector);
    builder.apply(Action::AddEdge, &mut selector);
    assert_eq!(
        builder.apply(Action::AddMapping, &mut selector),
        ActionOutcome::Rejected(Rejection::NoSourceFields)
    );
    assert!(builder.graph().edges()[0].mappings.is_empty());
}

#[test]
fn menu_failure_finishes_with_what_was_built() {
    let model = movies();
    let graph = ScenarioBuilder::new(&model).run(ReplaySelector::new([ADD_VERTEX, POST_REVIEWS]));
    assert_eq!(graph.vertex_count(), 1);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn empty_model_yields_empty_scenario_without_prompting() {
    let model = DataModel::new();
    let mut selector = ReplaySelector::new([ADD_VERTEX]);
    let graph = ScenarioBuilder::new(&model).run(&mut selector);
    assert!(graph.is_empty());
    assert!(selector.prompts().is_empty());
}

/// Answers with raw indices, without checking them against the options
struct UncheckedSelector(VecDeque<usize>);

impl Selector for UncheckedSelector {
    fn select(&mut self, _label: &str, _options: &[String]) -> SelectResult<Selection> {
        let index = self.0.pop_front().ok_or(SelectError::Exhausted)?;
        Ok(Selection {
            index,
            label: String::new(),
        })
    }
}

#[test]
fn out_of_range_answers_abandon_the_action() {
    let model = movies();
    let mut builder = ScenarioBuilder::new(&model);

    let mut selector = UncheckedSelector(VecDeque::from([9]));
    assert_eq!(
        builder.apply(Action::AddVertex, &mut selector),
        ActionOutcome::Abandoned(SelectError::OutOfRange { index: 9, len: 5 })
    );
    assert!(builder.graph().is_empty());

    // POST /movies offers two response codes
    let mut selector = UncheckedSelector(VecDeque::from([POST_MOVIES, 7]));
    assert_eq!(
        builder.apply(Action::AddVertex, &mut selector),
        ActionOutcome::Abandoned(SelectError::OutOfRange { index: 7, len: 2 })
    );

    let mut selector = ReplaySelector::new([POST_MOVIES, 0, POST_REVIEWS, 0, 0]);
    for action in [Action::AddVertex, Action::AddVertex, Action::AddEdge] {
        assert_eq!(builder.apply(action, &mut selector), ActionOutcome::Applied);
    }

    let mut selector = UncheckedSelector(VecDeque::from([2]));
    assert_eq!(
        builder.apply(Action::AddEdge, &mut selector),
        ActionOutcome::Abandoned(SelectError::OutOfRange { index: 2, len: 2 })
    );
    let mut selector = UncheckedSelector(VecDeque::from([0, 1]));
    assert_eq!(
        builder.apply(Action::AddEdge, &mut selector),
        ActionOutcome::Abandoned(SelectError::OutOfRange { index: 1, len: 1 })
    );
    let mut selector = UncheckedSelector(VecDeque::from([3]));
    assert_eq!(
        builder.apply(Action::AddMapping, &mut selector),
        ActionOutcome::Abandoned(SelectError::OutOfRange { index: 3, len: 1 })
    );
    assert_eq!(builder.graph().edge_count(), 1);
}
