//! Subcommand implementations
//!
//! Each command is generic over the [`Selector`] so the same code runs
//! against the terminal and against scripted answers.

use crate::config::Settings;
use anyhow::Context;
use chrono::Local;
use slsbench_core::{build_data_model, enrich_document, Selector};
use slsbench_scenario::{
    load_scenario, log_execution_order, save_scenario, GraphError, ScenarioBuilder, ScenarioGraph,
};
use slsbench_spec::{load_document, save_yaml};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Load `spec`, ask for a hint on every leaf field, write the enriched copy
///
/// Returns the path of the written document.
pub fn enrich<S: Selector>(
    spec: &Path,
    settings: &Settings,
    selector: S,
) -> anyhow::Result<PathBuf> {
    let mut document = load_document(spec)
        .with_context(|| format!("failed to load OpenAPI document {}", spec.display()))?;

    let report = enrich_document(&mut document, selector);
    if report.abandoned > 0 {
        warn!(abandoned = report.abandoned, "some fields were left without a hint");
    }

    let output = prepare_output(settings, "enriched-spec", "yaml")?;
    save_yaml(&document, &output)
        .with_context(|| format!("failed to write enriched document {}", output.display()))?;
    info!(path = %output.display(), "enriched document written");
    Ok(output)
}

/// Build a scenario over `spec` interactively and save it
///
/// `on_step` sees the graph after every builder action. Returns the path of
/// the written scenario.
pub fn scenario<S, F>(
    spec: &Path,
    settings: &Settings,
    selector: S,
    mut on_step: F,
) -> anyhow::Result<PathBuf>
where
    S: Selector,
    F: FnMut(&ScenarioGraph),
{
    let document = load_document(spec)
        .with_context(|| format!("failed to load OpenAPI document {}", spec.display()))?;
    let model = build_data_model(&document);
    info!(
        endpoints = model.endpoints.len(),
        operations = model.operation_count(),
        "data model built"
    );

    let graph = ScenarioBuilder::new(&model).run_with(selector, |graph, _, _| on_step(graph));
    log_execution_order(&graph);

    let output = prepare_output(settings, "scenario", "json")?;
    save_scenario(&graph, &output, settings.pretty_json)
        .with_context(|| format!("failed to write scenario {}", output.display()))?;
    Ok(output)
}

/// Execution order of a saved scenario as display lines
///
/// `Err` carries the cycle when there is no order.
pub fn order(path: &Path) -> anyhow::Result<Result<Vec<String>, CycleReport>> {
    let graph = load_scenario(path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    Ok(order_lines(&graph))
}

/// Why a scenario has no execution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub error: GraphError,
    /// Vertex labels of each cycle
    pub groups: Vec<Vec<String>>,
}

/// `"<step>. [<id>] <label>"` per vertex in topological order
pub fn order_lines(graph: &ScenarioGraph) -> Result<Vec<String>, CycleReport> {
    match graph.topological_sort() {
        Ok(order) => Ok(order
            .iter()
            .enumerate()
            .filter_map(|(step, id)| {
                graph
                    .vertex(*id)
                    .map(|v| format!("{}. [{id}] {}", step + 1, v.label()))
            })
            .collect()),
        Err(error) => {
            let groups = graph
                .cyclic_groups()
                .into_iter()
                .map(|group| {
                    group
                        .into_iter()
                        .filter_map(|id| graph.vertex(id).map(|v| format!("[{id}] {}", v.label())))
                        .collect()
                })
                .collect();
            Err(CycleReport { error, groups })
        }
    }
}

fn prepare_output(settings: &Settings, prefix: &str, extension: &str) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(&settings.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            settings.output_dir.display()
        )
    })?;
    Ok(settings.output_path(prefix, extension, &Local::now())?)
}
