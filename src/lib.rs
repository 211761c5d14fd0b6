use crate::config::PlannerConfig;
use crate::domain::candidate_set::CandidateSet;
use crate::domain::distance_table::DistanceTable;
use crate::domain::graph::Graph;
use crate::domain::optimizer::{SearchOptions, parallel, single_agent};
use crate::error::Result;
use crate::loader::{InputFormat, load_scenario};

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Best totals per search mode. A mode that was not run is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanReport {
    pub single_agent: Option<u64>,
    pub dual_agent: Option<u64>,
}

/// Loads a scenario file, builds the graph and runs the configured searches.
///
/// An entry id named by the scenario itself takes precedence over `config.entry`.
pub fn plan_from_file(file_path: &str, format: InputFormat, config: &PlannerConfig) -> Result<PlanReport> {
    config.validate()?;

    let scenario = load_scenario(file_path, format)?;
    log::info!("Scenario parsed successfully: {} node records.", scenario.records.len());

    let entry = scenario.entry.unwrap_or_else(|| config.entry.clone());
    let graph = Graph::build(scenario.records, &entry)?;

    plan(&graph, config)
}

/// Runs the configured searches over every reward-bearing node of `graph`.
pub fn plan(graph: &Graph, config: &PlannerConfig) -> Result<PlanReport> {
    config.validate()?;

    let table = DistanceTable::build(graph)?;
    let candidates = CandidateSet::all(&table);
    let options = SearchOptions { pruning: config.pruning };
    let entry = graph.entry();

    let mut report = PlanReport::default();

    if config.mode.runs_single() {
        let outcome = single_agent::optimize_with(&table, entry, candidates, config.single_agent_budget, options)?;
        log::info!("Single-agent best within {} ticks: {} ({} states visited).", config.single_agent_budget, outcome.best, outcome.stats.visited);
        report.single_agent = Some(outcome.best);
    }

    if config.mode.runs_dual() {
        let outcome = parallel::optimize_dual_parallel_with(&table, entry, candidates, config.dual_agent_budget, config.worker_count, options)?;
        log::info!("Dual-agent best within {} ticks: {} ({} states visited).", config.dual_agent_budget, outcome.best, outcome.stats.visited);
        report.dual_agent = Some(outcome.best);
    }

    Ok(report)
}
